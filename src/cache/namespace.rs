//! Declarative description of a store's namespaces

use std::marker::PhantomData;

/// How a namespace holds its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceMode {
    /// At most one entry, for parameter-less endpoints
    Singleton,
    /// One entry per derived key
    Keyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSpec {
    pub name: &'static str,
    pub mode: NamespaceMode,
}

impl NamespaceSpec {
    pub const fn singleton(name: &'static str) -> Self {
        Self {
            name,
            mode: NamespaceMode::Singleton,
        }
    }

    pub const fn keyed(name: &'static str) -> Self {
        Self {
            name,
            mode: NamespaceMode::Keyed,
        }
    }
}

/// The set of namespaces one store instance owns, plus the storage name its
/// snapshot is persisted under.
#[derive(Debug, Clone, Copy)]
pub struct StoreManifest {
    pub storage_name: &'static str,
    pub namespaces: &'static [NamespaceSpec],
}

impl StoreManifest {
    pub fn find(&self, name: &str) -> Option<&NamespaceSpec> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }
}

/// Typed handle to a singleton namespace.
#[derive(Debug)]
pub struct SingletonSlot<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> SingletonSlot<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn spec(&self) -> NamespaceSpec {
        NamespaceSpec::singleton(self.name)
    }
}

/// Typed handle to a keyed namespace.
#[derive(Debug)]
pub struct KeyedSlot<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> KeyedSlot<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn spec(&self) -> NamespaceSpec {
        NamespaceSpec::keyed(self.name)
    }
}
