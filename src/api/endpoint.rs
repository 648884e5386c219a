//! Static description of a sport's upstream API and its cache layout

use crate::cache::StoreManifest;

/// An upstream path paired with the cache slot its responses live in.
#[derive(Debug)]
pub struct Endpoint<S> {
    pub path: &'static str,
    pub slot: S,
}

impl<S> Endpoint<S> {
    pub const fn new(path: &'static str, slot: S) -> Self {
        Self { path, slot }
    }
}

/// Untyped view of an endpoint: which namespace caches which path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub namespace: &'static str,
    pub path: &'static str,
}

impl Route {
    pub const fn new(namespace: &'static str, path: &'static str) -> Self {
        Self { namespace, path }
    }
}

/// Everything needed to build a client and a store for one sport.
#[derive(Debug, Clone, Copy)]
pub struct SportDescriptor {
    /// Short identifier, e.g. `"football"`
    pub name: &'static str,
    pub base_url: &'static str,
    pub manifest: StoreManifest,
    pub routes: &'static [Route],
}

impl SportDescriptor {
    pub fn route(&self, namespace: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.namespace == namespace)
    }
}
