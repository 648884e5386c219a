//! Generic keyed TTL store with snapshot persistence
//!
//! One [`CacheStore`] serves one sport. Its namespaces come from a
//! [`StoreManifest`]; values are held as JSON so a single engine can serve
//! every payload type, and the typed slot handles convert at the edges.
//!
//! Reads and writes are synchronous against the in-memory state. Every
//! mutation encodes the full snapshot while still holding the state lock and
//! queues it for a background writer task, which only ever writes the newest
//! queued snapshot. [`CacheStore::flush`] waits for the writer to catch up.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, trace, warn};

use crate::constants::cache_ttl;
use crate::error::AppError;

use super::clock::{Clock, SystemClock};
use super::entry::{CacheEntry, create_entry_at, is_valid_at, remaining_ttl_at};
use super::namespace::{KeyedSlot, NamespaceMode, SingletonSlot, StoreManifest};
use super::persistence::{NamespaceState, Snapshot, decode_snapshot, encode_snapshot};
use super::storage::StorageAdapter;

/// Construction options for a [`CacheStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// TTL used when nothing (or nothing readable) was persisted
    pub default_ttl_ms: u64,
    pub clock: Arc<dyn Clock>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_ttl_ms: cache_ttl::DEFAULT_MS,
            clock: Arc::new(SystemClock),
        }
    }
}

impl StoreOptions {
    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.default_ttl_ms = ttl_ms;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// How a store came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// State was restored from the storage adapter
    Hydrated,
    /// Nothing usable was persisted; the store started empty
    ColdStart,
}

/// Entry counts for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceStats {
    pub name: &'static str,
    pub mode: NamespaceMode,
    pub total: usize,
    /// Entries still inside the current TTL
    pub live: usize,
}

/// Snapshot of a store's size for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub storage_name: &'static str,
    pub ttl_ms: u64,
    pub namespaces: Vec<NamespaceStats>,
}

impl CacheStats {
    pub fn total_entries(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.total).sum()
    }

    pub fn live_entries(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.live).sum()
    }
}

enum PersistCommand {
    Write(String),
    Remove,
    Flush(oneshot::Sender<()>),
}

pub struct CacheStore {
    manifest: StoreManifest,
    state: Mutex<Snapshot>,
    clock: Arc<dyn Clock>,
    hydration: Hydration,
    persist_tx: mpsc::UnboundedSender<PersistCommand>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("storage_name", &self.manifest.storage_name)
            .field("hydration", &self.hydration)
            .finish_non_exhaustive()
    }
}

impl CacheStore {
    /// Creates a store and rehydrates it from `adapter`.
    ///
    /// Read failures and undecodable blobs both end in a cold start; neither
    /// is returned to the caller. Must be called inside a Tokio runtime, which
    /// hosts the background writer for the lifetime of the store.
    #[instrument(skip(adapter, options), fields(storage = %manifest.storage_name))]
    pub async fn load(
        manifest: StoreManifest,
        adapter: Arc<dyn StorageAdapter>,
        options: StoreOptions,
    ) -> Self {
        let raw = match adapter.get_item(manifest.storage_name).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Failed to read persisted cache '{}', starting cold: {}",
                    manifest.storage_name, e
                );
                None
            }
        };

        let restored = raw.and_then(|text| decode_snapshot(&manifest, &text, options.default_ttl_ms));
        let (snapshot, hydration) = match restored {
            Some(snapshot) => (snapshot, Hydration::Hydrated),
            None => (
                Snapshot::empty(&manifest, options.default_ttl_ms),
                Hydration::ColdStart,
            ),
        };

        info!(
            "Cache store '{}' ready: hydration={:?}, entries={}, ttl={}ms",
            manifest.storage_name,
            hydration,
            snapshot.namespaces.values().map(NamespaceState::len).sum::<usize>(),
            snapshot.cache_ttl
        );

        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(manifest.storage_name, adapter, persist_rx));

        Self {
            manifest,
            state: Mutex::new(snapshot),
            clock: options.clock,
            hydration,
            persist_tx,
        }
    }

    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// Current shared TTL in milliseconds
    pub fn cache_ttl(&self) -> u64 {
        self.lock().cache_ttl
    }

    /// Replaces the shared TTL. Applies to every entry already stored.
    pub fn set_cache_ttl(&self, ttl_ms: u64) {
        debug!(
            "Setting cache TTL for '{}' to {}ms",
            self.manifest.storage_name, ttl_ms
        );
        self.mutate(|state| state.cache_ttl = ttl_ms);
    }

    /// True iff `timestamp` is still inside the current TTL
    pub fn is_cache_valid(&self, timestamp: i64) -> bool {
        let ttl = self.cache_ttl();
        is_valid_at(timestamp, ttl, self.clock.now_millis())
    }

    /// Live value of a singleton namespace
    pub fn get_singleton<T: DeserializeOwned>(&self, slot: &SingletonSlot<T>) -> Option<T> {
        let value = self.live_value(slot.name(), None)?;
        decode_value(slot.name(), value)
    }

    /// Replaces a singleton namespace's entry
    pub fn set_singleton<T: Serialize>(
        &self,
        slot: &SingletonSlot<T>,
        value: &T,
    ) -> Result<(), AppError> {
        self.store_value(slot.name(), None, serde_json::to_value(value)?)
    }

    /// Live value stored under `key` in a keyed namespace
    pub fn get_keyed<T: DeserializeOwned>(&self, slot: &KeyedSlot<T>, key: &str) -> Option<T> {
        let value = self.live_value(slot.name(), Some(key))?;
        decode_value(slot.name(), value)
    }

    /// Inserts or overwrites `key` in a keyed namespace; other keys are untouched
    pub fn set_keyed<T: Serialize>(
        &self,
        slot: &KeyedSlot<T>,
        key: &str,
        value: &T,
    ) -> Result<(), AppError> {
        self.store_value(slot.name(), Some(key), serde_json::to_value(value)?)
    }

    /// Untyped read by namespace name. `key` is ignored for singleton namespaces.
    pub fn get_value(&self, namespace: &str, key: Option<&str>) -> Option<Value> {
        self.live_value(namespace, key)
    }

    /// Untyped write by namespace name. Keyed namespaces require `key`.
    pub fn set_value(&self, namespace: &str, key: Option<&str>, value: Value) -> Result<(), AppError> {
        self.store_value(namespace, key, value)
    }

    /// Time left before the entry under `key` expires; `None` when absent.
    pub fn remaining_ttl<T>(&self, slot: &KeyedSlot<T>, key: &str) -> Option<Duration> {
        let state = self.lock();
        match state.namespaces.get(slot.name()) {
            Some(NamespaceState::Keyed(map)) => map
                .get(key)
                .map(|entry| remaining_ttl_at(entry.cached_at, state.cache_ttl, self.clock.now_millis())),
            _ => None,
        }
    }

    /// Empties every namespace. The TTL is kept.
    #[instrument(skip(self), fields(storage = %self.manifest.storage_name))]
    pub fn clear_cache(&self) {
        let manifest = self.manifest;
        self.mutate(|state| {
            let removed: usize = state.namespaces.values().map(NamespaceState::len).sum();
            *state = Snapshot::empty(&manifest, state.cache_ttl);
            info!(
                "Cleared cache '{}': removed {} entries",
                manifest.storage_name, removed
            );
        });
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let now = self.clock.now_millis();
        let namespaces = self
            .manifest
            .namespaces
            .iter()
            .map(|spec| {
                let (total, live) = state
                    .namespaces
                    .get(spec.name)
                    .map(|ns| {
                        let live = ns
                            .entries()
                            .filter(|entry| is_valid_at(entry.cached_at, state.cache_ttl, now))
                            .count();
                        (ns.len(), live)
                    })
                    .unwrap_or((0, 0));
                NamespaceStats {
                    name: spec.name,
                    mode: spec.mode,
                    total,
                    live,
                }
            })
            .collect();

        CacheStats {
            storage_name: self.manifest.storage_name,
            ttl_ms: state.cache_ttl,
            namespaces,
        }
    }

    /// Waits until every snapshot queued so far has been handed to the adapter.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.persist_tx.send(PersistCommand::Flush(ack_tx)).is_err() {
            return;
        }
        // A dropped ack means the writer is gone; nothing is left to wait for.
        let _ = ack_rx.await;
    }

    /// Deletes the persisted blob. In-memory state is untouched and the next
    /// mutation persists again.
    pub async fn purge_persisted(&self) {
        if self.persist_tx.send(PersistCommand::Remove).is_err() {
            warn!(
                "Persistence writer for '{}' is gone, cannot purge",
                self.manifest.storage_name
            );
            return;
        }
        self.flush().await;
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live_value(&self, namespace: &str, key: Option<&str>) -> Option<Value> {
        let state = self.lock();
        let entry = match (state.namespaces.get(namespace), key) {
            (Some(NamespaceState::Singleton(slot)), _) => slot.as_ref(),
            (Some(NamespaceState::Keyed(map)), Some(key)) => map.get(key),
            (Some(NamespaceState::Keyed(_)), None) => {
                warn!("Keyed namespace '{namespace}' read without a key");
                None
            }
            (None, _) => {
                warn!(
                    "Namespace '{}' is not part of '{}'",
                    namespace, self.manifest.storage_name
                );
                None
            }
        };

        let Some(entry) = entry else {
            trace!("Cache miss: namespace={namespace}, key={key:?}");
            return None;
        };

        let now = self.clock.now_millis();
        if !is_valid_at(entry.cached_at, state.cache_ttl, now) {
            debug!(
                "Cache entry expired: key={}, age={:?}, ttl={}ms",
                entry.key,
                entry.age_at(now),
                state.cache_ttl
            );
            return None;
        }

        debug!("Cache hit: key={}, age={:?}", entry.key, entry.age_at(now));
        Some(entry.value.clone())
    }

    fn store_value(&self, namespace: &str, key: Option<&str>, value: Value) -> Result<(), AppError> {
        let spec = self
            .manifest
            .find(namespace)
            .ok_or_else(|| AppError::unknown_namespace(namespace, self.manifest.storage_name))?;
        let name = spec.name;

        let entry: CacheEntry<Value> = match (spec.mode, key) {
            (NamespaceMode::Singleton, _) => create_entry_at(name, value, self.clock.now_millis()),
            (NamespaceMode::Keyed, Some(key)) => create_entry_at(key, value, self.clock.now_millis()),
            (NamespaceMode::Keyed, None) => {
                return Err(AppError::config_error(format!(
                    "Keyed namespace '{name}' requires a key"
                )));
            }
        };

        debug!("Caching entry: namespace={}, key={}", name, entry.key);
        self.mutate(move |state| {
            let slot = state
                .namespaces
                .entry(name)
                .or_insert_with(|| NamespaceState::empty(spec.mode));
            match slot {
                NamespaceState::Singleton(current) => *current = Some(entry),
                NamespaceState::Keyed(map) => {
                    map.insert(entry.key.clone(), entry);
                }
            }
        });
        Ok(())
    }

    /// Applies `change` and queues the resulting snapshot, both under the lock
    /// so queued snapshots keep mutation order.
    fn mutate<F: FnOnce(&mut Snapshot)>(&self, change: F) {
        let mut state = self.lock();
        change(&mut state);
        match encode_snapshot(&state) {
            Ok(blob) => {
                if self.persist_tx.send(PersistCommand::Write(blob)).is_err() {
                    warn!(
                        "Persistence writer for '{}' is gone, snapshot not saved",
                        self.manifest.storage_name
                    );
                }
            }
            Err(e) => warn!(
                "Failed to encode cache snapshot '{}': {}",
                self.manifest.storage_name, e
            ),
        }
    }
}

fn decode_value<T: DeserializeOwned>(namespace: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Cached value in '{namespace}' does not match the requested type: {e}");
            None
        }
    }
}

async fn run_writer(
    storage_name: &'static str,
    adapter: Arc<dyn StorageAdapter>,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
) {
    let mut next = rx.recv().await;
    while let Some(command) = next.take() {
        match command {
            PersistCommand::Write(mut blob) => {
                let mut pending = None;
                let mut skipped = 0usize;
                while let Ok(queued) = rx.try_recv() {
                    match queued {
                        PersistCommand::Write(newer) => {
                            blob = newer;
                            skipped += 1;
                        }
                        other => {
                            pending = Some(other);
                            break;
                        }
                    }
                }
                if skipped > 0 {
                    trace!("Coalesced {skipped} snapshots for '{storage_name}'");
                }
                if let Err(e) = adapter.set_item(storage_name, blob).await {
                    warn!("Failed to persist cache '{}': {}", storage_name, e);
                }
                if pending.is_some() {
                    next = pending;
                    continue;
                }
            }
            PersistCommand::Remove => {
                if let Err(e) = adapter.remove_item(storage_name).await {
                    warn!("Failed to remove persisted cache '{}': {}", storage_name, e);
                }
            }
            PersistCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
        next = rx.recv().await;
    }
    debug!("Persistence writer for '{storage_name}' stopped");
}
