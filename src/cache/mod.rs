//! Keyed TTL cache shared by every sport client
//!
//! - [`entry`]: the cached-value envelope and TTL predicates
//! - [`key`]: parameter bags and canonical key derivation
//! - [`namespace`]: per-sport manifests and typed slot handles
//! - [`store`]: the generic store engine
//! - [`persistence`]: snapshot JSON codec
//! - [`storage`]: storage adapters the snapshot is written through

pub mod clock;
pub mod entry;
pub mod key;
pub mod namespace;
pub mod persistence;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{
    CacheEntry, create_entry, create_entry_at, is_valid, is_valid_at, remaining_ttl,
    remaining_ttl_at,
};
pub use key::{ParamValue, Params, derive_key};
pub use namespace::{KeyedSlot, NamespaceMode, NamespaceSpec, SingletonSlot, StoreManifest};
pub use storage::{FileStorage, MemoryStorage, StorageAdapter};
pub use store::{CacheStats, CacheStore, Hydration, NamespaceStats, StoreOptions};
