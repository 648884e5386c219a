//! JSON codec for the persisted store snapshot
//!
//! Layout of one blob:
//!
//! ```json
//! {
//!   "state": {
//!     "countries": { "value": [...], "cachedAt": 1700000000000, "key": "countries" },
//!     "leagues": [["leagues:country=England", { "value": [...], "cachedAt": ..., "key": ... }]],
//!     "cacheTTL": 300000
//!   },
//!   "version": 0
//! }
//! ```
//!
//! Keyed maps have no JSON object form that keeps arbitrary keys and entry
//! envelopes apart, so they are written as `[key, entry]` pair lists and
//! rebuilt into maps on load.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::persistence::{FORMAT_VERSION, TTL_FIELD};

use super::entry::CacheEntry;
use super::namespace::{NamespaceMode, StoreManifest};

/// Contents of one namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceState {
    Singleton(Option<CacheEntry<Value>>),
    Keyed(HashMap<String, CacheEntry<Value>>),
}

impl NamespaceState {
    pub fn empty(mode: NamespaceMode) -> Self {
        match mode {
            NamespaceMode::Singleton => NamespaceState::Singleton(None),
            NamespaceMode::Keyed => NamespaceState::Keyed(HashMap::new()),
        }
    }

    /// Number of entries held, live or not
    pub fn len(&self) -> usize {
        match self {
            NamespaceState::Singleton(slot) => usize::from(slot.is_some()),
            NamespaceState::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Box<dyn Iterator<Item = &CacheEntry<Value>> + '_> {
        match self {
            NamespaceState::Singleton(slot) => Box::new(slot.iter()),
            NamespaceState::Keyed(map) => Box::new(map.values()),
        }
    }
}

/// Full state of a store: every namespace plus the shared TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub namespaces: BTreeMap<&'static str, NamespaceState>,
    pub cache_ttl: u64,
}

impl Snapshot {
    /// Every namespace of `manifest` present and empty
    pub fn empty(manifest: &StoreManifest, cache_ttl: u64) -> Self {
        let namespaces = manifest
            .namespaces
            .iter()
            .map(|ns| (ns.name, NamespaceState::empty(ns.mode)))
            .collect();
        Self {
            namespaces,
            cache_ttl,
        }
    }
}

#[derive(Debug, Error)]
enum SnapshotError {
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version {found}")]
    Version { found: u32 },

    #[error("field `{field}` has the wrong shape: {source}")]
    Shape {
        field: String,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct PersistedBlob {
    state: Map<String, Value>,
    #[serde(default)]
    version: u32,
}

/// Encodes `snapshot` into the persisted blob format.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    let mut state = Map::new();

    for (name, ns) in &snapshot.namespaces {
        let encoded = match ns {
            NamespaceState::Singleton(slot) => serde_json::to_value(slot)?,
            NamespaceState::Keyed(map) => {
                let mut pairs: Vec<(&String, &CacheEntry<Value>)> = map.iter().collect();
                pairs.sort_by(|a, b| a.0.cmp(b.0));
                serde_json::to_value(pairs)?
            }
        };
        state.insert((*name).to_string(), encoded);
    }
    state.insert(TTL_FIELD.to_string(), Value::from(snapshot.cache_ttl));

    let mut blob = Map::new();
    blob.insert("state".to_string(), Value::Object(state));
    blob.insert("version".to_string(), Value::from(FORMAT_VERSION));
    serde_json::to_string(&Value::Object(blob))
}

/// Decodes a persisted blob for `manifest`.
///
/// Returns `None` for anything that is not a well-formed blob of the current
/// version, so a corrupt or foreign value degrades to a cold start. A
/// namespace missing from the blob loads empty and a missing TTL falls back
/// to `fallback_ttl`.
pub fn decode_snapshot(manifest: &StoreManifest, text: &str, fallback_ttl: u64) -> Option<Snapshot> {
    match try_decode(manifest, text, fallback_ttl) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(
                "Ignoring persisted cache '{}': {}",
                manifest.storage_name, e
            );
            None
        }
    }
}

fn try_decode(
    manifest: &StoreManifest,
    text: &str,
    fallback_ttl: u64,
) -> Result<Snapshot, SnapshotError> {
    let mut blob: PersistedBlob = serde_json::from_str(text)?;
    if blob.version != FORMAT_VERSION {
        return Err(SnapshotError::Version {
            found: blob.version,
        });
    }

    let cache_ttl = match blob.state.remove(TTL_FIELD) {
        Some(value) => serde_json::from_value::<u64>(value).map_err(|source| SnapshotError::Shape {
            field: TTL_FIELD.to_string(),
            source,
        })?,
        None => fallback_ttl,
    };

    let mut snapshot = Snapshot::empty(manifest, cache_ttl);
    for ns in manifest.namespaces {
        let Some(raw) = blob.state.remove(ns.name) else {
            debug!(
                "Namespace '{}' missing from persisted cache '{}', starting empty",
                ns.name, manifest.storage_name
            );
            continue;
        };

        let shape_error = |source: serde_json::Error| SnapshotError::Shape {
            field: ns.name.to_string(),
            source,
        };
        let state = match ns.mode {
            NamespaceMode::Singleton => NamespaceState::Singleton(
                serde_json::from_value::<Option<CacheEntry<Value>>>(raw).map_err(shape_error)?,
            ),
            NamespaceMode::Keyed => {
                let pairs = serde_json::from_value::<Vec<(String, CacheEntry<Value>)>>(raw)
                    .map_err(shape_error)?;
                NamespaceState::Keyed(pairs.into_iter().collect())
            }
        };
        snapshot.namespaces.insert(ns.name, state);
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::create_entry_at;
    use crate::cache::namespace::NamespaceSpec;
    use serde_json::json;

    const MANIFEST: StoreManifest = StoreManifest {
        storage_name: "test-api-cache",
        namespaces: &[
            NamespaceSpec::singleton("countries"),
            NamespaceSpec::keyed("leagues"),
            NamespaceSpec::keyed("teams"),
        ],
    };

    fn populated() -> Snapshot {
        let mut snapshot = Snapshot::empty(&MANIFEST, 60_000);
        snapshot.namespaces.insert(
            "countries",
            NamespaceState::Singleton(Some(create_entry_at(
                "countries",
                json!([{"name": "England", "code": "GB"}]),
                1_000,
            ))),
        );
        let mut leagues = HashMap::new();
        for (i, key) in ["leagues:country=Spain", "leagues:country=England", "leagues"]
            .into_iter()
            .enumerate()
        {
            leagues.insert(
                key.to_string(),
                create_entry_at(key, json!({"id": i}), 2_000 + i as i64),
            );
        }
        snapshot
            .namespaces
            .insert("leagues", NamespaceState::Keyed(leagues));
        snapshot
    }

    #[test]
    fn test_round_trip_preserves_keyed_maps() {
        let original = populated();
        let text = encode_snapshot(&original).unwrap();
        let decoded = decode_snapshot(&MANIFEST, &text, 1).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_keyed_maps_encode_as_pair_lists() {
        let text = encode_snapshot(&populated()).unwrap();
        let blob: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(blob["version"], json!(0));
        assert_eq!(blob["state"]["cacheTTL"], json!(60_000));
        assert_eq!(blob["state"]["teams"], json!([]));
        let leagues = blob["state"]["leagues"].as_array().unwrap();
        assert_eq!(leagues.len(), 3);
        assert_eq!(leagues[0][0], json!("leagues"));
        assert_eq!(leagues[1][1]["key"], json!("leagues:country=England"));
        assert_eq!(blob["state"]["countries"]["cachedAt"], json!(1_000));
    }

    #[test]
    fn test_corrupt_input_is_cold_start() {
        assert!(decode_snapshot(&MANIFEST, "not json at all", 1).is_none());
        assert!(decode_snapshot(&MANIFEST, "", 1).is_none());
        assert!(decode_snapshot(&MANIFEST, "[1,2,3]", 1).is_none());
        assert!(decode_snapshot(&MANIFEST, r#"{"foo": 1}"#, 1).is_none());
    }

    #[test]
    fn test_wrong_namespace_shape_is_cold_start() {
        let keyed_as_object = json!({
            "state": { "leagues": { "leagues": { "value": 1, "cachedAt": 1, "key": "leagues" } } },
            "version": 0
        });
        assert!(decode_snapshot(&MANIFEST, &keyed_as_object.to_string(), 1).is_none());

        let singleton_as_list = json!({ "state": { "countries": [1, 2] }, "version": 0 });
        assert!(decode_snapshot(&MANIFEST, &singleton_as_list.to_string(), 1).is_none());

        let bad_ttl = json!({ "state": { "cacheTTL": "soon" }, "version": 0 });
        assert!(decode_snapshot(&MANIFEST, &bad_ttl.to_string(), 1).is_none());
    }

    #[test]
    fn test_other_version_is_cold_start() {
        let blob = json!({ "state": { "cacheTTL": 10 }, "version": 3 });
        assert!(decode_snapshot(&MANIFEST, &blob.to_string(), 1).is_none());
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let blob = json!({ "state": { "countries": null, "unknown": true } });
        let snapshot = decode_snapshot(&MANIFEST, &blob.to_string(), 42).unwrap();
        assert_eq!(snapshot, Snapshot::empty(&MANIFEST, 42));
    }
}
