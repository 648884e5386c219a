//! Read-through access to one sport: cache first, upstream on a miss

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::cache::{
    CacheStore, KeyedSlot, NamespaceMode, Params, SingletonSlot, StorageAdapter, StoreOptions,
    derive_key,
};
use crate::config::Config;
use crate::error::AppError;

use super::endpoint::{Endpoint, SportDescriptor};
use super::fetch_utils::fetch;
use super::http_client::create_http_client_with_timeout;

/// Thin wrapper over the upstream REST API of one sport.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` with `params` and decode the envelope's payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<T, AppError> {
        fetch(&self.http, &self.endpoint_url(path), &self.api_key, params).await
    }
}

/// One sport's client and cache store, wired together.
///
/// Lookups derive the cache key from the slot name and the request
/// parameters, serve a live entry when there is one, and otherwise fetch and
/// write the fresh payload back under the same key. A failed fetch never
/// touches the cache.
#[derive(Debug, Clone)]
pub struct SportApi {
    sport: SportDescriptor,
    client: ApiClient,
    cache: Arc<CacheStore>,
}

impl SportApi {
    pub fn new(sport: SportDescriptor, client: ApiClient, cache: Arc<CacheStore>) -> Self {
        Self {
            sport,
            client,
            cache,
        }
    }

    /// Builds the client from `config` and rehydrates the sport's store from `storage`.
    pub async fn connect(
        sport: SportDescriptor,
        config: &Config,
        http: reqwest::Client,
        storage: Arc<dyn StorageAdapter>,
    ) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?;
        let base_url = config
            .base_url_override
            .clone()
            .unwrap_or_else(|| sport.base_url.to_string());
        let client = ApiClient::new(http, base_url, api_key);

        let options = StoreOptions::default().with_ttl(config.cache_ttl_ms);
        let cache = CacheStore::load(sport.manifest, storage, options).await;
        Ok(Self::new(sport, client, Arc::new(cache)))
    }

    /// Same as [`SportApi::connect`] with a freshly built HTTP client
    pub async fn from_config(
        sport: SportDescriptor,
        config: &Config,
        storage: Arc<dyn StorageAdapter>,
    ) -> Result<Self, AppError> {
        let http = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Self::connect(sport, config, http, storage).await
    }

    pub fn sport(&self) -> &SportDescriptor {
        &self.sport
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Live cached value for a parameter-less endpoint, without fetching
    pub fn cached_singleton<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<SingletonSlot<T>>,
    ) -> Option<T> {
        self.cache.get_singleton(&endpoint.slot)
    }

    /// Live cached value for `params`, without fetching
    pub fn cached_keyed<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint<KeyedSlot<T>>,
        params: &Params,
    ) -> Option<T> {
        let key = derive_key(endpoint.slot.name(), Some(params));
        self.cache.get_keyed(&endpoint.slot, &key)
    }

    #[instrument(skip(self, endpoint), fields(sport = %self.sport.name, path = %endpoint.path))]
    pub async fn fetch_singleton<T>(&self, endpoint: &Endpoint<SingletonSlot<T>>) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(cached) = self.cache.get_singleton(&endpoint.slot) {
            return Ok(cached);
        }
        debug!("Cache miss for '{}', fetching", endpoint.slot.name());

        let fresh: T = self.client.get(endpoint.path, &Params::new()).await?;
        if let Err(e) = self.cache.set_singleton(&endpoint.slot, &fresh) {
            warn!("Fetched '{}' but could not cache it: {}", endpoint.slot.name(), e);
        }
        Ok(fresh)
    }

    #[instrument(skip(self, endpoint, params), fields(sport = %self.sport.name, path = %endpoint.path))]
    pub async fn fetch_keyed<T>(
        &self,
        endpoint: &Endpoint<KeyedSlot<T>>,
        params: &Params,
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = derive_key(endpoint.slot.name(), Some(params));
        if let Some(cached) = self.cache.get_keyed(&endpoint.slot, &key) {
            return Ok(cached);
        }
        debug!("Cache miss for '{key}', fetching");
        self.fetch_and_store(endpoint, params, &key).await
    }

    /// Fetches regardless of what is cached and overwrites the entry
    #[instrument(skip(self, endpoint, params), fields(sport = %self.sport.name, path = %endpoint.path))]
    pub async fn refresh_keyed<T>(
        &self,
        endpoint: &Endpoint<KeyedSlot<T>>,
        params: &Params,
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = derive_key(endpoint.slot.name(), Some(params));
        self.fetch_and_store(endpoint, params, &key).await
    }

    /// Untyped read-through by namespace name, for diagnostics.
    ///
    /// Keyed namespaces derive their key from `params`; singletons ignore them.
    pub async fn fetch_raw(
        &self,
        namespace: &str,
        params: &Params,
    ) -> Result<serde_json::Value, AppError> {
        self.raw(namespace, params, false).await
    }

    /// Like [`SportApi::fetch_raw`] but always goes upstream and overwrites the entry
    pub async fn refresh_raw(
        &self,
        namespace: &str,
        params: &Params,
    ) -> Result<serde_json::Value, AppError> {
        self.raw(namespace, params, true).await
    }

    #[instrument(skip(self, params), fields(sport = %self.sport.name))]
    async fn raw(
        &self,
        namespace: &str,
        params: &Params,
        bypass_cache: bool,
    ) -> Result<serde_json::Value, AppError> {
        let storage_name = self.sport.manifest.storage_name;
        let spec = self
            .sport
            .manifest
            .find(namespace)
            .ok_or_else(|| AppError::unknown_namespace(namespace, storage_name))?;
        let route = self
            .sport
            .route(namespace)
            .ok_or_else(|| AppError::unknown_namespace(namespace, storage_name))?;

        let (key, query) = match spec.mode {
            NamespaceMode::Singleton => (None, Params::new()),
            NamespaceMode::Keyed => (Some(derive_key(namespace, Some(params))), params.clone()),
        };

        if !bypass_cache && let Some(cached) = self.cache.get_value(namespace, key.as_deref()) {
            return Ok(cached);
        }

        let fresh: serde_json::Value = self.client.get(route.path, &query).await?;
        self.cache.set_value(namespace, key.as_deref(), fresh.clone())?;
        Ok(fresh)
    }

    async fn fetch_and_store<T>(
        &self,
        endpoint: &Endpoint<KeyedSlot<T>>,
        params: &Params,
        key: &str,
    ) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
    {
        let fresh: T = self.client.get(endpoint.path, params).await?;
        if let Err(e) = self.cache.set_keyed(&endpoint.slot, key, &fresh) {
            warn!("Fetched '{key}' but could not cache it: {e}");
        }
        Ok(fresh)
    }
}
