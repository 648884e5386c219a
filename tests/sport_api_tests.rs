//! Read-through behaviour of the sport clients against a mock upstream.

use std::sync::Arc;

use serde_json::json;
use sports_api_cache::api::{ApiClient, SportApi, create_http_client_with_timeout};
use sports_api_cache::cache::{
    CacheStore, ManualClock, MemoryStorage, Params, StorageAdapter, StoreOptions,
};
use sports_api_cache::constants::API_KEY_HEADER;
use sports_api_cache::error::AppError;
use sports_api_cache::sports::{Sport, football, formula1, hockey};
use sports_api_cache::testing_utils::TestDataBuilder;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

async fn connect(sport: Sport, server: &MockServer) -> (SportApi, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let config = TestDataBuilder::config(&server.uri());
    let api = SportApi::from_config(sport.descriptor(), &config, storage.clone())
        .await
        .unwrap();
    (api, storage)
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(header(API_KEY_HEADER, "test-key"))
        .and(query_param("team", "33"))
        .and(query_param("next", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
            "fixtures",
            json!([TestDataBuilder::fixture(868_000, "Manchester United", "Chelsea")]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (api, storage) = connect(Sport::Football, &mock_server).await;
    let params = Params::new().set("team", 33).set("next", 5);

    let first = api.fetch_keyed(&football::FIXTURES, &params).await.unwrap();
    // Parameter order does not matter for the cache key
    let reordered = Params::new().set("next", 5).set("team", 33);
    let second = api.fetch_keyed(&football::FIXTURES, &reordered).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        api.cached_keyed(&football::FIXTURES, &params).map(|f| f.len()),
        Some(1)
    );

    api.cache().flush().await;
    let blob = storage.snapshot("football-api-cache").unwrap();
    assert!(blob.contains("fixtures:next=5&team=33"), "{blob}");
}

#[tokio::test]
async fn test_distinct_params_fetch_separately() {
    let mock_server = MockServer::start().await;
    for team in ["1", "2"] {
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("id", team))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
                "teams",
                json!([{ "id": team }]),
            )))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let (api, _storage) = connect(Sport::Hockey, &mock_server).await;
    let one = api
        .fetch_keyed(&hockey::TEAMS, &Params::new().set("id", 1))
        .await
        .unwrap();
    let two = api
        .fetch_keyed(&hockey::TEAMS, &Params::new().set("id", 2))
        .await
        .unwrap();
    assert_ne!(one, two);
    assert_eq!(api.cache().stats().total_entries(), 2);
}

#[tokio::test]
async fn test_upstream_errors_leave_cache_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/standings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::error_envelope(
            "standings",
            "season",
            "The Season field must contain 4 characters.",
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (api, storage) = connect(Sport::Football, &mock_server).await;

    let params = Params::new().set("league", 39).set("season", "23");
    let err = api.fetch_keyed(&football::STANDINGS, &params).await.unwrap_err();
    match err {
        AppError::ApiReported { messages, .. } => {
            assert_eq!(messages, vec!["season: The Season field must contain 4 characters."]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = api.fetch_singleton(&football::COUNTRIES).await.unwrap_err();
    assert!(matches!(err, AppError::ApiServerError { status: 500, .. }));

    assert_eq!(api.cache().stats().total_entries(), 0);
    api.cache().flush().await;
    assert_eq!(storage.snapshot("football-api-cache"), None);
}

#[tokio::test]
async fn test_refresh_overwrites_live_entry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/races"))
        .and(query_param("season", "2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
            "races",
            json!([{ "id": 1, "status": "Completed" }]),
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (api, _storage) = connect(Sport::Formula1, &mock_server).await;
    let params = Params::new().set("season", 2024);

    api.fetch_keyed(&formula1::RACES, &params).await.unwrap();
    api.fetch_keyed(&formula1::RACES, &params).await.unwrap();
    api.refresh_keyed(&formula1::RACES, &params).await.unwrap();
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timezone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
            "timezone",
            json!(["Europe/Helsinki"]),
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let clock = ManualClock::new(1_700_000_000_000);
    let storage: Arc<dyn StorageAdapter> = Arc::new(MemoryStorage::new());
    let options = StoreOptions::default()
        .with_ttl(1_000)
        .with_clock(Arc::new(clock.clone()));
    let cache = CacheStore::load(hockey::MANIFEST, storage, options).await;
    let http = create_http_client_with_timeout(5).unwrap();
    let api = SportApi::new(
        hockey::SPORT,
        ApiClient::new(http, mock_server.uri(), "test-key"),
        Arc::new(cache),
    );

    api.fetch_singleton(&hockey::TIMEZONE).await.unwrap();
    clock.advance(999);
    api.fetch_singleton(&hockey::TIMEZONE).await.unwrap();
    clock.advance(1);
    let zones = api.fetch_singleton(&hockey::TIMEZONE).await.unwrap();
    assert_eq!(zones, vec!["Europe/Helsinki".to_string()]);
}

#[tokio::test]
async fn test_fetch_raw_by_namespace() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues/seasons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::envelope(
            "leagues/seasons",
            json!([2022, 2023]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (api, _storage) = connect(Sport::Football, &mock_server).await;
    let ignored = Params::new().set("league", 39);
    assert_eq!(api.fetch_raw("seasons", &ignored).await.unwrap(), json!([2022, 2023]));
    assert_eq!(api.fetch_raw("seasons", &Params::new()).await.unwrap(), json!([2022, 2023]));
    assert_eq!(
        api.cached_singleton(&football::SEASONS).map(|s| s.len()),
        Some(2)
    );

    let err = api.fetch_raw("cacheTTL", &Params::new()).await.unwrap_err();
    assert!(matches!(err, AppError::UnknownNamespace { .. }));
}

#[tokio::test]
async fn test_missing_api_key_is_rejected() {
    let storage = Arc::new(MemoryStorage::new());
    let mut config = TestDataBuilder::config("http://127.0.0.1:1");
    config.api_key.clear();
    let err = SportApi::from_config(football::SPORT, &config, storage)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
