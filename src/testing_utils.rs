//! Builders for upstream responses and configs used by tests

use serde_json::{Value, json};

use crate::config::Config;

/// Test utilities for mocking API-Sports responses
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// A successful envelope carrying `response`
    pub fn envelope(get: &str, response: Value) -> Value {
        let results = response.as_array().map(Vec::len).unwrap_or(1);
        json!({
            "get": get,
            "parameters": [],
            "errors": [],
            "results": results,
            "paging": { "current": 1, "total": 1 },
            "response": response
        })
    }

    /// A 200 envelope that flags the request in its `errors` object
    pub fn error_envelope(get: &str, field: &str, message: &str) -> Value {
        json!({
            "get": get,
            "parameters": [],
            "errors": { field: message },
            "results": 0,
            "paging": { "current": 0, "total": 0 },
            "response": []
        })
    }

    /// A handful of countries in API-Football's shape
    pub fn countries() -> Value {
        json!([
            { "name": "England", "code": "GB", "flag": "https://media.api-sports.io/flags/gb.svg" },
            { "name": "Spain", "code": "ES", "flag": "https://media.api-sports.io/flags/es.svg" }
        ])
    }

    /// One fixture row, enough for cache round trips
    pub fn fixture(id: i64, home: &str, away: &str) -> Value {
        json!({
            "fixture": { "id": id, "status": { "short": "NS" } },
            "teams": {
                "home": { "name": home },
                "away": { "name": away }
            },
            "goals": { "home": null, "away": null }
        })
    }

    /// Config pointing every sport at `base_url` with a fixed key
    pub fn config(base_url: &str) -> Config {
        Config {
            api_key: "test-key".to_string(),
            http_timeout_seconds: 5,
            base_url_override: Some(base_url.to_string()),
            ..Config::default()
        }
    }
}
