//! Upstream GET with status mapping and envelope unwrapping

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::cache::Params;
use crate::constants::API_KEY_HEADER;
use crate::error::AppError;

use super::models::ApiEnvelope;

/// Fetches `url` with `params` as the query string and returns the envelope's
/// `response` payload decoded as `T`.
///
/// A request either succeeds once or fails; there is no retry. Failures are
/// classified into the specific [`AppError`] variants:
/// - transport: timeout, connection, other reqwest errors
/// - HTTP status: 404, 429, other 4xx, 502/503, other 5xx
/// - body: empty, not JSON, API-reported `errors`, missing `response`,
///   `response` of an unexpected shape
#[instrument(skip(client, api_key, params))]
pub(super) async fn fetch<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    api_key: &str,
    params: &Params,
) -> Result<T, AppError> {
    let request = client
        .get(url)
        .header(API_KEY_HEADER, api_key)
        .query(&params.query_pairs())
        .build()?;
    let full_url = request.url().to_string();
    info!("Fetching data from URL: {full_url}");

    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            error!("Request failed for URL {}: {}", full_url, e);
            return Err(if e.is_timeout() {
                AppError::network_timeout(full_url)
            } else if e.is_connect() {
                AppError::network_connection(full_url, e.to_string())
            } else {
                AppError::ApiFetch(e)
            });
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, full_url);

        return Err(match status_code {
            404 => AppError::api_not_found(full_url),
            429 => AppError::api_rate_limit(reason, full_url),
            400..=499 => AppError::api_client_error(status_code, reason, full_url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, full_url),
            _ => AppError::api_server_error(status_code, reason, full_url),
        });
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", full_url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());
    let preview: String = response_text.chars().take(1024).collect();
    debug!("Response text (first 1024 chars): {preview}");

    decode_envelope(&response_text, &full_url)
}

/// Unwraps an envelope body into its typed `response` payload.
pub(super) fn decode_envelope<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::api_no_data("Response body is empty", url));
    }

    let envelope: ApiEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            let trimmed = body.trim_start();
            return Err(if trimmed.starts_with('{') || trimmed.starts_with('[') {
                AppError::api_unexpected_structure(e.to_string(), url)
            } else {
                AppError::api_malformed_json("Response is not valid JSON", url)
            });
        }
    };

    if !envelope.errors.is_empty() {
        let messages = envelope.errors.messages();
        error!("API reported errors for {}: {:?}", url, messages);
        return Err(AppError::api_reported(messages, url));
    }

    let payload = match envelope.response {
        Some(payload) if !payload.is_null() => payload,
        _ => return Err(AppError::api_no_data("Envelope has no response field", url)),
    };

    debug!(
        "Envelope for '{}' carried {} results",
        envelope.get, envelope.results
    );
    serde_json::from_value(payload).map_err(|e| {
        error!("Unexpected payload shape from {}: {}", url, e);
        AppError::api_unexpected_structure(e.to_string(), url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http_client::create_test_http_client;
    use crate::api::models::Country;
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    const URL: &str = "https://v3.football.api-sports.io/countries";

    #[test]
    fn test_decode_envelope_success() {
        let body = json!({
            "get": "countries",
            "errors": [],
            "results": 1,
            "response": [{ "name": "Spain", "code": "ES" }]
        })
        .to_string();
        let countries: Vec<Country> = decode_envelope(&body, URL).unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].code.as_deref(), Some("ES"));
    }

    #[test]
    fn test_decode_envelope_classifies_failures() {
        assert!(matches!(
            decode_envelope::<Value>("   ", URL),
            Err(AppError::ApiNoData { .. })
        ));
        assert!(matches!(
            decode_envelope::<Value>("<html>502</html>", URL),
            Err(AppError::ApiMalformedJson { .. })
        ));
        assert!(matches!(
            decode_envelope::<Value>(r#"{"errors": 5}"#, URL),
            Err(AppError::ApiUnexpectedStructure { .. })
        ));
        assert!(matches!(
            decode_envelope::<Value>(r#"{"errors": {"token": "Missing application key."}}"#, URL),
            Err(AppError::ApiReported { .. })
        ));
        assert!(matches!(
            decode_envelope::<Value>(r#"{"errors": [], "response": null}"#, URL),
            Err(AppError::ApiNoData { .. })
        ));
        assert!(matches!(
            decode_envelope::<Vec<Country>>(r#"{"errors": [], "response": {"name": 1}}"#, URL),
            Err(AppError::ApiUnexpectedStructure { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_query() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        Mock::given(method("GET"))
            .and(path("/leagues"))
            .and(header(API_KEY_HEADER, "secret"))
            .and(query_param("country", "England"))
            .and(query_param("season", "2023"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "get": "leagues",
                "errors": [],
                "results": 1,
                "response": [{ "league": { "id": 39, "name": "Premier League" } }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let params = Params::new()
            .set("country", "England")
            .set_opt::<&str>("type", None)
            .set("season", 2023);
        let url = format!("{}/leagues", mock_server.uri());
        let leagues: Vec<Value> = fetch(&client, &url, "secret", &params).await.unwrap();
        assert_eq!(leagues[0]["league"]["id"], json!(39));
    }

    #[tokio::test]
    async fn test_fetch_maps_status_codes() {
        let mock_server = MockServer::start().await;
        let client = create_test_http_client();

        for (status, route) in [(404u16, "/a"), (429, "/b"), (403, "/c"), (503, "/d"), (500, "/e")] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&mock_server)
                .await;
        }

        let get = |route: &str| {
            let url = format!("{}{}", mock_server.uri(), route);
            let client = client.clone();
            async move { fetch::<Value>(&client, &url, "k", &Params::new()).await }
        };

        assert!(matches!(get("/a").await, Err(AppError::ApiNotFound { .. })));
        assert!(matches!(get("/b").await, Err(AppError::ApiRateLimit { .. })));
        assert!(matches!(
            get("/c").await,
            Err(AppError::ApiClientError { status: 403, .. })
        ));
        assert!(matches!(
            get("/d").await,
            Err(AppError::ApiServiceUnavailable { status: 503, .. })
        ));
        assert!(matches!(
            get("/e").await,
            Err(AppError::ApiServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let client = create_test_http_client();
        // Port 9 (discard) is closed on CI hosts.
        let result = fetch::<Value>(&client, "http://127.0.0.1:9/status", "k", &Params::new()).await;
        assert!(result.unwrap_err().is_network());
    }
}
