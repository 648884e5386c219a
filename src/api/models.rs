//! Response envelope and the payload models shared by every sport

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope every API-Sports endpoint wraps its payload in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub get: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub errors: ApiErrors,
    #[serde(default)]
    pub results: u64,
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub response: Option<Value>,
}

/// The `errors` field is an empty list on success and either a list or an
/// object of messages on failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ApiErrors {
    List(Vec<Value>),
    Map(Map<String, Value>),
}

impl Default for ApiErrors {
    fn default() -> Self {
        ApiErrors::List(Vec::new())
    }
}

impl ApiErrors {
    pub fn is_empty(&self) -> bool {
        match self {
            ApiErrors::List(list) => list.is_empty(),
            ApiErrors::Map(map) => map.is_empty(),
        }
    }

    /// Human-readable messages, `field: message` for the object form
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiErrors::List(list) => list.iter().map(render_message).collect(),
            ApiErrors::Map(map) => map
                .iter()
                .map(|(field, message)| format!("{field}: {}", render_message(message)))
                .collect(),
        }
    }
}

fn render_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Country {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

/// Seasons are plain years for most sports and labels such as `"2019-2020"`
/// for some leagues.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Season {
    Year(i32),
    Label(String),
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::Year(year) => write!(f, "{year}"),
            Season::Label(label) => f.write_str(label),
        }
    }
}

/// Sport-specific payloads are cached and returned as raw JSON.
pub type Payload = Vec<Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_with_list_errors() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "get": "countries",
            "parameters": [],
            "errors": [],
            "results": 1,
            "paging": { "current": 1, "total": 1 },
            "response": [{ "name": "England", "code": "GB", "flag": "https://media/gb.svg" }]
        }))
        .unwrap();

        assert!(envelope.errors.is_empty());
        assert_eq!(envelope.paging, Some(Paging { current: 1, total: 1 }));
        let countries: Vec<Country> =
            serde_json::from_value(envelope.response.unwrap()).unwrap();
        assert_eq!(countries[0].name, "England");
        assert_eq!(countries[0].id, None);
    }

    #[test]
    fn test_envelope_with_object_errors() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "get": "standings",
            "errors": { "season": "The Season field must contain 4 characters." },
            "results": 0,
            "response": []
        }))
        .unwrap();

        assert!(!envelope.errors.is_empty());
        assert_eq!(
            envelope.errors.messages(),
            vec!["season: The Season field must contain 4 characters.".to_string()]
        );
    }

    #[test]
    fn test_seasons_accept_years_and_labels() {
        let seasons: Vec<Season> = serde_json::from_value(json!([2022, "2022-2023"])).unwrap();
        assert_eq!(
            seasons,
            vec![Season::Year(2022), Season::Label("2022-2023".to_string())]
        );
        assert_eq!(seasons[1].to_string(), "2022-2023");
    }
}
