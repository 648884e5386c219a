//! Request parameter bags and canonical cache-key derivation

use std::fmt;

/// A scalar request parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_param!(i8, i16, i32, i64, u8, u16, u32);

/// Insertion-ordered request parameters.
///
/// A name set through [`Params::set_opt`] with `None` is remembered but
/// treated as absent by both key derivation and query building, the same
/// way a missing parameter is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Params::insert`]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder form that keeps `None` as an absent value
    pub fn set_opt<V: Into<ParamValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.insert(name, value.map(Into::into));
        self
    }

    /// Inserts or replaces `name`, keeping its original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<ParamValue>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// True when no parameter carries a value
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }

    /// Present parameters rendered as strings, in insertion order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.clone(), v.to_string())))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, Some(v.into()));
        }
        params
    }
}

/// Builds the canonical cache key for `prefix` and `params`.
///
/// Absent values are dropped, the rest are sorted by name and rendered as
/// `name=value` joined with `&`, then appended after `prefix:`. With nothing
/// left the key is the bare prefix.
///
/// ```
/// use sports_api_cache::cache::{Params, derive_key};
///
/// let params = Params::new().set("team", 33).set("next", 5);
/// assert_eq!(derive_key("fixtures", Some(&params)), "fixtures:next=5&team=33");
/// assert_eq!(derive_key("fixtures", None), "fixtures");
/// ```
pub fn derive_key(prefix: &str, params: Option<&Params>) -> String {
    let Some(params) = params else {
        return prefix.to_string();
    };

    let mut pairs = params.query_pairs();
    if pairs.is_empty() {
        return prefix.to_string();
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let rendered = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{prefix}:{rendered}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_stable_under_reordering() {
        let a = Params::new()
            .set("league", 39)
            .set("season", 2023)
            .set("team", 33);
        let b = Params::new()
            .set("team", 33)
            .set("league", 39)
            .set("season", 2023);
        assert_eq!(derive_key("standings", Some(&a)), derive_key("standings", Some(&b)));
        assert_eq!(
            derive_key("standings", Some(&a)),
            "standings:league=39&season=2023&team=33"
        );
    }

    #[test]
    fn test_absent_values_are_dropped() {
        let with_absent = Params::new()
            .set("country", "England")
            .set_opt::<&str>("type", None);
        let without = Params::new().set("country", "England");
        assert_eq!(derive_key("leagues", Some(&with_absent)), "leagues:country=England");
        assert_eq!(
            derive_key("leagues", Some(&with_absent)),
            derive_key("leagues", Some(&without))
        );
    }

    #[test]
    fn test_empty_params_collapse_to_prefix() {
        assert_eq!(derive_key("leagues", None), "leagues");
        assert_eq!(derive_key("leagues", Some(&Params::new())), "leagues");
        let all_absent = Params::new().set_opt::<i32>("season", None);
        assert_eq!(derive_key("leagues", Some(&all_absent)), "leagues");
    }

    #[test]
    fn test_falsy_values_are_kept() {
        let params = Params::new()
            .set("live", false)
            .set("page", 0)
            .set("search", "");
        assert_eq!(
            derive_key("games", Some(&params)),
            "games:live=false&page=0&search="
        );
    }

    #[test]
    fn test_fixture_example() {
        let params = Params::new().set("team", 33).set("next", 5);
        assert_eq!(derive_key("fixtures", Some(&params)), "fixtures:next=5&team=33");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let params = Params::new()
            .set("date", "2024-01-01")
            .set("league", 12)
            .set("date", "2024-02-02");
        assert_eq!(
            params.query_pairs(),
            vec![
                ("date".to_string(), "2024-02-02".to_string()),
                ("league".to_string(), "12".to_string()),
            ]
        );
        assert_eq!(params.get("league"), Some(&ParamValue::Int(12)));
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(ParamValue::from(1.5).to_string(), "1.5");
        assert_eq!(ParamValue::from(2.0).to_string(), "2");
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = [("season", 2024), ("league", 1)].into_iter().collect();
        assert_eq!(derive_key("teams", Some(&params)), "teams:league=1&season=2024");
        assert!(!params.is_empty());
        assert!(Params::new().set_opt::<bool>("live", None).is_empty());
    }
}
