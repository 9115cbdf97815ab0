use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value as supplied by a caller.
///
/// Records arrive as loosely-typed JSON maps; the owning schema decides
/// which variant each field must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// A named set of parameter values.
///
/// Absent fields and explicit JSON `null`s are treated the same way: the
/// field takes its schema default when the record is filled.
///
/// # Examples
///
/// ```
/// use fx_hedge_sim::core::params::ParamRecord;
///
/// let record = ParamRecord::new()
///     .with("strike_price", 18.5)
///     .with("quantity_contracts", 2.0);
///
/// assert_eq!(record.number("strike_price"), Some(18.5));
/// assert!(record.get("risk_free_rate").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamRecord(BTreeMap<String, Option<ParamValue>>);

impl ParamRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), Some(value.into()));
    }

    /// The value of `name`, if present and not null.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name).and_then(|v| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Iterate over present (non-null) fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = ParamRecord::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_json() {
        let record: ParamRecord = serde_json::from_str(
            r#"{ "initial_price": 18.5, "direction": "down", "seed": null, "flag": true }"#,
        )
        .unwrap();

        assert_eq!(record.number("initial_price"), Some(18.5));
        assert_eq!(record.text("direction"), Some("down"));
        assert_eq!(record.flag("flag"), Some(true));
        assert!(!record.contains("seed"));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_typed_accessors_reject_wrong_variant() {
        let record = ParamRecord::new().with("direction", "up");
        assert_eq!(record.number("direction"), None);
        assert_eq!(record.text("direction"), Some("up"));
    }

    #[test]
    fn test_from_iterator() {
        let record: ParamRecord = vec![("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(record.number("b"), Some(2.0));
    }
}
