use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field name -> human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first message recorded for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by the simulation engine.
///
/// `InvalidParameters` is the recoverable category: the caller corrects the
/// record and retries. The identifier and compatibility variants signal a
/// broken contract between caller and engine and are not meant to be retried.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid {target} parameters: {errors}")]
    InvalidParameters {
        target: String,
        errors: FieldErrors,
    },
    #[error("unknown strategy type '{0}'")]
    UnknownStrategy(String),
    #[error("unknown exit policy type '{0}'")]
    UnknownExitPolicy(String),
    #[error("exit policy '{exit}' is not compatible with strategy '{strategy}'")]
    IncompatibleExit { strategy: String, exit: String },
    #[error("invalid currency pair '{0}'")]
    InvalidCurrencyPair(String),
}

impl SimulationError {
    pub fn invalid(target: impl Into<String>, errors: FieldErrors) -> Self {
        SimulationError::InvalidParameters {
            target: target.into(),
            errors,
        }
    }

    /// Whether correcting the parameter record could make a retry succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimulationError::InvalidParameters { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("strike_price", "Strike price must be positive");
        errors.insert("strike_price", "Must be at least 0.01");
        assert_eq!(errors.get("strike_price"), Some("Strike price must be positive"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("b", "two");
        errors.insert("a", "one");
        assert_eq!(errors.to_string(), "a: one; b: two");
    }

    #[test]
    fn test_error_categories() {
        let invalid = SimulationError::invalid("scenario", FieldErrors::new());
        assert!(invalid.is_recoverable());
        assert!(!SimulationError::UnknownStrategy("iron_condor".into()).is_recoverable());
    }
}
