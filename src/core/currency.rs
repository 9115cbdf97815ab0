use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// # Examples
///
/// ```
/// use fx_hedge_sim::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let mxn = CurrencyCode::new("MXN");
/// assert_ne!(usd, mxn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from parsing currency pair labels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairParseError {
    #[error("currency pair '{0}' must have the form BASE/QUOTE")]
    MissingSeparator(String),
    #[error("currency pair '{0}' has an empty leg")]
    EmptyLeg(String),
}

/// A pair of currencies quoted as `BASE/QUOTE`.
///
/// The simulation engine treats the pair as a label: prices in a scenario
/// are units of `quote` per unit of `base`, but no conversion is performed.
///
/// # Examples
///
/// ```
/// use fx_hedge_sim::core::currency::CurrencyPair;
///
/// let pair: CurrencyPair = "USD/MXN".parse().unwrap();
/// assert_eq!(pair.base.as_str(), "USD");
/// assert_eq!(pair.quote.as_str(), "MXN");
/// assert_eq!(pair.to_string(), "USD/MXN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Pairs offered by the scenario schema.
    pub fn supported() -> Vec<CurrencyPair> {
        [("USD", "MXN"), ("EUR", "USD"), ("GBP", "USD"), ("USD", "CAD")]
            .into_iter()
            .map(|(b, q)| CurrencyPair::new(CurrencyCode::new(b), CurrencyCode::new(q)))
            .collect()
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self::new(CurrencyCode::new("USD"), CurrencyCode::new("MXN"))
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| PairParseError::MissingSeparator(s.to_string()))?;
        let (base, quote) = (base.trim(), quote.trim());
        if base.is_empty() || quote.is_empty() {
            return Err(PairParseError::EmptyLeg(s.to_string()));
        }
        Ok(Self::new(
            CurrencyCode::new(base.to_ascii_uppercase()),
            CurrencyCode::new(quote.to_ascii_uppercase()),
        ))
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = PairParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}
