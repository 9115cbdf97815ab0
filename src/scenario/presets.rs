use crate::core::currency::CurrencyPair;
use crate::core::error::SimulationError;
use crate::scenario::params::{Direction, ScenarioParameters};
use serde::Serialize;
use std::fmt;

/// Historical behaviour of a currency pair used to seed presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairProfile {
    pub typical_volatility: f64,
    pub crisis_volatility: f64,
    pub typical_move: f64,
    pub crisis_move: f64,
    pub base_price: f64,
}

impl PairProfile {
    /// Profile for `pair`; unknown pairs fall back to the USD/MXN profile.
    pub fn for_pair(pair: &CurrencyPair) -> Self {
        match (pair.base.as_str(), pair.quote.as_str()) {
            ("EUR", "USD") => PairProfile {
                typical_volatility: 0.10,
                crisis_volatility: 0.15,
                typical_move: 0.06,
                crisis_move: 0.15,
                base_price: 1.08,
            },
            ("GBP", "USD") => PairProfile {
                typical_volatility: 0.11,
                crisis_volatility: 0.16,
                typical_move: 0.07,
                crisis_move: 0.18,
                base_price: 1.25,
            },
            ("USD", "CAD") => PairProfile {
                typical_volatility: 0.09,
                crisis_volatility: 0.14,
                typical_move: 0.05,
                crisis_move: 0.12,
                base_price: 1.35,
            },
            _ => PairProfile {
                typical_volatility: 0.12,
                crisis_volatility: 0.18,
                typical_move: 0.08,
                crisis_move: 0.20,
                base_price: 18.5,
            },
        }
    }
}

/// Named starting points for scenario configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    Bullish,
    Bearish,
    HighVolatility,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 3] = [
        ScenarioPreset::Bullish,
        ScenarioPreset::Bearish,
        ScenarioPreset::HighVolatility,
    ];

    /// Build this preset for `pair`, which must be one of
    /// [`CurrencyPair::supported`].
    pub fn build(self, pair: &CurrencyPair) -> Result<ScenarioParameters, SimulationError> {
        if !CurrencyPair::supported().contains(pair) {
            return Err(SimulationError::InvalidCurrencyPair(pair.to_string()));
        }
        let profile = PairProfile::for_pair(pair);
        let (horizon, volatility, direction, magnitude) = match self {
            ScenarioPreset::Bullish => (
                0.25,
                profile.typical_volatility,
                Direction::Up,
                profile.typical_move,
            ),
            ScenarioPreset::Bearish => (
                0.5,
                profile.crisis_volatility,
                Direction::Down,
                profile.crisis_move,
            ),
            // small net move, wide distribution
            ScenarioPreset::HighVolatility => {
                (0.5, profile.crisis_volatility, Direction::Neutral, 0.03)
            }
        };
        ScenarioParameters::new(
            profile.base_price,
            horizon,
            volatility,
            direction,
            magnitude,
            pair.clone(),
        )
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioPreset::Bullish => write!(f, "bullish"),
            ScenarioPreset::Bearish => write!(f, "bearish"),
            ScenarioPreset::HighVolatility => write!(f, "high_volatility"),
        }
    }
}

/// Every preset for `pair`, in [`ScenarioPreset::ALL`] order.
pub fn presets(pair: &CurrencyPair) -> Result<Vec<(ScenarioPreset, ScenarioParameters)>, SimulationError> {
    ScenarioPreset::ALL
        .iter()
        .map(|preset| preset.build(pair).map(|params| (*preset, params)))
        .collect()
}
