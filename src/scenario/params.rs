use crate::core::currency::CurrencyPair;
use crate::core::error::{FieldErrors, SimulationError};
use crate::core::params::{ParamRecord, ParamValue};
use crate::core::schema::{
    DefaultContext, FieldKind, FieldSpec, ParameterSchema, ValidationResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading days in one year.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Longest path the engine will simulate (ten years of trading days).
pub const MAX_TRADING_DAYS: usize = 2520;

/// Largest seed accepted from a record (integers above this lose precision as f64).
const MAX_SEED: f64 = 9_007_199_254_740_992.0;

/// Expected direction of the currency pair over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    /// Drift sign: +1 up, -1 down, 0 neutral.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
            Direction::Neutral => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "neutral" => Ok(Direction::Neutral),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Whole trading days implied by a horizon in years.
pub fn trading_days_for(time_horizon_years: f64) -> usize {
    // the epsilon keeps exact fractions such as 1/252 from flooring to zero
    let days = (time_horizon_years * TRADING_DAYS_PER_YEAR + 1e-9).floor();
    if days.is_finite() && days > 0.0 {
        days as usize
    } else {
        0
    }
}

fn positive_price(value: &ParamValue) -> Option<String> {
    match value.as_f64() {
        Some(p) if p <= 0.0 => Some("Price must be positive".to_string()),
        _ => None,
    }
}

fn horizon_in_days(value: &ParamValue) -> Option<String> {
    let days = trading_days_for(value.as_f64()?);
    if days == 0 {
        Some("Horizon must span at least one trading day".to_string())
    } else if days > MAX_TRADING_DAYS {
        Some(format!("Horizon must not exceed {} trading days", MAX_TRADING_DAYS))
    } else {
        None
    }
}

fn whole_seed(value: &ParamValue) -> Option<String> {
    match value.as_f64() {
        Some(s) if s < 0.0 || s.fract() != 0.0 || s > MAX_SEED => {
            Some("Seed must be a non-negative whole number".to_string())
        }
        _ => None,
    }
}

/// Field metadata for a scenario record.
pub fn scenario_schema() -> ParameterSchema {
    let pair = FieldSpec::new("currency_pair", FieldKind::Choice, "Currency Pair")
        .default_value(CurrencyPair::default().to_string())
        .option("USD/MXN", "USD/MXN")
        .option("EUR/USD", "EUR/USD")
        .option("GBP/USD", "GBP/USD")
        .option("USD/CAD", "USD/CAD");

    ParameterSchema::new(vec![
        FieldSpec::new("initial_price", FieldKind::Currency, "Current Price")
            .description("Current spot price of the currency pair")
            .default_value(18.5)
            .min(0.01)
            .check(positive_price),
        FieldSpec::new("time_horizon_years", FieldKind::Range, "Time Horizon")
            .description("Length of the hedge, in years")
            .default_value(0.25)
            .min(1.0 / TRADING_DAYS_PER_YEAR)
            .max(MAX_TRADING_DAYS as f64 / TRADING_DAYS_PER_YEAR)
            .step(0.25)
            .check(horizon_in_days),
        FieldSpec::new("annual_volatility", FieldKind::Percentage, "Expected Volatility")
            .description("Annual volatility of the currency pair")
            .default_value(0.12)
            .min(0.05)
            .max(0.50)
            .step(0.01),
        FieldSpec::new("direction", FieldKind::Choice, "Expected Direction")
            .default_value("down")
            .option("up", "Strengthening")
            .option("down", "Weakening")
            .option("neutral", "Sideways/Volatile"),
        FieldSpec::new("expected_magnitude", FieldKind::Percentage, "Expected Move Size")
            .description("Total expected price change over time horizon")
            .default_value(0.15)
            .min(0.01)
            .max(0.50)
            .step(0.01),
        pair,
        FieldSpec::new("seed", FieldKind::Number, "Random Seed (optional)")
            .description("For reproducible simulations")
            .min(0.0)
            .step(1.0)
            .check(whole_seed),
    ])
}

/// Validated description of how a currency pair might move.
///
/// Built only through [`ScenarioParameters::from_record`] or
/// [`ScenarioParameters::new`], both of which validate, so every instance
/// satisfies the scenario schema. `trading_days` is always derived from
/// the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioParameters {
    initial_price: f64,
    time_horizon_years: f64,
    trading_days: usize,
    annual_volatility: f64,
    direction: Direction,
    expected_magnitude: f64,
    currency_pair: CurrencyPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl ScenarioParameters {
    /// Build and validate a scenario.
    pub fn new(
        initial_price: f64,
        time_horizon_years: f64,
        annual_volatility: f64,
        direction: Direction,
        expected_magnitude: f64,
        currency_pair: CurrencyPair,
    ) -> Result<Self, SimulationError> {
        let record = ParamRecord::new()
            .with("initial_price", initial_price)
            .with("time_horizon_years", time_horizon_years)
            .with("annual_volatility", annual_volatility)
            .with("direction", direction.as_str())
            .with("expected_magnitude", expected_magnitude)
            .with("currency_pair", currency_pair.to_string());
        Self::from_record(&record)
    }

    /// Attach a seed for reproducible path generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn without_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn schema() -> ParameterSchema {
        scenario_schema()
    }

    pub fn validate(record: &ParamRecord) -> ValidationResult {
        scenario_schema().validate(record)
    }

    /// Fill absent fields with defaults and derive `trading_days`.
    pub fn fill_defaults(partial: &ParamRecord) -> ParamRecord {
        let mut filled = scenario_schema().fill_defaults(partial, None);
        if let Some(horizon) = filled.number("time_horizon_years") {
            filled.set("trading_days", trading_days_for(horizon) as f64);
        }
        filled
    }

    /// Validate, default-fill and convert a caller-supplied record.
    pub fn from_record(record: &ParamRecord) -> Result<Self, SimulationError> {
        Self::validate(record).into_result("scenario")?;
        let filled = Self::fill_defaults(record);

        let mut errors = FieldErrors::new();
        let mut number = |name: &str| {
            filled.number(name).unwrap_or_else(|| {
                errors.insert(name, "Missing value");
                f64::NAN
            })
        };
        let initial_price = number("initial_price");
        let time_horizon_years = number("time_horizon_years");
        let annual_volatility = number("annual_volatility");
        let expected_magnitude = number("expected_magnitude");

        let direction = filled
            .text("direction")
            .and_then(|d| d.parse::<Direction>().ok());
        let currency_pair = filled
            .text("currency_pair")
            .and_then(|p| p.parse::<CurrencyPair>().ok());

        let (direction, currency_pair) = match (direction, currency_pair) {
            (Some(d), Some(p)) if errors.is_empty() => (d, p),
            (d, p) => {
                if d.is_none() {
                    errors.insert("direction", "Missing value");
                }
                if p.is_none() {
                    errors.insert("currency_pair", "Missing value");
                }
                return Err(SimulationError::invalid("scenario", errors));
            }
        };

        Ok(Self {
            initial_price,
            time_horizon_years,
            trading_days: trading_days_for(time_horizon_years),
            annual_volatility,
            direction,
            expected_magnitude,
            currency_pair,
            seed: filled.number("seed").map(|s| s as u64),
        })
    }

    /// Context for resolving strategy defaults against this scenario.
    pub fn default_context(&self) -> DefaultContext {
        DefaultContext {
            spot_price: self.initial_price,
            volatility: self.annual_volatility,
            time_horizon_years: self.time_horizon_years,
        }
    }

    /// Length of one simulation step, in years.
    pub fn dt(&self) -> f64 {
        self.time_horizon_years / self.trading_days as f64
    }

    /// Drift calibrated so the expected terminal log-return matches the
    /// requested total move.
    pub fn drift(&self) -> f64 {
        self.direction.sign() * (1.0 + self.expected_magnitude.abs()).ln() / self.time_horizon_years
    }

    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    pub fn time_horizon_years(&self) -> f64 {
        self.time_horizon_years
    }

    pub fn trading_days(&self) -> usize {
        self.trading_days
    }

    pub fn annual_volatility(&self) -> f64 {
        self.annual_volatility
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn expected_magnitude(&self) -> f64 {
        self.expected_magnitude
    }

    pub fn currency_pair(&self) -> &CurrencyPair {
        &self.currency_pair
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
