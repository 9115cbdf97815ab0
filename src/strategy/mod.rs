//! Catalog of hedging strategies.
//!
//! [`StrategyKind`] is the closed set of strategy identifiers. Each kind
//! declares its parameter schema, the exit policies it can be paired with,
//! and how to turn a validated record into a typed [`Strategy`].

pub mod position;

pub use position::{OptionLeg, PositionValue, Strategy};

use crate::core::error::{FieldErrors, SimulationError};
use crate::core::params::{ParamRecord, ParamValue};
use crate::core::schema::{
    DefaultContext, DefaultRule, FieldKind, FieldSpec, ParameterSchema, ValidationResult,
};
use crate::exit::ExitKind;
use crate::pricing::{self, OptionType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Underlying units covered by one option contract.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    LongCall,
    LongPut,
    ProtectivePut,
    LongStraddle,
}

fn positive_strike(value: &ParamValue) -> Option<String> {
    match value.as_f64() {
        Some(k) if k <= 0.0 => Some("Strike price must be positive".to_string()),
        _ => None,
    }
}

fn whole_contracts(value: &ParamValue) -> Option<String> {
    match value.as_f64() {
        Some(q) if q < 1.0 || q.fract() != 0.0 || q > f64::from(u32::MAX) => {
            Some("Must be at least 1 whole contract".to_string())
        }
        _ => None,
    }
}

fn positive_exposure(value: &ParamValue) -> Option<String> {
    match value.as_f64() {
        Some(q) if q <= 0.0 => Some("Must have positive underlying exposure".to_string()),
        _ => None,
    }
}

fn strike_field(label: &'static str, description: &'static str, default: DefaultRule) -> FieldSpec {
    FieldSpec::new("strike_price", FieldKind::Currency, label)
        .description(description)
        .default_rule(default)
        .min(0.01)
        .check(positive_strike)
}

fn premium_field() -> FieldSpec {
    FieldSpec::new("premium_per_contract", FieldKind::Currency, "Premium per Contract")
        .description("Cost to purchase each contract; priced from the model when omitted")
        .default_rule(DefaultRule::Computed)
        .min(0.0)
        .readonly()
}

fn rate_field() -> FieldSpec {
    FieldSpec::new("risk_free_rate", FieldKind::Percentage, "Risk-free Rate")
        .default_value(0.05)
        .min(0.0)
        .max(0.20)
        .step(0.001)
}

fn volatility_field() -> FieldSpec {
    FieldSpec::new("volatility", FieldKind::Percentage, "Pricing Volatility")
        .description("Volatility used to value the options; defaults to the scenario volatility")
        .default_rule(DefaultRule::ScenarioVolatility)
        .min(0.0)
        .max(1.0)
        .step(0.01)
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::LongCall,
        StrategyKind::LongPut,
        StrategyKind::ProtectivePut,
        StrategyKind::LongStraddle,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StrategyKind::LongCall => "long_call",
            StrategyKind::LongPut => "long_put",
            StrategyKind::ProtectivePut => "protective_put",
            StrategyKind::LongStraddle => "long_straddle",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::LongCall => {
                "Buy call options to profit from upward price movement. Limited loss (premium paid), unlimited upside potential."
            }
            StrategyKind::LongPut => {
                "Buy put options to profit from downward price movement or hedge existing positions. Limited loss (premium), high profit potential on declines."
            }
            StrategyKind::ProtectivePut => {
                "Combine long underlying position with protective put options. Limits downside losses while maintaining upside participation."
            }
            StrategyKind::LongStraddle => {
                "Buy a call and a put at the same strike. Profits from a large move in either direction; loses the premium if the pair stays put."
            }
        }
    }

    /// Exit policies that make sense for this strategy.
    ///
    /// The protective put also holds linear underlying exposure, so exits
    /// defined purely on option value (take-profit, trailing stop) do not apply.
    pub fn compatible_exit_policies(self) -> &'static [ExitKind] {
        match self {
            StrategyKind::LongCall | StrategyKind::LongPut | StrategyKind::LongStraddle => &ExitKind::ALL,
            StrategyKind::ProtectivePut => &[ExitKind::HoldToExpiry, ExitKind::StopLoss],
        }
    }

    pub fn is_compatible(self, exit: ExitKind) -> bool {
        self.compatible_exit_policies().contains(&exit)
    }

    pub fn schema(self) -> ParameterSchema {
        match self {
            StrategyKind::LongCall => ParameterSchema::new(vec![
                strike_field(
                    "Strike Price",
                    "Price at which you can buy the underlying",
                    DefaultRule::Spot,
                ),
                FieldSpec::new("quantity_contracts", FieldKind::Number, "Number of Contracts")
                    .description("How many call contracts to purchase")
                    .default_value(1.0)
                    .min(1.0)
                    .step(1.0)
                    .check(whole_contracts),
                premium_field(),
                rate_field(),
                volatility_field(),
            ]),
            StrategyKind::LongPut | StrategyKind::LongStraddle => ParameterSchema::new(vec![
                strike_field(
                    "Strike Price",
                    if self == StrategyKind::LongPut {
                        "Price at which you can sell the underlying"
                    } else {
                        "Common strike of the call and put"
                    },
                    DefaultRule::Spot,
                ),
                FieldSpec::new("quantity_contracts", FieldKind::Number, "Number of Contracts")
                    .default_value(1.0)
                    .min(1.0)
                    .step(1.0)
                    .check(whole_contracts),
                premium_field(),
                rate_field(),
                volatility_field(),
            ]),
            StrategyKind::ProtectivePut => ParameterSchema::new(vec![
                FieldSpec::new("underlying_quantity", FieldKind::Currency, "Underlying Position Size")
                    .description("Amount of underlying currency exposure to protect")
                    .default_value(100_000.0)
                    .min(1000.0)
                    .check(positive_exposure),
                strike_field(
                    "Put Strike Price",
                    "Minimum price protection level",
                    DefaultRule::SpotFraction(0.95),
                ),
                FieldSpec::new("entry_price", FieldKind::Currency, "Entry Price")
                    .description("Spot price at which the underlying exposure was taken")
                    .default_rule(DefaultRule::Spot)
                    .min(0.01)
                    .readonly(),
                FieldSpec::new("quantity_contracts", FieldKind::Number, "Put Contracts")
                    .description("Contracts needed to cover the underlying exposure")
                    .default_rule(DefaultRule::Computed)
                    .check(whole_contracts)
                    .readonly(),
                premium_field(),
                rate_field(),
                volatility_field(),
            ]),
        }
    }

    /// Validate a (possibly partial) record against this strategy's schema.
    pub fn validate(self, params: &ParamRecord) -> ValidationResult {
        self.schema().validate(params)
    }

    /// Complete a partial record for a position opened in `ctx`.
    ///
    /// Strikes resolve against the current spot, the pricing volatility
    /// against the scenario, the protective put's contract count is always
    /// derived from its exposure, and an omitted premium is priced by the
    /// model over the full horizon.
    pub fn fill_defaults(self, partial: &ParamRecord, ctx: &DefaultContext) -> ParamRecord {
        let mut filled = self.schema().fill_defaults(partial, Some(ctx));

        if self == StrategyKind::ProtectivePut {
            if let Some(exposure) = filled.number("underlying_quantity") {
                let contracts = (exposure / (ctx.spot_price * CONTRACT_MULTIPLIER)).ceil().max(1.0);
                filled.set("quantity_contracts", contracts);
            }
        }

        if !filled.contains("premium_per_contract") {
            if let Some(premium) = self.model_premium(&filled, ctx) {
                filled.set("premium_per_contract", premium);
            }
        }
        filled
    }

    fn model_premium(self, filled: &ParamRecord, ctx: &DefaultContext) -> Option<f64> {
        let strike = filled.number("strike_price")?;
        let rate = filled.number("risk_free_rate")?;
        let volatility = filled.number("volatility")?;
        let value = |option_type| {
            pricing::price(
                ctx.spot_price,
                strike,
                ctx.time_horizon_years,
                rate,
                volatility,
                option_type,
            )
        };
        Some(match self {
            StrategyKind::LongCall => value(OptionType::Call),
            StrategyKind::LongPut | StrategyKind::ProtectivePut => value(OptionType::Put),
            StrategyKind::LongStraddle => value(OptionType::Call) + value(OptionType::Put),
        })
    }

    /// Convert a complete record into a typed position.
    pub fn build(self, params: &ParamRecord) -> Result<Strategy, SimulationError> {
        self.validate(params).into_result(self.id())?;

        let mut errors = FieldErrors::new();
        let mut number = |name: &str| {
            params.number(name).unwrap_or_else(|| {
                errors.insert(name, "Missing value");
                f64::NAN
            })
        };
        let leg = OptionLeg {
            strike_price: number("strike_price"),
            quantity_contracts: number("quantity_contracts") as u32,
            premium_per_contract: number("premium_per_contract"),
            risk_free_rate: number("risk_free_rate"),
            volatility: number("volatility"),
        };
        let strategy = match self {
            StrategyKind::LongCall => Strategy::LongCall(leg),
            StrategyKind::LongPut => Strategy::LongPut(leg),
            StrategyKind::LongStraddle => Strategy::LongStraddle(leg),
            StrategyKind::ProtectivePut => Strategy::ProtectivePut {
                leg,
                underlying_quantity: number("underlying_quantity"),
                entry_price: number("entry_price"),
            },
        };

        if errors.is_empty() {
            Ok(strategy)
        } else {
            Err(SimulationError::invalid(self.id(), errors))
        }
    }

    /// Validate, fill and build in one step.
    pub fn configure(self, partial: &ParamRecord, ctx: &DefaultContext) -> Result<Strategy, SimulationError> {
        self.validate(partial).into_result(self.id())?;
        self.build(&self.fill_defaults(partial, ctx))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrategyKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| SimulationError::UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ctx() -> DefaultContext {
        DefaultContext {
            spot_price: 18.5,
            volatility: 0.12,
            time_horizon_years: 0.25,
        }
    }

    #[test]
    fn test_parse_identifiers() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.id().parse::<StrategyKind>().unwrap(), kind);
        }
        let err = "iron_condor".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(err, SimulationError::UnknownStrategy(ref id) if id == "iron_condor"));
    }

    #[test]
    fn test_long_call_defaults_at_the_money() {
        let filled = StrategyKind::LongCall.fill_defaults(&ParamRecord::new(), &ctx());
        assert_eq!(filled.number("strike_price"), Some(18.5));
        assert_eq!(filled.number("quantity_contracts"), Some(1.0));
        assert_eq!(filled.number("risk_free_rate"), Some(0.05));
        assert_eq!(filled.number("volatility"), Some(0.12));

        let expected = pricing::price(18.5, 18.5, 0.25, 0.05, 0.12, OptionType::Call);
        assert_relative_eq!(filled.number("premium_per_contract").unwrap(), expected);
    }

    #[test]
    fn test_supplied_premium_is_trusted() {
        let partial = ParamRecord::new().with("premium_per_contract", 2.0);
        let strategy = StrategyKind::LongPut.configure(&partial, &ctx()).unwrap();
        assert_eq!(strategy.leg().premium_per_contract, 2.0);
        assert_eq!(strategy.initial_cost(), 2.0);
    }

    #[test]
    fn test_protective_put_derives_contracts() {
        let partial = ParamRecord::new()
            .with("underlying_quantity", 100_000.0)
            // user-supplied quantity is ignored
            .with("quantity_contracts", 7.0);
        let filled = StrategyKind::ProtectivePut.fill_defaults(&partial, &ctx());

        // ceil(100000 / (18.5 * 100)) = ceil(54.05) = 55
        assert_eq!(filled.number("quantity_contracts"), Some(55.0));
        assert_relative_eq!(filled.number("strike_price").unwrap(), 18.5 * 0.95);
        assert_eq!(filled.number("entry_price"), Some(18.5));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let record = ParamRecord::new()
            .with("strike_price", -1.0)
            .with("quantity_contracts", 1.5);
        let result = StrategyKind::LongCall.validate(&record);
        assert_eq!(result.errors.get("strike_price"), Some("Strike price must be positive"));
        assert_eq!(result.errors.get("quantity_contracts"), Some("Must be at least 1 whole contract"));

        let err = StrategyKind::LongCall.configure(&record, &ctx()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_protective_put_rejects_small_exposure() {
        let result = StrategyKind::ProtectivePut.validate(&ParamRecord::new().with("underlying_quantity", 0.0));
        assert_eq!(
            result.errors.get("underlying_quantity"),
            Some("Must have positive underlying exposure")
        );
    }

    #[test]
    fn test_build_requires_complete_record() {
        let err = StrategyKind::LongCall.build(&ParamRecord::new()).unwrap_err();
        match err {
            SimulationError::InvalidParameters { errors, .. } => {
                assert!(errors.contains("strike_price"));
                assert!(errors.contains("premium_per_contract"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_compatible_exits() {
        assert!(StrategyKind::LongCall.is_compatible(ExitKind::TakeProfit));
        assert!(StrategyKind::ProtectivePut.is_compatible(ExitKind::StopLoss));
        assert!(!StrategyKind::ProtectivePut.is_compatible(ExitKind::TakeProfit));
        assert!(!StrategyKind::ProtectivePut.is_compatible(ExitKind::TrailingStop));
    }

    #[test]
    fn test_configured_position_starts_flat() {
        for kind in StrategyKind::ALL {
            let strategy = kind.configure(&ParamRecord::new(), &ctx()).unwrap();
            let day0 = strategy.calculate_value(18.5, 0.25);
            assert_relative_eq!(day0.total_value, strategy.initial_cost(), max_relative = 1e-12);
        }
    }
}
