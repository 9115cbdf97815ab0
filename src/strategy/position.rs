use crate::pricing::{self, OptionType};
use crate::strategy::StrategyKind;
use serde::Serialize;

/// Value of a position at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionValue {
    /// Mark-to-model value; the P&L basis.
    pub total_value: f64,
    /// Payoff-only value, for diagnostics.
    pub intrinsic_value: f64,
}

/// Terms shared by every option leg of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionLeg {
    pub strike_price: f64,
    pub quantity_contracts: u32,
    pub premium_per_contract: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
}

impl OptionLeg {
    fn value(&self, option_type: OptionType, spot: f64, time_to_expiry: f64) -> PositionValue {
        let quantity = f64::from(self.quantity_contracts);
        let model = pricing::price(
            spot,
            self.strike_price,
            time_to_expiry.max(0.0),
            self.risk_free_rate,
            self.volatility,
            option_type,
        );
        PositionValue {
            total_value: model * quantity,
            intrinsic_value: option_type.intrinsic(spot, self.strike_price) * quantity,
        }
    }

    /// Premium paid for the whole leg.
    pub fn cost(&self) -> f64 {
        self.premium_per_contract * f64::from(self.quantity_contracts)
    }
}

/// A fully configured hedging position.
///
/// Instances are immutable and carry no simulation state, so one value can
/// be shared read-only across any number of concurrent runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
    LongCall(OptionLeg),
    LongPut(OptionLeg),
    /// Long underlying exposure plus puts struck below spot.
    ProtectivePut {
        leg: OptionLeg,
        /// Notional of the held underlying, in quote currency at entry.
        underlying_quantity: f64,
        /// Spot price at which the underlying exposure was established.
        entry_price: f64,
    },
    /// Long call and long put at the same strike.
    LongStraddle(OptionLeg),
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::LongCall(_) => StrategyKind::LongCall,
            Strategy::LongPut(_) => StrategyKind::LongPut,
            Strategy::ProtectivePut { .. } => StrategyKind::ProtectivePut,
            Strategy::LongStraddle(_) => StrategyKind::LongStraddle,
        }
    }

    pub fn leg(&self) -> &OptionLeg {
        match self {
            Strategy::LongCall(leg)
            | Strategy::LongPut(leg)
            | Strategy::LongStraddle(leg)
            | Strategy::ProtectivePut { leg, .. } => leg,
        }
    }

    /// Value the position at `spot` with `time_to_expiry` years left.
    /// Negative times are clamped to expiry.
    pub fn calculate_value(&self, spot: f64, time_to_expiry: f64) -> PositionValue {
        match self {
            Strategy::LongCall(leg) => leg.value(OptionType::Call, spot, time_to_expiry),
            Strategy::LongPut(leg) => leg.value(OptionType::Put, spot, time_to_expiry),
            Strategy::LongStraddle(leg) => {
                let call = leg.value(OptionType::Call, spot, time_to_expiry);
                let put = leg.value(OptionType::Put, spot, time_to_expiry);
                PositionValue {
                    total_value: call.total_value + put.total_value,
                    intrinsic_value: call.intrinsic_value + put.intrinsic_value,
                }
            }
            Strategy::ProtectivePut {
                leg,
                underlying_quantity,
                entry_price,
            } => {
                let underlying = underlying_quantity * spot / entry_price;
                let puts = leg.value(OptionType::Put, spot, time_to_expiry);
                PositionValue {
                    total_value: underlying + puts.total_value,
                    intrinsic_value: underlying + puts.intrinsic_value,
                }
            }
        }
    }

    /// Cost of opening the position: option premium plus, for composite
    /// strategies, the entry notional of the held underlying.
    pub fn initial_cost(&self) -> f64 {
        match self {
            Strategy::ProtectivePut {
                leg,
                underlying_quantity,
                ..
            } => leg.cost() + underlying_quantity,
            other => other.leg().cost(),
        }
    }
}
