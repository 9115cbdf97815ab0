//! Early-exit rules evaluated once per simulated day.
//!
//! [`ExitKind`] is the catalog side (identifier, schema, defaults) and
//! [`ExitPolicy`] the typed rule built from a validated record. Policies are
//! immutable: the trailing stop's running peak lives in an [`ExitState`]
//! that the caller threads from one evaluation to the next.

use crate::core::error::SimulationError;
use crate::core::params::{ParamRecord, ParamValue};
use crate::core::schema::{FieldKind, FieldSpec, ParameterSchema, ValidationResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitKind {
    HoldToExpiry,
    StopLoss,
    TakeProfit,
    TrailingStop,
}

fn strictly_negative(message: &'static str) -> impl Fn(&ParamValue) -> Option<String> {
    move |value| match value.as_f64() {
        Some(n) if n >= 0.0 => Some(message.to_string()),
        _ => None,
    }
}

fn stop_loss_check(value: &ParamValue) -> Option<String> {
    strictly_negative("Stop loss must be negative (represents a loss)")(value)
}

fn trailing_check(value: &ParamValue) -> Option<String> {
    strictly_negative("Trailing stop must be negative (represents a retracement)")(value)
}

fn profit_target_check(value: &ParamValue) -> Option<String> {
    match value.as_f64() {
        Some(n) if n <= 0.0 => Some("Profit target must be positive".to_string()),
        _ => None,
    }
}

impl ExitKind {
    pub const ALL: [ExitKind; 4] = [
        ExitKind::HoldToExpiry,
        ExitKind::StopLoss,
        ExitKind::TakeProfit,
        ExitKind::TrailingStop,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExitKind::HoldToExpiry => "hold_to_expiry",
            ExitKind::StopLoss => "stop_loss",
            ExitKind::TakeProfit => "take_profit",
            ExitKind::TrailingStop => "trailing_stop",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitKind::HoldToExpiry => "Hold the position until expiration date. No early exit.",
            ExitKind::StopLoss => "Exit position when losses reach a specified percentage threshold.",
            ExitKind::TakeProfit => "Exit position when profits reach a specified percentage target.",
            ExitKind::TrailingStop => {
                "Exit position when its value falls a specified percentage below its running peak."
            }
        }
    }

    pub fn schema(self) -> ParameterSchema {
        match self {
            ExitKind::HoldToExpiry => ParameterSchema::default(),
            ExitKind::StopLoss => ParameterSchema::new(vec![FieldSpec::new(
                "stop_loss_percentage",
                FieldKind::Percentage,
                "Stop Loss Threshold",
            )
            .description("Exit when losses reach this percentage of initial cost")
            .default_value(-0.50)
            .min(-0.95)
            .max(-0.05)
            .step(0.05)
            .check(stop_loss_check)]),
            ExitKind::TakeProfit => ParameterSchema::new(vec![FieldSpec::new(
                "profit_target_percentage",
                FieldKind::Percentage,
                "Profit Target",
            )
            .description("Exit when gains reach this percentage of initial cost")
            .default_value(1.0)
            .min(0.10)
            .max(5.0)
            .step(0.10)
            .check(profit_target_check)]),
            ExitKind::TrailingStop => ParameterSchema::new(vec![FieldSpec::new(
                "trail_percentage",
                FieldKind::Percentage,
                "Trailing Stop",
            )
            .description("Exit when value falls this far below its running peak")
            .default_value(-0.20)
            .min(-0.95)
            .max(-0.01)
            .step(0.01)
            .check(trailing_check)]),
        }
    }

    pub fn validate(self, params: &ParamRecord) -> ValidationResult {
        self.schema().validate(params)
    }

    pub fn fill_defaults(self, partial: &ParamRecord) -> ParamRecord {
        self.schema().fill_defaults(partial, None)
    }

    /// Convert a record into a typed policy. Absent thresholds take their
    /// defaults; present ones must validate.
    pub fn build(self, params: &ParamRecord) -> Result<ExitPolicy, SimulationError> {
        self.validate(params).into_result(self.id())?;
        let filled = self.fill_defaults(params);
        let threshold = |name: &str| filled.number(name).unwrap_or(f64::NAN);

        Ok(match self {
            ExitKind::HoldToExpiry => ExitPolicy::HoldToExpiry,
            ExitKind::StopLoss => ExitPolicy::StopLoss {
                stop_loss_percentage: threshold("stop_loss_percentage"),
            },
            ExitKind::TakeProfit => ExitPolicy::TakeProfit {
                profit_target_percentage: threshold("profit_target_percentage"),
            },
            ExitKind::TrailingStop => ExitPolicy::TrailingStop {
                trail_percentage: threshold("trail_percentage"),
            },
        })
    }
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExitKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExitKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| SimulationError::UnknownExitPolicy(s.to_string()))
    }
}

/// A configured exit rule. Thresholds are fractions of the initial cost
/// (or of the peak value, for the trailing stop).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExitPolicy {
    HoldToExpiry,
    StopLoss { stop_loss_percentage: f64 },
    TakeProfit { profit_target_percentage: f64 },
    TrailingStop { trail_percentage: f64 },
}

/// Per-run state carried between exit evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExitState {
    /// Highest position value seen so far, if the policy tracks one.
    pub peak_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExitDecision {
    pub should_exit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExitDecision {
    pub fn hold() -> Self {
        Self::default()
    }

    pub fn exit(reason: impl Into<String>) -> Self {
        Self {
            should_exit: true,
            reason: Some(reason.into()),
        }
    }
}

impl ExitPolicy {
    pub fn kind(&self) -> ExitKind {
        match self {
            ExitPolicy::HoldToExpiry => ExitKind::HoldToExpiry,
            ExitPolicy::StopLoss { .. } => ExitKind::StopLoss,
            ExitPolicy::TakeProfit { .. } => ExitKind::TakeProfit,
            ExitPolicy::TrailingStop { .. } => ExitKind::TrailingStop,
        }
    }

    /// Test the rule for one day.
    ///
    /// Returns the decision together with the state to pass into the next
    /// call. A non-positive `initial_cost` (or peak) disables the
    /// ratio-based rules instead of dividing by it.
    ///
    /// # Examples
    ///
    /// ```
    /// use fx_hedge_sim::exit::{ExitPolicy, ExitState};
    ///
    /// let policy = ExitPolicy::StopLoss { stop_loss_percentage: -0.5 };
    /// let (decision, _) = policy.should_exit(10, -600.0, 400.0, 1000.0, ExitState::default());
    /// assert!(decision.should_exit);
    /// assert_eq!(decision.reason.as_deref(), Some("Stop loss triggered: -60.0% loss"));
    /// ```
    pub fn should_exit(
        &self,
        day: usize,
        pnl: f64,
        value: f64,
        initial_cost: f64,
        state: ExitState,
    ) -> (ExitDecision, ExitState) {
        let (decision, next) = match *self {
            ExitPolicy::HoldToExpiry => (ExitDecision::hold(), state),
            ExitPolicy::StopLoss { stop_loss_percentage } => {
                let decision = match pnl_ratio(pnl, initial_cost) {
                    Some(loss) if loss <= stop_loss_percentage => {
                        ExitDecision::exit(format!("Stop loss triggered: {:.1}% loss", loss * 100.0))
                    }
                    _ => ExitDecision::hold(),
                };
                (decision, state)
            }
            ExitPolicy::TakeProfit {
                profit_target_percentage,
            } => {
                let decision = match pnl_ratio(pnl, initial_cost) {
                    Some(gain) if gain >= profit_target_percentage => {
                        ExitDecision::exit(format!("Profit target reached: {:.1}% gain", gain * 100.0))
                    }
                    _ => ExitDecision::hold(),
                };
                (decision, state)
            }
            ExitPolicy::TrailingStop { trail_percentage } => {
                let peak = state.peak_value.map_or(value, |p| p.max(value));
                let retracement = if peak > 0.0 {
                    Some((value - peak) / peak)
                } else {
                    None
                };
                let decision = match retracement {
                    Some(r) if r <= trail_percentage => {
                        ExitDecision::exit(format!("Trailing stop triggered: {:.1}% from peak", r * 100.0))
                    }
                    _ => ExitDecision::hold(),
                };
                (
                    decision,
                    ExitState {
                        peak_value: Some(peak),
                    },
                )
            }
        };

        if let Some(reason) = &decision.reason {
            debug!("day {}: {}", day, reason);
        }
        (decision, next)
    }
}

fn pnl_ratio(pnl: f64, initial_cost: f64) -> Option<f64> {
    (initial_cost > 0.0).then(|| pnl / initial_cost)
}
