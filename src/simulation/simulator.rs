//! Day-by-day simulation of a strategy along one price path.

use crate::core::error::SimulationError;
use crate::core::params::ParamRecord;
use crate::exit::{ExitKind, ExitPolicy, ExitState};
use crate::scenario::params::ScenarioParameters;
use crate::scenario::path::{generate_price_path, PricePath};
use crate::simulation::result::{
    FinalResult, OptionValuePoint, PnlPoint, PnlStatistics, SimulationResult,
};
use crate::strategy::{PositionValue, Strategy, StrategyKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// `{ "type": id, "params": {record} }` for a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: ParamRecord,
}

impl StrategyConfig {
    pub fn new(kind: StrategyKind, params: ParamRecord) -> Self {
        Self {
            kind: kind.id().to_string(),
            params,
        }
    }
}

/// `{ "type": id, "params": {record} }` for an exit policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: ParamRecord,
}

impl ExitConfig {
    pub fn new(kind: ExitKind, params: ParamRecord) -> Self {
        Self {
            kind: kind.id().to_string(),
            params,
        }
    }
}

impl Default for ExitConfig {
    fn default() -> Self {
        ExitConfig::new(ExitKind::HoldToExpiry, ParamRecord::new())
    }
}

/// A complete simulation request as supplied by a caller.
///
/// Records may be partial; every one of them is validated and
/// default-filled before anything runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub scenario: ParamRecord,
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub exit: ExitConfig,
}

impl SimulationConfig {
    pub fn new(scenario: ParamRecord, strategy: StrategyConfig, exit: ExitConfig) -> Self {
        Self {
            scenario,
            strategy,
            exit,
        }
    }

    /// Validate every record, resolve type identifiers and build the typed
    /// scenario, position and exit rule.
    pub fn resolve(&self) -> Result<ResolvedSimulation, SimulationError> {
        let strategy_kind: StrategyKind = self.strategy.kind.parse()?;
        let exit_kind: ExitKind = self.exit.kind.parse()?;
        check_compatible(strategy_kind, exit_kind)?;

        let scenario = ScenarioParameters::from_record(&self.scenario)?;
        let strategy = strategy_kind.configure(&self.strategy.params, &scenario.default_context())?;
        let exit = exit_kind.build(&self.exit.params)?;

        Ok(ResolvedSimulation {
            scenario,
            strategy,
            exit,
        })
    }
}

/// Typed inputs of one run, after validation and defaulting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSimulation {
    pub scenario: ScenarioParameters,
    pub strategy: Strategy,
    pub exit: ExitPolicy,
}

fn check_compatible(strategy: StrategyKind, exit: ExitKind) -> Result<(), SimulationError> {
    if strategy.is_compatible(exit) {
        Ok(())
    } else {
        Err(SimulationError::IncompatibleExit {
            strategy: strategy.id().to_string(),
            exit: exit.id().to_string(),
        })
    }
}

enum PositionState {
    Running,
    Closed { value: PositionValue, pnl: f64 },
}

/// The simulation engine.
///
/// Stateless: every run owns its path and exit state, so runs over
/// different seeds can proceed in parallel on shared inputs.
pub struct Simulator;

impl Simulator {
    /// Resolve `config` and run it.
    pub fn run(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
        let resolved = config.resolve()?;
        Self::simulate(&resolved.scenario, &resolved.strategy, &resolved.exit)
    }

    /// Generate a path for `scenario` and run `strategy` along it.
    pub fn simulate(
        scenario: &ScenarioParameters,
        strategy: &Strategy,
        exit: &ExitPolicy,
    ) -> Result<SimulationResult, SimulationError> {
        check_compatible(strategy.kind(), exit.kind())?;
        let path = generate_price_path(scenario);
        Ok(Self::run_on_path(path, scenario.time_horizon_years(), strategy, exit))
    }

    /// Walk an existing path day by day.
    ///
    /// The position is revalued each day with the time left to `horizon`
    /// until the exit rule fires; from then on the exit day's value and
    /// P&L are carried forward unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use fx_hedge_sim::exit::ExitPolicy;
    /// use fx_hedge_sim::scenario::PricePath;
    /// use fx_hedge_sim::simulation::Simulator;
    /// use fx_hedge_sim::strategy::{OptionLeg, Strategy};
    ///
    /// let strategy = Strategy::LongPut(OptionLeg {
    ///     strike_price: 18.5,
    ///     quantity_contracts: 1,
    ///     premium_per_contract: 0.4,
    ///     risk_free_rate: 0.05,
    ///     volatility: 0.12,
    /// });
    /// let path = PricePath::from_prices(vec![18.5, 18.0, 17.0]);
    /// let result = Simulator::run_on_path(path, 2.0 / 252.0, &strategy, &ExitPolicy::HoldToExpiry);
    ///
    /// assert_eq!(result.strategy_pnl.len(), 3);
    /// // expiry payoff of 1.5 less the 0.4 premium
    /// assert!((result.final_result.total_pnl - 1.1).abs() < 1e-9);
    /// ```
    pub fn run_on_path(
        path: PricePath,
        horizon: f64,
        strategy: &Strategy,
        exit: &ExitPolicy,
    ) -> SimulationResult {
        let trading_days = path.trading_days();
        let initial_cost = strategy.initial_cost();
        if initial_cost <= 0.0 && exit.kind() != ExitKind::HoldToExpiry {
            warn!(
                "initial cost {} is not positive; {} exit will never fire",
                initial_cost,
                exit.kind()
            );
        }

        let mut option_values = Vec::with_capacity(path.len());
        let mut strategy_pnl = Vec::with_capacity(path.len());
        let mut exit_state = ExitState::default();
        let mut position = PositionState::Running;
        let mut exit_day = None;
        let mut exit_reason = None;

        for point in path.points() {
            let (value, pnl) = match position {
                PositionState::Closed { value, pnl } => (value, pnl),
                PositionState::Running => {
                    let time_remaining = time_remaining(horizon, point.day, trading_days);
                    let value = strategy.calculate_value(point.price, time_remaining);
                    let pnl = value.total_value - initial_cost;

                    let (decision, next) =
                        exit.should_exit(point.day, pnl, value.total_value, initial_cost, exit_state);
                    exit_state = next;
                    if decision.should_exit {
                        exit_day = Some(point.day);
                        exit_reason = decision.reason;
                        position = PositionState::Closed { value, pnl };
                    }
                    (value, pnl)
                }
            };

            option_values.push(OptionValuePoint {
                day: point.day,
                total_value: value.total_value,
                intrinsic_value: value.intrinsic_value,
            });
            strategy_pnl.push(PnlPoint {
                day: point.day,
                pnl,
                total_value: value.total_value,
            });
        }

        let pnl: Vec<f64> = strategy_pnl.iter().map(|p| p.pnl).collect();
        let stats = PnlStatistics::from_series(&pnl);
        info!(
            "{} over {} days: total P&L {:.4}, win probability {:.2}{}",
            strategy.kind(),
            trading_days,
            stats.total_pnl,
            stats.win_probability,
            exit_day.map_or_else(String::new, |d| format!(", exited on day {}", d))
        );

        SimulationResult {
            price_path: path,
            option_values,
            strategy_pnl,
            final_result: FinalResult {
                total_pnl: stats.total_pnl,
                max_loss: stats.max_loss,
                max_gain: stats.max_gain,
                win_probability: stats.win_probability,
                exit_day,
                exit_reason,
            },
        }
    }
}

fn time_remaining(horizon: f64, day: usize, trading_days: usize) -> f64 {
    if trading_days == 0 {
        return horizon.max(0.0);
    }
    (horizon - (day as f64 / trading_days as f64) * horizon).max(0.0)
}
