//! # fx-hedge-sim
//!
//! Scenario-driven options strategy simulation for currency-risk hedging.
//!
//! Given a stochastic description of how a currency pair might move, the
//! engine synthesizes one price path, values a hedging position along it
//! with Black-Scholes, applies an early-exit rule and reports P&L
//! statistics.
//!
//! ## Architecture
//!
//! - **core** — Parameter records, declarative schemas, currency pairs, errors
//! - **pricing** — Black-Scholes valuation and Greeks
//! - **scenario** — Scenario parameters, GBM path generation, presets, recommendations
//! - **strategy** — Strategy catalog and typed positions
//! - **exit** — Exit policy catalog with explicit per-run state
//! - **simulation** — The day-by-day simulator and its result types
//! - **form** — Input-control hints derived from schemas
//!
//! ## Example
//!
//! ```
//! use fx_hedge_sim::prelude::*;
//!
//! let config = SimulationConfig::new(
//!     ParamRecord::new().with("direction", "down").with("seed", 42.0),
//!     StrategyConfig::new(StrategyKind::ProtectivePut, ParamRecord::new()),
//!     ExitConfig::new(ExitKind::StopLoss, ParamRecord::new()),
//! );
//!
//! let result = Simulator::run(&config).unwrap();
//! assert_eq!(result.strategy_pnl.len(), result.price_path.len());
//! ```

pub mod core;
pub mod exit;
pub mod form;
pub mod pricing;
pub mod scenario;
pub mod simulation;
pub mod strategy;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::CurrencyPair;
    pub use crate::core::error::SimulationError;
    pub use crate::core::params::{ParamRecord, ParamValue};
    pub use crate::exit::{ExitKind, ExitPolicy};
    pub use crate::scenario::{generate_price_path, Direction, PricePath, ScenarioParameters};
    pub use crate::simulation::{
        ExitConfig, SimulationConfig, SimulationReport, SimulationResult, Simulator, StrategyConfig,
    };
    pub use crate::strategy::{Strategy, StrategyKind};
}
