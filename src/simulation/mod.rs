//! Simulation orchestration and result types.

pub mod report;
pub mod result;
pub mod simulator;

pub use report::SimulationReport;
pub use result::{FinalResult, OptionValuePoint, PnlPoint, PnlStatistics, SimulationResult};
pub use simulator::{ExitConfig, ResolvedSimulation, SimulationConfig, Simulator, StrategyConfig};
