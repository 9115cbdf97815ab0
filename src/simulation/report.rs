use crate::exit::ExitPolicy;
use crate::scenario::params::ScenarioParameters;
use crate::scenario::path::PathSummary;
use crate::simulation::result::SimulationResult;
use crate::simulation::simulator::ResolvedSimulation;
use crate::strategy::Strategy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A simulation result wrapped with the inputs that produced it and run
/// metadata, for export.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub scenario: ScenarioParameters,
    pub strategy: Strategy,
    pub exit: ExitPolicy,
    pub initial_cost: f64,
    pub path_summary: PathSummary,
    pub result: SimulationResult,
}

impl SimulationReport {
    pub fn new(inputs: ResolvedSimulation, result: SimulationResult) -> Self {
        let path_summary = result.price_path.summary(inputs.scenario.dt());
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            initial_cost: inputs.strategy.initial_cost(),
            scenario: inputs.scenario,
            strategy: inputs.strategy,
            exit: inputs.exit,
            path_summary,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::ParamRecord;
    use crate::exit::ExitKind;
    use crate::simulation::simulator::{ExitConfig, SimulationConfig, Simulator, StrategyConfig};
    use crate::strategy::StrategyKind;

    #[test]
    fn test_report_serializes_inputs_and_metadata() {
        let config = SimulationConfig::new(
            ParamRecord::new().with("seed", 3.0),
            StrategyConfig::new(StrategyKind::LongCall, ParamRecord::new()),
            ExitConfig::new(ExitKind::TakeProfit, ParamRecord::new()),
        );
        let inputs = config.resolve().unwrap();
        let result = Simulator::simulate(&inputs.scenario, &inputs.strategy, &inputs.exit).unwrap();
        let report = SimulationReport::new(inputs, result);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"]["type"], "long_call");
        assert_eq!(json["exit"]["type"], "take_profit");
        assert_eq!(json["scenario"]["seed"], 3);
        assert!(json["id"].as_str().is_some());
        assert_eq!(
            json["result"]["strategy_pnl"].as_array().unwrap().len(),
            json["result"]["price_path"].as_array().unwrap().len()
        );
    }

    #[test]
    fn test_reports_get_distinct_ids() {
        let config = SimulationConfig::new(
            ParamRecord::new().with("seed", 1.0),
            StrategyConfig::new(StrategyKind::LongPut, ParamRecord::new()),
            ExitConfig::default(),
        );
        let a = SimulationReport::new(config.resolve().unwrap(), Simulator::run(&config).unwrap());
        let b = SimulationReport::new(config.resolve().unwrap(), Simulator::run(&config).unwrap());
        assert_ne!(a.id, b.id);
        assert_eq!(a.result, b.result);
    }
}
