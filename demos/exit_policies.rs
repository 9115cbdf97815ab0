//! Comparing exit policies on one long put.
//!
//! Runs the same position and price path under every exit rule the long
//! put accepts, showing where each closes the trade.

use fx_hedge_sim::core::params::ParamRecord;
use fx_hedge_sim::scenario::ScenarioParameters;
use fx_hedge_sim::simulation::Simulator;
use fx_hedge_sim::strategy::StrategyKind;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-hedge-sim: Exit Policy Comparison    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let scenario = ScenarioParameters::from_record(
        &ParamRecord::new()
            .with("direction", "down")
            .with("annual_volatility", 0.25)
            .with("expected_magnitude", 0.1)
            .with("time_horizon_years", 1.0)
            .with("seed", 7.0),
    )
    .expect("scenario is valid");

    let kind = StrategyKind::LongPut;
    let strategy = kind
        .configure(
            &ParamRecord::new().with("quantity_contracts", 10.0),
            &scenario.default_context(),
        )
        .expect("long put defaults are valid");
    println!("  {}: {}", kind, kind.description());
    println!("  Initial cost: {:.4}\n", strategy.initial_cost());

    for exit_kind in kind.compatible_exit_policies() {
        let exit = exit_kind.build(&ParamRecord::new()).expect("exit defaults are valid");
        let result = Simulator::simulate(&scenario, &strategy, &exit).expect("pair is compatible");
        let stats = &result.final_result;

        println!("━━━ {} ━━━", exit_kind);
        println!("  {}", exit_kind.description());
        println!("  Total P&L:       {:>10.4}", stats.total_pnl);
        println!("  Win probability: {:>9.1}%", stats.win_probability * 100.0);
        match (stats.exit_day, &stats.exit_reason) {
            (Some(day), Some(reason)) => println!("  Closed on day {}: {}\n", day, reason),
            _ => println!("  Held to expiry\n"),
        }
    }
}
