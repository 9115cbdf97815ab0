//! Hedging a peso-denominated receivable.
//!
//! Builds a bearish USD/MXN scenario, asks for recommendations, then runs
//! each recommended strategy along the same seeded price path.

use fx_hedge_sim::core::params::ParamRecord;
use fx_hedge_sim::exit::ExitKind;
use fx_hedge_sim::scenario::recommend::recommend;
use fx_hedge_sim::scenario::ScenarioParameters;
use fx_hedge_sim::simulation::{ExitConfig, SimulationConfig, Simulator, StrategyConfig};

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-hedge-sim: Basic Hedging Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let scenario_record = ParamRecord::new()
        .with("initial_price", 18.5)
        .with("time_horizon_years", 0.5)
        .with("annual_volatility", 0.15)
        .with("direction", "down")
        .with("expected_magnitude", 0.2)
        .with("seed", 42.0);

    let scenario = ScenarioParameters::from_record(&scenario_record).expect("scenario is valid");
    println!("━━━ Scenario ━━━\n");
    println!("  Pair:          {}", scenario.currency_pair());
    println!("  Spot:          {:.4}", scenario.initial_price());
    println!(
        "  View:          {} {:.0}% over {} trading days",
        scenario.direction().as_str(),
        scenario.expected_magnitude() * 100.0,
        scenario.trading_days()
    );
    println!("  Volatility:    {:.0}%\n", scenario.annual_volatility() * 100.0);

    println!("━━━ Recommendations ━━━\n");
    let recommendations = recommend(&scenario);
    for rec in &recommendations {
        println!("  {:<15} [{:?}] {}", rec.strategy, rec.confidence, rec.reason);
    }
    println!();

    println!("━━━ Results (same path for every strategy) ━━━\n");
    println!(
        "  {:<15} {:>14} {:>14} {:>14} {:>8}",
        "strategy", "total P&L", "max loss", "max gain", "win %"
    );
    for rec in &recommendations {
        let config = SimulationConfig::new(
            scenario_record.clone(),
            StrategyConfig::new(rec.strategy, ParamRecord::new()),
            ExitConfig::new(ExitKind::HoldToExpiry, ParamRecord::new()),
        );
        let result = Simulator::run(&config).expect("catalog defaults are valid");
        let stats = &result.final_result;
        println!(
            "  {:<15} {:>14.2} {:>14.2} {:>14.2} {:>7.1}%",
            rec.strategy.id(),
            stats.total_pnl,
            stats.max_loss,
            stats.max_gain,
            stats.win_probability * 100.0
        );
    }

    let path = fx_hedge_sim::scenario::generate_price_path(&scenario);
    let summary = path.summary(scenario.dt());
    println!(
        "\n  Path ended at {:.4} ({:+.2}%), max drawdown {:.2}%",
        summary.final_price,
        summary.total_return * 100.0,
        summary.max_drawdown * 100.0
    );
}
