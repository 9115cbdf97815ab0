use approx::assert_relative_eq;
use fx_hedge_sim::core::currency::CurrencyPair;
use fx_hedge_sim::core::error::SimulationError;
use fx_hedge_sim::core::params::ParamRecord;
use fx_hedge_sim::exit::{ExitKind, ExitPolicy};
use fx_hedge_sim::scenario::presets::{presets, ScenarioPreset};
use fx_hedge_sim::scenario::recommend::recommend;
use fx_hedge_sim::scenario::{generate_price_path, Direction, PricePath, ScenarioParameters};
use fx_hedge_sim::simulation::{
    ExitConfig, SimulationConfig, SimulationReport, Simulator, StrategyConfig,
};
use fx_hedge_sim::strategy::{OptionLeg, Strategy, StrategyKind};

/// Full pipeline: JSON request → validation → path → simulation → report.
#[test]
fn full_pipeline_from_json_request() {
    let config: SimulationConfig = serde_json::from_str(
        r#"{
            "scenario": {
                "initial_price": 18.5,
                "time_horizon_years": 0.5,
                "annual_volatility": 0.15,
                "direction": "down",
                "expected_magnitude": 0.2,
                "currency_pair": "USD/MXN",
                "seed": 42
            },
            "strategy": { "type": "protective_put", "params": { "underlying_quantity": 100000 } },
            "exit": { "type": "stop_loss", "params": { "stop_loss_percentage": -0.3 } }
        }"#,
    )
    .unwrap();

    let inputs = config.resolve().unwrap();
    assert_eq!(inputs.scenario.trading_days(), 126);
    assert_eq!(inputs.strategy.leg().quantity_contracts, 55);
    assert_relative_eq!(inputs.strategy.leg().strike_price, 18.5 * 0.95, epsilon = 1e-12);

    let result = Simulator::simulate(&inputs.scenario, &inputs.strategy, &inputs.exit).unwrap();
    assert_eq!(result.price_path.len(), 127);
    assert_eq!(result.option_values.len(), 127);
    assert_eq!(result.strategy_pnl.len(), 127);

    // day 0 values the position at its own entry terms
    assert_relative_eq!(result.strategy_pnl[0].pnl, 0.0, epsilon = 1e-6);

    let stats = &result.final_result;
    assert!(stats.max_loss <= stats.total_pnl && stats.total_pnl <= stats.max_gain);
    assert!((0.0..=1.0).contains(&stats.win_probability));

    let report = SimulationReport::new(inputs, result.clone());
    assert_eq!(report.result, result);
    assert_relative_eq!(report.path_summary.final_price, result.price_path.final_price());
}

/// Same seed, same everything.
#[test]
fn seeded_runs_are_reproducible() {
    let config = SimulationConfig::new(
        ParamRecord::new()
            .with("direction", "up")
            .with("annual_volatility", 0.3)
            .with("seed", 2024.0),
        StrategyConfig::new(StrategyKind::LongCall, ParamRecord::new().with("quantity_contracts", 5.0)),
        ExitConfig::new(ExitKind::TrailingStop, ParamRecord::new()),
    );

    let first = Simulator::run(&config).unwrap();
    for _ in 0..3 {
        assert_eq!(Simulator::run(&config).unwrap(), first);
    }
}

/// Every strategy runs with every exit it declares compatible.
#[test]
fn catalog_pairs_all_run() {
    for strategy in StrategyKind::ALL {
        for exit in strategy.compatible_exit_policies() {
            let config = SimulationConfig::new(
                ParamRecord::new().with("seed", 9.0),
                StrategyConfig::new(strategy, ParamRecord::new()),
                ExitConfig::new(*exit, ParamRecord::new()),
            );
            let result = Simulator::run(&config)
                .unwrap_or_else(|e| panic!("{} + {} failed: {}", strategy, exit, e));
            assert_eq!(result.strategy_pnl.len(), 64);
        }
    }
}

#[test]
fn incompatible_pairs_are_rejected() {
    for strategy in StrategyKind::ALL {
        for exit in ExitKind::ALL {
            if strategy.is_compatible(exit) {
                continue;
            }
            let config = SimulationConfig::new(
                ParamRecord::new(),
                StrategyConfig::new(strategy, ParamRecord::new()),
                ExitConfig::new(exit, ParamRecord::new()),
            );
            let err = Simulator::run(&config).unwrap_err();
            assert!(matches!(err, SimulationError::IncompatibleExit { .. }));
        }
    }
}

#[test]
fn unknown_identifiers_are_fatal() {
    let config: SimulationConfig = serde_json::from_str(
        r#"{ "strategy": { "type": "long_call" }, "exit": { "type": "dynamic_hedge" } }"#,
    )
    .unwrap();
    let err = Simulator::run(&config).unwrap_err();
    assert!(matches!(err, SimulationError::UnknownExitPolicy(ref id) if id == "dynamic_hedge"));
    assert!(!err.is_recoverable());
}

#[test]
fn invalid_records_report_every_field() {
    let config = SimulationConfig::new(
        ParamRecord::new()
            .with("initial_price", -1.0)
            .with("annual_volatility", 0.9)
            .with("direction", "sideways"),
        StrategyConfig::new(StrategyKind::LongPut, ParamRecord::new()),
        ExitConfig::default(),
    );
    match Simulator::run(&config).unwrap_err() {
        SimulationError::InvalidParameters { target, errors } => {
            assert_eq!(target, "scenario");
            assert_eq!(errors.len(), 3);
            assert_eq!(errors.get("annual_volatility"), Some("Must be at most 0.5"));
            assert!(errors.get("direction").unwrap().starts_with("Must be one of"));
        }
        other => panic!("expected invalid parameters, got {}", other),
    }
}

/// A hand-built path: the put gains as spot collapses, then the take-profit
/// closes the position and everything after is frozen.
#[test]
fn take_profit_on_known_path() {
    let strategy = Strategy::LongPut(OptionLeg {
        strike_price: 18.5,
        quantity_contracts: 2,
        premium_per_contract: 0.5,
        risk_free_rate: 0.05,
        volatility: 0.12,
    });
    let path = PricePath::from_prices(vec![18.5, 18.2, 17.8, 17.0, 16.5, 19.0, 20.0]);
    let exit = ExitPolicy::TakeProfit {
        profit_target_percentage: 1.0,
    };

    let result = Simulator::run_on_path(path, 6.0 / 252.0, &strategy, &exit);
    let exit_day = result.final_result.exit_day.expect("target should be reached");
    assert!(exit_day <= 4, "spot at 17.0 already doubles the premium");

    let frozen = result.strategy_pnl[exit_day].pnl;
    assert!(frozen >= 1.0);
    for point in &result.strategy_pnl[exit_day..] {
        assert_eq!(point.pnl, frozen);
    }
    assert_eq!(result.final_result.total_pnl, frozen);
}

#[test]
fn straddle_profits_from_a_large_move_either_way() {
    let leg = OptionLeg {
        strike_price: 18.5,
        quantity_contracts: 1,
        premium_per_contract: 0.6,
        risk_free_rate: 0.05,
        volatility: 0.12,
    };
    let straddle = Strategy::LongStraddle(leg);
    for end in [15.0, 22.0] {
        let path = PricePath::from_prices(vec![18.5, end]);
        let result = Simulator::run_on_path(path, 1.0 / 252.0, &straddle, &ExitPolicy::HoldToExpiry);
        assert!(result.final_result.total_pnl > 2.0);
    }
}

#[test]
fn presets_feed_recommendations() {
    let all = presets(&CurrencyPair::default()).unwrap();
    let bearish = &all
        .iter()
        .find(|(preset, _)| *preset == ScenarioPreset::Bearish)
        .unwrap()
        .1;

    let recs = recommend(bearish);
    assert_eq!(recs[0].strategy, StrategyKind::ProtectivePut);

    // every recommended strategy can be configured for the scenario
    for rec in recs {
        let strategy = rec
            .strategy
            .configure(&ParamRecord::new(), &bearish.default_context())
            .unwrap();
        assert_eq!(strategy.kind(), rec.strategy);
    }
}

#[test]
fn drift_pulls_the_average_path() {
    let mut up = 0.0;
    let mut down = 0.0;
    for seed in 0..40u64 {
        let base = ScenarioParameters::new(100.0, 1.0, 0.05, Direction::Up, 0.3, CurrencyPair::default())
            .unwrap()
            .with_seed(seed);
        up += generate_price_path(&base).final_price();

        let bear = ScenarioParameters::new(100.0, 1.0, 0.05, Direction::Down, 0.3, CurrencyPair::default())
            .unwrap()
            .with_seed(seed);
        down += generate_price_path(&bear).final_price();
    }
    assert!(up / 40.0 > 115.0);
    assert!(down / 40.0 < 85.0);
}
