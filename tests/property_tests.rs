use fx_hedge_sim::core::currency::CurrencyPair;
use fx_hedge_sim::exit::{ExitPolicy, ExitState};
use fx_hedge_sim::pricing::{price, OptionType};
use fx_hedge_sim::scenario::{generate_price_path, Direction, PricePath, ScenarioParameters};
use fx_hedge_sim::simulation::Simulator;
use fx_hedge_sim::strategy::{OptionLeg, Strategy as Position};
use proptest::prelude::*;

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(vec![Direction::Up, Direction::Down, Direction::Neutral])
}

/// A valid scenario with a fixed seed.
fn arb_scenario() -> impl Strategy<Value = ScenarioParameters> {
    (
        1.0f64..50.0,
        1usize..=504,
        0.05f64..0.5,
        arb_direction(),
        0.01f64..0.5,
        0u64..1_000_000,
    )
        .prop_map(|(spot, days, vol, direction, magnitude, seed)| {
            ScenarioParameters::new(
                spot,
                days as f64 / 252.0,
                vol,
                direction,
                magnitude,
                CurrencyPair::default(),
            )
            .unwrap()
            .with_seed(seed)
        })
}

fn arb_leg() -> impl Strategy<Value = OptionLeg> {
    (0.5f64..2.0, 1u32..20, 0.0f64..3.0, 0.0f64..0.2, 0.0f64..1.0).prop_map(
        |(moneyness, quantity, premium, rate, vol)| OptionLeg {
            strike_price: 18.5 * moneyness,
            quantity_contracts: quantity,
            premium_per_contract: premium,
            risk_free_rate: rate,
            volatility: vol,
        },
    )
}

fn arb_position() -> impl Strategy<Value = Position> {
    (arb_leg(), 0usize..4).prop_map(|(leg, variant)| match variant {
        0 => Position::LongCall(leg),
        1 => Position::LongPut(leg),
        2 => Position::LongStraddle(leg),
        _ => Position::ProtectivePut {
            leg,
            underlying_quantity: 100_000.0,
            entry_price: 18.5,
        },
    })
}

fn arb_exit() -> impl Strategy<Value = ExitPolicy> {
    prop_oneof![
        Just(ExitPolicy::HoldToExpiry),
        (-0.95f64..-0.05).prop_map(|t| ExitPolicy::StopLoss {
            stop_loss_percentage: t
        }),
        (0.1f64..5.0).prop_map(|t| ExitPolicy::TakeProfit {
            profit_target_percentage: t
        }),
        (-0.95f64..-0.01).prop_map(|t| ExitPolicy::TrailingStop { trail_percentage: t }),
    ]
}

fn arb_path() -> impl Strategy<Value = PricePath> {
    prop::collection::vec(10.0f64..30.0, 1..120).prop_map(|prices| PricePath::from_prices(prices))
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Seeded generation is deterministic.
    //
    // The same scenario and seed always produce a bit-identical path.
    // ===================================================================
    #[test]
    fn seeded_paths_are_deterministic(scenario in arb_scenario()) {
        prop_assert_eq!(generate_price_path(&scenario), generate_price_path(&scenario));
    }

    // ===================================================================
    // INVARIANT 2: Path shape.
    //
    // trading_days + 1 points, days numbered 0..=n, day 0 at the initial
    // price, every price strictly positive.
    // ===================================================================
    #[test]
    fn path_has_expected_shape(scenario in arb_scenario()) {
        let path = generate_price_path(&scenario);
        prop_assert_eq!(path.len(), scenario.trading_days() + 1);
        prop_assert_eq!(path.initial_price(), scenario.initial_price());
        for (i, point) in path.points().iter().enumerate() {
            prop_assert_eq!(point.day, i);
            prop_assert!(point.price > 0.0 && point.price.is_finite());
        }
    }

    // ===================================================================
    // INVARIANT 3: Put-call parity.
    //
    // C - P = S - K e^{-rT} for any inputs with positive volatility.
    // ===================================================================
    #[test]
    fn put_call_parity_holds(
        spot in 1.0f64..100.0,
        moneyness in 0.5f64..1.5,
        t in 0.01f64..5.0,
        r in 0.0f64..0.2,
        sigma in 0.01f64..1.0,
    ) {
        let strike = spot * moneyness;
        let call = price(spot, strike, t, r, sigma, OptionType::Call);
        let put = price(spot, strike, t, r, sigma, OptionType::Put);
        let forward = spot - strike * (-r * t).exp();
        prop_assert!(
            (call - put - forward).abs() < 1e-9 * spot.max(1.0),
            "parity violated: C={} P={} S-Ke^-rT={}",
            call, put, forward
        );
    }

    // ===================================================================
    // INVARIANT 4: Option prices are non-negative and a call is worth
    // at least S - K e^{-rT}, up to the CDF approximation error.
    // ===================================================================
    #[test]
    fn prices_are_bounded_below(
        spot in 1.0f64..100.0,
        moneyness in 0.5f64..1.5,
        t in 0.0f64..5.0,
        r in 0.0f64..0.2,
        sigma in 0.0f64..1.0,
    ) {
        let strike = spot * moneyness;
        let call = price(spot, strike, t, r, sigma, OptionType::Call);
        let put = price(spot, strike, t, r, sigma, OptionType::Put);
        // the normal CDF approximation is accurate to ~1e-7
        let tolerance = 1e-6 * spot;
        prop_assert!(call >= -tolerance && put >= -tolerance);
        prop_assert!(call >= spot - strike * (-r * t).exp() - tolerance);
    }

    // ===================================================================
    // INVARIANT 5: Series cover the whole path.
    //
    // option_values and strategy_pnl have one entry per path point, days
    // aligned with the path, whether or not the position exits early.
    // ===================================================================
    #[test]
    fn series_span_the_full_path(
        path in arb_path(),
        position in arb_position(),
        exit in arb_exit(),
    ) {
        let n = path.len();
        let result = Simulator::run_on_path(path, 0.25, &position, &exit);
        prop_assert_eq!(result.option_values.len(), n);
        prop_assert_eq!(result.strategy_pnl.len(), n);
        for (i, (value, pnl)) in result.option_values.iter().zip(&result.strategy_pnl).enumerate() {
            prop_assert_eq!(value.day, i);
            prop_assert_eq!(pnl.day, i);
            prop_assert_eq!(value.total_value, pnl.total_value);
        }
        if let Some(day) = result.final_result.exit_day {
            prop_assert!(day < n);
        }
    }

    // ===================================================================
    // INVARIANT 6: Frozen carry-forward.
    //
    // After exit_day = d, every later P&L entry equals entry d.
    // ===================================================================
    #[test]
    fn pnl_frozen_after_exit(
        path in arb_path(),
        position in arb_position(),
        exit in arb_exit(),
    ) {
        let result = Simulator::run_on_path(path, 0.25, &position, &exit);
        if let Some(d) = result.final_result.exit_day {
            let frozen = result.strategy_pnl[d];
            for later in &result.strategy_pnl[d + 1..] {
                prop_assert_eq!(later.pnl, frozen.pnl);
                prop_assert_eq!(later.total_value, frozen.total_value);
            }
            prop_assert!(result.final_result.exit_reason.is_some());
        } else {
            prop_assert!(result.final_result.exit_reason.is_none());
        }
    }

    // ===================================================================
    // INVARIANT 7: Aggregate statistics are consistent.
    //
    // max_loss ≤ total_pnl ≤ max_gain and win probability lies in [0, 1].
    // ===================================================================
    #[test]
    fn statistics_are_consistent(
        path in arb_path(),
        position in arb_position(),
        exit in arb_exit(),
    ) {
        let result = Simulator::run_on_path(path, 0.25, &position, &exit);
        let stats = &result.final_result;
        prop_assert!(stats.max_loss <= stats.total_pnl);
        prop_assert!(stats.total_pnl <= stats.max_gain);
        prop_assert!((0.0..=1.0).contains(&stats.win_probability));

        let last = result.strategy_pnl.last().unwrap();
        prop_assert_eq!(stats.total_pnl, last.pnl);
    }

    // ===================================================================
    // INVARIANT 8: Trailing stop state is monotone.
    //
    // The threaded peak never decreases and never falls below any value
    // seen so far.
    // ===================================================================
    #[test]
    fn trailing_peak_is_running_max(
        values in prop::collection::vec(0.0f64..1000.0, 1..60),
        trail in -0.95f64..-0.01,
    ) {
        let policy = ExitPolicy::TrailingStop { trail_percentage: trail };
        let mut state = ExitState::default();
        let mut seen_max = f64::NEG_INFINITY;
        for (day, value) in values.iter().enumerate() {
            let (_, next) = policy.should_exit(day, 0.0, *value, 100.0, state);
            seen_max = seen_max.max(*value);
            prop_assert_eq!(next.peak_value, Some(seen_max));
            state = next;
        }
    }
}
