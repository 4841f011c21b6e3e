use proptest::prelude::*;
use strategy::{
    evaluate, signal_series, IndicatorValues, MacdParams, MaCrossoverParams, RsiParams,
    StrategyKind, StrategyRegistry,
};
use common::Signal;

fn reading() -> impl Strategy<Value = IndicatorValues> {
    (
        proptest::option::of(-1_000.0f64..1_000.0),
        proptest::option::of(-1_000.0f64..1_000.0),
        proptest::option::of(0.0f64..100.0),
        proptest::option::of(-50.0f64..50.0),
    )
        .prop_map(|(fast_ma, slow_ma, rsi, macd_histo)| IndicatorValues {
            fast_ma,
            slow_ma,
            rsi,
            macd_histo,
        })
}

fn kinds() -> Vec<StrategyKind> {
    StrategyKind::defaults().to_vec()
}

proptest! {
    /// Buy and Hold never trades, whatever the readings.
    #[test]
    fn buy_and_hold_always_holds(cur in reading(), prev in proptest::option::of(reading())) {
        prop_assert_eq!(evaluate(&StrategyKind::BuyAndHold, &cur, prev.as_ref()), Signal::Hold);
    }

    /// Same inputs, same output, and the inputs are left untouched.
    #[test]
    fn evaluate_is_idempotent(cur in reading(), prev in proptest::option::of(reading())) {
        for kind in kinds() {
            let before = (cur, prev);
            let a = evaluate(&kind, &cur, prev.as_ref());
            let b = evaluate(&kind, &cur, prev.as_ref());
            prop_assert_eq!(a, b);
            prop_assert_eq!(before, (cur, prev));
        }
    }

    /// Without a previous step the crossover rules can never fire.
    #[test]
    fn first_step_crossovers_hold(cur in reading()) {
        let ma = StrategyKind::MaCrossover(MaCrossoverParams::default());
        let macd = StrategyKind::Macd(MacdParams::default());
        prop_assert_eq!(evaluate(&ma, &cur, None), Signal::Hold);
        prop_assert_eq!(evaluate(&macd, &cur, None), Signal::Hold);
    }

    /// A crossover Buy always has the fast average on top at t and not at t-1.
    #[test]
    fn ma_signals_agree_with_the_cross(cur in reading(), prev in reading()) {
        let ma = StrategyKind::MaCrossover(MaCrossoverParams::default());
        match evaluate(&ma, &cur, Some(&prev)) {
            Signal::Buy => {
                prop_assert!(cur.fast_ma.unwrap() > cur.slow_ma.unwrap());
                prop_assert!(prev.fast_ma.unwrap() <= prev.slow_ma.unwrap());
            }
            Signal::Sell => {
                prop_assert!(cur.fast_ma.unwrap() < cur.slow_ma.unwrap());
                prop_assert!(prev.fast_ma.unwrap() >= prev.slow_ma.unwrap());
            }
            Signal::Hold => {}
        }
    }

    /// RSI signals depend only on the current value and the thresholds.
    #[test]
    fn rsi_ignores_previous_step(value in 0.0f64..100.0, prev in proptest::option::of(reading())) {
        let rsi = StrategyKind::Rsi(RsiParams::default());
        let cur = IndicatorValues { rsi: Some(value), ..Default::default() };
        let expected = if value < 30.0 {
            Signal::Buy
        } else if value > 70.0 {
            Signal::Sell
        } else {
            Signal::Hold
        };
        prop_assert_eq!(evaluate(&rsi, &cur, prev.as_ref()), expected);
    }

    /// Full runs over arbitrary positive prices emit one signal per bar and never panic.
    #[test]
    fn signal_series_matches_input_length(closes in proptest::collection::vec(0.01f64..10_000.0, 0..120)) {
        for kind in kinds() {
            prop_assert_eq!(signal_series(&kind, &closes).len(), closes.len());
        }
    }

    /// A MACD Buy can only follow a step whose histogram was at or below zero.
    #[test]
    fn macd_buys_only_on_zero_cross(closes in proptest::collection::vec(1.0f64..500.0, 40..100)) {
        let macd = StrategyKind::Macd(MacdParams { fast_period: 3, slow_period: 6, signal_period: 3 });
        let values = strategy::indicator_series(&macd, &closes);
        let signals = signal_series(&macd, &closes);
        for (t, signal) in signals.iter().enumerate() {
            if *signal == Signal::Buy {
                prop_assert!(values[t].macd_histo.unwrap() > 0.0);
                prop_assert!(values[t - 1].macd_histo.unwrap() <= 0.0);
            }
        }
    }

    /// Once both averages cover only a flat tail they tie exactly and the crossover holds.
    #[test]
    fn flat_tail_never_crosses(
        prefix in proptest::collection::vec(1.0f64..1_000.0, 30..60),
        level in 1.0f64..1_000.0,
    ) {
        let ma = StrategyKind::MaCrossover(MaCrossoverParams { fast_period: 10, slow_period: 30 });
        let mut closes = prefix.clone();
        closes.extend(std::iter::repeat(level).take(40));

        let values = strategy::indicator_series(&ma, &closes);
        let signals = signal_series(&ma, &closes);
        for t in prefix.len() + 29..closes.len() {
            prop_assert_eq!(values[t].fast_ma, values[t].slow_ma);
            prop_assert_eq!(signals[t], Signal::Hold);
        }
    }

    /// Names outside the registry resolve to Buy and Hold.
    #[test]
    fn unknown_names_fall_back(name in "[a-z ]{0,24}") {
        let registry = StrategyRegistry::default();
        prop_assume!(registry.get(&name).is_none());
        prop_assert_eq!(registry.resolve(&name), StrategyKind::BuyAndHold);
    }
}
