//! Property tests for the universal engine invariants.

use pricelens::analysis::levels::cluster_levels;
use pricelens::prelude::*;
use proptest::prelude::*;

fn prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1_000_000.0, 0..max_len)
}

proptest! {
    #[test]
    fn pattern_indices_stay_in_bounds(series in prices(200)) {
        let analyzer = Analyzer::default();
        let patterns = analyzer.patterns(&series).unwrap();

        if series.len() < 15 {
            prop_assert!(patterns.is_empty());
        } else {
            // The safety net guarantees at least one match
            prop_assert!(!patterns.is_empty());
        }
        for m in &patterns {
            prop_assert!(m.start_index <= m.end_index);
            prop_assert!(m.end_index < series.len());
        }
    }

    #[test]
    fn monotone_series_hits_exactly_the_safety_net(mut series in prop::collection::vec(1.0f64..1_000_000.0, 15..100)) {
        // Sorted input has no strict local extrema, so exactly one
        // whole-series fallback match must come back
        series.sort_by(f64::total_cmp);
        let analyzer = Analyzer::default();
        let patterns = analyzer.patterns(&series).unwrap();

        prop_assert_eq!(patterns.len(), 1);
        prop_assert!(!patterns[0].kind.is_structural());
        prop_assert_eq!(patterns[0].start_index, 0);
        prop_assert_eq!(patterns[0].end_index, series.len() - 1);
    }

    #[test]
    fn clustered_levels_are_sorted_and_no_more_numerous(levels in prop::collection::vec(1.0f64..1_000_000.0, 0..50)) {
        let clustered = cluster_levels(&levels, 0.03);
        prop_assert!(clustered.len() <= levels.len());
        for pair in clustered.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn r_squared_is_a_fraction(series in prices(100)) {
        if let Some(fit) = fit_series(&series) {
            prop_assert!(fit.r_squared >= -1e-9);
            prop_assert!(fit.r_squared <= 1.0 + 1e-9);
        } else {
            prop_assert!(series.len() < 2);
        }
    }

    #[test]
    fn noiseless_line_is_fully_explained(
        n in 2usize..100,
        slope in prop_oneof![0.1f64..100.0, -100.0f64..-0.1],
        intercept in 1_000.0f64..100_000.0,
    ) {
        let series: Vec<f64> = (0..n).map(|i| slope * i as f64 + intercept).collect();
        let fit = fit_series(&series).unwrap();
        prop_assert!((fit.r_squared - 1.0).abs() < 1e-6);
        prop_assert!((fit.slope - slope).abs() < 1e-6 * slope.abs().max(1.0));
    }

    #[test]
    fn events_are_well_formed(series in prices(150)) {
        let analyzer = Analyzer::default();
        let events = analyzer.events(&series).unwrap();

        if series.is_empty() {
            prop_assert!(events.is_empty());
        }
        for e in &events {
            prop_assert_eq!(e.index, series.len() - 1);
        }
        prop_assert!(events.iter().filter(|e| e.kind.is_record()).count() <= 1);
        prop_assert!(events.iter().filter(|e| e.kind.is_surge()).count() <= 1);
    }

    #[test]
    fn flat_series_never_surges(price in 1.0f64..1_000_000.0, n in 1usize..100) {
        let analyzer = Analyzer::default();
        let series = vec![price; n];
        let events = analyzer.events(&series).unwrap();
        prop_assert!(!events.iter().any(|e| e.kind.is_surge()));
    }

    #[test]
    fn short_series_trend_is_insufficient(series in prices(5)) {
        prop_assume!(series.len() < 5);
        let analyzer = Analyzer::default();
        let report = analyzer.trend(&series).unwrap();
        prop_assert_eq!(report.direction, TrendDirection::InsufficientData);
        prop_assert_eq!(report.strength, 0);
        prop_assert_eq!(report.confidence, 0);
        prop_assert_eq!(report.forecast_price, None);
    }

    #[test]
    fn trend_scores_stay_in_range(series in prices(150)) {
        let analyzer = Analyzer::default();
        let report = analyzer.trend(&series).unwrap();
        prop_assert!(report.strength <= 100);
        prop_assert!(report.confidence <= 100);
        if let Some(r2) = report.r_squared {
            prop_assert!(r2 <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn level_sides_are_bounded(series in prices(200)) {
        let analyzer = Analyzer::default();
        let levels = analyzer.levels(&series).unwrap();
        let cap = if series.len() < 50 { 1 } else { 2 };
        prop_assert!(levels.support.len() <= cap);
        prop_assert!(levels.resistance.len() <= cap);
    }
}
