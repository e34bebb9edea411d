//! Property tests for the windowing and aggregation invariants
//!
//! Aggregate uncertainty is treated as the standard error of the mean
//! throughout (sample standard deviation / sqrt(window count)).

use proptest::prelude::*;

use aetrs::aggregate::Aggregator;
use aetrs::config::AnalysisConfig;
use aetrs::models::{Method, Sample, WindowResult};
use aetrs::series::SampleSeries;
use aetrs::window::WindowGenerator;

fn series_1hz(n: usize, hr: f64) -> SampleSeries {
    let samples: Vec<Sample> = (0..n)
        .map(|i| Sample {
            elapsed_seconds: i as f64,
            heart_rate: hr,
            speed: 6.0,
            elevation: 1000.0,
        })
        .collect();
    SampleSeries::new(samples).unwrap()
}

proptest! {
    /// On gap-free 1 Hz data the generated window count always matches
    /// floor((span - window_length) / step) + 1, and no window is skipped.
    #[test]
    fn prop_window_count_formula(
        step in 1u32..120,
        half_width in 5u32..300,
        extra in 0u32..600,
    ) {
        let window_len = 2 * half_width;
        let span = window_len + extra;
        let series = series_1hz(span as usize + 1, 150.0);
        let config = AnalysisConfig {
            step_seconds: step as f64,
            half_width_seconds: half_width as f64,
            ..Default::default()
        };
        let generator =
            WindowGenerator::new(&series, &config, 0.0, span as f64).unwrap();

        let expected = (extra / step) as usize + 1;
        prop_assert_eq!(generator.expected_count(), expected);
        prop_assert_eq!(generator.windows().count(), expected);
    }

    /// Every window's halves span exactly half_width each and meet at the
    /// midpoint.
    #[test]
    fn prop_halves_partition_window(
        step in 1u32..60,
        half_width in 5u32..120,
    ) {
        let span = 4 * half_width;
        let series = series_1hz(span as usize + 1, 150.0);
        let config = AnalysisConfig {
            step_seconds: step as f64,
            half_width_seconds: half_width as f64,
            ..Default::default()
        };
        let generator =
            WindowGenerator::new(&series, &config, 0.0, span as f64).unwrap();
        for window in generator.windows() {
            prop_assert_eq!(window.end - window.start, 2.0 * half_width as f64);
            prop_assert_eq!(window.first_half.len(), half_width as usize);
            prop_assert_eq!(window.second_half.len(), half_width as usize);
            let boundary = window.start + half_width as f64;
            prop_assert!(window.first_half.last().unwrap().elapsed_seconds < boundary);
            prop_assert!(window.second_half[0].elapsed_seconds >= boundary);
        }
    }

    /// Aggregation is order-independent down to the bit pattern: the same
    /// result stream fed in any permutation yields identical statistics.
    #[test]
    fn prop_aggregation_order_independent(
        drifts in proptest::collection::vec(-20.0f64..20.0, 1..40),
        seed in 0u64..1000,
    ) {
        let results: Vec<WindowResult> = drifts
            .iter()
            .enumerate()
            .map(|(i, &drift)| WindowResult {
                method: Method::Raw,
                window_index: i,
                aet_estimate_bpm: 150.0 + drift * 0.1,
                drift_pct: drift,
                pace_drift_pct: None,
                pace_at_aet: None,
            })
            .collect();

        // Cheap deterministic shuffle
        let mut shuffled = results.clone();
        let len = shuffled.len();
        for i in 0..len {
            let j = (seed as usize + i * 7) % len;
            shuffled.swap(i, j);
        }

        let aggregator = Aggregator::new(5.0);
        let a = aggregator.aggregate(Method::Raw, results).unwrap();
        let b = aggregator.aggregate(Method::Raw, shuffled).unwrap();
        prop_assert_eq!(a.mean_drift_pct.to_bits(), b.mean_drift_pct.to_bits());
        prop_assert_eq!(a.drift_uncertainty.to_bits(), b.drift_uncertainty.to_bits());
        prop_assert_eq!(a.mean_aet_bpm.to_bits(), b.mean_aet_bpm.to_bits());
        prop_assert_eq!(a.aet_uncertainty.to_bits(), b.aet_uncertainty.to_bits());
    }

    /// A single-window aggregate converges to that window's values with
    /// zero uncertainty.
    #[test]
    fn prop_single_window_aggregate_is_identity(
        drift in -20.0f64..20.0,
        aet in 100.0f64..190.0,
    ) {
        let result = WindowResult {
            method: Method::Raw,
            window_index: 0,
            aet_estimate_bpm: aet,
            drift_pct: drift,
            pace_drift_pct: None,
            pace_at_aet: None,
        };
        let agg = Aggregator::new(5.0)
            .aggregate(Method::Raw, vec![result])
            .unwrap();
        prop_assert_eq!(agg.mean_drift_pct, drift);
        prop_assert_eq!(agg.mean_aet_bpm, aet);
        prop_assert_eq!(agg.drift_uncertainty, 0.0);
        prop_assert_eq!(agg.window_count, 1);
        prop_assert_eq!(agg.successful, drift.abs() <= 5.0);
    }
}
