// File: crates/series-reduce/tests/scenarios.rs
// Purpose: End-to-end reduction scenarios through the public engine API.

use chrono::{TimeZone, Utc};
use series_reduce::types::DAY_MS;
use series_reduce::{
    CancelToken, ComputeParams, Engine, EngineConfig, Granularity, Series, Simplifier, SimplifierKind, SmoothingType,
};

fn engine() -> Engine {
    Engine::new(EngineConfig::default().with_workers(4)).expect("engine")
}

fn day(y: i32, m: u32, d: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp_millis()
}

#[test]
fn change_filter_keeps_first_and_changes() {
    let mut series = vec![Series::from_pairs("a", [(0, 5.0), (1, 5.0), (2, 5.0), (3, 9.0)])];
    let params = ComputeParams::default().with_threshold(0).with_simplifier(SimplifierKind::ValueChange);
    engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
    let ts: Vec<(i64, f64)> = series[0].samples.iter().map(|s| (s.timestamp, s.value)).collect();
    assert_eq!(ts, vec![(0, 5.0), (3, 9.0)]);
}

#[test]
fn increasing_series_meets_budget_with_endpoints() {
    let mut series = vec![Series::from_pairs("ramp", (0..10_000).map(|i| (i * 1_000, i as f64)))];
    let params = ComputeParams::default().with_threshold(100);
    engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
    let s = &series[0];
    assert!(s.len() <= 100, "got {}", s.len());
    assert_eq!(s.first().unwrap().timestamp, 0);
    assert_eq!(s.last().unwrap().timestamp, 9_999_000);
}

#[test]
fn noisy_series_meets_budget_with_endpoints() {
    let mut series = vec![Series::from_pairs(
        "wave",
        (0..10_000).map(|i| (i * 1_000, (i as f64 * 0.013).sin() * 50.0 + ((i * 7919) % 13) as f64)),
    )];
    let params = ComputeParams::default().with_threshold(100);
    engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
    let s = &series[0];
    assert!(s.len() <= 100 && s.len() > 2, "got {}", s.len());
    assert_eq!(s.first().unwrap().timestamp, 0);
    assert_eq!(s.last().unwrap().timestamp, 9_999_000);
}

#[test]
fn calendar_month_average_two_buckets() {
    let start = day(2023, 1, 15);
    let mut series = vec![Series::from_pairs(
        "daily",
        (0..=31).map(|i| (start + i * DAY_MS, if i < 17 { 10.0 } else { 20.0 })),
    )];
    let params = ComputeParams::default()
        .with_threshold(-1)
        .with_smoothing(SmoothingType::Avg, Granularity::CalendarMonth);
    engine().compute(&mut series, &params, &CancelToken::new()).unwrap();

    let out = &series[0].samples;
    assert_eq!(out.len(), 2);
    assert_eq!((out[0].timestamp, out[0].value), (day(2023, 1, 16), 10.0));
    // Feb 2023 has 28 days: midpoint is Feb 15 00:00
    assert_eq!((out[1].timestamp, out[1].value), (day(2023, 2, 15), 20.0));
}

#[test]
fn zero_threshold_gradient_alone_is_noop_change_filter_collapses() {
    let input = Series::from_pairs("flat", (0..500).map(|i| (i, if i < 250 { 1.0 } else { 2.0 })));

    let mut direct = vec![input.clone()];
    let engine = engine();
    engine.simplifier(SimplifierKind::Gradient).simplify(&mut direct, 0, &CancelToken::new()).unwrap();
    assert_eq!(direct[0], input);

    let mut piped = vec![input];
    let params = ComputeParams::default().with_threshold(0);
    engine.compute(&mut piped, &params, &CancelToken::new()).unwrap();
    let ts: Vec<i64> = piped[0].samples.iter().map(|s| s.timestamp).collect();
    assert_eq!(ts, vec![0, 250, 499]);
}

#[test]
fn names_and_count_preserved() {
    let mut series: Vec<Series> = (0..30)
        .map(|k| Series::from_pairs(format!("s{k}"), (0..2_000).map(move |i| (i, ((i * (k + 3)) % 17) as f64))))
        .collect();
    let params = ComputeParams::default().with_threshold(3_000);
    engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
    assert_eq!(series.len(), 30);
    for (k, s) in series.iter().enumerate() {
        assert_eq!(s.name, format!("s{k}"));
        assert!(s.len() <= 100);
    }
}

#[test]
fn too_small_budget_leaves_series_unreduced() {
    let mut series: Vec<Series> = (0..10).map(|k| Series::from_pairs(format!("s{k}"), (0..100).map(|i| (i, (i % 3) as f64)))).collect();
    let before = series.clone();
    // 5 samples over 10 series -> 0 per series
    let params = ComputeParams::default().with_threshold(5);
    engine().compute(&mut series, &params, &CancelToken::new()).unwrap();
    assert_eq!(series, before);
}

#[test]
fn every_simplifier_respects_order_and_size() {
    let engine = engine();
    for kind in SimplifierKind::ALL {
        let mut series = vec![
            Series::from_pairs("a", (0..3_000).map(|i| (i * 10, ((i * 31) % 101) as f64))),
            Series::from_pairs("b", (0..1_500).map(|i| (i * 10, (i as f64 * 0.1).cos()))),
        ];
        let sizes: Vec<usize> = series.iter().map(Series::len).collect();
        let params = ComputeParams::default().with_threshold(400).with_simplifier(kind);
        engine.compute(&mut series, &params, &CancelToken::new()).unwrap();
        for (s, before) in series.iter().zip(sizes) {
            assert!(s.len() <= before, "{kind}: {} grew", s.name);
            assert!(s.samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp), "{kind}: {} unordered", s.name);
        }
    }
}

#[test]
fn distance_cancellation_is_fatal() {
    let mut series = vec![Series::from_pairs("a", (0..1_000).map(|i| (i, ((i * 13) % 7) as f64)))];
    let before = series.clone();
    let cancel = CancelToken::new();
    cancel.cancel();
    let engine = engine();
    let err = engine.simplifier(SimplifierKind::Distance).simplify(&mut series, 10, &cancel).unwrap_err();
    assert!(matches!(err, series_reduce::ReduceError::Interrupted));
    assert_eq!(series, before);
}

#[test]
fn compute_refuses_cancelled_token() {
    let mut series = vec![Series::from_pairs("a", (0..1_000).map(|i| (i, ((i * 13) % 7) as f64)))];
    let cancel = CancelToken::new();
    cancel.cancel();
    let params = ComputeParams::default().with_threshold(10).with_simplifier(SimplifierKind::Distance);
    let err = engine().compute(&mut series, &params, &cancel).unwrap_err();
    assert!(matches!(err, series_reduce::ReduceError::Interrupted));
    assert_eq!(series[0].len(), 1_000);
}
