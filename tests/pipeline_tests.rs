use chrono::{FixedOffset, NaiveDate};
use kline_report::classify::CandleClass;
use kline_report::normalize::normalize;
use kline_report::pipeline::analyze;
use serde_json::{json, Value};

fn tz() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

const DAY_START_MS: i64 = 1_714_492_800_000;

fn row(offset_min: i64, open: f64, high: f64, low: f64, close: f64) -> Value {
    json!([
        DAY_START_MS + offset_min * 60_000,
        open.to_string(),
        high.to_string(),
        low.to_string(),
        close.to_string(),
        "1.0",
        DAY_START_MS + (offset_min + 15) * 60_000 - 1,
        "0",
        1,
        "0",
        "0",
        "0"
    ])
}

fn run(rows: &[Value]) -> Vec<kline_report::pipeline::ReportCandle> {
    analyze(normalize(rows, tz(), "ETHUSDT", date()).unwrap())
}

#[test]
fn scenario_plain_bullish() {
    // ibs = (110-90)/(120-90)*100 = 66.67, below the strong threshold
    let out = run(&[row(0, 100.0, 120.0, 90.0, 110.0)]);
    let ibs = out[0].ibs.unwrap();
    assert!((ibs - 66.666_666_666_666_67).abs() < 1e-9);
    assert_eq!(out[0].class, CandleClass::Bullish);
}

#[test]
fn scenario_strong_bullish() {
    // ibs = (115-90)/30*100 = 83.33 >= 69
    let out = run(&[row(0, 100.0, 120.0, 90.0, 115.0)]);
    let ibs = out[0].ibs.unwrap();
    assert!((ibs - 83.333_333_333_333_33).abs() < 1e-9);
    assert_eq!(out[0].class, CandleClass::StrongBullish);
}

#[test]
fn scenario_strong_bearish() {
    // ibs = (85-80)/30*100 = 16.67 <= 31
    let out = run(&[row(0, 100.0, 110.0, 80.0, 85.0)]);
    let ibs = out[0].ibs.unwrap();
    assert!((ibs - 16.666_666_666_666_668).abs() < 1e-9);
    assert_eq!(out[0].class, CandleClass::StrongBearish);
}

#[test]
fn zero_true_range_is_undefined_and_never_strong() {
    let out = run(&[row(0, 100.0, 100.0, 100.0, 100.0)]);
    assert_eq!(out[0].ibs, None);
    assert_eq!(out[0].class, CandleClass::Bullish);
}

#[test]
fn ibs_stays_in_bounds_whenever_range_is_positive() {
    let rows: Vec<Value> = (0..96)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.3).sin() * 10.0;
            row(i * 15, base, base + 5.0, base - 5.0, base + (i as f64 * 0.7).cos() * 4.0)
        })
        .collect();
    let out = run(&rows);
    assert_eq!(out.len(), 96);
    for rc in &out {
        let ibs = rc.ibs.expect("positive range");
        assert!((0.0..=100.0).contains(&ibs), "ibs out of range: {ibs}");
    }
}

#[test]
fn single_candle_ema_equals_close() {
    let out = run(&[row(0, 100.0, 120.0, 90.0, 110.0)]);
    assert!((out[0].ema20 - 110.0).abs() < f64::EPSILON);
}

#[test]
fn ema_runs_by_position_across_gaps() {
    // Same closes, one series contiguous and one with missing intervals:
    // the EMA values must be identical because only position matters.
    let closes = [100.0, 101.0, 103.0, 102.0];
    let contiguous: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| row(i as i64 * 15, *c, c + 1.0, c - 1.0, *c))
        .collect();
    let gappy: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| row(i as i64 * 120, *c, c + 1.0, c - 1.0, *c))
        .collect();

    let a = run(&contiguous);
    let b = run(&gappy);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.ema20.to_bits(), y.ema20.to_bits());
    }
}

#[test]
fn pipeline_is_idempotent() {
    let rows: Vec<Value> = (0..96)
        .map(|i| {
            let base = 3000.0 + (i as f64 * 0.2).sin() * 25.0;
            row(i * 15, base, base + 10.0, base - 10.0, base + (i as f64 * 0.5).cos() * 8.0)
        })
        .collect();

    let a = run(&rows);
    let b = run(&rows);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.ema20.to_bits(), y.ema20.to_bits());
        assert_eq!(x.ibs.map(f64::to_bits), y.ibs.map(f64::to_bits));
        assert_eq!(x.class, y.class);
    }
}
