/// Internal Bar Strength: where the close sits within the candle's range,
/// scaled to [0, 100].
///
/// A zero true range (high == low) makes the ratio undefined; that case
/// returns `None` rather than NaN so downstream classification can treat
/// it as "no strong signal".
pub fn ibs(high: f64, low: f64, close: f64) -> Option<f64> {
    let range = high - low;
    if range == 0.0 {
        return None;
    }
    Some((close - low) / range * 100.0)
}
