use chrono::{DateTime, FixedOffset};

/// One normalized OHLCV interval, with its open time in the report's
/// display timezone.
#[derive(Debug, Clone)]
pub struct Candle {
    pub open_time: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// A flat candle (close == open) counts as bullish.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }
}
