use crate::model::candle::Candle;

/// IBS at or above this on a bullish candle upgrades it to StrongBullish.
pub const STRONG_BULLISH_IBS: f64 = 69.0;
/// IBS at or below this on a bearish candle upgrades it to StrongBearish.
pub const STRONG_BEARISH_IBS: f64 = 31.0;

/// Draw category for one candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleClass {
    Bullish,
    Bearish,
    StrongBullish,
    StrongBearish,
}

/// Classify a candle from its body direction and IBS value.
///
/// Pure function of (open, close, ibs); an undefined IBS (zero true range)
/// matches neither strong branch and leaves the base class in place.
pub fn classify(candle: &Candle, ibs: Option<f64>) -> CandleClass {
    let bullish = candle.is_bullish();
    match ibs {
        Some(v) if bullish && v >= STRONG_BULLISH_IBS => CandleClass::StrongBullish,
        Some(v) if !bullish && v <= STRONG_BEARISH_IBS => CandleClass::StrongBearish,
        _ => {
            if bullish {
                CandleClass::Bullish
            } else {
                CandleClass::Bearish
            }
        }
    }
}
