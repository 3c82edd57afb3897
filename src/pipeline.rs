use chrono::{Days, FixedOffset, NaiveDate};

use crate::classify::{classify, CandleClass, STRONG_BEARISH_IBS, STRONG_BULLISH_IBS};
use crate::indicator::ema::Ema;
use crate::indicator::ibs::ibs;
use crate::model::candle::Candle;

/// Smoothing span for the report's EMA overlay.
pub const EMA_SPAN: usize = 20;

/// One candle with its derived indicators and draw category attached.
#[derive(Debug, Clone)]
pub struct ReportCandle {
    pub candle: Candle,
    pub ibs: Option<f64>,
    pub ema20: f64,
    pub class: CandleClass,
}

/// Run the indicator and classification pass over a normalized sequence.
///
/// Single forward pass; the EMA is computed by position over whatever
/// candles exist, so wall-clock gaps in the series do not affect it. The
/// output is index-aligned with the input.
pub fn analyze(candles: Vec<Candle>) -> Vec<ReportCandle> {
    let mut ema = Ema::new(EMA_SPAN);
    candles
        .into_iter()
        .map(|candle| {
            let ibs = ibs(candle.high, candle.low, candle.close);
            let ema20 = ema.push(candle.close);
            let class = classify(&candle, ibs);
            ReportCandle {
                candle,
                ibs,
                ema20,
                class,
            }
        })
        .collect()
}

/// Plain-text body for the report notification: the covered window plus
/// the color legend.
pub fn summary_text(symbol: &str, interval: &str, date: NaiveDate, tz: FixedOffset) -> String {
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    format!(
        "Attached: {symbol} {interval} candlestick chart for {date} 00:00 \
         to {next} 00:00 (UTC{tz}).\n\
         \n\
         Legend:\n\
         - blue: bullish candle with IBS >= {bull:.0}\n\
         - red: bearish candle with IBS <= {bear:.0}\n\
         - orange line: EMA{span}\n",
        bull = STRONG_BULLISH_IBS,
        bear = STRONG_BEARISH_IBS,
        span = EMA_SPAN,
    )
}
