use chrono::{FixedOffset, NaiveDate, TimeZone};
use serde_json::Value;

use crate::error::AppError;
use crate::model::candle::Candle;

/// Extract an f64 from a kline field that Binance encodes either as a
/// JSON number or as a string-wrapped decimal.
fn field_f64(row: &[Value], idx: usize) -> Result<f64, AppError> {
    match &row[idx] {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| AppError::MalformedKline(format!("field {idx} is not numeric: {s:?}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AppError::MalformedKline(format!("field {idx} is not a valid f64"))),
        other => Err(AppError::MalformedKline(format!(
            "field {idx} has unexpected type: {other}"
        ))),
    }
}

/// Convert raw kline rows into a canonical candle sequence.
///
/// Each row is a positional array of at least
/// `[open_time_ms, open, high, low, close, volume, ...]`; trailing fields
/// are ignored. Open times are converted from epoch milliseconds into the
/// display timezone. The supplier sends rows pre-sorted, but sorting and
/// duplicate removal are applied anyway as a normalization step.
pub fn normalize(
    rows: &[Value],
    tz: FixedOffset,
    symbol: &str,
    date: NaiveDate,
) -> Result<Vec<Candle>, AppError> {
    if rows.is_empty() {
        return Err(AppError::EmptyInput {
            symbol: symbol.to_string(),
            date,
        });
    }

    let mut candles = Vec::with_capacity(rows.len());
    for row in rows {
        let fields = row
            .as_array()
            .ok_or_else(|| AppError::MalformedKline(format!("row is not an array: {row}")))?;
        if fields.len() < 6 {
            return Err(AppError::MalformedKline(format!(
                "row has {} fields, expected at least 6",
                fields.len()
            )));
        }

        let open_time_ms = fields[0].as_i64().ok_or_else(|| {
            AppError::MalformedKline(format!("open time is not an integer: {}", fields[0]))
        })?;
        let open_time = tz
            .timestamp_millis_opt(open_time_ms)
            .single()
            .ok_or_else(|| {
                AppError::MalformedKline(format!("open time out of range: {open_time_ms}"))
            })?;

        candles.push(Candle {
            open_time,
            open: field_f64(fields, 1)?,
            high: field_f64(fields, 2)?,
            low: field_f64(fields, 3)?,
            close: field_f64(fields, 4)?,
            volume: field_f64(fields, 5)?,
        });
    }

    candles.sort_by_key(|c| c.open_time);
    candles.dedup_by_key(|c| c.open_time);
    Ok(candles)
}
