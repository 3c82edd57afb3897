use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::AppError;

use super::types::BinanceApiErrorResponse;

/// Maximum klines per request accepted by the endpoint.
const KLINES_LIMIT_MAX: usize = 1000;

pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceRestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch raw kline rows for `[start_ms, end_ms)` from the public
    /// `GET /api/v3/klines` endpoint (unsigned).
    ///
    /// Rows are returned as-is: positional JSON arrays with Binance's
    /// string-encoded decimals. Normalization happens downstream.
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
        limit: usize,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.clamp(1, KLINES_LIMIT_MAX);
        let limit_s = limit.to_string();
        let start_s = start_ms.to_string();
        let end_s = end_ms.to_string();

        tracing::debug!(symbol, interval, start_ms, end_ms, limit, "Fetching klines");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("startTime", start_s.as_str()),
                ("endTime", end_s.as_str()),
                ("limit", limit_s.as_str()),
            ])
            .send()
            .await
            .context("get_klines HTTP failed")?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<BinanceApiErrorResponse>(&body) {
                return Err(AppError::BinanceApi {
                    code: err.code,
                    msg: err.msg,
                }
                .into());
            }
            return Err(anyhow::anyhow!("klines request failed: {}", body));
        }

        let rows: Vec<Value> = resp.json().await.context("get_klines JSON parse failed")?;
        tracing::info!(symbol, interval, count = rows.len(), "Fetched klines");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BinanceRestClient::new("https://api.binance.com/");
        assert_eq!(client.base_url, "https://api.binance.com");
    }

    #[test]
    fn error_body_parses() {
        let err: BinanceApiErrorResponse =
            serde_json::from_str(r#"{"code":-1121,"msg":"Invalid symbol."}"#).unwrap();
        assert_eq!(err.code, -1121);
        assert_eq!(err.msg, "Invalid symbol.");
    }
}
