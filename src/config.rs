use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;

use crate::chart::ChartStyle;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    pub report: ReportConfig,
    pub chart: ChartConfig,
    pub email: EmailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    pub symbol: String,
    pub kline_interval: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Display timezone as whole hours east of UTC (8 = UTC+08:00).
    pub tz_offset_hours: i32,
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(skip)]
    pub address: String,
    #[serde(skip)]
    pub auth_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Parse a Binance kline interval string (e.g. "1s", "1m", "1h", "1d", "1w", "1M") into milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64> {
    if s.len() < 2 {
        bail!("invalid interval '{}': expected format like '15m'", s);
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_ms = match suffix {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 7 * 86_400_000,
        "M" => 30 * 86_400_000,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d/w/M",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl BinanceConfig {
    pub fn kline_interval_ms(&self) -> Result<u64> {
        parse_interval_ms(&self.kline_interval)
    }
}

impl ReportConfig {
    pub fn display_tz(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.tz_offset_hours * 3600).with_context(|| {
            format!(
                "report.tz_offset_hours is out of range: {}",
                self.tz_offset_hours
            )
        })
    }
}

impl ChartConfig {
    pub fn style(&self) -> ChartStyle {
        ChartStyle {
            width: self.width,
            height: self.height,
            font_family: self.font_family.clone(),
            ..ChartStyle::default()
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;

        if config.email.enabled {
            config.email.address =
                std::env::var("EMAIL").context("EMAIL not set in .env or environment")?;
            config.email.auth_code = std::env::var("EMAIL_AUTH_CODE")
                .context("EMAIL_AUTH_CODE not set in .env or environment")?;
        }

        config
            .binance
            .kline_interval_ms()
            .context("binance.kline_interval is invalid")?;
        config
            .report
            .display_tz()
            .context("report.tz_offset_hours is invalid")?;

        Ok(config)
    }
}
