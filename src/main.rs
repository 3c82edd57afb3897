use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

use kline_report::binance::rest::BinanceRestClient;
use kline_report::chart;
use kline_report::config::Config;
use kline_report::email::Mailer;
use kline_report::error::AppError;
use kline_report::normalize::normalize;
use kline_report::pipeline::{analyze, summary_text};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load config
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists (and .env with EMAIL / EMAIL_AUTH_CODE when email is enabled)");
            std::process::exit(1);
        }
    };

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let symbol = config.binance.symbol.clone();
    let interval = config.binance.kline_interval.clone();
    let tz = config.report.display_tz()?;

    // Target date: first CLI argument as YYYY-MM-DD, else yesterday in the
    // display timezone.
    let date = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("invalid date argument '{}', expected YYYY-MM-DD", arg))?,
        None => (Utc::now().with_timezone(&tz) - Duration::days(1)).date_naive(),
    };

    tracing::info!(%symbol, %interval, %date, "Generating kline report");

    // Fetch window: [date 00:00, next day 00:00) in the display timezone.
    let start = tz
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is valid"))
        .single()
        .with_context(|| format!("cannot resolve midnight of {} in {}", date, tz))?;
    let start_ms = start.timestamp_millis();
    let end_ms = start_ms + 24 * 3_600_000;

    let client = BinanceRestClient::new(&config.binance.rest_base_url);
    let rows = client
        .get_klines(&symbol, &interval, start_ms, end_ms, 1000)
        .await?;

    let candles = match normalize(&rows, tz, &symbol, date) {
        Ok(c) => c,
        Err(AppError::EmptyInput { symbol, date }) => {
            tracing::warn!(%symbol, %date, "No kline data for the requested window, nothing to report");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(count = candles.len(), "Normalized candles");

    let report = analyze(candles);

    let output_dir = PathBuf::from(&config.report.output_dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let image_name = format!("{}_{}_{}.png", symbol, interval, date);
    let image_path = output_dir.join(&image_name);

    let title = format!("{} {} klines (IBS coloring + EMA20)", symbol, interval);
    chart::render(
        &config.chart.style(),
        &report,
        &title,
        "Price",
        &image_path,
    )?;
    tracing::info!(path = %image_path.display(), "Chart written");

    if config.email.enabled {
        let subject = format!("{} {} kline report", date, symbol);
        let body = summary_text(&symbol, &interval, date, tz);
        let png_bytes = std::fs::read(&image_path)
            .with_context(|| format!("failed to read {}", image_path.display()))?;

        let mailer = Mailer::new(config.email.clone());
        tokio::task::spawn_blocking(move || {
            mailer.send_report(&subject, &body, &image_name, png_bytes)
        })
        .await
        .context("email task panicked")??;
        tracing::info!("Report email sent");
    }

    Ok(())
}
