use std::path::Path;

use plotters::prelude::*;

use crate::classify::CandleClass;
use crate::error::AppError;
use crate::pipeline::ReportCandle;

const BULLISH_COLOR: RGBColor = RGBColor(0x26, 0xa6, 0x9a);
const BEARISH_COLOR: RGBColor = RGBColor(0xef, 0x53, 0x50);
const STRONG_BULLISH_COLOR: RGBColor = RGBColor(0x00, 0x00, 0xff);
const STRONG_BEARISH_COLOR: RGBColor = RGBColor(0xff, 0x00, 0x00);
const EMA_COLOR: RGBColor = RGBColor(0xff, 0xa5, 0x00);

/// Renderer configuration, passed at construction instead of being set as
/// process-global backend state.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
    /// Candle body width as a fraction of one position unit.
    pub body_fraction: f64,
    /// Upper bound on the number of x tick labels.
    pub max_x_labels: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        // 14x8 inches at 150 dpi.
        Self {
            width: 2100,
            height: 1200,
            font_family: "sans-serif".to_string(),
            title_font_size: 42,
            label_font_size: 24,
            body_fraction: 0.4,
            max_x_labels: 10,
        }
    }
}

fn class_color(class: CandleClass) -> RGBColor {
    match class {
        CandleClass::Bullish => BULLISH_COLOR,
        CandleClass::Bearish => BEARISH_COLOR,
        CandleClass::StrongBullish => STRONG_BULLISH_COLOR,
        CandleClass::StrongBearish => STRONG_BEARISH_COLOR,
    }
}

/// Y range covering every wick and EMA value, padded by 2%.
pub(crate) fn y_bounds(candles: &[ReportCandle]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for rc in candles {
        min = min.min(rc.candle.low).min(rc.ema20);
        max = max.max(rc.candle.high).max(rc.ema20);
    }
    let range = max - min;
    let pad = if range < 1e-9 { 1.0 } else { range * 0.02 };
    (min - pad, max + pad)
}

/// Tick stride so at most `max_labels` x labels appear.
pub(crate) fn label_stride(len: usize, max_labels: usize) -> usize {
    (len / max_labels.max(1)).max(1)
}

/// Render the classified series as a candlestick PNG.
///
/// Candles are plotted by ordinal position: a missing interval in the
/// series compresses away instead of leaving a visual gap. Each candle
/// gets a wick segment from low to high and a filled body rectangle, both
/// in its class color, with a continuous EMA20 overlay on top.
pub fn render(
    style: &ChartStyle,
    candles: &[ReportCandle],
    title: &str,
    y_label: &str,
    path: &Path,
) -> Result<(), AppError> {
    if candles.is_empty() {
        return Err(AppError::Render(
            "cannot render an empty candle series".to_string(),
        ));
    }

    let n = candles.len();
    let (y_min, y_max) = y_bounds(candles);
    let stride = label_stride(n, style.max_x_labels);

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AppError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (style.font_family.as_str(), style.title_font_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-1.0..n as f64, y_min..y_max)
        .map_err(|e| AppError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n.div_ceil(stride).min(style.max_x_labels + 1))
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            match candles.get(idx as usize) {
                Some(rc) => rc.candle.open_time.format("%H:%M").to_string(),
                None => String::new(),
            }
        })
        .y_desc(y_label)
        .label_style((style.font_family.as_str(), style.label_font_size))
        .axis_desc_style((style.font_family.as_str(), style.label_font_size))
        .draw()
        .map_err(|e| AppError::Render(e.to_string()))?;

    // Wicks first so the bodies paint over them.
    chart
        .draw_series(candles.iter().enumerate().map(|(i, rc)| {
            let color = class_color(rc.class);
            PathElement::new(
                vec![(i as f64, rc.candle.low), (i as f64, rc.candle.high)],
                color.stroke_width(2),
            )
        }))
        .map_err(|e| AppError::Render(e.to_string()))?;

    let half_body = style.body_fraction / 2.0;
    chart
        .draw_series(candles.iter().enumerate().map(|(i, rc)| {
            let color = class_color(rc.class);
            Rectangle::new(
                [
                    (i as f64 - half_body, rc.candle.body_low()),
                    (i as f64 + half_body, rc.candle.body_high()),
                ],
                color.filled(),
            )
        }))
        .map_err(|e| AppError::Render(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            candles.iter().enumerate().map(|(i, rc)| (i as f64, rc.ema20)),
            EMA_COLOR.stroke_width(3),
        ))
        .map_err(|e| AppError::Render(e.to_string()))?
        .label(format!("EMA{}", crate::pipeline::EMA_SPAN))
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 30, y)], EMA_COLOR.stroke_width(3))
        });

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font((style.font_family.as_str(), style.label_font_size))
        .draw()
        .map_err(|e| AppError::Render(e.to_string()))?;

    root.present().map_err(|e| AppError::Render(e.to_string()))?;
    Ok(())
}
