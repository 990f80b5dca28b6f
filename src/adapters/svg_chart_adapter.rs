//! SVG line charts written to disk.

use crate::domain::error::AgentError;
use crate::domain::price::{Period, PricePoint};
use crate::ports::chart_port::ChartPort;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;
const SINGLE_COLOR: &str = "#2563eb";
const COMPARE_COLORS: [&str; 2] = ["#2563eb", "#f97316"];

pub struct SvgChartAdapter {
    charts_dir: PathBuf,
}

impl SvgChartAdapter {
    pub fn new(charts_dir: PathBuf) -> Self {
        Self { charts_dir }
    }

    fn write(&self, filename: &str, svg: &str) -> Result<String, AgentError> {
        fs::create_dir_all(&self.charts_dir)?;
        let path = self.charts_dir.join(filename);
        fs::write(&path, svg)?;
        debug!(path = %path.display(), "chart written");
        Ok(absolute(&path).display().to_string())
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

struct Line<'a> {
    label: &'a str,
    color: &'a str,
    values: Vec<f64>,
}

fn min_max(lines: &[Line<'_>]) -> (f64, f64) {
    lines
        .iter()
        .flat_map(|l| l.values.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn polyline(values: &[f64], min: f64, max: f64) -> String {
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if values.len() > 1 {
        plot_width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = PADDING + i as f64 * scale_x;
            let y = HEIGHT - PADDING - (v - min) * scale_y;
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders one or more lines sharing a y axis.
fn render_svg(title: &str, y_label: &str, x_range: (&str, &str), lines: &[Line<'_>]) -> String {
    let (min, max) = min_max(lines);
    let axis_y = HEIGHT - PADDING;
    let label_y = axis_y + 18.0;
    let mut parts: Vec<String> = vec![
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH:.0}" height="{HEIGHT:.0}" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}">"#
        ),
        r#"<rect width="100%" height="100%" fill="white"/>"#.to_string(),
        format!(
            r#"<text x="{:.0}" y="25" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
            WIDTH / 2.0,
            escape(title)
        ),
        format!(
            r##"<line x1="{PADDING:.0}" y1="{axis_y:.0}" x2="{:.0}" y2="{axis_y:.0}" stroke="#9ca3af"/>"##,
            WIDTH - PADDING
        ),
        format!(
            r##"<line x1="{PADDING:.0}" y1="{PADDING:.0}" x2="{PADDING:.0}" y2="{axis_y:.0}" stroke="#9ca3af"/>"##
        ),
        format!(
            r#"<text x="{PADDING:.0}" y="{label_y:.0}" font-family="sans-serif" font-size="11">{}</text>"#,
            escape(x_range.0)
        ),
        format!(
            r#"<text x="{:.0}" y="{label_y:.0}" text-anchor="end" font-family="sans-serif" font-size="11">{}</text>"#,
            WIDTH - PADDING,
            escape(x_range.1)
        ),
        format!(
            r#"<text x="{:.0}" y="{PADDING:.0}" text-anchor="end" font-family="sans-serif" font-size="11">{max:.2}</text>"#,
            PADDING - 5.0
        ),
        format!(
            r#"<text x="{:.0}" y="{axis_y:.0}" text-anchor="end" font-family="sans-serif" font-size="11">{min:.2}</text>"#,
            PADDING - 5.0
        ),
        format!(
            r#"<text x="15" y="{mid:.0}" transform="rotate(-90 15 {mid:.0})" text-anchor="middle" font-family="sans-serif" font-size="11">{}</text>"#,
            escape(y_label),
            mid = HEIGHT / 2.0
        ),
    ];

    parts.extend(lines.iter().map(|line| {
        format!(
            r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            line.color,
            polyline(&line.values, min, max)
        )
    }));

    if lines.len() > 1 {
        for (i, line) in lines.iter().enumerate() {
            let y = PADDING + 15.0 * i as f64;
            parts.push(format!(
                r#"<rect x="{:.0}" y="{:.0}" width="10" height="10" fill="{}"/>"#,
                WIDTH - PADDING - 80.0,
                y - 9.0,
                line.color
            ));
            parts.push(format!(
                r#"<text x="{:.0}" y="{y:.0}" font-family="sans-serif" font-size="12">{}</text>"#,
                WIDTH - PADDING - 65.0,
                escape(line.label)
            ));
        }
    }

    parts.push("</svg>\n".to_string());
    parts.join("\n")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn date_range(series: &[PricePoint]) -> (String, String) {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.date.to_string(), last.date.to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Closes divided by the first close, so every series starts at 1.0.
pub fn normalize(series: &[PricePoint]) -> Vec<f64> {
    let Some(first) = series.first().map(|p| p.close) else {
        return Vec::new();
    };
    series.iter().map(|p| p.close / first).collect()
}

pub fn close_price_svg(series: &[PricePoint], ticker: &str, period: Period) -> String {
    let (start, end) = date_range(series);
    let line = Line {
        label: ticker,
        color: SINGLE_COLOR,
        values: series.iter().map(|p| p.close).collect(),
    };
    render_svg(
        &format!("{ticker} Close Price ({period})"),
        "Price",
        (&start, &end),
        &[line],
    )
}

pub fn comparison_svg(
    series_a: &[PricePoint],
    series_b: &[PricePoint],
    ticker_a: &str,
    ticker_b: &str,
    period: Period,
) -> String {
    let (start_a, end_a) = date_range(series_a);
    let (start_b, end_b) = date_range(series_b);
    let start = start_a.min(start_b);
    let end = end_a.max(end_b);
    let lines = [
        Line {
            label: ticker_a,
            color: COMPARE_COLORS[0],
            values: normalize(series_a),
        },
        Line {
            label: ticker_b,
            color: COMPARE_COLORS[1],
            values: normalize(series_b),
        },
    ];
    render_svg(
        &format!("{ticker_a} vs {ticker_b} (Normalized, {period})"),
        "Growth (Start = 1.0)",
        (&start, &end),
        &lines,
    )
}

impl ChartPort for SvgChartAdapter {
    fn render_single(
        &self,
        series: &[PricePoint],
        ticker: &str,
        period: Period,
    ) -> Result<String, AgentError> {
        if series.is_empty() {
            return Err(AgentError::ChartRender {
                reason: format!("no prices to plot for {ticker}"),
            });
        }
        let ticker = ticker.to_uppercase();
        let svg = close_price_svg(series, &ticker, period);
        self.write(&format!("{ticker}_{period}.svg"), &svg)
    }

    fn render_comparison(
        &self,
        series_a: &[PricePoint],
        series_b: &[PricePoint],
        ticker_a: &str,
        ticker_b: &str,
        period: Period,
    ) -> Result<String, AgentError> {
        if series_a.is_empty() || series_b.is_empty() {
            return Err(AgentError::ChartRender {
                reason: "price data missing for comparison chart".into(),
            });
        }
        let (ticker_a, ticker_b) = (ticker_a.to_uppercase(), ticker_b.to_uppercase());
        let svg = comparison_svg(series_a, series_b, &ticker_a, &ticker_b, period);
        self.write(&format!("compare_{ticker_a}_{ticker_b}_{period}.svg"), &svg)
    }
}
