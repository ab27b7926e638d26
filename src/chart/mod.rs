//! PNG charts of analysis statistics
//!
//! Charts are rasterized directly into an [`RgbaImage`] with the pixel
//! primitives of [`crate::shapes`] and a built-in bitmap font.

mod bar;
mod canvas;
pub mod font;
mod pie;

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analyze::{AnalysisReport, HOURS_PER_WEEK, WEEKDAYS};
use crate::output::{chart_path, save_png, OutputError};
use crate::tweet::Sentiment;

pub use bar::{bar_chart, stacked_bar_chart, Series};
pub use pie::pie_chart;

/// Categorical palette.
pub const PALETTE: [Rgba<u8>; 10] = [
    Rgba([31, 119, 180, 255]),
    Rgba([255, 127, 14, 255]),
    Rgba([44, 160, 44, 255]),
    Rgba([214, 39, 40, 255]),
    Rgba([148, 103, 189, 255]),
    Rgba([140, 86, 75, 255]),
    Rgba([227, 119, 194, 255]),
    Rgba([127, 127, 127, 255]),
    Rgba([188, 189, 34, 255]),
    Rgba([23, 190, 207, 255]),
];

/// Color of a sentiment in every chart.
pub fn sentiment_color(sentiment: Sentiment) -> Rgba<u8> {
    match sentiment {
        Sentiment::Negative => PALETTE[3],
        Sentiment::Neutral => PALETTE[7],
        Sentiment::Positive => PALETTE[2],
    }
}

/// Image size and text scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// Font pixel size in image pixels
    pub text_scale: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self { width: 800, height: 600, text_scale: 2 }
    }
}

fn sentiment_series(rows: &[[u64; 3]]) -> Vec<Series> {
    Sentiment::ALL
        .iter()
        .map(|&s| {
            let values = rows.iter().map(|r| r[s.index()] as f64).collect();
            Series::new(s.label(), values, sentiment_color(s))
        })
        .collect()
}

fn weekday_series(rows: &[[u64; 7]]) -> Vec<Series> {
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(d, day)| {
            let values = rows.iter().map(|r| r[d] as f64).collect();
            Series::new(*day, values, PALETTE[d])
        })
        .collect()
}

/// Labels for hour-of-week bars: the weekday name at each midnight.
fn hour_labels() -> Vec<String> {
    (0..HOURS_PER_WEEK)
        .map(|h| if h % 24 == 0 { WEEKDAYS[h / 24].to_string() } else { String::new() })
        .collect()
}

/// Every chart the report supports, as `(title, image)` pairs.
///
/// Author and timestamp charts are left out when the report has no such
/// section.
pub fn build_charts(report: &AnalysisReport, style: &ChartStyle) -> Vec<(&'static str, RgbaImage)> {
    let mut charts = Vec::new();

    let labels: Vec<String> = Sentiment::ALL.iter().map(|s| s.label().to_string()).collect();
    let values: Vec<f64> = report.sentiments.iter().map(|&c| c as f64).collect();
    let title = "Sentiment Distribution";
    charts.push((title, bar_chart(title, &labels, &values, PALETTE[0], style)));

    let slices: Vec<(String, f64)> = report.pos.iter().map(|(pos, c)| (pos.clone(), *c as f64)).collect();
    let title = "Token Distribution";
    charts.push((title, pie_chart(title, &slices, &PALETTE, style)));

    let hashtags: Vec<String> = report.top_hashtags.iter().map(|h| h.hashtag.clone()).collect();
    let counts: Vec<f64> = report.top_hashtags.iter().map(|h| h.count as f64).collect();
    let title = "Top Hashtags";
    charts.push((title, bar_chart(title, &hashtags, &counts, PALETTE[0], style)));

    let rows: Vec<[u64; 3]> = report.top_hashtags.iter().map(|h| h.sentiments).collect();
    let title = "Top Hashtag Sentiments";
    charts.push((title, stacked_bar_chart(title, &hashtags, &sentiment_series(&rows), style)));

    if let Some(users) = &report.active_users {
        let names: Vec<String> = users.iter().map(|u| u.user.clone()).collect();
        let rows: Vec<[u64; 3]> = users.iter().map(|u| u.sentiments).collect();
        let title = "Top Users Sentiments";
        charts.push((title, stacked_bar_chart(title, &names, &sentiment_series(&rows), style)));

        let rows: Vec<[u64; 7]> = users.iter().map(|u| u.weekdays).collect();
        let title = "Top Users Weekdays";
        charts.push((title, stacked_bar_chart(title, &names, &weekday_series(&rows), style)));
    }

    if let Some(temporal) = &report.temporal {
        let title = "Hourly Tweets";
        charts.push((title, bar_chart(title, &hour_labels(), &temporal.hour_of_week_average, PALETTE[0], style)));

        let days: Vec<String> = WEEKDAYS.iter().map(|d| d.to_string()).collect();
        let title = "Weekday Averages";
        charts.push((title, bar_chart(title, &days, &temporal.weekday_average, PALETTE[0], style)));
    }

    charts
}

/// Render every supported chart into `out_dir` and return the written paths.
pub fn render_all(report: &AnalysisReport, out_dir: &Path, style: &ChartStyle) -> Result<Vec<PathBuf>, OutputError> {
    let mut written = Vec::new();
    for (title, image) in build_charts(report, style) {
        let path = chart_path(out_dir, title);
        save_png(&image, &path)?;
        debug!(path = %path.display(), "chart written");
        written.push(path);
    }
    info!(charts = written.len(), dir = %out_dir.display(), "charts rendered");
    Ok(written)
}
