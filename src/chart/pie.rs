//! Pie charts

use image::{Rgba, RgbaImage};

use super::canvas::{Canvas, INK};
use super::ChartStyle;
use crate::shapes::rasterize_sector;

/// Render a pie chart; slice colors are taken from `colors` in order, cycling.
///
/// The legend lists every slice with its share, zero slices included. A pie
/// whose values sum to zero is drawn as a "NO DATA" notice.
pub fn pie_chart(title: &str, slices: &[(String, f64)], colors: &[Rgba<u8>], style: &ChartStyle) -> RgbaImage {
    let mut canvas = Canvas::new(style);
    canvas.title(title);

    let total: f64 = slices.iter().map(|(_, v)| v.max(0.0)).sum();
    let share = |v: f64| if total > 0.0 { v.max(0.0) / total } else { 0.0 };
    let color = |i: usize| colors.get(i % colors.len().max(1)).copied().unwrap_or(INK);

    let entries: Vec<(String, Rgba<u8>)> = slices
        .iter()
        .enumerate()
        .map(|(i, (label, v))| (format!("{label} {:.1}%", share(*v) * 100.0), color(i)))
        .collect();
    let legend_width = canvas.legend_width(entries.iter().map(|(l, _)| l.as_str()));
    let plot = canvas.plot_area(legend_width);

    let cx = plot.x + plot.w / 2;
    let cy = plot.y + plot.h / 2;
    if total <= 0.0 {
        canvas.text_centered(cx, cy, "NO DATA", INK);
        return canvas.into_image();
    }

    let radius = plot.w.min(plot.h) / 2;
    let mut start = 0.0;
    for (i, (_, value)) in slices.iter().enumerate() {
        // The last slice closes the circle exactly
        let end = if i + 1 == slices.len() { 1.0 } else { start + share(*value) };
        let pixels = rasterize_sector(cx, cy, radius, start, end);
        canvas.fill(pixels, color(i));
        start = end;
    }

    let line = canvas.line();
    canvas.legend(plot.x + plot.w + 2 * line, plot.y, &entries);
    canvas.into_image()
}
