//! Bar and stacked bar charts

use image::{Rgba, RgbaImage};

use super::canvas::{format_value, Canvas, Rect, INK};
use super::font::fit_text;
use super::ChartStyle;

/// One stacked layer: a value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: Rgba<u8>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>, color: Rgba<u8>) -> Self {
        Self { name: name.into(), values, color }
    }
}

/// Horizontal position of category slots inside the plot.
struct Slots {
    x: f64,
    width: f64,
}

impl Slots {
    fn new(plot: Rect, count: usize) -> Self {
        Self { x: f64::from(plot.x), width: f64::from(plot.w) / count.max(1) as f64 }
    }

    fn start(&self, i: usize) -> i32 {
        (self.x + i as f64 * self.width).round() as i32
    }

    fn center(&self, i: usize) -> i32 {
        (self.x + (i as f64 + 0.5) * self.width).round() as i32
    }

    /// Bar left edge and width, leaving a gap between neighbours.
    fn bar(&self, i: usize) -> (i32, i32) {
        let width = (self.width * 0.7).max(1.0);
        let left = self.x + i as f64 * self.width + (self.width - width) / 2.0;
        (left.round() as i32, width.round().max(1.0) as i32)
    }
}

/// Category labels under the x axis.
///
/// An empty label leaves its slot to the previous non-empty one, so sparse
/// labels (one per day over hourly bars) get room to be read.
fn draw_labels(canvas: &mut Canvas, plot: Rect, slots: &Slots, labels: &[String]) {
    let y = plot.bottom() + canvas.line() / 2 + 1;
    for (i, label) in labels.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        let span = labels[i + 1..].iter().position(|l| !l.is_empty()).map_or(labels.len() - i, |p| p + 1);
        let room = (slots.width * span as f64).floor().max(0.0) as u32;
        let text = fit_text(label, room.saturating_sub(2), canvas.scale()).to_string();
        if span == 1 {
            canvas.text_centered(slots.center(i), y, &text, INK);
        } else {
            canvas.text(slots.start(i) + 1, y, &text, INK);
        }
    }
}

/// Value label above a bar, dropped when it does not fit the slot.
fn draw_value(canvas: &mut Canvas, slots: &Slots, i: usize, top: i32, value: f64) {
    let text = format_value(value);
    if f64::from(canvas.text_width(&text)) <= slots.width {
        let y = top - canvas.line() - canvas.line() / 2;
        canvas.text_centered(slots.center(i), y, &text, INK);
    }
}

fn bar_height(value: f64, max: f64, plot: Rect) -> i32 {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    (value / max * f64::from(plot.h)).round() as i32
}

/// Render a single-series bar chart.
///
/// `labels` and `values` are paired by position; a shorter `labels` leaves
/// the remaining bars unlabeled.
pub fn bar_chart(title: &str, labels: &[String], values: &[f64], color: Rgba<u8>, style: &ChartStyle) -> RgbaImage {
    let mut canvas = Canvas::new(style);
    canvas.title(title);
    let plot = canvas.plot_area(0);
    let max = values.iter().copied().fold(0.0, f64::max);
    canvas.axes(plot, max);

    let slots = Slots::new(plot, values.len());
    for (i, &value) in values.iter().enumerate() {
        let height = bar_height(value, max, plot);
        let (left, width) = slots.bar(i);
        canvas.rect(left, plot.bottom() - height, width, height, color);
        draw_value(&mut canvas, &slots, i, plot.bottom() - height, value);
    }
    draw_labels(&mut canvas, plot, &slots, labels);

    canvas.into_image()
}

/// Render a stacked bar chart with one bar per label and a legend.
///
/// Series values missing for a category count as zero. The bar total is
/// printed above each bar.
pub fn stacked_bar_chart(title: &str, labels: &[String], series: &[Series], style: &ChartStyle) -> RgbaImage {
    let mut canvas = Canvas::new(style);
    canvas.title(title);
    let legend_width = canvas.legend_width(series.iter().map(|s| s.name.as_str()));
    let plot = canvas.plot_area(legend_width);

    let value = |s: &Series, i: usize| s.values.get(i).copied().unwrap_or(0.0).max(0.0);
    let totals: Vec<f64> = (0..labels.len()).map(|i| series.iter().map(|s| value(s, i)).sum()).collect();
    let max = totals.iter().copied().fold(0.0, f64::max);
    canvas.axes(plot, max);

    let slots = Slots::new(plot, labels.len());
    for (i, total) in totals.iter().enumerate() {
        let (left, width) = slots.bar(i);
        let mut cumulative = 0.0;
        for layer in series {
            let v = value(layer, i);
            let lower = plot.bottom() - bar_height(cumulative, max, plot);
            cumulative += v;
            let upper = plot.bottom() - bar_height(cumulative, max, plot);
            canvas.rect(left, upper, width, lower - upper, layer.color);
        }
        draw_value(&mut canvas, &slots, i, plot.bottom() - bar_height(*total, max, plot), *total);
    }
    draw_labels(&mut canvas, plot, &slots, labels);

    let entries: Vec<(String, Rgba<u8>)> = series.iter().map(|s| (s.name.clone(), s.color)).collect();
    let line = canvas.line();
    canvas.legend(plot.x + plot.w + 2 * line, plot.y, &entries);

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PALETTE;

    fn count(image: &RgbaImage, color: Rgba<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bar_chart_dimensions_and_bars() {
        let style = ChartStyle { width: 300, height: 200, text_scale: 1 };
        let image = bar_chart("Counts", &labels(&["a", "b"]), &[1.0, 2.0], PALETTE[0], &style);
        assert_eq!(image.dimensions(), (300, 200));
        assert!(count(&image, PALETTE[0]) > 0);
    }

    #[test]
    fn test_taller_bar_has_more_pixels() {
        let style = ChartStyle { width: 300, height: 200, text_scale: 1 };
        let small = bar_chart("x", &[], &[1.0, 4.0], PALETTE[1], &style);
        let large = bar_chart("x", &[], &[3.0, 4.0], PALETTE[1], &style);
        assert!(count(&large, PALETTE[1]) > count(&small, PALETTE[1]));
    }

    #[test]
    fn test_zero_values_draw_no_bars() {
        let style = ChartStyle { width: 200, height: 150, text_scale: 1 };
        let image = bar_chart("Empty", &labels(&["a"]), &[0.0], PALETTE[2], &style);
        assert_eq!(count(&image, PALETTE[2]), 0);
    }

    #[test]
    fn test_stacked_layers_drawn() {
        let style = ChartStyle { width: 400, height: 300, text_scale: 1 };
        let series = vec![
            Series::new("neg", vec![2.0, 1.0], PALETTE[3]),
            Series::new("pos", vec![1.0], PALETTE[2]),
        ];
        let image = stacked_bar_chart("Stacked", &labels(&["#a", "#b"]), &series, &style);
        assert!(count(&image, PALETTE[3]) > count(&image, PALETTE[2]));
        assert!(count(&image, PALETTE[2]) > 0);
    }

    #[test]
    fn test_sparse_labels_get_room() {
        let style = ChartStyle { width: 400, height: 200, text_scale: 1 };
        let mut hours = vec![String::new(); 48];
        hours[0] = "Monday".to_string();
        hours[24] = "Tuesday".to_string();
        let values = vec![1.0; 48];
        let image = bar_chart("Hourly", &hours, &values, PALETTE[0], &style);
        // Labels render in ink below the axis even though each slot is narrow
        let canvas = Canvas::new(&style);
        let plot = canvas.plot_area(0);
        let ink_below = (plot.bottom() + 2..200)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x as u32, y as u32) == &INK)
            .count();
        assert!(ink_below > 20);
    }
}
