//! Drawing surface shared by the chart kinds

use image::{Rgba, RgbaImage};

use super::font::{text_height, text_pixels, text_width};
use super::ChartStyle;
use crate::shapes::{rasterize_frame, rasterize_rect};

pub(crate) const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub(crate) const INK: Rgba<u8> = Rgba([40, 40, 40, 255]);

/// Plot region in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

pub(crate) struct Canvas {
    image: RgbaImage,
    scale: u32,
}

impl Canvas {
    pub fn new(style: &ChartStyle) -> Self {
        Self {
            image: RgbaImage::from_pixel(style.width, style.height, BACKGROUND),
            scale: style.text_scale.max(1),
        }
    }

    /// Height of one text line.
    pub fn line(&self) -> i32 {
        text_height(self.scale) as i32
    }

    pub fn text_width(&self, text: &str) -> u32 {
        text_width(text, self.scale)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn fill<I>(&mut self, pixels: I, color: Rgba<u8>)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let (width, height) = self.image.dimensions();
        for (x, y) in pixels {
            if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
        self.fill(rasterize_rect(x, y, w, h), color);
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Rgba<u8>) {
        let pixels = text_pixels(text, x, y, self.scale);
        self.fill(pixels, color);
    }

    pub fn text_centered(&mut self, cx: i32, y: i32, text: &str, color: Rgba<u8>) {
        let x = cx - self.text_width(text) as i32 / 2;
        self.text(x, y, text, color);
    }

    pub fn title(&mut self, title: &str) {
        let cx = self.image.width() as i32 / 2;
        let y = self.line();
        self.text_centered(cx, y, title, INK);
    }

    /// Region left for the plot after title, axis labels and a legend column.
    pub fn plot_area(&self, legend_width: i32) -> Rect {
        let line = self.line();
        let left = self.text_width("00000") as i32 + 2 * line;
        let top = 4 * line;
        let bottom = 3 * line;
        let right = if legend_width > 0 { legend_width + 2 * line } else { 2 * line };
        Rect {
            x: left,
            y: top,
            w: self.image.width() as i32 - left - right,
            h: self.image.height() as i32 - top - bottom,
        }
    }

    /// Axis lines plus `0` and `max` tick labels.
    pub fn axes(&mut self, plot: Rect, max: f64) {
        let line = self.line();
        self.rect(plot.x - 1, plot.y, 1, plot.h + 1, INK);
        self.rect(plot.x - 1, plot.bottom(), plot.w + 1, 1, INK);

        let top_label = format_value(max);
        let x = plot.x - line / 2 - self.text_width(&top_label) as i32;
        self.text(x, plot.y - line / 2, &top_label, INK);
        let x = plot.x - line / 2 - self.text_width("0") as i32;
        self.text(x, plot.bottom() - line, "0", INK);
    }

    /// Color boxes with labels, one row per entry, starting at `(x, y)`.
    pub fn legend(&mut self, x: i32, y: i32, entries: &[(String, Rgba<u8>)]) {
        let line = self.line();
        for (row, (label, color)) in entries.iter().enumerate() {
            let top = y + row as i32 * 2 * line;
            self.rect(x, top, line, line, *color);
            self.fill(rasterize_frame(x, top, line, line, 1), INK);
            self.text(x + line + line / 2, top, label, INK);
        }
    }

    /// Width a legend with these labels needs.
    pub fn legend_width<'a, I>(&self, labels: I) -> i32
    where
        I: IntoIterator<Item = &'a str>,
    {
        let widest = labels.into_iter().map(|l| self.text_width(l)).max().unwrap_or(0);
        if widest == 0 {
            return 0;
        }
        widest as i32 + self.line() * 3 / 2
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Whole numbers without decimals, anything else with one.
pub(crate) fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
