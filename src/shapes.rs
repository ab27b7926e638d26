//! Pixel sets for chart primitives.
//!
//! Each function returns the integer pixel coordinates a shape covers; the
//! chart renderer paints them. Coordinates may fall outside the canvas and
//! are clipped when painted.

use std::collections::HashSet;
use std::f64::consts::TAU;

/// Rasterize a filled rectangle with top-left corner `(x, y)`.
///
/// # Examples
///
/// ```
/// use tweetsent::shapes::rasterize_rect;
///
/// let pixels = rasterize_rect(0, 0, 3, 2);
/// assert_eq!(pixels.len(), 6);
/// assert!(pixels.contains(&(2, 1)));
/// ```
pub fn rasterize_rect(x: i32, y: i32, w: i32, h: i32) -> HashSet<(i32, i32)> {
    if w <= 0 || h <= 0 {
        return HashSet::new();
    }
    (y..y + h).flat_map(|py| (x..x + w).map(move |px| (px, py))).collect()
}

/// Rasterize a rectangle outline `thickness` pixels wide.
///
/// # Examples
///
/// ```
/// use tweetsent::shapes::rasterize_frame;
///
/// let pixels = rasterize_frame(0, 0, 4, 4, 1);
/// assert!(pixels.contains(&(3, 0)));
/// assert!(!pixels.contains(&(1, 1)));
/// ```
pub fn rasterize_frame(x: i32, y: i32, w: i32, h: i32, thickness: i32) -> HashSet<(i32, i32)> {
    if w <= 0 || h <= 0 || thickness <= 0 {
        return HashSet::new();
    }
    let t = thickness.min(w).min(h);
    rasterize_rect(x, y, w, h)
        .into_iter()
        .filter(|&(px, py)| px < x + t || px >= x + w - t || py < y + t || py >= y + h - t)
        .collect()
}

/// Rasterize a filled circular sector.
///
/// Angles are in turns (`0.0..=1.0`), measured clockwise from 12 o'clock, so
/// consecutive slices of a pie chart can be drawn from cumulative fractions.
///
/// # Examples
///
/// ```
/// use tweetsent::shapes::rasterize_sector;
///
/// // Right half of a disc
/// let pixels = rasterize_sector(10, 10, 5, 0.0, 0.5);
/// assert!(pixels.contains(&(13, 10)));
/// assert!(!pixels.contains(&(7, 10)));
/// ```
pub fn rasterize_sector(cx: i32, cy: i32, radius: i32, start: f64, end: f64) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();
    if radius <= 0 || end <= start {
        return pixels;
    }
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let turn = clock_angle(dx, dy);
            if (start..end).contains(&turn) {
                pixels.insert((cx + dx, cy + dy));
            }
        }
    }
    pixels
}

/// Clockwise angle from 12 o'clock in turns, in `[0, 1)`. Image y grows downward.
fn clock_angle(dx: i32, dy: i32) -> f64 {
    let angle = f64::from(dx).atan2(-f64::from(dy));
    let turn = angle / TAU;
    if turn < 0.0 {
        turn + 1.0
    } else {
        turn
    }
}
