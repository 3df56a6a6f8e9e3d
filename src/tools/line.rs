use crate::color::Color;
use crate::grid::{CanvasGrid, Point};
use std::ops::RangeInclusive;

/// Inclusive clip rectangle for a walk, in `i64` so offsets never overflow.
#[derive(Clone, Copy)]
struct Window {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Window {
    const UNBOUNDED: Window = Window {
        min_x: i32::MIN as i64,
        min_y: i32::MIN as i64,
        max_x: i32::MAX as i64,
        max_y: i32::MAX as i64,
    };

    fn of(grid: &CanvasGrid) -> Window {
        Window {
            min_x: 0,
            min_y: 0,
            max_x: grid.width() as i64 - 1,
            max_y: grid.height() as i64 - 1,
        }
    }
}

/// Bresenham walk from `(x0, y0)` to `(x1, y1)`, visiting only the cells inside
/// `window`. Only steps whose major coordinate lands in the window are computed.
fn walk(x0: i32, y0: i32, x1: i32, y1: i32, window: Window, mut visit: impl FnMut(i64, i64)) {
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    if dx >= dy {
        for i in steps_within(x0, sx, dx, window.min_x, window.max_x) {
            let y = y0 + sy * minor_offset(i, dx, dy);
            if (window.min_y..=window.max_y).contains(&y) {
                visit(x0 + sx * i, y);
            }
        }
    } else {
        for i in steps_within(y0, sy, dy, window.min_y, window.max_y) {
            let x = x0 + sx * minor_offset(i, dy, dx);
            if (window.min_x..=window.max_x).contains(&x) {
                visit(x, y0 + sy * i);
            }
        }
    }
}

/// Step indices in `0..=len` whose position `start + step * i` lies in `lo..=hi`.
fn steps_within(start: i64, step: i64, len: i64, lo: i64, hi: i64) -> RangeInclusive<i64> {
    let (first, last) = if step > 0 {
        (lo - start, hi - start)
    } else {
        (start - hi, start - lo)
    };
    first.max(0)..=last.min(len)
}

/// Minor-axis offset after `i` major steps; matches the error-accumulator loop,
/// including its tie-break.
fn minor_offset(i: i64, major: i64, minor: i64) -> i64 {
    if minor == 0 {
        return 0;
    }
    let (i, major, minor) = (i128::from(i), i128::from(major), i128::from(minor));
    ((2 * minor * i + 3 * major - 1) / (2 * major) - 1) as i64
}

/// Cells visited by a Bresenham walk from `(x0, y0)` to `(x1, y1)`, endpoints included.
pub fn line_points(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
    let mut points = Vec::new();
    // every visited cell lies between the endpoints, so it fits in i32
    walk(x0, y0, x1, y1, Window::UNBOUNDED, |x, y| {
        points.push(Point::new(x as i32, y as i32))
    });
    points
}

/// `line_points` restricted to the inclusive rectangle `min..=max`, in walk order.
pub fn line_points_within(x0: i32, y0: i32, x1: i32, y1: i32, min: Point, max: Point) -> Vec<Point> {
    let window = Window {
        min_x: min.x.into(),
        min_y: min.y.into(),
        max_x: max.x.into(),
        max_y: max.y.into(),
    };
    let mut points = Vec::new();
    walk(x0, y0, x1, y1, window, |x, y| points.push(Point::new(x as i32, y as i32)));
    points
}

pub fn draw_line(grid: &CanvasGrid, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> CanvasGrid {
    let mut next = grid.clone();
    walk(x0, y0, x1, y1, Window::of(grid), |x, y| next.put_pixel_wide(x, y, color));
    next
}
