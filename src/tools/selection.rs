use crate::color::Color;
use crate::grid::{clip_span, CanvasGrid, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

impl SelectionBounds {
    /// Box spanning two corners, both inclusive.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let span = |a: i32, b: i32| (i64::from(a) - i64::from(b)).unsigned_abs() as usize + 1;
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: span(a.x, b.x),
            height: span(a.y, b.y),
        }
    }

    /// Bounding box of a lasso outline.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Self::from_corners(min, max))
    }

    pub fn contains(&self, p: Point) -> bool {
        let within = |p: i32, start: i32, len: usize| {
            u64::try_from(i64::from(p) - i64::from(start)).is_ok_and(|d| d < len as u64)
        };
        within(p.x, self.x, self.width) && within(p.y, self.y, self.height)
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct Selection {
    pub active: bool,
    pub points: Vec<Point>,
    pub bounds: Option<SelectionBounds>,
    pub pixels: Option<CanvasGrid>,
}

impl Selection {
    pub fn rect(bounds: SelectionBounds) -> Self {
        Self {
            active: true,
            points: Vec::new(),
            bounds: Some(bounds),
            pixels: None,
        }
    }

    pub fn lasso(points: Vec<Point>) -> Self {
        let bounds = SelectionBounds::enclosing(&points);
        Self {
            active: bounds.is_some(),
            points,
            bounds,
            pixels: None,
        }
    }

    pub fn is_lasso(&self) -> bool {
        self.points.len() > 2
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Copies the selected cells out of `grid`. Lasso selections blank out cells
    /// whose position falls outside the outline.
    pub fn capture(&self, grid: &CanvasGrid) -> Option<CanvasGrid> {
        let b = self.bounds.filter(|_| self.active)?;
        let mut pixels = extract_selection(grid, b.x, b.y, b.width, b.height);
        if self.is_lasso() {
            let (left, top) = (i64::from(b.x), i64::from(b.y));
            for y in 0..b.height as i64 {
                for x in 0..b.width as i64 {
                    if !polygon_contains((left + x) as f64, (top + y) as f64, &self.points) {
                        pixels.put_pixel_wide(x, y, Color::Transparent);
                    }
                }
            }
        }
        Some(pixels)
    }

    /// Clears the selected cells from `grid`, honouring the lasso outline.
    pub fn erase_from(&self, grid: &CanvasGrid) -> CanvasGrid {
        let Some(b) = self.bounds.filter(|_| self.active) else {
            return grid.clone();
        };
        if !self.is_lasso() {
            return clear_selection(grid, b.x, b.y, b.width, b.height);
        }
        let mut next = grid.clone();
        for y in clip_span(b.y.into(), b.height, grid.height()) {
            for x in clip_span(b.x.into(), b.width, grid.width()) {
                if polygon_contains(x as f64, y as f64, &self.points) {
                    next.put_pixel_wide(x, y, Color::Transparent);
                }
            }
        }
        next
    }
}

/// Copies a `width x height` window starting at `(x, y)`. Cells outside the source
/// come back transparent.
pub fn extract_selection(grid: &CanvasGrid, x: i32, y: i32, width: usize, height: usize) -> CanvasGrid {
    let mut out = CanvasGrid::new(width, height);
    let (x, y) = (i64::from(x), i64::from(y));
    for sy in clip_span(y, height, grid.height()) {
        for sx in clip_span(x, width, grid.width()) {
            if let Some(color) = grid.get_wide(sx, sy) {
                out.put_pixel_wide(sx - x, sy - y, color);
            }
        }
    }
    out
}

/// Overlays `pixels` at `(x, y)`. Transparent source cells leave the destination as is.
pub fn paste_pixels(grid: &CanvasGrid, pixels: &CanvasGrid, x: i32, y: i32) -> CanvasGrid {
    let mut next = grid.clone();
    let (x, y) = (i64::from(x), i64::from(y));
    for ty in clip_span(y, pixels.height(), grid.height()) {
        for tx in clip_span(x, pixels.width(), grid.width()) {
            match pixels.get_wide(tx - x, ty - y) {
                Some(color) if !color.is_transparent() => next.put_pixel_wide(tx, ty, color),
                _ => {}
            }
        }
    }
    next
}

pub fn clear_selection(grid: &CanvasGrid, x: i32, y: i32, width: usize, height: usize) -> CanvasGrid {
    let mut next = grid.clone();
    for cy in clip_span(y.into(), height, grid.height()) {
        for cx in clip_span(x.into(), width, grid.width()) {
            next.put_pixel_wide(cx, cy, Color::Transparent);
        }
    }
    next
}

/// Even-odd ray casting.
pub fn is_point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    polygon_contains(p.x.into(), p.y.into(), polygon)
}

fn polygon_contains(px: f64, py: f64, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].x as f64, polygon[i].y as f64);
        let (xj, yj) = (polygon[j].x as f64, polygon[j].y as f64);
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}
