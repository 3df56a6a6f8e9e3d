use crate::color::Color;
use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Integer grid coordinate. May lie outside the grid while a pointer is dragged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangular raster of cells addressed as `grid[y][x]`.
///
/// Primitives never mutate a grid they are handed; they clone and return a new one.
/// Serializes as an array of rows.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Color>>", into = "Vec<Vec<Color>>")]
pub struct CanvasGrid {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl CanvasGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::Transparent)
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            cells: vec![color; width * height],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(EditorError::RaggedGrid {
                    row,
                    expected: width,
                    found: cols.len(),
                });
            }
            cells.extend(cols);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        self.rows().map(<[Color]>::to_vec).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x.into(), y.into()).is_some()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.get_wide(x.into(), y.into())
    }

    /// `get` for offsets computed past the `i32` range.
    pub(crate) fn get_wide(&self, x: i64, y: i64) -> Option<Color> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Like `get`, but reads outside the grid as transparent.
    pub fn get_or_transparent(&self, x: i32, y: i32) -> Color {
        self.get(x, y).unwrap_or(Color::Transparent)
    }

    /// Bounds-checked write used by the primitives on their own working copy.
    pub(crate) fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.put_pixel_wide(x.into(), y.into(), color);
    }

    pub(crate) fn put_pixel_wide(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = color;
        }
    }

    pub fn row(&self, y: usize) -> Option<&[Color]> {
        if y < self.height {
            Some(&self.cells[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // chunks_exact panics on zero, and a zero-width grid has no cells anyway
        self.cells
            .chunks_exact(self.width.max(1))
            .take(if self.width == 0 { 0 } else { self.height })
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Color::is_transparent)
    }

    pub fn with_pixel(&self, x: i32, y: i32, color: Color) -> CanvasGrid {
        let mut next = self.clone();
        next.put_pixel(x, y, color);
        next
    }

    pub(crate) fn map_cells(&self, f: impl Fn(Color) -> Color) -> CanvasGrid {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|&c| f(c)).collect(),
        }
    }
}

impl TryFrom<Vec<Vec<Color>>> for CanvasGrid {
    type Error = EditorError;

    fn try_from(rows: Vec<Vec<Color>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<CanvasGrid> for Vec<Vec<Color>> {
    fn from(grid: CanvasGrid) -> Self {
        grid.to_rows()
    }
}

/// Square stamp of `size` cells centred on `(x, y)`; size 1 is a single pixel.
pub fn stamp(grid: &CanvasGrid, x: i32, y: i32, size: u32, color: Color) -> CanvasGrid {
    let mut next = grid.clone();
    stamp_in_place(&mut next, x, y, size, color);
    next
}

pub(crate) fn stamp_in_place(grid: &mut CanvasGrid, x: i32, y: i32, size: u32, color: Color) {
    for p in stamp_cells(grid, x, y, size) {
        grid.put_pixel(p.x, p.y, color);
    }
}

/// Cells of `grid` covered by a square brush of `size` centred on `(x, y)`.
pub fn stamp_cells(grid: &CanvasGrid, x: i32, y: i32, size: u32) -> impl Iterator<Item = Point> {
    let size = size.max(1) as usize;
    let offset = ((size - 1) / 2) as i64;
    let cols = clip_span(i64::from(x) - offset, size, grid.width());
    let rows = clip_span(i64::from(y) - offset, size, grid.height());
    // clipped to the grid, so every cell fits in i32
    rows.flat_map(move |cy| cols.clone().map(move |cx| Point::new(cx as i32, cy as i32)))
}

/// The part of `start..start + len` that falls inside `0..limit`.
pub(crate) fn clip_span(start: i64, len: usize, limit: usize) -> Range<i64> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    start.max(0)..start.saturating_add(len).min(limit)
}
