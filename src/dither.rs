use serde::{Deserialize, Serialize};

// Ordered Bayer matrices (values in range [0, n*n-1]).
#[rustfmt::skip]
const BAYER_2: [[u8; 2]; 2] = [
    [0, 2],
    [3, 1],
];
#[rustfmt::skip]
const BAYER_4: [[u8; 4]; 4] = [
    [ 0,  8,  2, 10],
    [12,  4, 14,  6],
    [ 3, 11,  1,  9],
    [15,  7, 13,  5],
];
#[rustfmt::skip]
const BAYER_8: [[u8; 8]; 8] = [
    [ 0, 32,  8, 40,  2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44,  4, 36, 14, 46,  6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [ 3, 35, 11, 43,  1, 33,  9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47,  7, 39, 13, 45,  5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Density used by the brush when dithering is switched on.
pub const BRUSH_DENSITY: f32 = 0.5;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DitherPattern {
    Bayer2,
    Bayer4,
    Bayer8,
}

impl DitherPattern {
    pub fn size(self) -> usize {
        match self {
            DitherPattern::Bayer2 => 2,
            DitherPattern::Bayer4 => 4,
            DitherPattern::Bayer8 => 8,
        }
    }

    fn value(self, row: usize, col: usize) -> u8 {
        match self {
            DitherPattern::Bayer2 => BAYER_2[row][col],
            DitherPattern::Bayer4 => BAYER_4[row][col],
            DitherPattern::Bayer8 => BAYER_8[row][col],
        }
    }
}

/// Threshold in `[0, 1)` for a cell. The pattern tiles the plane, negative
/// coordinates included.
pub fn bayer_threshold(x: i32, y: i32, pattern: DitherPattern) -> f32 {
    let n = pattern.size() as i32;
    let row = y.rem_euclid(n) as usize;
    let col = x.rem_euclid(n) as usize;
    pattern.value(row, col) as f32 / (n * n) as f32
}

pub fn should_draw_dithered(x: i32, y: i32, pattern: DitherPattern, density: f32) -> bool {
    bayer_threshold(x, y, pattern) < density
}
