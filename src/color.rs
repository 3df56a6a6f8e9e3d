use crate::error::EditorError;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TRANSPARENT: &str = "transparent";

/// A single cell value: either nothing, or an opaque sRGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    #[default]
    Transparent,
    Rgb(u8, u8, u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in whole degrees `[0, 360)`, saturation and value in whole percent.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Hsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub fn is_transparent(&self) -> bool {
        matches!(self, Color::Transparent)
    }

    pub fn from_hex(s: &str) -> Option<Color> {
        if s.eq_ignore_ascii_case(TRANSPARENT) {
            return Some(Color::Transparent);
        }
        hex_to_rgb(s).map(Color::from)
    }

    pub fn to_hex(&self) -> String {
        match self {
            Color::Transparent => TRANSPARENT.to_string(),
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        }
    }

    /// Transparent reads as black here, which is what color sliders show for it.
    pub fn to_rgb(&self) -> Rgb {
        match *self {
            Color::Transparent => Rgb::default(),
            Color::Rgb(r, g, b) => Rgb { r, g, b },
        }
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        match *self {
            Color::Transparent => [0, 0, 0, 0],
            Color::Rgb(r, g, b) => [r, g, b, 255],
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s).ok_or_else(|| EditorError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = EditorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Accepts `"transparent"` or `#` followed by exactly six hex digits, in any case.
pub fn is_valid_hex(s: &str) -> bool {
    s.eq_ignore_ascii_case(TRANSPARENT) || hex_to_rgb(s).is_some()
}

pub fn hex_to_rgb(s: &str) -> Option<Rgb> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    Color::from(rgb).to_hex()
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }
    let h = (h.round() as u16) % 360;
    let s = if max == 0.0 { 0.0 } else { delta / max * 100.0 };
    let v = max * 100.0;

    Hsv {
        h,
        s: s.round() as u8,
        v: v.round() as u8,
    }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = (hsv.h % 360) as f64;
    let s = hsv.s.min(100) as f64 / 100.0;
    let v = hsv.v.min(100) as f64 / 100.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |channel: f64| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;

    Rgb {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
    }
}

pub fn hex_to_hsv(s: &str) -> Option<Hsv> {
    hex_to_rgb(s).map(rgb_to_hsv)
}

pub fn hsv_to_hex(hsv: Hsv) -> String {
    rgb_to_hex(hsv_to_rgb(hsv))
}

/// Rotates the hue by `degrees` (negative values wrap). Transparent stays transparent.
pub fn shift_hue(color: Color, degrees: i32) -> Color {
    if color.is_transparent() {
        return color;
    }
    let mut hsv = rgb_to_hsv(color.to_rgb());
    hsv.h = (hsv.h as i32 + degrees).rem_euclid(360) as u16;
    Color::from(hsv_to_rgb(hsv))
}

pub fn random_from_set<R: Rng + ?Sized>(colors: &[Color], rng: &mut R) -> Option<Color> {
    colors.choose(rng).copied()
}
