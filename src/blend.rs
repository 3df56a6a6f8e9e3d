use crate::color::Color;
use crate::grid::CanvasGrid;
use crate::layers::Layer;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
            BlendMode::ColorDodge,
            BlendMode::ColorBurn,
            BlendMode::HardLight,
            BlendMode::SoftLight,
            BlendMode::Difference,
            BlendMode::Exclusion,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "Color Dodge",
            BlendMode::ColorBurn => "Color Burn",
            BlendMode::HardLight => "Hard Light",
            BlendMode::SoftLight => "Soft Light",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
        }
    }

    /// Mode result for one channel, `base` and `top` in `[0, 1]`.
    pub fn blend_channel(self, base: f32, top: f32) -> f32 {
        let (b, t) = (base, top);
        let m = match self {
            BlendMode::Normal => t,
            BlendMode::Multiply => b * t,
            BlendMode::Screen => b + t - b * t,
            BlendMode::Overlay => hard_light(t, b),
            BlendMode::Darken => b.min(t),
            BlendMode::Lighten => b.max(t),
            BlendMode::ColorDodge => {
                if b <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    (b / (1.0 - t)).min(1.0)
                }
            }
            BlendMode::ColorBurn => {
                if b >= 1.0 {
                    1.0
                } else if t <= 0.0 {
                    0.0
                } else {
                    1.0 - ((1.0 - b) / t).min(1.0)
                }
            }
            BlendMode::HardLight => hard_light(b, t),
            BlendMode::SoftLight => {
                if t <= 0.5 {
                    b - (1.0 - 2.0 * t) * b * (1.0 - b)
                } else {
                    let d = if b <= 0.25 {
                        ((16.0 * b - 12.0) * b + 4.0) * b
                    } else {
                        b.sqrt()
                    };
                    b + (2.0 * t - 1.0) * (d - b)
                }
            }
            BlendMode::Difference => (b - t).abs(),
            BlendMode::Exclusion => b + t - 2.0 * b * t,
        };
        m.clamp(0.0, 1.0)
    }
}

// Overlay is hard light with the operands swapped
fn hard_light(b: f32, t: f32) -> f32 {
    if t <= 0.5 {
        2.0 * b * t
    } else {
        1.0 - 2.0 * (1.0 - b) * (1.0 - t)
    }
}

/// Composites `top` over `base` with an opacity weight in `[0, 1]`.
///
/// A transparent top leaves the base alone. Over a transparent base there is nothing
/// to blend against, so the top shows as-is whenever its opacity is above zero.
pub fn blend_pixel(base: Color, top: Color, mode: BlendMode, opacity: f32) -> Color {
    let alpha = opacity.clamp(0.0, 1.0);
    if top.is_transparent() || alpha <= 0.0 {
        return base;
    }
    if base.is_transparent() {
        return top;
    }

    let b = base.to_rgb();
    let t = top.to_rgb();
    let mix = |bc: u8, tc: u8| {
        let bf = bc as f32 / 255.0;
        let tf = tc as f32 / 255.0;
        let m = mode.blend_channel(bf, tf);
        let out = bf * (1.0 - alpha) + m * alpha;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Color::Rgb(mix(b.r, t.r), mix(b.g, t.g), mix(b.b, t.b))
}

/// Composites one grid over another, cell by cell.
pub fn blend_grids(base: &CanvasGrid, top: &CanvasGrid, mode: BlendMode, opacity: f32) -> CanvasGrid {
    let mut out = base.clone();
    for y in 0..base.height() as i32 {
        for x in 0..base.width() as i32 {
            let t = top.get_or_transparent(x, y);
            if t.is_transparent() {
                continue;
            }
            out.put_pixel(x, y, blend_pixel(base.get_or_transparent(x, y), t, mode, opacity));
        }
    }
    out
}

/// Composites visible layers from the bottom of the stack (index 0) upwards.
pub fn merge_layers(layers: &[Layer], width: usize, height: usize) -> CanvasGrid {
    layers
        .iter()
        .filter(|layer| layer.visible)
        .fold(CanvasGrid::new(width, height), |acc, layer| {
            blend_grids(&acc, &layer.pixels, layer.blend_mode, layer.opacity_weight())
        })
}
