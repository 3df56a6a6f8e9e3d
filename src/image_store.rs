use crate::error::Result;
use crate::grid::CanvasGrid;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Small RGBA preview kept alongside a saved document.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Raw RGBA bytes, one pixel per cell, for a `width x height` raster. Cells outside
/// the grid and transparent cells come out as `[0, 0, 0, 0]`.
pub fn export_rgba(grid: &CanvasGrid, width: usize, height: usize) -> Vec<u8> {
    let mut pixels: Vec<[u8; 4]> = Vec::with_capacity(width * height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            pixels.push(grid.get_or_transparent(x, y).to_rgba());
        }
    }
    bytemuck::cast_slice::<[u8; 4], u8>(&pixels).to_vec()
}

pub fn to_rgba_image(grid: &CanvasGrid) -> RgbaImage {
    ImageBuffer::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        Rgba(grid.get_or_transparent(x as i32, y as i32).to_rgba())
    })
}

/// Nearest-neighbour upscale, so each cell becomes a `scale x scale` block.
pub fn scaled(grid: &CanvasGrid, scale: u32) -> RgbaImage {
    let image = to_rgba_image(grid);
    let scale = scale.max(1);
    if scale == 1 {
        return image;
    }
    imageops::resize(
        &image,
        image.width() * scale,
        image.height() * scale,
        FilterType::Nearest,
    )
}

pub fn encode_png(grid: &CanvasGrid) -> Result<Vec<u8>> {
    encode_image(&to_rgba_image(grid))
}

pub fn encode_image(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn save_png(grid: &CanvasGrid, path: &Path, scale: u32) -> Result<()> {
    let image = scaled(grid, scale);
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("wrote {}x{} png to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// Downscales so the longest edge is at most `max_edge`; smaller grids stay 1:1.
pub fn thumbnail(grid: &CanvasGrid, max_edge: u32) -> Thumbnail {
    let image = to_rgba_image(grid);
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    let image = if longest <= max_edge || longest == 0 {
        image
    } else {
        let scale = max_edge as f32 / longest as f32;
        let nw = ((w as f32 * scale).round() as u32).max(1);
        let nh = ((h as f32 * scale).round() as u32).max(1);
        imageops::resize(&image, nw, nh, FilterType::Nearest)
    };
    Thumbnail {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    }
}
