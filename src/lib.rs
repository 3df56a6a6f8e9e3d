//! Core of a grid-based pixel-art editor: raster primitives, layers with blend modes,
//! palettes, bounded undo history and PNG export. Rendering and input plumbing belong
//! to the host; it feeds pointer and key events into [`Editor`] and paints
//! [`RenderSurface`] frames.

pub mod blend;
pub mod color;
pub mod commands;
pub mod config;
pub mod dither;
pub mod document;
pub mod error;
pub mod grid;
pub mod history;
pub mod image_store;
pub mod layers;
pub mod palette;
pub mod state;
pub mod tools;

pub use color::Color;
pub use config::EditorConfig;
pub use document::{DirectoryStore, Document, DocumentStore, MemoryStore};
pub use error::{EditorError, Result};
pub use grid::{CanvasGrid, Point};
pub use layers::{Layer, LayerId, LayerStack};
pub use state::{Editor, RenderSurface};
