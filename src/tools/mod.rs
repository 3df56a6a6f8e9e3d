pub mod base;
pub mod ellipse;
pub mod fill;
pub mod line;
pub mod rect;
pub mod selection;
pub mod transform;

// Re-export the primitives so callers can `use crate::tools::draw_line`
pub use base::{PointerPhase, Tool, ToolInput};
pub use ellipse::draw_circle;
pub use fill::{flood_fill, global_fill};
pub use line::{draw_line, line_points, line_points_within};
pub use rect::draw_rectangle;
pub use selection::{
    clear_selection, extract_selection, is_point_in_polygon, paste_pixels, Selection,
    SelectionBounds,
};
pub use transform::{flip_horizontal, flip_vertical, rotate_clockwise};
