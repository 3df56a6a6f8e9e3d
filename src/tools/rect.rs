use crate::color::Color;
use crate::grid::CanvasGrid;

pub fn draw_rectangle(
    grid: &CanvasGrid,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color,
    filled: bool,
) -> CanvasGrid {
    let mut next = grid.clone();
    let (min_x, max_x) = (x0.min(x1), x0.max(x1));
    let (min_y, max_y) = (y0.min(y1), y0.max(y1));

    // Only walk the part of the box that can land on the grid
    let clip_x0 = min_x.max(0);
    let clip_x1 = max_x.min(grid.width() as i32 - 1);
    let clip_y0 = min_y.max(0);
    let clip_y1 = max_y.min(grid.height() as i32 - 1);

    for y in clip_y0..=clip_y1 {
        for x in clip_x0..=clip_x1 {
            let on_border = x == min_x || x == max_x || y == min_y || y == max_y;
            if filled || on_border {
                next.put_pixel(x, y, color);
            }
        }
    }
    next
}
