use crate::color::Color;
use crate::grid::CanvasGrid;

/// 4-connected flood fill from `(x, y)`.
///
/// Cells are repainted as soon as they are popped, so a repainted cell never matches
/// the target again and cycles terminate.
pub fn flood_fill(grid: &CanvasGrid, x: i32, y: i32, new_color: Color) -> CanvasGrid {
    let target = match grid.get(x, y) {
        Some(c) if c != new_color => c,
        _ => return grid.clone(),
    };

    let mut next = grid.clone();
    let mut stack = vec![(x, y)];
    while let Some((px, py)) = stack.pop() {
        if next.get(px, py) != Some(target) {
            continue;
        }
        next.put_pixel(px, py, new_color);

        for (nx, ny) in [(px + 1, py), (px - 1, py), (px, py + 1), (px, py - 1)] {
            if next.get(nx, ny) == Some(target) {
                stack.push((nx, ny));
            }
        }
    }
    next
}

/// Repaints every cell equal to `target`, connected or not.
pub fn global_fill(grid: &CanvasGrid, target: Color, new_color: Color) -> CanvasGrid {
    if target == new_color {
        return grid.clone();
    }
    grid.map_cells(|c| if c == target { new_color } else { c })
}
