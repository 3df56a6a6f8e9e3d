use crate::grid::CanvasGrid;

/// Quarter turn clockwise. The result is `height x width`.
pub fn rotate_clockwise(grid: &CanvasGrid) -> CanvasGrid {
    let (w, h) = grid.dimensions();
    let mut next = CanvasGrid::new(h, w);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let color = grid.get_or_transparent(x, y);
            next.put_pixel(h as i32 - 1 - y, x, color);
        }
    }
    next
}

pub fn flip_horizontal(grid: &CanvasGrid) -> CanvasGrid {
    let w = grid.width() as i32;
    let mut next = grid.clone();
    for y in 0..grid.height() as i32 {
        for x in 0..w {
            next.put_pixel(w - 1 - x, y, grid.get_or_transparent(x, y));
        }
    }
    next
}

pub fn flip_vertical(grid: &CanvasGrid) -> CanvasGrid {
    let h = grid.height() as i32;
    let mut next = grid.clone();
    for y in 0..h {
        for x in 0..grid.width() as i32 {
            next.put_pixel(x, h - 1 - y, grid.get_or_transparent(x, y));
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn sample() -> CanvasGrid {
        // 3 wide, 2 tall, every cell distinct
        let mut rows = Vec::new();
        for y in 0..2u8 {
            rows.push((0..3u8).map(|x| Color::Rgb(x, y, 0)).collect());
        }
        CanvasGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn rotation_swaps_dimensions_and_maps_cells() {
        let grid = sample();
        let rotated = rotate_clockwise(&grid);
        assert_eq!(rotated.dimensions(), (2, 3));
        // new[x][h-1-y] = old[y][x]
        assert_eq!(rotated.get(1, 0), grid.get(0, 0));
        assert_eq!(rotated.get(0, 0), grid.get(0, 1));
        assert_eq!(rotated.get(0, 2), grid.get(2, 1));
    }

    #[test]
    fn four_rotations_restore_the_grid() {
        let grid = sample();
        let mut out = grid.clone();
        for _ in 0..4 {
            out = rotate_clockwise(&out);
        }
        assert_eq!(out, grid);
    }

    #[test]
    fn flips_are_involutions() {
        let grid = sample();
        assert_ne!(flip_horizontal(&grid), grid);
        assert_eq!(flip_horizontal(&flip_horizontal(&grid)), grid);
        assert_eq!(flip_vertical(&flip_vertical(&grid)), grid);
        assert_eq!(flip_horizontal(&grid).get(0, 0), grid.get(2, 0));
        assert_eq!(flip_vertical(&grid).get(0, 0), grid.get(0, 1));
    }
}
