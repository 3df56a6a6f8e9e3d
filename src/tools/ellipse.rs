use crate::color::Color;
use crate::grid::{clip_span, CanvasGrid};

/// Midpoint circle. Outline mode plots the 8 symmetric octants; filled mode paints a
/// horizontal span per row. Negative radii draw nothing. Only rows and steps that can
/// reach the grid are visited, so the cost is bounded by the grid, not the radius.
pub fn draw_circle(
    grid: &CanvasGrid,
    cx: i32,
    cy: i32,
    radius: i32,
    color: Color,
    filled: bool,
) -> CanvasGrid {
    let mut next = grid.clone();
    if radius < 0 {
        return next;
    }
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
    let (width, height) = (grid.width() as i64, grid.height() as i64);

    if filled {
        for dy in (-r).max(-cy)..=r.min(height - 1 - cy) {
            let half = isqrt((r * r - dy * dy) as u128) as i64;
            let span = usize::try_from(2 * half + 1).unwrap_or(usize::MAX);
            for x in clip_span(cx - half, span, grid.width()) {
                next.put_pixel_wide(x, cy + dy, color);
            }
        }
        return next;
    }

    // step x is the offset along one axis for all 8 points it plots
    let mut steps: Vec<i64> = [(cx, width), (cy, height)]
        .into_iter()
        .flat_map(|(centre, limit)| {
            let ahead = (-centre).max(0)..=(limit - 1 - centre).min(r);
            let behind = (centre - limit + 1).max(0)..=centre.min(r);
            ahead.chain(behind)
        })
        .collect();
    steps.sort_unstable();
    steps.dedup();

    for x in steps {
        let y = octant_height(r, x);
        if x > y {
            continue;
        }
        for (px, py) in [
            (x, y),
            (y, x),
            (-x, y),
            (-y, x),
            (x, -y),
            (y, -x),
            (-x, -y),
            (-y, -x),
        ] {
            next.put_pixel_wide(cx + px, cy + py, color);
        }
    }
    next
}

/// The `y` the midpoint loop holds when it plots step `x`.
fn octant_height(r: i64, x: i64) -> i64 {
    let n = 4 * (i128::from(r) * i128::from(r) - i128::from(x) * i128::from(x));
    if n <= 0 {
        return 0;
    }
    ((isqrt((n - 1) as u128) + 1) / 2) as i64
}

fn isqrt(n: u128) -> u128 {
    let mut root = (n as f64).sqrt() as u128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Color = Color::Rgb(0, 255, 0);

    fn count(grid: &CanvasGrid) -> usize {
        grid.cells().iter().filter(|c| **c == GREEN).count()
    }

    #[test]
    fn zero_radius_is_a_dot() {
        let grid = CanvasGrid::square(3);
        assert_eq!(count(&draw_circle(&grid, 1, 1, 0, GREEN, false)), 1);
        assert_eq!(count(&draw_circle(&grid, 1, 1, 0, GREEN, true)), 1);
        assert_eq!(draw_circle(&grid, 1, 1, -2, GREEN, true), grid);
    }

    #[test]
    fn outline_radius_one_is_a_plus() {
        let grid = CanvasGrid::square(3);
        let out = draw_circle(&grid, 1, 1, 1, GREEN, false);
        assert_eq!(out.get(1, 1), Some(Color::Transparent));
        for (x, y) in [(1, 0), (0, 1), (2, 1), (1, 2)] {
            assert_eq!(out.get(x, y), Some(GREEN));
        }
    }

    #[test]
    fn outline_is_symmetric_and_hollow() {
        let grid = CanvasGrid::square(11);
        let out = draw_circle(&grid, 5, 5, 4, GREEN, false);
        assert_eq!(out.get(5, 5), Some(Color::Transparent));
        for y in 0..11 {
            for x in 0..11 {
                assert_eq!(out.get(x, y), out.get(10 - x, y));
                assert_eq!(out.get(x, y), out.get(x, 10 - y));
                assert_eq!(out.get(x, y), out.get(y, x));
            }
        }
        assert_eq!(out.get(9, 5), Some(GREEN));
    }

    #[test]
    fn filled_spans() {
        let grid = CanvasGrid::square(5);
        let out = draw_circle(&grid, 2, 2, 2, GREEN, true);
        // rows: half widths 0, 1, 2, 1, 0
        assert_eq!(count(&out), 1 + 3 + 5 + 3 + 1);
    }

    #[test]
    fn clips_off_canvas() {
        let grid = CanvasGrid::square(4);
        let out = draw_circle(&grid, 0, 0, 3, GREEN, true);
        assert!(count(&out) > 0);
        let far = draw_circle(&grid, 100, 100, 3, GREEN, false);
        assert_eq!(far, grid);
    }

    #[test]
    fn extreme_centres_and_radii_stay_cheap() {
        let grid = CanvasGrid::square(4);
        for filled in [false, true] {
            assert_eq!(draw_circle(&grid, i32::MAX, 0, 3, GREEN, filled), grid);
            assert_eq!(draw_circle(&grid, i32::MIN, i32::MIN, 3, GREEN, filled), grid);
        }
        let covered = draw_circle(&grid, 1, 1, i32::MAX, GREEN, true);
        assert_eq!(count(&covered), 16);
        // the outline of a huge circle passes far from a small grid near its centre
        assert_eq!(draw_circle(&grid, 1, 1, i32::MAX, GREEN, false), grid);
    }

    #[test]
    fn large_outline_matches_its_symmetry() {
        let grid = CanvasGrid::square(41);
        let out = draw_circle(&grid, 20, 20, 17, GREEN, false);
        for (x, y) in [(37, 20), (3, 20), (20, 37), (20, 3)] {
            assert_eq!(out.get(x, y), Some(GREEN));
        }
        for y in 0..41 {
            for x in 0..41 {
                assert_eq!(out.get(x, y), out.get(y, x));
                assert_eq!(out.get(x, y), out.get(40 - x, y));
            }
        }
    }
}
