/// Circle–rectangle overlap test.
///
/// The rectangle's closest point to the circle centre is found by clamping the
/// centre into `[rx, rx + w] x [ry, ry + h]`. The shapes overlap iff the squared
/// distance to that point is at most `r²`, so touching boundaries count.
pub fn circle_rectangle_overlap(
    cx: f64,
    cy: f64,
    r: f64,
    rx: f64,
    ry: f64,
    w: f64,
    h: f64,
) -> bool {
    let closest_x = cx.clamp(rx, rx + w);
    let closest_y = cy.clamp(ry, ry + h);
    let dx = cx - closest_x;
    let dy = cy - closest_y;
    dx * dx + dy * dy <= r * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_inside_rectangle() {
        assert!(circle_rectangle_overlap(5.0, 5.0, 1.0, 0.0, 0.0, 10.0, 10.0));
        // zero radius still overlaps when the centre lies inside
        assert!(circle_rectangle_overlap(5.0, 5.0, 0.0, 0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_touching_edge_counts_as_overlap() {
        // distance to the left edge is exactly r
        assert!(circle_rectangle_overlap(-2.0, 5.0, 2.0, 0.0, 0.0, 10.0, 10.0));
        assert!(!circle_rectangle_overlap(-2.5, 5.0, 2.0, 0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_corner_distance() {
        // corner at (0, 0), centre at (-3, -4): distance 5
        assert!(circle_rectangle_overlap(-3.0, -4.0, 5.0, 0.0, 0.0, 1.0, 1.0));
        assert!(!circle_rectangle_overlap(-3.0, -4.0, 4.99, 0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_grid_cells_around_roi() {
        // 50px cells, ROI at (200, 150) r=60
        let hit = |col: f64, row: f64| {
            circle_rectangle_overlap(200.0, 150.0, 60.0, col * 50.0, row * 50.0, 50.0, 50.0)
        };
        assert!(hit(3.0, 2.0));
        assert!(hit(2.0, 3.0)); // dx = 50
        assert!(hit(4.0, 1.0)); // dy = 50
        assert!(!hit(2.0, 1.0)); // diagonal, 50² + 50² > 60²
        assert!(!hit(6.0, 3.0));
    }
}
