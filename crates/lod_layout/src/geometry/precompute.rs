use super::obstacles::ExclusionMap;
use super::types::{CellId, DetailLevel, Footprint, Grid};
use crate::scene::Scene;
use itertools::iproduct;

/// Preprocessing output shared by every placement attempt of a run:
/// cells blocked by the ROI and the feasible anchor cells per detail level.
#[derive(Debug, Clone)]
pub struct Precompute {
    pub grid: Grid,
    pub exclusion: ExclusionMap,
    roi_blocked: Vec<bool>, // row-major, grid.index(cell)
    anchors: [Vec<CellId>; 3],
}

impl Precompute {
    pub fn build(scene: &Scene) -> Self {
        let grid = scene.grid;
        let exclusion = scene.exclusion_map();

        let roi_blocked: Vec<bool> = iproduct!(0..grid.rows, 0..grid.columns)
            .map(|(row, col)| scene.roi.overlaps_cell(&grid, CellId::new(col, row)))
            .collect();

        let mut pre = Self {
            grid,
            exclusion,
            roi_blocked,
            anchors: [Vec::new(), Vec::new(), Vec::new()],
        };
        pre.anchors = [
            DetailLevel::Icon,
            DetailLevel::Compact,
            DetailLevel::Detailed,
        ]
        .map(|level| pre.collect_anchors(level));

        log::debug!(
            "precompute: {} ROI-blocked cells, anchors per level = [{}, {}, {}]",
            pre.roi_blocked.iter().filter(|b| **b).count(),
            pre.anchors[0].len(),
            pre.anchors[1].len(),
            pre.anchors[2].len()
        );
        pre
    }

    fn collect_anchors(&self, level: DetailLevel) -> Vec<CellId> {
        iproduct!(0..self.grid.rows, 0..self.grid.columns)
            .map(|(row, col)| Footprint::new(CellId::new(col, row), level))
            .filter(|fp| self.is_allowed(fp))
            .map(|fp| fp.origin)
            .collect()
    }

    /// Feasible top-left cells for `level`, row-major order
    pub fn anchors(&self, level: DetailLevel) -> &[CellId] {
        &self.anchors[level.index() as usize]
    }

    pub fn is_roi_blocked(&self, cell: CellId) -> bool {
        self.roi_blocked[self.grid.index(cell)]
    }

    /// Bounds, obstacle exclusion for the footprint's level, and ROI, checked per cell
    pub fn is_allowed(&self, fp: &Footprint) -> bool {
        fp.fits(&self.grid)
            && fp
                .cells()
                .all(|c| !self.exclusion.is_excluded(fp.level, c) && !self.is_roi_blocked(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::fixtures::abc_scene;

    #[test]
    fn test_roi_blocks_expected_cells() {
        let pre = Precompute::build(&abc_scene(60.0));
        let blocked: usize = iproduct!(0..6, 0..8)
            .filter(|&(r, c)| pre.is_roi_blocked(CellId::new(c, r)))
            .count();
        // cols 2..=5 on rows 2..=3, plus (3,1), (4,1), (3,4), (4,4)
        assert_eq!(blocked, 12);
        assert!(pre.is_roi_blocked(CellId::new(4, 4)));
        assert!(!pre.is_roi_blocked(CellId::new(2, 1)));
    }

    #[test]
    fn test_anchors_respect_every_constraint() {
        let pre = Precompute::build(&abc_scene(60.0));
        for level in [DetailLevel::Icon, DetailLevel::Compact, DetailLevel::Detailed] {
            assert!(!pre.anchors(level).is_empty());
            for &origin in pre.anchors(level) {
                let fp = Footprint::new(origin, level);
                assert!(fp.fits(&pre.grid));
                for cell in fp.cells() {
                    assert!(!pre.exclusion.is_excluded(level, cell));
                    assert!(!pre.is_roi_blocked(cell));
                }
            }
        }
        // the 2x2 panel area is never an anchor
        assert!(!pre.anchors(DetailLevel::Icon).contains(&CellId::new(1, 1)));
        // (0,2) is the closest detailed slot below the panel
        assert!(pre.anchors(DetailLevel::Detailed).contains(&CellId::new(0, 2)));
        assert!(!pre.anchors(DetailLevel::Detailed).contains(&CellId::new(2, 0)));
    }

    #[test]
    fn test_roi_covering_grid_leaves_no_anchor() {
        let pre = Precompute::build(&abc_scene(250.0));
        assert!(pre.anchors(DetailLevel::Icon).is_empty());
        assert!(pre.anchors(DetailLevel::Detailed).is_empty());
    }
}
