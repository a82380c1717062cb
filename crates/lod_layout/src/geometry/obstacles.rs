use super::types::{CellId, DetailLevel, Grid};
use std::collections::BTreeSet;

/// Neighbour offsets excluded at every level (plus the obstacle cell itself)
const BASE_OFFSETS: [(i64, i64); 3] = [(0, 1), (1, 0), (1, 1)];
/// Added from level 1 upwards
const COMPACT_OFFSETS: [(i64, i64); 2] = [(-1, 0), (-1, 1)];
/// Added at level 2
const DETAILED_OFFSETS: [(i64, i64); 3] = [(-1, -1), (0, -1), (1, -1)];

/// Offsets of the exclusion ring for `level`, cumulative over lower levels
fn offsets_for_level(level: DetailLevel) -> Vec<(i64, i64)> {
    let mut offsets = vec![(0, 0)];
    offsets.extend(BASE_OFFSETS);
    if level >= DetailLevel::Compact {
        offsets.extend(COMPACT_OFFSETS);
    }
    if level >= DetailLevel::Detailed {
        offsets.extend(DETAILED_OFFSETS);
    }
    offsets
}

/// Cells an item of `level` may not occupy around one obstacle.
/// `obstacle` is the obstacle's (possibly out-of-grid) cell; offsets outside the grid are dropped.
pub fn obstacle_exclusion_cells(
    grid: &Grid,
    obstacle: (i64, i64),
    level: DetailLevel,
) -> BTreeSet<CellId> {
    offsets_for_level(level)
        .into_iter()
        .filter_map(|(dx, dy)| grid.cell_at(obstacle.0 + dx, obstacle.1 + dy))
        .collect()
}

/// Per-level union of the exclusion sets of all fixed obstacles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionMap {
    per_level: [BTreeSet<CellId>; 3],
}

impl ExclusionMap {
    pub fn build(grid: &Grid, obstacles: &[(i64, i64)]) -> Self {
        let per_level = [
            DetailLevel::Icon,
            DetailLevel::Compact,
            DetailLevel::Detailed,
        ]
        .map(|level| {
            obstacles
                .iter()
                .flat_map(|&obstacle| obstacle_exclusion_cells(grid, obstacle, level))
                .collect::<BTreeSet<_>>()
        });
        Self { per_level }
    }

    pub fn cells(&self, level: DetailLevel) -> &BTreeSet<CellId> {
        &self.per_level[level.index() as usize]
    }

    pub fn is_excluded(&self, level: DetailLevel, cell: CellId) -> bool {
        self.cells(level).contains(&cell)
    }
}
