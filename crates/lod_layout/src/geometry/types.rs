use crate::constants::LEVEL_COUNT;
use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;

/// Grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId {
    pub col: usize,
    pub row: usize,
}

impl CellId {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Detail level of an item. Footprint grows with the level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum DetailLevel {
    Icon,     // 1x1
    Compact,  // 2x1
    Detailed, // 2x2
}

impl DetailLevel {
    pub const MAX: DetailLevel = DetailLevel::Detailed;

    pub fn index(self) -> u8 {
        match self {
            DetailLevel::Icon => 0,
            DetailLevel::Compact => 1,
            DetailLevel::Detailed => 2,
        }
    }

    /// Footprint (width, height) in cells
    pub fn footprint(self) -> (usize, usize) {
        match self {
            DetailLevel::Icon => (1, 1),
            DetailLevel::Compact => (2, 1),
            DetailLevel::Detailed => (2, 2),
        }
    }

    pub fn cell_count(self) -> usize {
        let (w, h) = self.footprint();
        w * h
    }

    /// One level lower, `None` at level 0
    pub fn lower(self) -> Option<Self> {
        match self {
            DetailLevel::Icon => None,
            DetailLevel::Compact => Some(DetailLevel::Icon),
            DetailLevel::Detailed => Some(DetailLevel::Compact),
        }
    }
}

impl TryFrom<u8> for DetailLevel {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(DetailLevel::Icon),
            1 => Ok(DetailLevel::Compact),
            2 => Ok(DetailLevel::Detailed),
            other => Err(LayoutError::InvalidLayout {
                message: format!("detail level must be below {LEVEL_COUNT}, got {other}"),
            }),
        }
    }
}

impl From<DetailLevel> for u8 {
    fn from(level: DetailLevel) -> Self {
        level.index()
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Layout grid. Pixel coordinates map to cells by integer division with `block_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
    pub block_size: u32,
}

impl Grid {
    pub fn new(columns: usize, rows: usize, block_size: u32) -> Result<Self> {
        if columns == 0 || rows == 0 || block_size == 0 {
            return Err(LayoutError::InvalidScene {
                message: format!(
                    "grid dimensions must be positive, got {columns}x{rows} \
                     with block size {block_size}"
                ),
            });
        }
        Ok(Self {
            columns,
            rows,
            block_size,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    pub fn width_px(&self) -> f64 {
        self.columns as f64 * self.block_size as f64
    }

    pub fn height_px(&self) -> f64 {
        self.rows as f64 * self.block_size as f64
    }

    /// Signed cell coordinates for a pixel position (may lie outside the grid)
    pub fn cell_of_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let b = self.block_size as f64;
        ((x / b).floor() as i64, (y / b).floor() as i64)
    }

    pub fn cell_at(&self, col: i64, row: i64) -> Option<CellId> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.columns && row < self.rows).then_some(CellId::new(col, row))
    }

    /// Row-major index used by occupancy counters
    pub fn index(&self, cell: CellId) -> usize {
        cell.row * self.columns + cell.col
    }

    /// Pixel rectangle (x, y, w, h) of a single cell
    pub fn cell_rect_px(&self, cell: CellId) -> (f64, f64, f64, f64) {
        let b = self.block_size as f64;
        (cell.col as f64 * b, cell.row as f64 * b, b, b)
    }
}

/// Axis-aligned pixel region of a fixed UI element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub pos: [f64; 2],
    pub size: [f64; 2],
}

impl PixelBox {
    pub fn area(&self) -> f64 {
        self.size[0] * self.size[1]
    }

    pub fn center(&self) -> (f64, f64) {
        (
            self.pos[0] + self.size[0] / 2.0,
            self.pos[1] + self.size[1] / 2.0,
        )
    }
}

/// Circular exclusion zone (ROI) in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionCircle {
    pub center: [f64; 2],
    pub radius: f64,
}

impl ExclusionCircle {
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    pub fn overlaps_cell(&self, grid: &Grid, cell: CellId) -> bool {
        let (x, y, w, h) = grid.cell_rect_px(cell);
        super::predicates::circle_rectangle_overlap(
            self.center[0],
            self.center[1],
            self.radius,
            x,
            y,
            w,
            h,
        )
    }
}

/// Cells covered by an item at `level` anchored at its top-left cell `origin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub origin: CellId,
    pub level: DetailLevel,
}

impl Footprint {
    pub fn new(origin: CellId, level: DetailLevel) -> Self {
        Self { origin, level }
    }

    pub fn fits(&self, grid: &Grid) -> bool {
        let (w, h) = self.level.footprint();
        self.origin.col + w <= grid.columns && self.origin.row + h <= grid.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        let (w, h) = self.level.footprint();
        let (c0, r0) = (self.origin.col, self.origin.row);
        itertools::iproduct!(r0..r0 + h, c0..c0 + w).map(|(row, col)| CellId::new(col, row))
    }

    /// Footprint centre in cell units
    pub fn center(&self) -> (f64, f64) {
        let (w, h) = self.level.footprint();
        (
            self.origin.col as f64 + w as f64 / 2.0,
            self.origin.row as f64 + h as f64 / 2.0,
        )
    }
}
