pub mod joint;
pub mod objective;
pub mod placement;
pub mod refinement;
pub mod search;
pub mod selection;
pub mod verify;

use crate::config::{Config, ObjectiveKind, SolveMode};
use crate::constants::{
    DEFAULT_LAMBDA, DEFAULT_LEVEL_BONUS, DEFAULT_TIMEOUT_MS, MAX_SELECTED_ITEMS,
};
use crate::error::{LayoutError, Result};
use crate::geometry::{CellId, DetailLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use joint::place_jointly;
pub use placement::{PlacementOutcome, place_items};
pub use refinement::{AttemptRecord, LayoutReport, LayoutStatus, optimize_layout, refine};
pub use selection::{SelectionResult, area_budget, select_items};
pub use verify::check_layout;

/// Solver settings for one run
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub mode: SolveMode,
    pub objective: ObjectiveKind,
    pub timeout: Duration, // per search
    pub max_items: usize,
    pub lambda: f64,
    pub level_bonus: f64,
    pub area_bias: bool,
    pub parallel: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            mode: SolveMode::TwoStage,
            objective: ObjectiveKind::InteractionCost,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_items: MAX_SELECTED_ITEMS,
            lambda: DEFAULT_LAMBDA,
            level_bonus: DEFAULT_LEVEL_BONUS,
            area_bias: true,
            parallel: true,
        }
    }
}

impl SolveOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        let solver = &config.solver;
        Ok(Self {
            mode: solver.solve_mode()?,
            objective: solver.objective_kind()?,
            timeout: Duration::from_millis(solver.timeout_ms),
            max_items: solver.max_items.min(MAX_SELECTED_ITEMS),
            lambda: solver.lambda,
            level_bonus: solver.level_bonus,
            area_bias: solver.area_bias,
            parallel: solver.parallel,
        })
    }
}

/// One chosen item and its detail level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub name: String,
    pub relevance: f64,
    pub level: DetailLevel,
}

/// Level change applied by the refinement loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    pub item: String,
    pub from: DetailLevel,
    pub to: DetailLevel,
}

/// Items chosen to appear, each at exactly one level. At most
/// `MAX_SELECTED_ITEMS` entries, sorted by name, names unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    entries: Vec<SelectedItem>,
}

impl Selection {
    pub fn new(mut entries: Vec<SelectedItem>) -> Result<Self> {
        if entries.len() > MAX_SELECTED_ITEMS {
            return Err(LayoutError::InvalidLayout {
                message: format!(
                    "a selection holds at most {} items, got {}",
                    MAX_SELECTED_ITEMS,
                    entries.len()
                ),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(dup) = entries.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(LayoutError::InvalidLayout {
                message: format!("item '{}' selected more than once", dup[0].name),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SelectedItem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn level_of(&self, name: &str) -> Option<DetailLevel> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.level)
    }

    /// Σ levels; the refinement potential
    pub fn total_level(&self) -> u32 {
        self.entries.iter().map(|e| e.level.index() as u32).sum()
    }

    pub fn cell_count(&self) -> usize {
        self.entries.iter().map(|e| e.level.cell_count()).sum()
    }

    pub fn max_level(&self) -> Option<DetailLevel> {
        self.entries.iter().map(|e| e.level).max()
    }

    /// Lowers the least relevant item among those at the highest level by one
    /// step (ties go to the lexicographically smallest name). `None` when every
    /// item is already at level 0.
    pub fn degrade(&self) -> Option<(Selection, Degradation)> {
        let top = self.max_level()?;
        let lowered = top.lower()?;
        let victim = self
            .entries
            .iter()
            .filter(|e| e.level == top)
            .min_by(|a, b| {
                a.relevance
                    .total_cmp(&b.relevance)
                    .then_with(|| a.name.cmp(&b.name))
            })?;

        let degradation = Degradation {
            item: victim.name.clone(),
            from: top,
            to: lowered,
        };
        let entries = self
            .entries
            .iter()
            .map(|e| {
                if e.name == degradation.item {
                    SelectedItem {
                        level: lowered,
                        ..e.clone()
                    }
                } else {
                    e.clone()
                }
            })
            .collect();
        Some((Self { entries }, degradation))
    }
}

/// Selected item with its top-left anchor cell
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub name: String,
    pub relevance: f64,
    pub level: DetailLevel,
    pub origin: CellId,
}

/// Complete assignment of positions to every selected item
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub items: Vec<PlacedItem>,
    pub objective: f64,
}

impl Placement {
    pub fn to_layout(&self) -> Vec<LayoutRecord> {
        let mut records: Vec<LayoutRecord> = self
            .items
            .iter()
            .map(|p| LayoutRecord {
                name: p.name.clone(),
                level: p.level,
                position: [p.origin.col, p.origin.row],
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }
}

/// Output record handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub name: String,
    pub level: DetailLevel,
    pub position: [usize; 2], // [column, row]
}
