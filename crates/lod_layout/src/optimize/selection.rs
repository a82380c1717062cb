use crate::error::Result;
use crate::geometry::DetailLevel;
use crate::optimize::objective::selection_value;
use crate::optimize::search::{Deadline, SearchStats};
use crate::optimize::{SelectedItem, Selection, SolveOptions};
use crate::scene::Scene;

/// Levels tried per item, most valuable first
const LEVELS_DESC: [DetailLevel; 3] = [
    DetailLevel::Detailed,
    DetailLevel::Compact,
    DetailLevel::Icon,
];

/// Result of the selection stage
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub selection: Selection,
    pub objective: f64,
    /// Area budget in cells the selection had to fit
    pub budget: usize,
}

/// Number of cells the selected footprints may use in total:
///
/// `floor((W·H − (apps + questions + π·r²)) · bias / block²)`
/// with `bias = 1 − 2r/W` (clamped to `[0, 1]`), or 1 when `area_bias` is off.
/// A negative free area yields a zero budget.
pub fn area_budget(scene: &Scene, area_bias: bool) -> usize {
    let grid = &scene.grid;
    let total_px = grid.width_px() * grid.height_px();
    let blocked_px = scene.apps_button.area() + scene.questions_panel.area() + scene.roi.area();
    let free_px = (total_px - blocked_px).max(0.0);

    let bias = if area_bias {
        (1.0 - 2.0 * scene.roi.radius / grid.width_px()).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let block_area = grid.block_size as f64 * grid.block_size as f64;
    (free_px * bias / block_area).floor() as usize
}

/// Chooses which items to show and at which level.
///
/// Exhaustive depth-first search with a relevance bound over
/// (item × {level 2, 1, 0, skip}), limited to `max_items` items and the area
/// budget. Items with zero relevance add nothing and are never selected.
/// An empty selection is a valid result when nothing fits.
pub fn select_items(scene: &Scene, opts: &SolveOptions) -> Result<SelectionResult> {
    let budget = area_budget(scene, opts.area_bias);

    let mut candidates: Vec<(&str, f64)> = scene
        .items()
        .iter()
        .filter(|item| item.relevance > 0.0)
        .map(|item| (item.name.as_str(), item.relevance))
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut search = SelectionSearch {
        top_values: candidates
            .iter()
            .map(|&(_, r)| selection_value(r, DetailLevel::MAX, opts.level_bonus))
            .collect(),
        candidates: &candidates,
        budget,
        max_items: opts.max_items,
        level_bonus: opts.level_bonus,
        deadline: Deadline::start("selection", opts.timeout),
        chosen: vec![None; candidates.len()],
        best_value: 0.0,
        best: vec![None; candidates.len()],
        stats: SearchStats::default(),
    };
    search.explore(0, 0, 0, 0.0)?;

    let entries = candidates
        .iter()
        .zip(&search.best)
        .filter_map(|(&(name, relevance), level)| {
            level.map(|level| SelectedItem {
                name: name.to_string(),
                relevance,
                level,
            })
        })
        .collect();
    let selection = Selection::new(entries)?;

    log::debug!(
        "selection search: {} nodes, {} pruned, {:?} elapsed",
        search.stats.nodes,
        search.stats.pruned,
        search.deadline.elapsed()
    );
    if selection.is_empty() {
        log::info!("selection: nothing fits the area budget of {budget} cells");
    } else {
        log::info!(
            "selection: {} items, {} of {} cells, objective {:.4}",
            selection.len(),
            selection.cell_count(),
            budget,
            search.best_value
        );
    }

    Ok(SelectionResult {
        selection,
        objective: search.best_value,
        budget,
    })
}

struct SelectionSearch<'a> {
    candidates: &'a [(&'a str, f64)], // descending relevance
    top_values: Vec<f64>,             // value of each candidate at the highest level
    budget: usize,
    max_items: usize,
    level_bonus: f64,
    deadline: Deadline,
    chosen: Vec<Option<DetailLevel>>,
    best_value: f64,
    best: Vec<Option<DetailLevel>>,
    stats: SearchStats,
}

impl SelectionSearch<'_> {
    fn explore(&mut self, i: usize, count: usize, cells: usize, value: f64) -> Result<()> {
        self.stats.nodes += 1;
        self.deadline.check()?;

        if value > self.best_value {
            self.best_value = value;
            self.best.clone_from(&self.chosen);
        }
        if i == self.candidates.len() || count == self.max_items {
            return Ok(());
        }

        // candidates are sorted, so the next free slots hold the best remaining values
        let slots = (self.max_items - count).min(self.candidates.len() - i);
        let bound = value + self.top_values[i..i + slots].iter().sum::<f64>();
        if bound <= self.best_value {
            self.stats.pruned += 1;
            return Ok(());
        }

        let relevance = self.candidates[i].1;
        for level in LEVELS_DESC {
            let used = cells + level.cell_count();
            if used > self.budget {
                continue;
            }
            self.chosen[i] = Some(level);
            let gain = selection_value(relevance, level, self.level_bonus);
            self.explore(i + 1, count + 1, used, value + gain)?;
            self.chosen[i] = None;
        }
        self.explore(i + 1, count, cells, value)
    }
}
