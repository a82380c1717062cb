use crate::config::SolveMode;
use crate::error::Result;
use crate::geometry::Precompute;
use crate::optimize::joint::place_jointly;
use crate::optimize::objective::selection_value;
use crate::optimize::placement::{PlacementOutcome, place_items};
use crate::optimize::selection::select_items;
use crate::optimize::{Degradation, LayoutRecord, Placement, SelectedItem, Selection, SolveOptions};
use crate::scene::Scene;

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    /// Every selected item is placed
    Success,
    /// All items reached level 0 and placement still failed. The exact search
    /// never produces a partial assignment, so there is no layout to report;
    /// the last selection tried is kept for diagnostics.
    Exhausted,
}

/// One Placing attempt of the loop
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub iteration: usize,
    pub total_level: u32,
    pub feasible: bool,
    /// Level change applied after this attempt, if any
    pub degradation: Option<Degradation>,
}

/// Everything a caller needs to use or diagnose the result
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub status: LayoutStatus,
    /// Selection of the last attempt (the accepted one on success)
    pub selection: Selection,
    /// Present only on success
    pub placement: Option<Placement>,
    pub attempts: Vec<AttemptRecord>,
    pub selection_objective: f64,
}

impl LayoutReport {
    pub fn is_success(&self) -> bool {
        self.status == LayoutStatus::Success
    }

    /// Placed records; empty when the run is exhausted
    pub fn layout(&self) -> Vec<LayoutRecord> {
        self.placement
            .as_ref()
            .map(Placement::to_layout)
            .unwrap_or_default()
    }

    pub fn objective(&self) -> f64 {
        self.placement.as_ref().map_or(0.0, |p| p.objective)
    }
}

enum State {
    Placing(Selection),
    Degrading(Selection),
    Success(Selection, Placement),
    Exhausted(Selection),
}

/// Runs one solve in the configured mode.
///
/// Two-stage: the selection stage once, then the placement/degradation loop.
/// Single-stage: one joint search over items, levels and anchors, which
/// always succeeds (possibly with an empty layout).
pub fn optimize_layout(scene: &Scene, opts: &SolveOptions) -> Result<LayoutReport> {
    for item in scene.items() {
        log::debug!("relevance {}: {:.4}", item.name, item.relevance);
    }
    match opts.mode {
        SolveMode::TwoStage => {
            let selected = select_items(scene, opts)?;
            let mut report = refine(scene, selected.selection, opts)?;
            report.selection_objective = selected.objective;
            Ok(report)
        }
        SolveMode::SingleStage => solve_single_stage(scene, opts),
    }
}

fn solve_single_stage(scene: &Scene, opts: &SolveOptions) -> Result<LayoutReport> {
    let pre = Precompute::build(scene);
    let placement = place_jointly(scene, &pre, opts)?;
    let selection = Selection::new(
        placement
            .items
            .iter()
            .map(|p| SelectedItem {
                name: p.name.clone(),
                relevance: p.relevance,
                level: p.level,
            })
            .collect(),
    )?;
    let selection_objective = selection
        .entries()
        .iter()
        .map(|e| selection_value(e.relevance, e.level, opts.level_bonus))
        .sum();

    log::info!(
        "joint layout: {} items, total level {}, objective {:.4}",
        placement.items.len(),
        selection.total_level(),
        placement.objective
    );
    Ok(LayoutReport {
        status: LayoutStatus::Success,
        attempts: vec![AttemptRecord {
            iteration: 0,
            total_level: selection.total_level(),
            feasible: true,
            degradation: None,
        }],
        selection,
        placement: Some(placement),
        selection_objective,
    })
}

/// Placement/degradation loop starting from a given selection.
///
/// Each failed attempt lowers the least relevant item at the highest level
/// present by one step, so Σ levels strictly decreases and the loop ends
/// after at most Σ levels + 1 attempts. Search timeouts propagate as errors.
pub fn refine(scene: &Scene, selection: Selection, opts: &SolveOptions) -> Result<LayoutReport> {
    let pre = Precompute::build(scene);
    let mut attempts: Vec<AttemptRecord> = Vec::new();
    let mut state = State::Placing(selection);

    loop {
        state = match state {
            State::Placing(selection) => {
                let iteration = attempts.len();
                log::info!(
                    "placement attempt {}: {} items, total level {}",
                    iteration,
                    selection.len(),
                    selection.total_level()
                );
                let outcome = place_items(scene, &pre, &selection, opts)?;
                attempts.push(AttemptRecord {
                    iteration,
                    total_level: selection.total_level(),
                    feasible: matches!(outcome, PlacementOutcome::Placed(_)),
                    degradation: None,
                });
                match outcome {
                    PlacementOutcome::Placed(placement) => State::Success(selection, placement),
                    PlacementOutcome::Infeasible => {
                        log::info!("placement attempt {iteration} failed");
                        State::Degrading(selection)
                    }
                }
            }
            State::Degrading(selection) => match selection.degrade() {
                Some((lowered, step)) => {
                    log::info!(
                        "lowered '{}' from level {} to {}",
                        step.item,
                        step.from,
                        step.to
                    );
                    if let Some(last) = attempts.last_mut() {
                        last.degradation = Some(step);
                    }
                    State::Placing(lowered)
                }
                None => State::Exhausted(selection),
            },
            State::Success(selection, placement) => {
                log::info!(
                    "layout found after {} attempt(s): {} items, objective {:.4}",
                    attempts.len(),
                    placement.items.len(),
                    placement.objective
                );
                return Ok(LayoutReport {
                    status: LayoutStatus::Success,
                    selection,
                    placement: Some(placement),
                    attempts,
                    selection_objective: 0.0,
                });
            }
            State::Exhausted(selection) => {
                log::warn!(
                    "no feasible layout after {} attempt(s); last selection had {} items",
                    attempts.len(),
                    selection.len()
                );
                return Ok(LayoutReport {
                    status: LayoutStatus::Exhausted,
                    selection,
                    placement: None,
                    attempts,
                    selection_objective: 0.0,
                });
            }
        };
    }
}
