use crate::error::Result;
use crate::geometry::{Footprint, Grid, Precompute};
use crate::optimize::objective::PlacementObjective;
use crate::optimize::search::{Deadline, Occupancy, SearchStats};
use crate::optimize::{PlacedItem, Placement, Selection, SolveOptions};
use crate::scene::Scene;
use rayon::prelude::*;

/// Result of one placement attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    /// Every selected item has a position
    Placed(Placement),
    /// No assignment satisfies all constraints for this selection
    Infeasible,
}

/// Feasible anchor of one item with its objective contribution
#[derive(Debug, Clone)]
struct Candidate {
    footprint: Footprint,
    value: f64,
    cells: Vec<usize>, // occupancy indices
}

/// Candidate anchors of one selected item, best value first
#[derive(Debug, Clone)]
struct ItemCandidates {
    entry: usize, // index into the selection entries
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone)]
struct Incumbent {
    value: f64,
    choice: Vec<usize>, // candidate index per item
}

/// Finds the optimal non-overlapping positions for a fixed selection.
///
/// Branch and bound over items ordered by their best achievable value. Each
/// branch keeps a per-cell occupancy counter; a candidate is admissible only if
/// every cell it covers still has count 0. The bound is the current value plus
/// the best value of every remaining item. With `parallel`, the first item's
/// candidates are explored as independent rayon tasks with their own
/// occupancy state; the reduction keeps the highest value and, on ties, the
/// lowest candidate index, which matches the sequential visiting order.
pub fn place_items(
    scene: &Scene,
    pre: &Precompute,
    selection: &Selection,
    opts: &SolveOptions,
) -> Result<PlacementOutcome> {
    let objective = PlacementObjective::new(scene, opts);
    let deadline = Deadline::start("placement", opts.timeout);
    let (best, stats) =
        search_selection(pre, selection, &objective, opts.parallel, &deadline, None)?;

    log::debug!(
        "placement search: {} nodes, {} pruned, {:?} elapsed",
        stats.nodes,
        stats.pruned,
        deadline.elapsed()
    );

    Ok(match best {
        Some(placement) => PlacementOutcome::Placed(placement),
        None => PlacementOutcome::Infeasible,
    })
}

/// Exact search for one fixed selection under a shared deadline.
///
/// Only placements strictly better than `floor` are returned, so a caller
/// comparing several selections can prune against its incumbent.
pub(crate) fn search_selection(
    pre: &Precompute,
    selection: &Selection,
    objective: &PlacementObjective,
    parallel: bool,
    deadline: &Deadline,
    floor: Option<f64>,
) -> Result<(Option<Placement>, SearchStats)> {
    if selection.is_empty() {
        let empty = floor.is_none_or(|f| 0.0 > f).then(|| Placement {
            items: Vec::new(),
            objective: 0.0,
        });
        return Ok((empty, SearchStats::default()));
    }

    let items = build_candidates(pre, selection, objective);
    if let Some(stuck) = items.iter().find(|it| it.candidates.is_empty()) {
        let entry = &selection.entries()[stuck.entry];
        log::debug!(
            "placement: '{}' has no feasible anchor at level {}",
            entry.name,
            entry.level
        );
        return Ok((None, SearchStats::default()));
    }

    // suffix[i] = Σ best value of items i..
    let mut suffix = vec![0.0; items.len() + 1];
    for i in (0..items.len()).rev() {
        suffix[i] = suffix[i + 1] + items[i].candidates[0].value;
    }

    let ctx = SearchContext {
        grid: &pre.grid,
        items: &items,
        suffix: &suffix,
        deadline,
        floor,
    };

    let (best, stats) = if parallel && items[0].candidates.len() > 1 {
        search_parallel(&ctx)?
    } else {
        search_sequential(&ctx)?
    };

    let placement = best.map(|best| {
        let placed = items
            .iter()
            .zip(&best.choice)
            .map(|(it, &k)| {
                let entry = &selection.entries()[it.entry];
                PlacedItem {
                    name: entry.name.clone(),
                    relevance: entry.relevance,
                    level: entry.level,
                    origin: it.candidates[k].footprint.origin,
                }
            })
            .collect();
        Placement {
            items: placed,
            objective: best.value,
        }
    });
    Ok((placement, stats))
}

fn build_candidates(
    pre: &Precompute,
    selection: &Selection,
    objective: &PlacementObjective,
) -> Vec<ItemCandidates> {
    let mut items: Vec<ItemCandidates> = selection
        .entries()
        .iter()
        .enumerate()
        .map(|(entry, sel)| {
            let mut candidates: Vec<Candidate> = pre
                .anchors(sel.level)
                .iter()
                .map(|&origin| {
                    let footprint = Footprint::new(origin, sel.level);
                    Candidate {
                        value: objective.value(sel.relevance, &footprint),
                        cells: footprint.cells().map(|c| pre.grid.index(c)).collect(),
                        footprint,
                    }
                })
                .collect();
            // stable: equal values keep row-major order
            candidates.sort_by(|a, b| b.value.total_cmp(&a.value));
            ItemCandidates { entry, candidates }
        })
        .collect();

    let best = |it: &ItemCandidates| it.candidates.first().map_or(0.0, |c| c.value);
    items.sort_by(|a, b| best(b).total_cmp(&best(a)).then_with(|| a.entry.cmp(&b.entry)));
    items
}

struct SearchContext<'a> {
    grid: &'a Grid,
    items: &'a [ItemCandidates],
    suffix: &'a [f64],
    deadline: &'a Deadline,
    floor: Option<f64>, // leaves must beat this value
}

/// Depth-first state owned by one worker
struct Branch<'a> {
    ctx: &'a SearchContext<'a>,
    occupancy: Occupancy,
    choice: Vec<usize>,
    best: Option<Incumbent>,
    stats: SearchStats,
}

impl<'a> Branch<'a> {
    fn new(ctx: &'a SearchContext<'a>) -> Self {
        Self {
            ctx,
            occupancy: Occupancy::new(ctx.grid.cell_count()),
            choice: Vec::with_capacity(ctx.items.len()),
            best: None,
            stats: SearchStats::default(),
        }
    }

    fn best_value(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.value).or(self.ctx.floor)
    }

    /// Explores item 0 fixed at candidate `k`
    fn run_root(&mut self, k: usize) -> Result<()> {
        let items = self.ctx.items;
        let cand = &items[0].candidates[k];
        if let Some(best) = self.best_value()
            && cand.value + self.ctx.suffix[1] <= best
        {
            self.stats.pruned += 1;
            return Ok(());
        }
        self.occupancy.occupy(&cand.cells);
        self.choice.push(k);
        let result = self.explore(1, cand.value);
        self.choice.pop();
        self.occupancy.release(&cand.cells);
        result
    }

    fn explore(&mut self, i: usize, value: f64) -> Result<()> {
        self.stats.nodes += 1;
        self.ctx.deadline.check()?;

        let items = self.ctx.items;
        if i == items.len() {
            if self.best_value().is_none_or(|best| value > best) {
                self.best = Some(Incumbent {
                    value,
                    choice: self.choice.clone(),
                });
            }
            return Ok(());
        }

        for (k, cand) in items[i].candidates.iter().enumerate() {
            // candidates are sorted, nothing further down can beat the incumbent
            if let Some(best) = self.best_value()
                && value + cand.value + self.ctx.suffix[i + 1] <= best
            {
                self.stats.pruned += 1;
                break;
            }
            if !self.occupancy.is_free(&cand.cells) {
                continue;
            }
            self.occupancy.occupy(&cand.cells);
            self.choice.push(k);
            let result = self.explore(i + 1, value + cand.value);
            self.choice.pop();
            self.occupancy.release(&cand.cells);
            result?;
        }
        Ok(())
    }
}

fn search_sequential(ctx: &SearchContext<'_>) -> Result<(Option<Incumbent>, SearchStats)> {
    let mut branch = Branch::new(ctx);
    for k in 0..ctx.items[0].candidates.len() {
        branch.run_root(k)?;
    }
    Ok((branch.best, branch.stats))
}

fn search_parallel(ctx: &SearchContext<'_>) -> Result<(Option<Incumbent>, SearchStats)> {
    let results: Vec<Result<(Option<Incumbent>, SearchStats)>> = (0..ctx.items[0].candidates.len())
        .into_par_iter()
        .map(|k| {
            let mut branch = Branch::new(ctx);
            branch.run_root(k)?;
            Ok((branch.best, branch.stats))
        })
        .collect();

    let mut best: Option<Incumbent> = None;
    let mut stats = SearchStats::default();
    for result in results {
        let (local, local_stats) = result?;
        stats.merge(local_stats);
        if let Some(local) = local
            && best.as_ref().is_none_or(|b| local.value > b.value)
        {
            best = Some(local);
        }
    }
    Ok((best, stats))
}
