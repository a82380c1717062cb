use crate::error::Result;
use crate::geometry::{DetailLevel, Footprint, Precompute};
use crate::optimize::objective::PlacementObjective;
use crate::optimize::placement::search_selection;
use crate::optimize::search::{Deadline, SearchStats};
use crate::optimize::{Placement, SelectedItem, Selection, SolveOptions};
use crate::scene::Scene;
use itertools::Itertools;
use strum::IntoEnumIterator;

/// One (item subset, level per item) choice with its overlap-free upper bound
struct Assignment {
    entries: Vec<(usize, DetailLevel)>, // index into scene.items()
    bound: f64,
}

/// Single-stage solve: chooses items, levels and anchors together.
///
/// Maximizes the placement objective over at most `max_items` items, each
/// used at most once, with no area budget. Assignments are visited by
/// decreasing upper bound (Σ best anchor value per item and level) and each
/// one runs the occupancy search with the incumbent as its floor, so the
/// visit stops at the first bound that cannot improve on it. The empty
/// placement is always feasible, so a result always exists.
pub fn place_jointly(scene: &Scene, pre: &Precompute, opts: &SolveOptions) -> Result<Placement> {
    let objective = PlacementObjective::new(scene, opts);
    let deadline = Deadline::start("joint placement", opts.timeout);

    let items: Vec<_> = scene.items().iter().filter(|i| i.relevance > 0.0).collect();
    // best[i][level]: best single-item value, None without a feasible anchor
    let best: Vec<[Option<f64>; 3]> = items
        .iter()
        .map(|item| {
            [DetailLevel::Icon, DetailLevel::Compact, DetailLevel::Detailed].map(|level| {
                pre.anchors(level)
                    .iter()
                    .map(|&origin| objective.value(item.relevance, &Footprint::new(origin, level)))
                    .max_by(f64::total_cmp)
            })
        })
        .collect();

    let mut assignments = Vec::new();
    for size in 1..=opts.max_items.min(items.len()) {
        for subset in (0..items.len()).combinations(size) {
            for levels in subset.iter().map(|_| DetailLevel::iter()).multi_cartesian_product() {
                let bound: Option<f64> = subset
                    .iter()
                    .zip(&levels)
                    .map(|(&i, level)| best[i][level.index() as usize])
                    .sum();
                if let Some(bound) = bound {
                    assignments.push(Assignment {
                        entries: subset.iter().copied().zip(levels).collect(),
                        bound,
                    });
                }
            }
        }
    }
    // stable: equal bounds keep generation order
    assignments.sort_by(|a, b| b.bound.total_cmp(&a.bound));

    let mut incumbent = Placement {
        items: Vec::new(),
        objective: 0.0,
    };
    let mut stats = SearchStats::default();
    let mut visited = 0usize;
    for assignment in &assignments {
        deadline.check()?;
        if assignment.bound <= incumbent.objective {
            break;
        }
        visited += 1;
        let selection = Selection::new(
            assignment
                .entries
                .iter()
                .map(|&(i, level)| SelectedItem {
                    name: items[i].name.clone(),
                    relevance: items[i].relevance,
                    level,
                })
                .collect(),
        )?;
        let (found, local) = search_selection(
            pre,
            &selection,
            &objective,
            opts.parallel,
            &deadline,
            Some(incumbent.objective),
        )?;
        stats.merge(local);
        if let Some(found) = found {
            incumbent = found;
        }
    }

    log::debug!(
        "joint placement: {} of {} assignments searched, {} nodes, {} pruned, {:?} elapsed",
        visited,
        assignments.len(),
        stats.nodes,
        stats.pruned,
        deadline.elapsed()
    );
    Ok(incumbent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::geometry::{CellId, ExclusionCircle, Grid, PixelBox};
    use crate::optimize::verify::check_layout;
    use crate::scene::fixtures::{abc_scene, relevance};
    use std::collections::HashSet;
    use std::time::Duration;

    fn free_scene(columns: usize, rows: usize, entries: &[(&str, f64)]) -> Scene {
        let off_grid = PixelBox {
            pos: [-100.0, -100.0],
            size: [0.0, 0.0],
        };
        Scene::new(
            Grid::new(columns, rows, 10).unwrap(),
            off_grid,
            off_grid,
            ExclusionCircle {
                center: [1000.0, 1000.0],
                radius: 1.0,
            },
            relevance(entries),
        )
        .unwrap()
    }

    /// Best value over every (skip | level × anchor) choice per item
    fn brute_force(scene: &Scene, pre: &Precompute, opts: &SolveOptions) -> f64 {
        let objective = PlacementObjective::new(scene, opts);
        let options: Vec<Vec<Option<Footprint>>> = scene
            .items()
            .iter()
            .map(|_| {
                let mut choices: Vec<Option<Footprint>> = vec![None];
                for level in DetailLevel::iter() {
                    choices.extend(
                        pre.anchors(level)
                            .iter()
                            .map(|&o| Some(Footprint::new(o, level))),
                    );
                }
                choices
            })
            .collect();

        let mut best = 0.0f64;
        for combo in options.iter().map(|o| o.iter()).multi_cartesian_product() {
            let used: Vec<_> = combo.iter().filter(|fp| fp.is_some()).collect();
            if used.len() > opts.max_items {
                continue;
            }
            let cells: Vec<CellId> = combo
                .iter()
                .filter_map(|fp| fp.as_ref())
                .flat_map(|fp| fp.cells().collect::<Vec<_>>())
                .collect();
            let unique: HashSet<_> = cells.iter().collect();
            if unique.len() != cells.len() {
                continue;
            }
            let value: f64 = combo
                .iter()
                .zip(scene.items())
                .filter_map(|(fp, item)| fp.as_ref().map(|fp| objective.value(item.relevance, fp)))
                .sum();
            best = best.max(value);
        }
        best
    }

    #[test]
    fn test_matches_exhaustive_enumeration() {
        let scene = free_scene(3, 2, &[("a", 0.9), ("b", 0.6), ("c", 0.3)]);
        let pre = Precompute::build(&scene);
        for max_items in [1, 2, 3] {
            let opts = SolveOptions {
                max_items,
                ..SolveOptions::default()
            };
            let placement = place_jointly(&scene, &pre, &opts).unwrap();
            assert!(placement.items.len() <= max_items);
            assert!((placement.objective - brute_force(&scene, &pre, &opts)).abs() < 1e-9);
            check_layout(&scene, &placement.to_layout()).unwrap();
        }
    }

    #[test]
    fn test_fully_blocked_grid_yields_empty_placement() {
        let scene = abc_scene(250.0);
        let pre = Precompute::build(&scene);
        let placement = place_jointly(&scene, &pre, &SolveOptions::default()).unwrap();
        assert!(placement.items.is_empty());
        assert_eq!(placement.objective, 0.0);
    }

    #[test]
    fn test_zero_relevance_items_are_left_out() {
        let scene = free_scene(4, 4, &[("a", 0.5), ("z", 0.0)]);
        let pre = Precompute::build(&scene);
        let placement = place_jointly(&scene, &pre, &SolveOptions::default()).unwrap();
        let names: Vec<_> = placement.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scene = abc_scene(60.0);
        let pre = Precompute::build(&scene);
        let seq_opts = SolveOptions {
            parallel: false,
            ..SolveOptions::default()
        };
        let seq = place_jointly(&scene, &pre, &seq_opts).unwrap();
        let par = place_jointly(&scene, &pre, &SolveOptions::default()).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_timeout_is_reported() {
        let scene = abc_scene(60.0);
        let pre = Precompute::build(&scene);
        let opts = SolveOptions {
            timeout: Duration::ZERO,
            ..SolveOptions::default()
        };
        let err = place_jointly(&scene, &pre, &opts).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::SearchTimeout {
                phase: "joint placement",
                ..
            }
        ));
    }
}
