use crate::constants::MAX_SELECTED_ITEMS;
use crate::error::{LayoutError, Result};
use crate::geometry::{CellId, Footprint};
use crate::optimize::LayoutRecord;
use crate::scene::Scene;
use std::collections::{HashMap, HashSet};

/// Re-checks every layout invariant against the scene, independently of the
/// search: item count, known and unique names, grid bounds, obstacle exclusion
/// per level, the exclusion circle, and pairwise disjoint footprints.
pub fn check_layout(scene: &Scene, layout: &[LayoutRecord]) -> Result<()> {
    if layout.len() > MAX_SELECTED_ITEMS {
        return Err(invalid(format!(
            "{} items placed, at most {} allowed",
            layout.len(),
            MAX_SELECTED_ITEMS
        )));
    }

    let exclusion = scene.exclusion_map();
    let mut owner: HashMap<CellId, &str> = HashMap::new();
    let mut names = HashSet::new();

    for record in layout {
        if scene.relevance(&record.name).is_none() {
            return Err(LayoutError::UnknownItem(record.name.clone()));
        }
        if !names.insert(record.name.as_str()) {
            return Err(invalid(format!("'{}' placed more than once", record.name)));
        }

        let fp = Footprint::new(CellId::new(record.position[0], record.position[1]), record.level);
        if !fp.fits(&scene.grid) {
            return Err(invalid(format!(
                "'{}' at {} level {} leaves the {}x{} grid",
                record.name, fp.origin, record.level, scene.grid.columns, scene.grid.rows
            )));
        }

        for cell in fp.cells() {
            if exclusion.is_excluded(record.level, cell) {
                return Err(invalid(format!(
                    "'{}' covers cell {} reserved around an obstacle",
                    record.name, cell
                )));
            }
            if scene.roi.overlaps_cell(&scene.grid, cell) {
                return Err(invalid(format!(
                    "'{}' covers cell {} inside the exclusion circle",
                    record.name, cell
                )));
            }
            if let Some(other) = owner.insert(cell, record.name.as_str()) {
                return Err(invalid(format!(
                    "'{}' and '{}' overlap at {}",
                    other, record.name, cell
                )));
            }
        }
    }
    Ok(())
}

fn invalid(message: String) -> LayoutError {
    LayoutError::InvalidLayout { message }
}
