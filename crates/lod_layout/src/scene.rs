use crate::config::SceneConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::{ExclusionCircle, ExclusionMap, Grid, PixelBox};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Candidate UI item with its externally supplied relevance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub relevance: f64,
}

/// Everything the optimizer knows about one invocation: grid, fixed obstacles,
/// exclusion circle and item relevance. Immutable for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub grid: Grid,
    /// "Apps" control button
    pub apps_button: PixelBox,
    /// Questions panel; its centre is the focal point of the placement objective
    pub questions_panel: PixelBox,
    pub roi: ExclusionCircle,
    items: Vec<Item>, // sorted by name
}

impl Scene {
    pub fn new(
        grid: Grid,
        apps_button: PixelBox,
        questions_panel: PixelBox,
        roi: ExclusionCircle,
        relevance: BTreeMap<String, f64>,
    ) -> Result<Self> {
        for (label, b) in [("apps_button", &apps_button), ("questions_panel", &questions_panel)] {
            let finite = b.pos.iter().chain(b.size.iter()).all(|v| v.is_finite());
            if !finite || b.size[0] < 0.0 || b.size[1] < 0.0 {
                return Err(LayoutError::InvalidScene {
                    message: format!("{label} must have finite position and non-negative size"),
                });
            }
        }
        if !roi.radius.is_finite() || roi.radius < 0.0 || !roi.center.iter().all(|v| v.is_finite())
        {
            return Err(LayoutError::InvalidScene {
                message: format!("ROI radius must be finite and non-negative, got {}", roi.radius),
            });
        }

        let mut items = Vec::with_capacity(relevance.len());
        for (name, score) in relevance {
            if name.trim().is_empty() {
                return Err(LayoutError::InvalidScene {
                    message: "item names must not be empty".to_string(),
                });
            }
            if !score.is_finite() || score < 0.0 {
                return Err(LayoutError::InvalidScene {
                    message: format!(
                        "relevance of '{name}' must be finite and non-negative, got {score}"
                    ),
                });
            }
            items.push(Item {
                name,
                relevance: score,
            });
        }

        Ok(Self {
            grid,
            apps_button,
            questions_panel,
            roi,
            items,
        })
    }

    /// Builds the scene from the `[scene]` table. Entries in `overrides`
    /// (e.g. from a relevance CSV) replace inline scores with the same name.
    pub fn from_config(
        cfg: &SceneConfig,
        overrides: Option<&BTreeMap<String, f64>>,
    ) -> Result<Self> {
        let grid = Grid::new(cfg.columns, cfg.rows, cfg.block_size)?;
        let mut relevance = cfg.relevance.clone();
        if let Some(extra) = overrides {
            relevance.extend(extra.iter().map(|(k, v)| (k.clone(), *v)));
        }
        Self::new(grid, cfg.apps_button, cfg.questions_panel, cfg.roi, relevance)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn relevance(&self, name: &str) -> Option<f64> {
        self.items
            .binary_search_by(|item| item.name.as_str().cmp(name))
            .ok()
            .map(|i| self.items[i].relevance)
    }

    /// Cells of the two fixed obstacles (top-left pixel divided by block size)
    pub fn obstacle_cells(&self) -> [(i64, i64); 2] {
        let apps = self.apps_button.pos;
        let questions = self.questions_panel.pos;
        [
            self.grid.cell_of_pixel(apps[0], apps[1]),
            self.grid.cell_of_pixel(questions[0], questions[1]),
        ]
    }

    pub fn exclusion_map(&self) -> ExclusionMap {
        ExclusionMap::build(&self.grid, &self.obstacle_cells())
    }

    /// Questions panel centre in cell units
    pub fn focal_point(&self) -> (f64, f64) {
        let (x, y) = self.questions_panel.center();
        let b = self.grid.block_size as f64;
        (x / b, y / b)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn relevance(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|&(n, r)| (n.to_string(), r)).collect()
    }

    /// 8x6 grid, 50px blocks, apps button at (7,0), 2x2 questions panel at (0,0)
    pub(crate) fn reference_scene(roi_radius: f64, entries: &[(&str, f64)]) -> Scene {
        Scene::new(
            Grid::new(8, 6, 50).unwrap(),
            PixelBox {
                pos: [350.0, 0.0],
                size: [50.0, 50.0],
            },
            PixelBox {
                pos: [0.0, 0.0],
                size: [100.0, 100.0],
            },
            ExclusionCircle {
                center: [200.0, 150.0],
                radius: roi_radius,
            },
            relevance(entries),
        )
        .unwrap()
    }

    pub(crate) fn abc_scene(roi_radius: f64) -> Scene {
        reference_scene(roi_radius, &[("alpha", 0.9), ("beta", 0.5), ("gamma", 0.3)])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_items_sorted_and_lookup() {
        let scene = reference_scene(60.0, &[("gamma", 0.3), ("alpha", 0.9)]);
        let names: Vec<_> = scene.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gamma"]);
        assert_eq!(scene.relevance("gamma"), Some(0.3));
        assert_eq!(scene.relevance("delta"), None);
    }

    #[test]
    fn test_obstacles_and_focal_point() {
        let scene = abc_scene(60.0);
        assert_eq!(scene.obstacle_cells(), [(7, 0), (0, 0)]);
        assert_eq!(scene.focal_point(), (1.0, 1.0));
    }

    #[test]
    fn test_rejects_negative_relevance() {
        let err = Scene::new(
            Grid::new(2, 2, 10).unwrap(),
            PixelBox {
                pos: [0.0, 0.0],
                size: [10.0, 10.0],
            },
            PixelBox {
                pos: [10.0, 10.0],
                size: [10.0, 10.0],
            },
            ExclusionCircle {
                center: [0.0, 0.0],
                radius: 1.0,
            },
            relevance(&[("bad", -0.1)]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let result = Scene::new(
            Grid::new(2, 2, 10).unwrap(),
            PixelBox {
                pos: [0.0, 0.0],
                size: [10.0, 10.0],
            },
            PixelBox {
                pos: [10.0, 10.0],
                size: [10.0, 10.0],
            },
            ExclusionCircle {
                center: [0.0, 0.0],
                radius: -1.0,
            },
            BTreeMap::new(),
        );
        assert!(matches!(result, Err(LayoutError::InvalidScene { .. })));
    }
}
