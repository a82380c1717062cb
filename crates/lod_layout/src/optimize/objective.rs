use crate::config::ObjectiveKind;
use crate::geometry::{DetailLevel, Footprint};
use crate::optimize::SolveOptions;
use crate::scene::Scene;

/// Selection-stage value: relevance * (1 + level_bonus * level)
pub fn selection_value(relevance: f64, level: DetailLevel, level_bonus: f64) -> f64 {
    relevance * (1.0 + level_bonus * level.index() as f64)
}

/// Position-sensitive objective of the placement stage.
///
/// Distances are measured in cell units from the footprint centre to the
/// focal point (centre of the questions panel).
#[derive(Debug, Clone, Copy)]
pub struct PlacementObjective {
    pub kind: ObjectiveKind,
    pub lambda: f64,
    pub level_bonus: f64,
    pub focal: (f64, f64),
}

impl PlacementObjective {
    pub fn new(scene: &Scene, opts: &SolveOptions) -> Self {
        Self {
            kind: opts.objective,
            lambda: opts.lambda,
            level_bonus: opts.level_bonus,
            focal: scene.focal_point(),
        }
    }

    pub fn squared_distance(&self, fp: &Footprint) -> f64 {
        let (x, y) = fp.center();
        let dx = x - self.focal.0;
        let dy = y - self.focal.1;
        dx * dx + dy * dy
    }

    pub fn value(&self, relevance: f64, fp: &Footprint) -> f64 {
        match self.kind {
            ObjectiveKind::Relevance => relevance,
            ObjectiveKind::LevelWeighted => selection_value(relevance, fp.level, self.level_bonus),
            ObjectiveKind::InteractionCost => {
                relevance / (1.0 + self.lambda * self.squared_distance(fp))
                    * (1.0 + fp.level.index() as f64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CellId;

    fn objective(kind: ObjectiveKind) -> PlacementObjective {
        PlacementObjective {
            kind,
            lambda: 0.1,
            level_bonus: 0.5,
            focal: (1.0, 1.0),
        }
    }

    #[test]
    fn test_selection_value_rewards_level() {
        assert_eq!(selection_value(0.8, DetailLevel::Icon, 0.5), 0.8);
        assert!((selection_value(0.8, DetailLevel::Detailed, 0.5) - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_interaction_cost_decays_with_distance() {
        let obj = objective(ObjectiveKind::InteractionCost);
        // detailed footprint at (0,2): centre (1,3), d² = 4
        let near = Footprint::new(CellId::new(0, 2), DetailLevel::Detailed);
        assert_eq!(obj.squared_distance(&near), 4.0);
        assert!((obj.value(1.0, &near) - 3.0 / 1.4).abs() < 1e-12);

        let far = Footprint::new(CellId::new(6, 4), DetailLevel::Detailed);
        assert!(obj.value(1.0, &far) < obj.value(1.0, &near));
    }

    #[test]
    fn test_other_kinds_ignore_position() {
        let near = Footprint::new(CellId::new(0, 2), DetailLevel::Compact);
        let far = Footprint::new(CellId::new(6, 5), DetailLevel::Compact);
        for kind in [ObjectiveKind::Relevance, ObjectiveKind::LevelWeighted] {
            let obj = objective(kind);
            assert_eq!(obj.value(0.7, &near), obj.value(0.7, &far));
        }
        assert!((objective(ObjectiveKind::LevelWeighted).value(0.7, &near) - 1.05).abs() < 1e-12);
    }
}
