use crate::{
    constants::{
        DEFAULT_LAMBDA, DEFAULT_LEVEL_BONUS, DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT_MS,
        MAX_SELECTED_ITEMS,
    },
    error::{LayoutError, Result},
    geometry::{ExclusionCircle, PixelBox},
};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum_macros::{Display, EnumString};

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub solver: SolverConfig,
    pub scene: SceneConfig,
}

/// How the stages are chained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SolveMode {
    /// Selection, then placement with level degradation on failure
    TwoStage,
    /// Items, levels and positions chosen together in one search
    SingleStage,
}

/// Placement objective variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ObjectiveKind {
    /// relevance
    Relevance,
    /// relevance * (1 + level_bonus * level)
    LevelWeighted,
    /// relevance / (1 + lambda * d²) * (1 + level)
    InteractionCost,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolverConfig {
    #[serde(default = "default_mode")]
    pub mode: String, // "two-stage" | "single-stage"
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64, // per search
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default = "default_level_bonus")]
    pub level_bonus: f64,
    #[serde(default = "default_objective")]
    pub objective: String, // "relevance" | "level-weighted" | "interaction-cost"
    #[serde(default = "default_true")]
    pub area_bias: bool, // shrink the area budget by 1 - 2r/W
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_mode() -> String {
    SolveMode::TwoStage.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_max_items() -> usize {
    MAX_SELECTED_ITEMS
}
fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}
fn default_level_bonus() -> f64 {
    DEFAULT_LEVEL_BONUS
}
fn default_objective() -> String {
    ObjectiveKind::InteractionCost.to_string()
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_items: MAX_SELECTED_ITEMS,
            lambda: DEFAULT_LAMBDA,
            level_bonus: DEFAULT_LEVEL_BONUS,
            objective: default_objective(),
            area_bias: true,
            parallel: true,
            output_dir: default_output_dir(),
        }
    }
}

impl SolverConfig {
    pub fn solve_mode(&self) -> Result<SolveMode> {
        SolveMode::from_str(&self.mode).map_err(|_| {
            LayoutError::Config(format!(
                "Invalid solver mode: {}. Must be 'two-stage' or 'single-stage'",
                self.mode
            ))
        })
    }

    pub fn objective_kind(&self) -> Result<ObjectiveKind> {
        ObjectiveKind::from_str(&self.objective).map_err(|_| {
            LayoutError::Config(format!(
                "Invalid objective: {}. Must be 'relevance', 'level-weighted' or 'interaction-cost'",
                self.objective
            ))
        })
    }
}

/// Scene description (grid, fixed UI elements, ROI and relevance)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    pub columns: usize,
    pub rows: usize,
    pub block_size: u32,
    pub apps_button: PixelBox,
    pub questions_panel: PixelBox,
    pub roi: ExclusionCircle,
    #[serde(default)]
    pub relevance_csv: Option<String>,
    #[serde(default)]
    pub relevance: BTreeMap<String, f64>,
}

impl Config {
    /// Reads and validates a TOML configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            LayoutError::Config(format!(
                "Failed to load config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// `scene.relevance_csv` resolved against the directory of the config
    /// file it was loaded from; absolute paths are kept as they are
    pub fn relevance_path(&self, config_path: &Path) -> Option<PathBuf> {
        let csv = self.scene.relevance_csv.as_ref()?;
        let base = config_path.parent().unwrap_or(Path::new("."));
        Some(base.join(csv))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let solver = &self.solver;
        solver.solve_mode()?;
        solver.objective_kind()?;

        if solver.timeout_ms == 0 {
            return Err(LayoutError::Config("timeout_ms must be positive".to_string()));
        }
        if solver.max_items == 0 || solver.max_items > MAX_SELECTED_ITEMS {
            return Err(LayoutError::Config(format!(
                "max_items must be between 1 and {}, got {}",
                MAX_SELECTED_ITEMS, solver.max_items
            )));
        }
        if !solver.lambda.is_finite() || solver.lambda < 0.0 {
            return Err(LayoutError::Config(format!(
                "lambda must be finite and non-negative, got {}",
                solver.lambda
            )));
        }
        if !solver.level_bonus.is_finite() || solver.level_bonus < 0.0 {
            return Err(LayoutError::Config(format!(
                "level_bonus must be finite and non-negative, got {}",
                solver.level_bonus
            )));
        }

        let scene = &self.scene;
        if scene.columns == 0 || scene.rows == 0 || scene.block_size == 0 {
            return Err(LayoutError::Config(format!(
                "grid must have positive columns, rows and block_size, got {}x{} @ {}px",
                scene.columns, scene.rows, scene.block_size
            )));
        }
        Ok(())
    }
}
