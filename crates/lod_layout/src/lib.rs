pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod geometry;
pub mod optimize;
pub mod relevance;
pub mod scene;

pub use config::{Config, ObjectiveKind, SolveMode};
pub use constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_OUTPUT_DIR, EXPECTED_ITEM_HEADER, EXPECTED_RELEVANCE_HEADER,
    MAX_SELECTED_ITEMS,
};
pub use error::LayoutError;
pub use export::{ExportFormat, export_layout_csv, export_layout_json, read_layout_json};
pub use geometry::{CellId, DetailLevel, ExclusionCircle, Grid, PixelBox, Precompute};
pub use optimize::{
    LayoutRecord, LayoutReport, LayoutStatus, Selection, SolveOptions, check_layout,
    optimize_layout,
};
pub use relevance::{read_relevance_csv, read_relevance_from_reader};
pub use scene::Scene;
