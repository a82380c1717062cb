pub mod obstacles;
pub mod precompute;
pub mod predicates;
pub mod types;

pub use obstacles::{ExclusionMap, obstacle_exclusion_cells};
pub use precompute::Precompute;
pub use predicates::circle_rectangle_overlap;
pub use types::{CellId, DetailLevel, ExclusionCircle, Footprint, Grid, PixelBox};
