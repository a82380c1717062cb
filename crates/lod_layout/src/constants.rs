/// Selection limits
pub const MAX_SELECTED_ITEMS: usize = 4;
pub const LEVEL_COUNT: u8 = 3; // detail levels 0, 1, 2

/// Objective weights
pub const DEFAULT_LAMBDA: f64 = 0.1; // distance decay of the interaction cost
pub const DEFAULT_LEVEL_BONUS: f64 = 0.5; // selection reward per detail level

/// Search budget
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Expected headers in relevance CSV files
pub const EXPECTED_ITEM_HEADER: &str = "Item";
pub const EXPECTED_RELEVANCE_HEADER: &str = "Relevance";

/// Default file locations
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "out";
