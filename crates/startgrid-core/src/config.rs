//! User grid configuration and gesture timings.

use crate::error::{ConfigError, ConfigResult};
use crate::timer::Duration;
use serde::{Deserialize, Serialize};

/// Default number of grid columns.
pub const DEFAULT_COLUMNS: usize = 5;
/// Default number of grid rows.
pub const DEFAULT_ROWS: usize = 3;
/// Largest column or row count a grid may have.
pub const MAX_GRID_DIMENSION: usize = 64;
/// Default icon edge length in pixels.
pub const DEFAULT_ICON_SIZE: f64 = 96.0;

/// Sustained overlap needed before a drop merges.
pub const DEFAULT_MERGE_DELAY_MS: u64 = 600;
/// Time over the outside region before an item leaves its folder.
pub const DEFAULT_DRAG_OUT_DELAY_MS: u64 = 400;
/// Lockout after a page change.
pub const DEFAULT_PAGE_COOLDOWN_MS: u64 = 600;
/// Pause between wheel events that starts a new gesture.
pub const DEFAULT_WHEEL_GESTURE_GAP_MS: u64 = 200;
/// Accumulated wheel delta that commits a page step.
pub const DEFAULT_WHEEL_THRESHOLD: f64 = 50.0;

/// Grid shape chosen by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Preferred column count; the viewport may force fewer.
    #[serde(alias = "cols")]
    pub columns: usize,
    pub rows: usize,
    pub icon_size: f64,
    /// Width taken by a side panel to the left of the grid.
    pub left_offset: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            icon_size: DEFAULT_ICON_SIZE,
            left_offset: 0.0,
        }
    }
}

impl GridConfig {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_GRID_DIMENSION).contains(&self.columns) {
            return Err(invalid(
                "columns",
                format!("must be between 1 and {MAX_GRID_DIMENSION}, got {}", self.columns),
            ));
        }
        if !(1..=MAX_GRID_DIMENSION).contains(&self.rows) {
            return Err(invalid(
                "rows",
                format!("must be between 1 and {MAX_GRID_DIMENSION}, got {}", self.rows),
            ));
        }
        if !(self.icon_size.is_finite() && self.icon_size > 0.0) {
            return Err(invalid("iconSize", format!("must be positive, got {}", self.icon_size)));
        }
        if !(self.left_offset.is_finite() && self.left_offset >= 0.0) {
            return Err(invalid("leftOffset", format!("must be non-negative, got {}", self.left_offset)));
        }
        Ok(())
    }
}

/// Debounce delays and paging thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timings {
    pub merge_delay_ms: u64,
    pub drag_out_delay_ms: u64,
    pub page_cooldown_ms: u64,
    pub wheel_gesture_gap_ms: u64,
    pub wheel_threshold: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            merge_delay_ms: DEFAULT_MERGE_DELAY_MS,
            drag_out_delay_ms: DEFAULT_DRAG_OUT_DELAY_MS,
            page_cooldown_ms: DEFAULT_PAGE_COOLDOWN_MS,
            wheel_gesture_gap_ms: DEFAULT_WHEEL_GESTURE_GAP_MS,
            wheel_threshold: DEFAULT_WHEEL_THRESHOLD,
        }
    }
}

impl Timings {
    pub fn merge_delay(&self) -> Duration {
        Duration::from_millis(self.merge_delay_ms)
    }

    pub fn drag_out_delay(&self) -> Duration {
        Duration::from_millis(self.drag_out_delay_ms)
    }

    pub fn page_cooldown(&self) -> Duration {
        Duration::from_millis(self.page_cooldown_ms)
    }

    pub fn wheel_gesture_gap(&self) -> Duration {
        Duration::from_millis(self.wheel_gesture_gap_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.wheel_threshold.is_finite() && self.wheel_threshold > 0.0) {
            return Err(invalid(
                "wheelThreshold",
                format!("must be positive, got {}", self.wheel_threshold),
            ));
        }
        Ok(())
    }
}

/// Everything the engine is configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub timings: Timings,
}

impl EngineConfig {
    /// Parse and validate a configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.grid.validate()?;
        self.timings.validate()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
