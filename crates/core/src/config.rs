use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("visible range ends ({end}) before it starts ({start})")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("scale bounds must satisfy 0 < min_scale <= max_scale (got {min}..{max})")]
    InvalidScale { min: f64, max: f64 },
    #[error("lane_height must be positive")]
    ZeroLaneHeight,
}

/// Geometry and range of the timeline canvas.
///
/// Scales are in logical pixels per day. Every field has a default, so a
/// config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// First day shown on the canvas (x = 0).
    pub start_date: NaiveDate,
    /// Last day shown on the canvas. Dropped tracks are clamped to
    /// `start_date..=end_date`.
    pub end_date: NaiveDate,
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_scale: f64,
    pub lane_height: f64,
    /// Track boxes are never drawn narrower than this.
    pub min_item_width: f64,
    /// The canvas always shows at least this many lane rows.
    pub min_visible_lanes: usize,
    /// Blank space below the last lane.
    pub extra_height: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap_or(NaiveDate::MIN),
            min_scale: 3.7,
            max_scale: 32.0,
            initial_scale: 20.0,
            lane_height: 60.0,
            min_item_width: 80.0,
            min_visible_lanes: 4,
            extra_height: 100.0,
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_date < self.start_date {
            return Err(ConfigError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::InvalidScale {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if self.lane_height <= 0.0 {
            return Err(ConfigError::ZeroLaneHeight);
        }
        Ok(())
    }

    /// Parse a JSON config and validate it.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }
}
