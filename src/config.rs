//! Pattern configuration: axis layout, round count and color palette.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::validate_color;
use crate::model::AxisConfig;

const AXIS_COUNT: usize = 16;
const TOTAL_ROWS: usize = 10;
const DEFAULT_COLORS: [&str; 4] = ["#8B4513", "#D2691E", "#CD853F", "#A0522D"];

/// Settings used to create a fresh pattern grid.
///
/// `center_axis_index` left unset means `floor(axis_count / 2)`. Fields
/// missing from a JSON file take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeaveConfig {
    pub axis_count: usize,
    pub center_axis_index: Option<usize>,
    pub total_rows: usize,
    pub available_colors: Vec<String>,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            axis_count: AXIS_COUNT,
            center_axis_index: None,
            total_rows: TOTAL_ROWS,
            available_colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl WeaveConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), axes = config.axis_count, "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.axis_count == 0 {
            return Err(ConfigError::Invalid("axisCount must be at least 1".into()));
        }
        if let Some(center) = self.center_axis_index
            && center >= self.axis_count
        {
            return Err(ConfigError::Invalid(format!(
                "centerAxisIndex {center} is outside 0..{}",
                self.axis_count
            )));
        }
        for color in &self.available_colors {
            validate_color(color).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    pub fn axis_config(&self) -> AxisConfig {
        AxisConfig::new(self.axis_count, self.center_axis_index)
    }
}
