//! Rasterizer configuration.
//!
//! Loaded from JSON; every field has a default so an empty object `{}` is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RasterError, RasterResult};

/// Default cap on categorical column height (pixels).
pub const DEFAULT_MAX_COLUMN_HEIGHT: usize = 2160;

/// Default alpha applied to polar field pixels (~82% opacity).
pub const DEFAULT_FIELD_ALPHA: u8 = 210;

/// Root rasterizer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Split the outer row loop across rayon worker threads.
    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub column: ColumnConfig,

    #[serde(default)]
    pub polar: PolarConfig,

    #[serde(default)]
    pub png: PngConfig,
}

impl RenderConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> RasterResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RasterError::ConfigIo(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> RasterResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RasterError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RasterResult<()> {
        if self.column.max_height == 0 {
            return Err(RasterError::ConfigValidation(
                "column.max_height must be at least 1".to_string(),
            ));
        }
        if let Some([w, h]) = self.polar.image_size {
            if w == 0 || h == 0 {
                return Err(RasterError::ConfigValidation(format!(
                    "polar.image_size must be non-zero, got {}x{}",
                    w, h
                )));
            }
        }
        Ok(())
    }
}

/// How a categorical column picks the sample for a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Each sample's category holds until the category changes.
    #[default]
    HoldPrevious,
    /// The closer of the surrounding samples wins; ties go to the earlier one.
    NearestNeighbor,
}

/// Categorical column settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_max_column_height")]
    pub max_height: usize,

    #[serde(default)]
    pub sampling: SamplingPolicy,
}

fn default_max_column_height() -> usize {
    DEFAULT_MAX_COLUMN_HEIGHT
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_COLUMN_HEIGHT,
            sampling: SamplingPolicy::default(),
        }
    }
}

/// Polar field settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarConfig {
    /// Bilinear interpolation between grid cells.
    #[serde(default = "default_true")]
    pub interpolate: bool,

    /// Fixed image resolution `[width, height]`. `None` renders at plot-area size every frame.
    #[serde(default)]
    pub image_size: Option<[usize; 2]>,

    #[serde(default = "default_field_alpha")]
    pub alpha: u8,
}

fn default_true() -> bool {
    true
}

fn default_field_alpha() -> u8 {
    DEFAULT_FIELD_ALPHA
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            interpolate: true,
            image_size: None,
            alpha: DEFAULT_FIELD_ALPHA,
        }
    }
}

/// PNG deflate level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    #[default]
    Fast,
    Default,
    Best,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PngConfig {
    #[serde(default)]
    pub compression: PngCompression,
}
