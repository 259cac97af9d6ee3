//! Error types for the raster/color core.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Primary error type for palette lookup and rasterization.
#[derive(Debug, Error)]
pub enum RasterError {
    // === Palette / range errors ===
    #[error("Palette must contain at least one color")]
    EmptyPalette,

    #[error("No palette ranges registered")]
    NoRanges,

    #[error("Invalid palette range [{lower}, {upper})")]
    InvalidRange { lower: f64, upper: f64 },

    #[error("Range capacity exceeded: {what} {value} does not fit (max {max})")]
    RangeCapacityExceeded {
        what: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // === Data errors ===
    #[error("Sample sequence is empty")]
    EmptySamples,

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Color axis not found: {0}")]
    ColorAxisNotFound(String),

    // === Configuration errors ===
    #[error("Config IO error: {0}")]
    ConfigIo(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    // === Output errors ===
    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl RasterError {
    /// True for errors caused by caller misuse rather than bad input data.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            RasterError::NoRanges
                | RasterError::InvalidRange { .. }
                | RasterError::RangeCapacityExceeded { .. }
        )
    }
}

impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        RasterError::ConfigIo(err.to_string())
    }
}

impl From<serde_json::Error> for RasterError {
    fn from(err: serde_json::Error) -> Self {
        RasterError::ConfigParse(format!("JSON error: {}", err))
    }
}
