//! Value-to-color mapping and raster image synthesis for heat-map series.
//!
//! Components:
//! - Range color axis (palette sub-ranges, packed palette indices)
//! - Categorical column rasterizer (lithology tracks)
//! - Polar field rasterizer (bilinear sampling, dynamic/fixed caching)
//! - PNG encoding of the produced pixel buffers

pub mod categorical;
pub mod field;
pub mod image;
pub mod lithology;
pub mod parallel;
pub mod png;
pub mod polar;
pub mod range_color;

pub use categorical::{CategoricalColumnRasterizer, ColumnLayout, NearestSample, Sample};
pub use field::ScalarField;
pub use image::RasterImage;
pub use lithology::{LithologyItem, LithologyRegistry, INVALID_LITHOLOGY_ID};
pub use polar::{PolarDomain, PolarFieldRasterizer, PolarHit, RasterMode};
pub use range_color::{AxisBand, PaletteIndex, PaletteRange, RangeColorAxis};
