//! Common types shared by the raster renderer and its hosts.

pub mod buffer;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;

pub use buffer::PixelBuffer;
pub use color::{Color, Palette};
pub use config::{
    ColumnConfig, PngCompression, PngConfig, PolarConfig, RenderConfig, SamplingPolicy,
};
pub use error::{RasterError, RasterResult};
pub use geometry::{DataBounds, DataPoint, ScreenPoint, ScreenRect};
pub use host::{
    AxisScale, ColorAxis, ColorAxisLookup, DefaultColorSource, EdgeRenderingMode, Orientation,
    PlotTransform, RenderContext,
};
