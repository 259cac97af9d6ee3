//! Capabilities consumed from the host plotting framework.
//!
//! The rasterizers never own axes, layout or a drawing surface. They reach
//! them through these narrow traits, which the host implements.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::geometry::{DataPoint, ScreenPoint, ScreenRect};

/// Direction an axis runs along on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Anti-aliasing hint for rectangle drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeRenderingMode {
    #[default]
    Automatic,
    Adaptive,
    PreferSharpness,
    PreferSpeed,
}

/// Data/screen transform for the axis pair a series is plotted against.
///
/// `Sync` so rasterizers can share it across row workers.
pub trait PlotTransform: Sync {
    fn transform(&self, point: DataPoint) -> ScreenPoint;

    fn inverse_transform(&self, point: ScreenPoint) -> DataPoint;

    /// Visible drawing region in pixels.
    fn plot_area(&self) -> ScreenRect;

    /// True if `inverse_transform` yields `(magnitude, angle_degrees)` directly.
    fn is_polar(&self) -> bool {
        false
    }
}

/// A single axis: value to screen coordinate along its direction.
pub trait AxisScale {
    fn transform(&self, value: f64) -> f64;

    /// Minimum after auto-scaling.
    fn actual_minimum(&self) -> f64;

    /// Maximum after auto-scaling.
    fn actual_maximum(&self) -> f64;

    fn orientation(&self) -> Orientation;
}

/// Value-to-color mapping owned by the host.
pub trait ColorAxis: Sync {
    fn color(&self, value: f64) -> Color;

    /// Feed an observed data value into the axis auto-scaling.
    fn include(&mut self, value: f64);

    /// Bumped whenever the mapping changes. Cached images compare it.
    fn version(&self) -> u64 {
        0
    }
}

/// Resolves a color axis by key, `None` meaning the plot's default axis.
pub trait ColorAxisLookup {
    fn color_axis(&self, key: Option<&str>) -> Option<&dyn ColorAxis>;

    fn color_axis_mut(&mut self, key: Option<&str>) -> Option<&mut dyn ColorAxis>;
}

/// Supplies colors for categories seen for the first time.
pub trait DefaultColorSource {
    fn default_color(&mut self) -> Color;
}

impl<F: FnMut() -> Color> DefaultColorSource for F {
    fn default_color(&mut self) -> Color {
        self()
    }
}

/// Drawing surface.
pub trait RenderContext {
    fn draw_image(&mut self, image: &PixelBuffer, dest: ScreenRect, opacity: f64, smooth: bool);

    fn draw_rectangle(
        &mut self,
        rect: ScreenRect,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
        mode: EdgeRenderingMode,
    );
}
