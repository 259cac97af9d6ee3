//! Mock implementations of the host plotting traits.
//!
//! These stand in for a real plotting framework: simple linear and polar
//! transforms, a grayscale color axis, and a drawing context that records
//! every call instead of painting.

use raster_common::{
    AxisScale, Color, ColorAxis, ColorAxisLookup, DataPoint, DefaultColorSource,
    EdgeRenderingMode, Orientation, PixelBuffer, PlotTransform, RenderContext, ScreenPoint,
    ScreenRect,
};

/// Linear data-to-screen mapping over a plot area.
///
/// By default larger `y` is higher on screen. With `y_down` set larger `y`
/// is lower, as for depth tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianTransform {
    pub area: ScreenRect,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub y_down: bool,
}

impl CartesianTransform {
    pub fn new(area: ScreenRect, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            area,
            x_range,
            y_range,
            y_down: false,
        }
    }

    /// Square area `[0, size]` in pixels mapping `[-extent, extent]` on both axes.
    pub fn centered(size: f64, extent: f64) -> Self {
        Self::new(
            ScreenRect::new(0.0, 0.0, size, size),
            (-extent, extent),
            (-extent, extent),
        )
    }

    pub fn with_y_down(mut self) -> Self {
        self.y_down = true;
        self
    }

    pub fn with_area(mut self, area: ScreenRect) -> Self {
        self.area = area;
        self
    }
}

impl PlotTransform for CartesianTransform {
    fn transform(&self, point: DataPoint) -> ScreenPoint {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let fx = (point.x - x0) / (x1 - x0);
        let fy = (point.y - y0) / (y1 - y0);
        let y = if self.y_down {
            self.area.top + fy * self.area.height
        } else {
            self.area.bottom() - fy * self.area.height
        };
        ScreenPoint::new(self.area.left + fx * self.area.width, y)
    }

    fn inverse_transform(&self, point: ScreenPoint) -> DataPoint {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let fx = (point.x - self.area.left) / self.area.width;
        let fy = if self.y_down {
            (point.y - self.area.top) / self.area.height
        } else {
            (self.area.bottom() - point.y) / self.area.height
        };
        DataPoint::new(x0 + fx * (x1 - x0), y0 + fy * (y1 - y0))
    }

    fn plot_area(&self) -> ScreenRect {
        self.area
    }
}

/// Native polar surface: data points are `(magnitude, angle_degrees)`,
/// angle 0 to the right and increasing counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarTransform {
    pub area: ScreenRect,
    pub max_magnitude: f64,
}

impl PolarTransform {
    pub fn new(area: ScreenRect, max_magnitude: f64) -> Self {
        Self {
            area,
            max_magnitude,
        }
    }

    fn center(&self) -> (f64, f64) {
        (
            self.area.left + self.area.width / 2.0,
            self.area.top + self.area.height / 2.0,
        )
    }

    fn radius(&self) -> f64 {
        self.area.width.min(self.area.height) / 2.0
    }
}

impl PlotTransform for PolarTransform {
    fn transform(&self, point: DataPoint) -> ScreenPoint {
        let (cx, cy) = self.center();
        let r = point.x / self.max_magnitude * self.radius();
        let theta = point.y.to_radians();
        ScreenPoint::new(cx + r * theta.cos(), cy - r * theta.sin())
    }

    fn inverse_transform(&self, point: ScreenPoint) -> DataPoint {
        let (cx, cy) = self.center();
        let dx = point.x - cx;
        let dy = cy - point.y;
        let magnitude = dx.hypot(dy) / self.radius() * self.max_magnitude;
        DataPoint::new(magnitude, dy.atan2(dx).to_degrees())
    }

    fn plot_area(&self) -> ScreenRect {
        self.area
    }

    fn is_polar(&self) -> bool {
        true
    }
}

/// Linear axis between two screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub minimum: f64,
    pub maximum: f64,
    pub screen_start: f64,
    pub screen_end: f64,
    pub orientation: Orientation,
}

impl LinearScale {
    pub fn horizontal(minimum: f64, maximum: f64, screen_start: f64, screen_end: f64) -> Self {
        Self {
            minimum,
            maximum,
            screen_start,
            screen_end,
            orientation: Orientation::Horizontal,
        }
    }

    pub fn vertical(minimum: f64, maximum: f64, screen_start: f64, screen_end: f64) -> Self {
        Self {
            orientation: Orientation::Vertical,
            ..Self::horizontal(minimum, maximum, screen_start, screen_end)
        }
    }
}

impl AxisScale for LinearScale {
    fn transform(&self, value: f64) -> f64 {
        let t = (value - self.minimum) / (self.maximum - self.minimum);
        self.screen_start + t * (self.screen_end - self.screen_start)
    }

    fn actual_minimum(&self) -> f64 {
        self.minimum
    }

    fn actual_maximum(&self) -> f64 {
        self.maximum
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }
}

/// Black-to-white color axis over `[minimum, maximum]`.
///
/// Remembers every included value and widens to cover it, bumping its
/// version whenever the mapping changes.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayAxis {
    pub minimum: f64,
    pub maximum: f64,
    pub included: Vec<f64>,
    version: u64,
}

impl GrayAxis {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self {
            minimum,
            maximum,
            included: Vec::new(),
            version: 0,
        }
    }

    /// Empty axis that takes its range entirely from included values.
    pub fn auto() -> Self {
        Self::new(f64::INFINITY, f64::NEG_INFINITY)
    }

    pub fn set_range(&mut self, minimum: f64, maximum: f64) {
        self.minimum = minimum;
        self.maximum = maximum;
        self.version += 1;
    }
}

impl ColorAxis for GrayAxis {
    fn color(&self, value: f64) -> Color {
        if value.is_nan() || self.maximum < self.minimum {
            return Color::TRANSPARENT;
        }
        let span = self.maximum - self.minimum;
        let t = if span > 0.0 {
            (value - self.minimum) / span
        } else {
            0.0
        };
        Color::BLACK.lerp(&Color::WHITE, t)
    }

    fn include(&mut self, value: f64) {
        self.included.push(value);
        if value.is_nan() {
            return;
        }
        if value < self.minimum || value > self.maximum {
            self.minimum = self.minimum.min(value);
            self.maximum = self.maximum.max(value);
            self.version += 1;
        }
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Color axes keyed by name, plus an optional default.
#[derive(Debug, Clone, Default)]
pub struct AxisMap<A> {
    pub default: Option<A>,
    pub named: Vec<(String, A)>,
}

impl<A> AxisMap<A> {
    pub fn with_default(axis: A) -> Self {
        Self {
            default: Some(axis),
            named: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, axis: A) {
        self.named.push((key.into(), axis));
    }

    pub fn get(&self, key: Option<&str>) -> Option<&A> {
        match key {
            None => self.default.as_ref(),
            Some(k) => self.named.iter().find(|(name, _)| name == k).map(|(_, a)| a),
        }
    }

    pub fn get_mut(&mut self, key: Option<&str>) -> Option<&mut A> {
        match key {
            None => self.default.as_mut(),
            Some(k) => self
                .named
                .iter_mut()
                .find(|(name, _)| name == k)
                .map(|(_, a)| a),
        }
    }
}

impl<A: ColorAxis> ColorAxisLookup for AxisMap<A> {
    fn color_axis(&self, key: Option<&str>) -> Option<&dyn ColorAxis> {
        self.get(key).map(|a| a as &dyn ColorAxis)
    }

    fn color_axis_mut(&mut self, key: Option<&str>) -> Option<&mut dyn ColorAxis> {
        self.get_mut(key).map(|a| a as &mut dyn ColorAxis)
    }
}

/// Hands out colors from a fixed list in order, wrapping around.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycle {
    colors: Vec<Color>,
    next: usize,
    pub calls: usize,
}

impl ColorCycle {
    pub fn new(colors: &[Color]) -> Self {
        Self {
            colors: colors.to_vec(),
            next: 0,
            calls: 0,
        }
    }
}

impl DefaultColorSource for ColorCycle {
    fn default_color(&mut self) -> Color {
        self.calls += 1;
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        color
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnImage {
    pub buffer: PixelBuffer,
    pub dest: ScreenRect,
    pub opacity: f64,
    pub smooth: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnRect {
    pub rect: ScreenRect,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub mode: EdgeRenderingMode,
}

/// Drawing surface that records calls in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    pub images: Vec<DrawnImage>,
    pub rectangles: Vec<DrawnRect>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.rectangles.clear();
    }
}

impl RenderContext for RecordingContext {
    fn draw_image(&mut self, image: &PixelBuffer, dest: ScreenRect, opacity: f64, smooth: bool) {
        self.images.push(DrawnImage {
            buffer: image.clone(),
            dest,
            opacity,
            smooth,
        });
    }

    fn draw_rectangle(
        &mut self,
        rect: ScreenRect,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
        mode: EdgeRenderingMode,
    ) {
        self.rectangles.push(DrawnRect {
            rect,
            fill,
            stroke,
            stroke_width,
            mode,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_round_trip_both_directions() {
        let up = CartesianTransform::new(ScreenRect::new(10.0, 20.0, 100.0, 50.0), (0.0, 1.0), (0.0, 10.0));
        let p = up.transform(DataPoint::new(0.5, 10.0));
        assert!((p.x - 60.0).abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);

        let down = up.with_y_down();
        let p = down.transform(DataPoint::new(0.5, 10.0));
        assert!((p.y - 70.0).abs() < 1e-9);
        let back = down.inverse_transform(p);
        assert!((back.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_polar_transform_angles() {
        let t = PolarTransform::new(ScreenRect::new(0.0, 0.0, 100.0, 100.0), 10.0);
        let p = t.transform(DataPoint::new(10.0, 90.0));
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
        let d = t.inverse_transform(ScreenPoint::new(50.0, 100.0));
        assert!((d.x - 10.0).abs() < 1e-9);
        assert!((d.y + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_gray_axis_include_widens() {
        let mut axis = GrayAxis::new(0.0, 1.0);
        axis.include(0.5);
        assert_eq!(axis.version(), 0);
        axis.include(4.0);
        assert_eq!(axis.version(), 1);
        assert_eq!(axis.maximum, 4.0);
        assert_eq!(axis.color(4.0), Color::WHITE);
        assert_eq!(axis.color(f64::NAN), Color::TRANSPARENT);
    }

    #[test]
    fn test_axis_map_lookup() {
        let mut axes = AxisMap::with_default(GrayAxis::new(0.0, 1.0));
        axes.insert("depth", GrayAxis::new(0.0, 100.0));
        assert!(axes.color_axis(None).is_some());
        assert!(axes.color_axis(Some("depth")).is_some());
        assert!(axes.color_axis(Some("missing")).is_none());
    }

    #[test]
    fn test_color_cycle_wraps() {
        let mut cycle = ColorCycle::new(&[Color::BLACK, Color::WHITE]);
        assert_eq!(cycle.default_color(), Color::BLACK);
        assert_eq!(cycle.default_color(), Color::WHITE);
        assert_eq!(cycle.default_color(), Color::BLACK);
        assert_eq!(cycle.calls, 3);
    }
}
