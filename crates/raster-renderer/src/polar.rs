//! Polar scalar field rasterization.
//!
//! A [`ScalarField`] indexed by `(magnitude bin, angle bin)` is projected
//! onto a Cartesian or native polar plot surface. Each destination pixel is
//! inverse-transformed to data space, converted to `(magnitude, angle)`,
//! mapped to fractional grid indices, sampled, and colored through the
//! host's color axis.
//!
//! Two modes:
//! - **Dynamic**: rendered at plot-area size on every frame.
//! - **Fixed**: rendered once at a fixed resolution over the square
//!   `[-R, R] x [-R, R]` and rescaled to the current screen extent of the
//!   domain. Only data, domain or color-axis changes trigger a rebuild.

use raster_common::buffer::put_pixel;
use raster_common::{
    Color, ColorAxis, ColorAxisLookup, DataPoint, PixelBuffer, PlotTransform, PolarConfig,
    RasterError, RasterResult, RenderConfig, RenderContext, ScreenPoint, ScreenRect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::field::ScalarField;
use crate::image::RasterImage;
use crate::parallel::fill_rows;

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        a - 360.0
    } else {
        a
    }
}

/// Cartesian `(x, y)` to `(magnitude, angle_degrees)`, angle in `[0, 360)`.
pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), normalize_angle(y.atan2(x).to_degrees()))
}

/// Mapping from grid indices to polar data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarDomain {
    pub angle0: f64,
    pub angle1: f64,
    pub magnitude0: f64,
    pub magnitude1: f64,
    /// Subtracted from every plot angle before grid lookup.
    #[serde(default)]
    pub rotation_angle: f64,
}

impl PolarDomain {
    pub fn new(angle0: f64, angle1: f64, magnitude0: f64, magnitude1: f64) -> RasterResult<Self> {
        let domain = Self {
            angle0,
            angle1,
            magnitude0,
            magnitude1,
            rotation_angle: 0.0,
        };
        domain.validate()?;
        Ok(domain)
    }

    pub fn with_rotation(mut self, rotation_angle: f64) -> Self {
        self.rotation_angle = rotation_angle;
        self
    }

    pub fn validate(&self) -> RasterResult<()> {
        let values = [self.angle0, self.angle1, self.magnitude0, self.magnitude1, self.rotation_angle];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RasterError::InvalidField(
                "polar domain values must be finite".to_string(),
            ));
        }
        if self.angle1 == self.angle0 || self.magnitude1 == self.magnitude0 {
            return Err(RasterError::InvalidField(format!(
                "degenerate polar domain: angle {}..{}, magnitude {}..{}",
                self.angle0, self.angle1, self.magnitude0, self.magnitude1
            )));
        }
        Ok(())
    }

    /// Radius of the square a fixed-mode image covers.
    pub fn outer_radius(&self) -> f64 {
        self.magnitude0.abs().max(self.magnitude1.abs())
    }

    /// Fractional `(i, j)` grid indices for a plot-space `(magnitude, angle)`,
    /// or `None` outside the grid.
    pub fn grid_indices(&self, magnitude: f64, angle: f64, rows: usize, cols: usize) -> Option<(f64, f64)> {
        let angle = normalize_angle(angle - self.rotation_angle);
        let j = (angle - self.angle0) / (self.angle1 - self.angle0) * cols as f64;
        let i = (magnitude - self.magnitude0) / (self.magnitude1 - self.magnitude0) * rows as f64;

        let inside = (0.0..rows as f64).contains(&i) && (0.0..cols as f64).contains(&j);
        inside.then_some((i, j))
    }
}

/// Image sizing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    /// Plot-area size, recomputed every render.
    #[default]
    Dynamic,
    /// Fixed resolution, computed once and rescaled.
    Fixed { width: usize, height: usize },
}

/// Tooltip data for a screen point over the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarHit {
    pub magnitude: f64,
    /// Plot angle in `[0, 360)`, before the rotation offset is removed.
    pub angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone)]
struct FieldCache {
    buffer: Arc<PixelBuffer>,
    field_version: u64,
    axis_version: u64,
}

/// Rasterizes a polar field for a heat-map series.
#[derive(Debug, Clone)]
pub struct PolarFieldRasterizer {
    field: ScalarField,
    domain: PolarDomain,
    interpolate: bool,
    /// Multiplied into the alpha of every axis color.
    alpha: u8,
    mode: RasterMode,
    parallel: bool,
    color_axis_key: Option<String>,
    version: u64,
    cache: Option<FieldCache>,
    recompute_count: u64,
}

impl PolarFieldRasterizer {
    pub fn new(field: ScalarField, domain: PolarDomain) -> Self {
        let polar = PolarConfig::default();
        Self {
            field,
            domain,
            interpolate: polar.interpolate,
            alpha: polar.alpha,
            mode: RasterMode::Dynamic,
            parallel: false,
            color_axis_key: None,
            version: 0,
            cache: None,
            recompute_count: 0,
        }
    }

    pub fn with_config(field: ScalarField, domain: PolarDomain, config: &RenderConfig) -> Self {
        let mut rasterizer = Self::new(field, domain);
        rasterizer.interpolate = config.polar.interpolate;
        rasterizer.alpha = config.polar.alpha;
        rasterizer.parallel = config.parallel;
        rasterizer.mode = match config.polar.image_size {
            Some([width, height]) => RasterMode::Fixed { width, height },
            None => RasterMode::Dynamic,
        };
        rasterizer
    }

    pub fn field(&self) -> &ScalarField {
        &self.field
    }

    pub fn domain(&self) -> &PolarDomain {
        &self.domain
    }

    pub fn set_field(&mut self, field: ScalarField) {
        self.field = field;
        self.invalidate();
    }

    pub fn set_domain(&mut self, domain: PolarDomain) -> RasterResult<()> {
        domain.validate()?;
        self.domain = domain;
        self.invalidate();
        Ok(())
    }

    pub fn set_interpolate(&mut self, interpolate: bool) {
        if self.interpolate != interpolate {
            self.interpolate = interpolate;
            self.invalidate();
        }
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.invalidate();
        }
    }

    pub fn set_mode(&mut self, mode: RasterMode) {
        if self.mode != mode {
            self.mode = mode;
            self.cache = None;
        }
    }

    pub fn mode(&self) -> RasterMode {
        self.mode
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Bind to a named color axis; `None` uses the plot's default.
    pub fn set_color_axis_key(&mut self, key: Option<String>) {
        self.color_axis_key = key;
        self.cache = None;
    }

    /// Mark the fixed-mode image stale.
    pub fn invalidate(&mut self) {
        self.version += 1;
    }

    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    fn axis_not_found(&self) -> RasterError {
        RasterError::ColorAxisNotFound(
            self.color_axis_key
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        )
    }

    /// Report the field's value range to the bound color axis for auto-scaling.
    pub fn update_axis_range(&self, axes: &mut dyn ColorAxisLookup) -> RasterResult<()> {
        let key = self.color_axis_key.as_deref();
        let axis = axes
            .color_axis_mut(key)
            .ok_or_else(|| self.axis_not_found())?;
        if let Some((min, max)) = self.field.value_range() {
            axis.include(min);
            axis.include(max);
        }
        Ok(())
    }

    /// Color for a plot-space `(magnitude, angle)`; transparent outside the grid.
    fn pixel_color(&self, magnitude: f64, angle: f64, axis: &dyn ColorAxis) -> Color {
        let indices = self
            .domain
            .grid_indices(magnitude, angle, self.field.rows(), self.field.cols());
        match indices {
            Some((i, j)) => {
                let value = self.field.sample(i, j, self.interpolate);
                if value.is_nan() {
                    Color::TRANSPARENT
                } else {
                    axis.color(value).scale_alpha(self.alpha)
                }
            }
            None => Color::TRANSPARENT,
        }
    }

    /// Plot-space `(magnitude, angle)` under a screen point.
    fn polar_at(transform: &dyn PlotTransform, point: ScreenPoint) -> (f64, f64) {
        let data = transform.inverse_transform(point);
        if transform.is_polar() {
            (data.x, normalize_angle(data.y))
        } else {
            cartesian_to_polar(data.x, data.y)
        }
    }

    /// Render at plot-area resolution through the host transform.
    pub fn rasterize_dynamic(
        &mut self,
        transform: &dyn PlotTransform,
        axis: &dyn ColorAxis,
    ) -> PixelBuffer {
        let area = transform.plot_area();
        let (width, height) = area.pixel_size();
        let started = Instant::now();

        let mut buffer = PixelBuffer::new(width, height);
        let this = &*self;
        fill_rows(&mut buffer, self.parallel, |row, bytes| {
            let y = area.top + row as f64 + 0.5;
            for col in 0..width {
                let point = ScreenPoint::new(area.left + col as f64 + 0.5, y);
                let (magnitude, angle) = Self::polar_at(transform, point);
                put_pixel(bytes, col, this.pixel_color(magnitude, angle, axis));
            }
        });

        self.recompute_count += 1;
        tracing::debug!(
            width,
            height,
            elapsed_us = started.elapsed().as_micros() as u64,
            "rasterized polar field (dynamic)"
        );
        buffer
    }

    /// Render the normalized `[-R, R]` square at a fixed size.
    pub fn rasterize_fixed(&mut self, width: usize, height: usize, axis: &dyn ColorAxis) -> PixelBuffer {
        let radius = self.domain.outer_radius();
        let started = Instant::now();

        let mut buffer = PixelBuffer::new(width, height);
        let this = &*self;
        fill_rows(&mut buffer, self.parallel, |row, bytes| {
            let y = radius - (row as f64 + 0.5) / height as f64 * 2.0 * radius;
            for col in 0..width {
                let x = -radius + (col as f64 + 0.5) / width as f64 * 2.0 * radius;
                let (magnitude, angle) = cartesian_to_polar(x, y);
                put_pixel(bytes, col, this.pixel_color(magnitude, angle, axis));
            }
        });

        self.recompute_count += 1;
        tracing::debug!(
            width,
            height,
            rows = self.field.rows(),
            cols = self.field.cols(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "rasterized polar field (fixed)"
        );
        buffer
    }

    /// Screen rectangle spanned by the four cardinal extrema of the domain.
    pub fn fixed_destination(&self, transform: &dyn PlotTransform) -> ScreenRect {
        let r = self.domain.outer_radius();
        let extrema = if transform.is_polar() {
            [
                DataPoint::new(r, 0.0),
                DataPoint::new(r, 90.0),
                DataPoint::new(r, 180.0),
                DataPoint::new(r, 270.0),
            ]
        } else {
            [
                DataPoint::new(r, 0.0),
                DataPoint::new(0.0, r),
                DataPoint::new(-r, 0.0),
                DataPoint::new(0.0, -r),
            ]
        };
        let points: Vec<ScreenPoint> = extrema.iter().map(|p| transform.transform(*p)).collect();
        ScreenRect::from_points(&points)
    }

    /// Produce the image for this frame, `None` for an empty plot area.
    pub fn image(
        &mut self,
        transform: &dyn PlotTransform,
        axes: &dyn ColorAxisLookup,
    ) -> RasterResult<Option<RasterImage>> {
        let axis = axes
            .color_axis(self.color_axis_key.as_deref())
            .ok_or_else(|| self.axis_not_found())?;

        match self.mode {
            RasterMode::Dynamic => {
                let area = transform.plot_area();
                let (width, height) = area.pixel_size();
                if width == 0 || height == 0 {
                    return Ok(None);
                }
                let buffer = self.rasterize_dynamic(transform, axis);
                Ok(Some(RasterImage::new(Arc::new(buffer), area, 1.0, false)))
            }
            RasterMode::Fixed { width, height } => {
                if width == 0 || height == 0 {
                    return Ok(None);
                }
                let axis_version = axis.version();
                let cached = self
                    .cache
                    .as_ref()
                    .filter(|c| c.field_version == self.version && c.axis_version == axis_version)
                    .map(|c| c.buffer.clone());
                let buffer = match cached {
                    Some(buffer) => {
                        tracing::trace!("polar field cache hit");
                        buffer
                    }
                    None => {
                        let buffer = Arc::new(self.rasterize_fixed(width, height, axis));
                        self.cache = Some(FieldCache {
                            buffer: buffer.clone(),
                            field_version: self.version,
                            axis_version,
                        });
                        buffer
                    }
                };
                let dest = self.fixed_destination(transform);
                Ok(Some(RasterImage::new(buffer, dest, 1.0, self.interpolate)))
            }
        }
    }

    pub fn render(
        &mut self,
        transform: &dyn PlotTransform,
        axes: &dyn ColorAxisLookup,
        ctx: &mut dyn RenderContext,
    ) -> RasterResult<()> {
        if let Some(image) = self.image(transform, axes)? {
            image.draw(ctx);
        }
        Ok(())
    }

    /// Magnitude, angle and sampled value under a screen point, for tooltips.
    pub fn nearest_point(&self, point: ScreenPoint, transform: &dyn PlotTransform) -> Option<PolarHit> {
        let (magnitude, angle) = Self::polar_at(transform, point);
        let (i, j) = self
            .domain
            .grid_indices(magnitude, angle, self.field.rows(), self.field.cols())?;
        Some(PolarHit {
            magnitude,
            angle,
            value: self.field.sample(i, j, self.interpolate),
        })
    }
}
