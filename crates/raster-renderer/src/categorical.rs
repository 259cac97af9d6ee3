//! Categorical column rasterization (lithology tracks).
//!
//! A sequence of `(category, position)` samples, sorted by position, becomes
//! a one-pixel-wide column whose rows cover the sample domain. The column is
//! cached and rebuilt only when the samples, the lithology registry or the
//! sampling settings change.

use raster_common::buffer::put_pixel;
use raster_common::{
    Color, ColumnConfig, DataBounds, DataPoint, DefaultColorSource, PixelBuffer, PlotTransform,
    RasterError, RasterResult, RenderConfig, RenderContext, SamplingPolicy, ScreenPoint,
    ScreenRect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::image::RasterImage;
use crate::lithology::{lithology_id, LithologyRegistry};
use crate::parallel::fill_rows;

/// One categorical observation. `category` may be NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub category: f64,
    pub position: f64,
}

impl Sample {
    pub fn new(category: f64, position: f64) -> Self {
        Self { category, position }
    }
}

/// Vertical extent and resolution of a rasterized column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    /// Data position of row 0.
    pub start: f64,
    /// Data position of the far edge of the last row.
    pub end: f64,
    /// Smallest strictly positive gap between consecutive samples.
    pub min_delta: f64,
    pub height: usize,
    /// Data units per row.
    pub pitch: f64,
}

impl ColumnLayout {
    /// Size the column so the finest sample spacing gets at least one row,
    /// capped at `max_height` rows.
    pub fn compute(samples: &[Sample], max_height: usize) -> RasterResult<Self> {
        let first = samples.first().ok_or(RasterError::EmptySamples)?;

        let (mut start, mut end) = (first.position, first.position);
        let mut min_delta = f64::INFINITY;
        for pair in samples.windows(2) {
            let delta = pair[1].position - pair[0].position;
            if delta > 0.0 && delta < min_delta {
                min_delta = delta;
            }
        }
        for s in samples {
            start = start.min(s.position);
            end = end.max(s.position);
        }
        if end == start {
            end = start + 1.0;
        }

        let span = end - start;
        if !min_delta.is_finite() {
            min_delta = span;
        }

        let natural = (span / min_delta).ceil();
        let height = if natural.is_finite() {
            (natural as usize).clamp(1, max_height.max(1))
        } else {
            max_height.max(1)
        };
        if natural > height as f64 {
            tracing::warn!(
                natural_height = natural,
                height,
                "column height capped, fine sample spacing will be merged"
            );
        }

        Ok(Self {
            start,
            end,
            min_delta,
            height,
            pitch: span / height as f64,
        })
    }

    /// Data position sampled for `row`.
    #[inline]
    pub fn position(&self, row: usize) -> f64 {
        self.start + row as f64 * self.pitch
    }
}

/// Run of consecutive samples sharing a category, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    end: f64,
    first_sample: usize,
}

/// Merge equal (or both-NaN) consecutive categories. The last run is open-ended.
fn build_runs(samples: &[Sample]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut first = 0;
    for i in 1..samples.len() {
        if !same_category(samples[first].category, samples[i].category) {
            runs.push(Run {
                end: samples[i].position,
                first_sample: first,
            });
            first = i;
        }
    }
    if !samples.is_empty() {
        runs.push(Run {
            end: f64::INFINITY,
            first_sample: first,
        });
    }
    runs
}

fn same_category(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Index of the sample closest to `position`: the last sample at or before
/// it versus the first at or after it, ties going to the earlier one.
pub fn nearest_sample(samples: &[Sample], position: f64) -> Option<usize> {
    if samples.is_empty() {
        return None;
    }
    let after = samples.partition_point(|s| s.position < position);
    let before = samples.partition_point(|s| s.position <= position).checked_sub(1);

    match (before, after < samples.len()) {
        (None, _) => Some(after.min(samples.len() - 1)),
        (Some(b), false) => Some(b),
        (Some(b), true) => {
            let d_before = position - samples[b].position;
            let d_after = samples[after].position - position;
            Some(if d_before <= d_after { b } else { after })
        }
    }
}

/// Result of a nearest-point query on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestSample {
    pub index: usize,
    pub lithology_id: i32,
    pub name: String,
    /// Query x with the owning sample's position.
    pub point: DataPoint,
}

#[derive(Debug, Clone)]
struct ColumnCache {
    buffer: Arc<PixelBuffer>,
    layout: ColumnLayout,
    samples_version: u64,
    registry_version: u64,
}

/// Builds and caches the pixel column for a categorical series.
#[derive(Debug, Clone)]
pub struct CategoricalColumnRasterizer {
    samples: Vec<Sample>,
    samples_version: u64,
    registry: LithologyRegistry,
    config: ColumnConfig,
    parallel: bool,
    column_left: f64,
    column_right: f64,
    cache: Option<ColumnCache>,
    recompute_count: u64,
}

impl CategoricalColumnRasterizer {
    pub fn new(registry: LithologyRegistry) -> Self {
        Self {
            samples: Vec::new(),
            samples_version: 0,
            registry,
            config: ColumnConfig::default(),
            parallel: false,
            column_left: 0.0,
            column_right: 1.0,
            cache: None,
            recompute_count: 0,
        }
    }

    pub fn with_config(registry: LithologyRegistry, config: &RenderConfig) -> Self {
        let mut rasterizer = Self::new(registry);
        rasterizer.config = config.column.clone();
        rasterizer.parallel = config.parallel;
        rasterizer
    }

    /// Replace the samples. They must be sorted by ascending position.
    pub fn set_samples(&mut self, samples: Vec<Sample>) {
        self.samples = samples;
        self.samples_version += 1;
    }

    pub fn push_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
        self.samples_version += 1;
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn registry(&self) -> &LithologyRegistry {
        &self.registry
    }

    /// Registry mutations bump its version, which invalidates the cache.
    pub fn registry_mut(&mut self) -> &mut LithologyRegistry {
        &mut self.registry
    }

    pub fn set_sampling(&mut self, sampling: SamplingPolicy) {
        if self.config.sampling != sampling {
            self.config.sampling = sampling;
            self.invalidate();
        }
    }

    pub fn sampling(&self) -> SamplingPolicy {
        self.config.sampling
    }

    pub fn set_max_height(&mut self, max_height: usize) {
        if self.config.max_height != max_height {
            self.config.max_height = max_height;
            self.invalidate();
        }
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Horizontal data extent the column is drawn across.
    pub fn set_column_extent(&mut self, left: f64, right: f64) {
        self.column_left = left;
        self.column_right = right;
    }

    /// Drop the cached column; the next render rebuilds it.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Number of times the column has actually been rasterized.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    fn cache_is_valid(&self) -> bool {
        self.cache.as_ref().is_some_and(|c| {
            c.samples_version == self.samples_version
                && c.registry_version == self.registry.version()
        })
    }

    /// Rasterize (or reuse) the column. Fails on an empty sample sequence.
    pub fn rasterize(
        &mut self,
        defaults: &mut dyn DefaultColorSource,
    ) -> RasterResult<(Arc<PixelBuffer>, ColumnLayout)> {
        if self.samples.is_empty() {
            return Err(RasterError::EmptySamples);
        }
        if let Some(cache) = self.cache.as_ref().filter(|_| self.cache_is_valid()) {
            tracing::trace!(height = cache.layout.height, "column cache hit");
            return Ok((cache.buffer.clone(), cache.layout));
        }

        let started = Instant::now();
        let layout = ColumnLayout::compute(&self.samples, self.config.max_height)?;

        // Resolve colors up front; the registry may register new ids here.
        let colors: Vec<Color> = self
            .samples
            .iter()
            .map(|s| self.registry.resolve_color(lithology_id(s.category), defaults))
            .collect();

        let mut buffer = PixelBuffer::new(1, layout.height);
        let samples = &self.samples;
        let run_count = match self.config.sampling {
            SamplingPolicy::HoldPrevious => {
                let runs = build_runs(samples);
                fill_rows(&mut buffer, self.parallel, |row, bytes| {
                    let pos = layout.position(row);
                    let run = runs
                        .partition_point(|r| r.end <= pos)
                        .min(runs.len() - 1);
                    put_pixel(bytes, 0, colors[runs[run].first_sample]);
                });
                runs.len()
            }
            SamplingPolicy::NearestNeighbor => {
                fill_rows(&mut buffer, self.parallel, |row, bytes| {
                    if let Some(i) = nearest_sample(samples, layout.position(row)) {
                        put_pixel(bytes, 0, colors[i]);
                    }
                });
                samples.len()
            }
        };

        self.recompute_count += 1;
        tracing::debug!(
            height = layout.height,
            runs = run_count,
            sampling = ?self.config.sampling,
            elapsed_us = started.elapsed().as_micros() as u64,
            "rasterized categorical column"
        );

        let buffer = Arc::new(buffer);
        self.cache = Some(ColumnCache {
            buffer: buffer.clone(),
            layout,
            samples_version: self.samples_version,
            registry_version: self.registry.version(),
        });
        Ok((buffer, layout))
    }

    /// Column image and its destination rectangle, `None` with no samples.
    pub fn image(
        &mut self,
        transform: &dyn PlotTransform,
        defaults: &mut dyn DefaultColorSource,
    ) -> RasterResult<Option<RasterImage>> {
        if self.samples.is_empty() {
            return Ok(None);
        }
        let (buffer, layout) = self.rasterize(defaults)?;

        let p0 = transform.transform(DataPoint::new(self.column_left, layout.start));
        let p1 = transform.transform(DataPoint::new(self.column_right, layout.end));
        let dest = ScreenRect::from_points(&[p0, p1]);

        // Row 0 holds the smallest position; flip when that end is lower on screen.
        let buffer = if p0.y > p1.y {
            Arc::new(buffer.flipped_vertically())
        } else {
            buffer
        };
        Ok(Some(RasterImage::new(buffer, dest, 1.0, false)))
    }

    pub fn render(
        &mut self,
        transform: &dyn PlotTransform,
        defaults: &mut dyn DefaultColorSource,
        ctx: &mut dyn RenderContext,
    ) -> RasterResult<()> {
        if let Some(image) = self.image(transform, defaults)? {
            image.draw(ctx);
        }
        Ok(())
    }

    /// Data bounds of the column: the drawn x extent by the sample positions.
    pub fn bounds(&self) -> Option<DataBounds> {
        let first = self.samples.first()?;
        let (min, max) = self.samples.iter().fold(
            (first.position, first.position),
            |(lo, hi), s| (lo.min(s.position), hi.max(s.position)),
        );
        Some(DataBounds::new(
            self.column_left.min(self.column_right),
            min,
            self.column_left.max(self.column_right),
            max,
        ))
    }

    /// Sample owning the screen point, for tooltips.
    pub fn nearest_point(
        &self,
        point: ScreenPoint,
        transform: &dyn PlotTransform,
    ) -> Option<NearestSample> {
        let data = transform.inverse_transform(point);
        if !self.bounds()?.contains(data) {
            return None;
        }
        let index = nearest_sample(&self.samples, data.y)?;
        let sample = self.samples[index];
        let id = lithology_id(sample.category);
        Some(NearestSample {
            index,
            lithology_id: id,
            name: self.registry.name_of(id),
            point: DataPoint::new(data.x, sample.position),
        })
    }
}
