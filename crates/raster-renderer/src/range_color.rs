//! Range-partitioned color axis.
//!
//! A [`RangeColorAxis`] splits the data axis into ordered, disjoint
//! sub-ranges, each carrying its own palette. A lookup yields a
//! [`PaletteIndex`]: one of three sentinels or a `(subrange, index)` pair
//! with a 1-based in-range palette slot.
//!
//! With exactly one range registered, that range spans whatever the axis
//! currently shows (`actual_minimum..actual_maximum`). The stored bounds are
//! left untouched; the effective bounds are computed per lookup.

use raster_common::{
    AxisScale, Color, ColorAxis, EdgeRenderingMode, Orientation, Palette, RasterError,
    RasterResult, RenderContext, ScreenRect,
};

/// Packed form of [`PaletteIndex::BelowRange`].
pub const LOW_SENTINEL: i32 = -1;
/// Packed form of [`PaletteIndex::AboveRange`].
pub const HIGH_SENTINEL: i32 = i32::MAX;
/// Packed form of [`PaletteIndex::Invalid`].
pub const INVALID_SENTINEL: i32 = i32::MIN;

const INDEX_BITS: u32 = 16;
const INDEX_MASK: i32 = 0xFFFF;
/// Largest sub-range ordinal that packs without reaching `HIGH_SENTINEL`.
pub const MAX_PACKED_SUBRANGE: usize = 0x7FFE;
/// Largest 1-based palette slot that packs into the low 16 bits.
pub const MAX_PACKED_INDEX: usize = 0xFFFF;

/// Outcome of a palette lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteIndex {
    /// NaN, or a value in a gap between ranges.
    Invalid,
    /// Below the first range while a low color is configured.
    BelowRange,
    /// Above the last range while a high color is configured.
    AboveRange,
    /// `index` is 1-based within the palette of range `subrange`.
    InRange { subrange: usize, index: usize },
}

impl PaletteIndex {
    /// Compact wire form: sub-range ordinal in the high 16 bits, palette
    /// slot in the low 16 bits.
    pub fn pack(&self) -> RasterResult<i32> {
        match *self {
            PaletteIndex::Invalid => Ok(INVALID_SENTINEL),
            PaletteIndex::BelowRange => Ok(LOW_SENTINEL),
            PaletteIndex::AboveRange => Ok(HIGH_SENTINEL),
            PaletteIndex::InRange { subrange, index } => {
                if subrange > MAX_PACKED_SUBRANGE {
                    return Err(RasterError::RangeCapacityExceeded {
                        what: "sub-range ordinal",
                        value: subrange,
                        max: MAX_PACKED_SUBRANGE,
                    });
                }
                if index == 0 || index > MAX_PACKED_INDEX {
                    return Err(RasterError::RangeCapacityExceeded {
                        what: "palette index",
                        value: index,
                        max: MAX_PACKED_INDEX,
                    });
                }
                Ok(((subrange as i32) << INDEX_BITS) | index as i32)
            }
        }
    }

    pub fn unpack(packed: i32) -> Self {
        match packed {
            LOW_SENTINEL => PaletteIndex::BelowRange,
            HIGH_SENTINEL => PaletteIndex::AboveRange,
            p if p < 0 => PaletteIndex::Invalid,
            p => {
                let index = (p & INDEX_MASK) as usize;
                if index == 0 {
                    return PaletteIndex::Invalid;
                }
                PaletteIndex::InRange {
                    subrange: (p >> INDEX_BITS) as usize,
                    index,
                }
            }
        }
    }
}

/// One sub-range `[lower, upper)` with its palette.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteRange {
    pub lower: f64,
    pub upper: f64,
    pub palette: Palette,
}

impl PaletteRange {
    pub fn new(lower: f64, upper: f64, palette: Palette) -> RasterResult<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(RasterError::InvalidRange { lower, upper });
        }
        Ok(Self {
            lower,
            upper,
            palette,
        })
    }
}

/// Screen placement of the color band drawn for the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBand {
    /// Screen coordinate where the band starts, across the axis direction.
    pub offset: f64,
    /// Band size across the axis direction, also used for end markers.
    pub thickness: f64,
}

/// Color axis made of several palette sub-ranges.
#[derive(Debug, Clone)]
pub struct RangeColorAxis {
    ranges: Vec<PaletteRange>,
    low_color: Color,
    high_color: Color,
    invalid_color: Color,
    actual_minimum: f64,
    actual_maximum: f64,
    data_range: Option<(f64, f64)>,
    version: u64,
}

impl Default for RangeColorAxis {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeColorAxis {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            low_color: Color::Automatic,
            high_color: Color::Automatic,
            invalid_color: Color::TRANSPARENT,
            actual_minimum: 0.0,
            actual_maximum: 100.0,
            data_range: None,
            version: 0,
        }
    }

    /// Append a range. Ranges must be added in ascending, disjoint order.
    pub fn add_range(&mut self, lower: f64, upper: f64, palette: Palette) -> RasterResult<()> {
        self.ranges.push(PaletteRange::new(lower, upper, palette)?);
        self.version += 1;
        Ok(())
    }

    pub fn clear_ranges(&mut self) {
        self.ranges.clear();
        self.version += 1;
    }

    pub fn ranges(&self) -> &[PaletteRange] {
        &self.ranges
    }

    /// `Color::Automatic` disables the below-range sentinel.
    pub fn set_low_color(&mut self, color: Color) {
        self.low_color = color;
        self.version += 1;
    }

    /// `Color::Automatic` disables the above-range sentinel.
    pub fn set_high_color(&mut self, color: Color) {
        self.high_color = color;
        self.version += 1;
    }

    pub fn set_invalid_color(&mut self, color: Color) {
        self.invalid_color = color;
        self.version += 1;
    }

    pub fn low_color(&self) -> Color {
        self.low_color
    }

    pub fn high_color(&self) -> Color {
        self.high_color
    }

    pub fn invalid_color(&self) -> Color {
        self.invalid_color
    }

    /// Visible range after the host's auto-scaling.
    pub fn set_actual_range(&mut self, minimum: f64, maximum: f64) {
        if minimum != self.actual_minimum || maximum != self.actual_maximum {
            self.actual_minimum = minimum;
            self.actual_maximum = maximum;
            self.version += 1;
        }
    }

    pub fn actual_minimum(&self) -> f64 {
        self.actual_minimum
    }

    pub fn actual_maximum(&self) -> f64 {
        self.actual_maximum
    }

    /// Min/max of all values passed to [`ColorAxis::include`].
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.data_range
    }

    pub fn reset_data_range(&mut self) {
        self.data_range = None;
    }

    /// Adopt the included data range as the visible range.
    pub fn auto_scale(&mut self) {
        if let Some((min, max)) = self.data_range {
            self.set_actual_range(min, max);
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bounds used for range `i`: a lone range follows the visible range.
    fn effective_bounds(&self, i: usize) -> (f64, f64) {
        if self.ranges.len() == 1 {
            (self.actual_minimum, self.actual_maximum)
        } else {
            (self.ranges[i].lower, self.ranges[i].upper)
        }
    }

    /// Look up the palette slot for `value`.
    ///
    /// Fails with [`RasterError::NoRanges`] if no range is registered.
    pub fn palette_index(&self, value: f64) -> RasterResult<PaletteIndex> {
        let last = match self.ranges.len() {
            0 => return Err(RasterError::NoRanges),
            n => n - 1,
        };

        if value.is_nan() {
            return Ok(PaletteIndex::Invalid);
        }

        if self.low_color.is_defined() && value < self.effective_bounds(0).0 {
            return Ok(PaletteIndex::BelowRange);
        }
        if self.high_color.is_defined() && value > self.effective_bounds(last).1 {
            return Ok(PaletteIndex::AboveRange);
        }

        for (i, range) in self.ranges.iter().enumerate() {
            let (lower, upper) = self.effective_bounds(i);
            let inside = value >= lower && (value < upper || (i == last && value == upper));
            if inside {
                let index = in_range_index(value, lower, upper, range.palette.len());
                return Ok(PaletteIndex::InRange { subrange: i, index });
            }
        }

        Ok(PaletteIndex::Invalid)
    }

    /// Packed wire form of [`palette_index`](Self::palette_index).
    pub fn packed_palette_index(&self, value: f64) -> RasterResult<i32> {
        self.palette_index(value)?.pack()
    }

    /// Color for a lookup result.
    pub fn color_of(&self, index: PaletteIndex) -> Color {
        match index {
            PaletteIndex::BelowRange => self.low_color,
            PaletteIndex::AboveRange => self.high_color,
            PaletteIndex::Invalid => self.invalid_color,
            PaletteIndex::InRange { subrange, index } => self
                .ranges
                .get(subrange)
                .and_then(|r| index.checked_sub(1).and_then(|i| r.palette.get(i)))
                .unwrap_or(self.invalid_color),
        }
    }

    pub fn color_of_packed(&self, packed: i32) -> Color {
        self.color_of(PaletteIndex::unpack(packed))
    }

    /// Draw the axis color band: every palette slot of every range becomes a
    /// rectangle clipped to the visible range, plus end markers for the
    /// low/high colors when configured.
    pub fn render_band(&self, scale: &dyn AxisScale, band: AxisBand, ctx: &mut dyn RenderContext) {
        let (min, max) = (scale.actual_minimum(), scale.actual_maximum());
        let orientation = scale.orientation();

        for (i, range) in self.ranges.iter().enumerate() {
            let (lower, upper) = self.effective_bounds(i);
            let n = range.palette.len();
            let step = (upper - lower) / n as f64;

            for (k, color) in range.palette.colors().iter().enumerate() {
                let a = (lower + k as f64 * step).max(min);
                let b = (lower + (k + 1) as f64 * step).min(max);
                if b <= a {
                    continue;
                }
                let rect = band_rect(orientation, band, scale.transform(a), scale.transform(b));
                ctx.draw_rectangle(
                    rect,
                    *color,
                    Color::Automatic,
                    0.0,
                    EdgeRenderingMode::PreferSharpness,
                );
            }
        }

        let s_min = scale.transform(min);
        let s_max = scale.transform(max);
        let direction = if s_max >= s_min { 1.0 } else { -1.0 };

        if self.low_color.is_defined() {
            let rect = band_rect(orientation, band, s_min - direction * band.thickness, s_min);
            ctx.draw_rectangle(
                rect,
                self.low_color,
                Color::Automatic,
                0.0,
                EdgeRenderingMode::PreferSharpness,
            );
        }
        if self.high_color.is_defined() {
            let rect = band_rect(orientation, band, s_max, s_max + direction * band.thickness);
            ctx.draw_rectangle(
                rect,
                self.high_color,
                Color::Automatic,
                0.0,
                EdgeRenderingMode::PreferSharpness,
            );
        }
    }
}

/// `1 + floor((value - lower) / (upper - lower) * n)`, clamped to `[1, n]`.
fn in_range_index(value: f64, lower: f64, upper: f64, n: usize) -> usize {
    let width = upper - lower;
    if !(width > 0.0) {
        return 1;
    }
    let raw = 1.0 + ((value - lower) / width * n as f64).floor();
    raw.clamp(1.0, n as f64) as usize
}

fn band_rect(orientation: Orientation, band: AxisBand, s0: f64, s1: f64) -> ScreenRect {
    let (start, length) = (s0.min(s1), (s1 - s0).abs());
    match orientation {
        Orientation::Vertical => ScreenRect::new(band.offset, start, band.thickness, length),
        Orientation::Horizontal => ScreenRect::new(start, band.offset, length, band.thickness),
    }
}

impl ColorAxis for RangeColorAxis {
    fn color(&self, value: f64) -> Color {
        match self.palette_index(value) {
            Ok(index) => self.color_of(index),
            Err(_) => self.invalid_color,
        }
    }

    fn include(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.data_range = Some(match self.data_range {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(n: usize) -> Palette {
        let colors = (0..n).map(|i| Color::rgb(i as u8, 0, 0)).collect();
        Palette::new(colors).unwrap()
    }

    #[test]
    fn test_in_range_index_clamps() {
        assert_eq!(in_range_index(0.0, 0.0, 10.0, 5), 1);
        assert_eq!(in_range_index(9.999, 0.0, 10.0, 5), 5);
        assert_eq!(in_range_index(10.0, 0.0, 10.0, 5), 5);
        assert_eq!(in_range_index(4.0, 0.0, 10.0, 5), 3);
    }

    #[test]
    fn test_pack_layout() {
        let idx = PaletteIndex::InRange {
            subrange: 2,
            index: 7,
        };
        assert_eq!(idx.pack().unwrap(), (2 << 16) | 7);
        assert_eq!(PaletteIndex::unpack((2 << 16) | 7), idx);
    }

    #[test]
    fn test_pack_rejects_overflow() {
        let idx = PaletteIndex::InRange {
            subrange: 0,
            index: 70_000,
        };
        assert!(matches!(
            idx.pack(),
            Err(RasterError::RangeCapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_gap_between_ranges_is_invalid() {
        let mut axis = RangeColorAxis::new();
        axis.add_range(0.0, 1.0, palette(2)).unwrap();
        axis.add_range(2.0, 3.0, palette(2)).unwrap();
        assert_eq!(axis.palette_index(1.5).unwrap(), PaletteIndex::Invalid);
    }

    #[test]
    fn test_version_bumps_on_mutation() {
        let mut axis = RangeColorAxis::new();
        let v0 = axis.version();
        axis.add_range(0.0, 1.0, palette(2)).unwrap();
        axis.set_actual_range(0.0, 100.0); // unchanged
        assert_eq!(axis.version(), v0 + 1);
    }
}
