//! Dense 2-D scalar grids and their sampling.
//!
//! Storage is a flat row-major buffer; `idx(row, col) = row * cols + col`.
//! For polar fields rows are magnitude bins and columns are angle bins.

use raster_common::{RasterError, RasterResult};

/// Below this value span the field is treated as constant and sampled
/// without interpolation.
pub const DEGENERATE_RANGE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    value_range: Option<(f64, f64)>,
}

impl ScalarField {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> RasterResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(RasterError::InvalidField(format!(
                "grid must be non-empty, got {}x{}",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(RasterError::InvalidField(format!(
                "expected {} values for {}x{} grid, got {}",
                rows * cols,
                rows,
                cols,
                data.len()
            )));
        }
        let value_range = finite_range(&data);
        Ok(Self {
            rows,
            cols,
            data,
            value_range,
        })
    }

    /// Build from nested rows; all rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> RasterResult<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(RasterError::InvalidField("ragged rows".to_string()));
        }
        Self::new(rows.len(), cols, rows.concat())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.idx(row, col).map(|i| self.data[i])
    }

    /// Min/max over non-NaN values, `None` if every value is NaN.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.value_range
    }

    fn is_degenerate(&self) -> bool {
        match self.value_range {
            Some((min, max)) => max - min < DEGENERATE_RANGE_EPSILON,
            None => true,
        }
    }

    /// Sample at fractional grid indices (`i` along rows, `j` along columns).
    ///
    /// Falls back to nearest-cell sampling when `interpolate` is off or the
    /// field is constant.
    pub fn sample(&self, i: f64, j: f64, interpolate: bool) -> f64 {
        if !interpolate || self.is_degenerate() {
            self.sample_nearest(i, j)
        } else {
            self.sample_bilinear(i, j)
        }
    }

    /// Value of the cell containing `(i, j)`.
    pub fn sample_nearest(&self, i: f64, j: f64) -> f64 {
        let r = clamp_index(i.floor(), self.rows);
        let c = clamp_index(j.floor(), self.cols);
        self.data[r * self.cols + c]
    }

    /// Bilinear blend of the four cells around `(i, j)`, treating cell
    /// centers as sample locations and clamping at the grid edges.
    pub fn sample_bilinear(&self, i: f64, j: f64) -> f64 {
        let si = i - 0.5;
        let sj = j - 0.5;
        let fi = si.floor();
        let fj = sj.floor();
        let di = si - fi;
        let dj = sj - fj;

        let r0 = clamp_index(fi, self.rows);
        let r1 = clamp_index(fi + 1.0, self.rows);
        let c0 = clamp_index(fj, self.cols);
        let c1 = clamp_index(fj + 1.0, self.cols);

        let v = |r: usize, c: usize| self.data[r * self.cols + c];

        let v0 = v(r0, c0) * (1.0 - dj) + v(r0, c1) * dj;
        let v1 = v(r1, c0) * (1.0 - dj) + v(r1, c1) * dj;
        v0 * (1.0 - di) + v1 * di
    }
}

#[inline]
fn clamp_index(x: f64, n: usize) -> usize {
    x.max(0.0).min((n - 1) as f64) as usize
}

fn finite_range(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
            None => Some((v, v)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> ScalarField {
        ScalarField::from_rows(&[vec![0.0, 10.0], vec![20.0, 30.0]]).unwrap()
    }

    #[test]
    fn test_bilinear_center_is_mean() {
        assert_eq!(two_by_two().sample_bilinear(1.0, 1.0), 15.0);
    }

    #[test]
    fn test_bilinear_clamps_at_edges() {
        let f = two_by_two();
        // Cell centers reproduce the cell value
        assert_eq!(f.sample_bilinear(0.5, 0.5), 0.0);
        assert_eq!(f.sample_bilinear(1.5, 1.5), 30.0);
        // Outside the centers the edge value is held
        assert_eq!(f.sample_bilinear(0.0, 0.0), 0.0);
        assert_eq!(f.sample_bilinear(1.99, 1.99), 30.0);
    }

    #[test]
    fn test_nearest_floors() {
        let f = two_by_two();
        assert_eq!(f.sample_nearest(0.9, 1.2), 10.0);
        assert_eq!(f.sample(1.0, 1.0, false), 30.0);
    }

    #[test]
    fn test_constant_field_skips_interpolation() {
        let f = ScalarField::new(2, 2, vec![4.0; 4]).unwrap();
        assert_eq!(f.sample(1.0, 1.0, true), 4.0);
    }

    #[test]
    fn test_value_range_ignores_nan() {
        let f = ScalarField::new(1, 3, vec![f64::NAN, -2.0, 5.0]).unwrap();
        assert_eq!(f.value_range(), Some((-2.0, 5.0)));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(ScalarField::new(2, 2, vec![0.0; 3]).is_err());
        assert!(ScalarField::new(0, 2, vec![]).is_err());
        assert!(ScalarField::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
