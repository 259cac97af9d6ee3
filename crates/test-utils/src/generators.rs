//! Synthetic data generators.
//!
//! Everything here is deterministic so tests can assert exact values.

/// Grid with predictable values: `row * 1000 + col`, row-major.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(3, 2);
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[1], 1.0);    // row 0, col 1
/// assert_eq!(grid[3], 1000.0); // row 1, col 0
/// ```
pub fn create_test_grid(rows: usize, cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((row * 1000 + col) as f64);
        }
    }
    data
}

/// Polar field that increases with magnitude bin only: every angle in
/// row `r` holds `r`. Handy for checking radial mapping.
pub fn create_radial_field(rows: usize, cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        data.extend(std::iter::repeat(row as f64).take(cols));
    }
    data
}

/// Polar field that increases with angle bin only: every magnitude in
/// column `c` holds `c`.
pub fn create_angular_field(rows: usize, cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for _ in 0..rows {
        data.extend((0..cols).map(|c| c as f64));
    }
    data
}

/// Smooth lobed pattern in `[0, 1]`, similar to an antenna or wind-rose
/// heat map. Used for benchmarks.
pub fn create_lobed_field(rows: usize, cols: usize, lobes: u32) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let radial = (row as f64 + 0.5) / rows as f64;
        for col in 0..cols {
            let theta = (col as f64 + 0.5) / cols as f64 * std::f64::consts::TAU;
            let angular = 0.5 + 0.5 * (lobes as f64 * theta).cos();
            data.push(radial * angular);
        }
    }
    data
}

/// Field with NaN written at the given flat indices.
pub fn create_field_with_nans(rows: usize, cols: usize, value: f64, nan_at: &[usize]) -> Vec<f64> {
    let mut data = vec![value; rows * cols];
    for &i in nan_at {
        if i < data.len() {
            data[i] = f64::NAN;
        }
    }
    data
}

/// Expand `(category, thickness)` layers into `(category, position)` pairs,
/// one sample every `step` units starting at `top`.
///
/// ```
/// use test_utils::create_layered_log;
///
/// let log = create_layered_log(&[(1.0, 2.0), (2.0, 1.0)], 0.0, 1.0);
/// assert_eq!(log, vec![(1.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
/// ```
pub fn create_layered_log(layers: &[(f64, f64)], top: f64, step: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    let mut layer_top = top;
    for &(category, thickness) in layers {
        let count = (thickness / step).round().max(1.0) as usize;
        for k in 0..count {
            out.push((category, layer_top + k as f64 * step));
        }
        layer_top += thickness;
    }
    out
}

/// `n` pseudo-random categorical samples with strictly increasing,
/// irregular positions. `categories` distinct ids are cycled through in
/// runs of varying length.
pub fn create_irregular_log(n: usize, categories: u32, seed: u32) -> Vec<(f64, f64)> {
    let mut state = seed.max(1);
    let mut next = move || {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    let mut out = Vec::with_capacity(n);
    let mut position = 0.0;
    let mut category = 0u32;
    for _ in 0..n {
        if next() % 4 == 0 {
            category = (category + 1) % categories.max(1);
        }
        out.push((category as f64 + 1.0, position));
        position += 0.1 + (next() % 100) as f64 / 100.0;
    }
    out
}
