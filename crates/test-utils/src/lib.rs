//! Shared test utilities for the raster workspace.
//!
//! This crate provides:
//! - Synthetic sample and field generators
//! - Common fixtures (lithology tables, range layouts)
//! - Mock implementations of the host plotting traits
//! - Assertion macros for floats and pixels
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{CartesianTransform, RecordingContext, init_tracing};
//! ```

pub mod fixtures;
pub mod generators;
pub mod hosts;

pub use fixtures::*;
pub use generators::*;
pub use hosts::*;

/// Install a test-writer tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Approximate floating-point equality.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert the RGBA bytes of one pixel in a `PixelBuffer`.
///
/// ```ignore
/// assert_pixel_eq!(buffer, row, col, [255, 0, 0, 255]);
/// ```
#[macro_export]
macro_rules! assert_pixel_eq {
    ($buffer:expr, $row:expr, $col:expr, $rgba:expr) => {{
        let expected: [u8; 4] = $rgba;
        match $buffer.get($row, $col) {
            Some(actual) => assert_eq!(
                actual.to_bytes(), expected,
                "pixel ({}, {}) mismatch", $row, $col
            ),
            None => panic!("pixel ({}, {}) out of bounds", $row, $col),
        }
    }};
}

#[cfg(test)]
mod tests {
    use raster_common::{Color, PixelBuffer};

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_pixel_eq() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.set(1, 0, Color::rgb(1, 2, 3));
        assert_pixel_eq!(buffer, 1, 0, [1, 2, 3, 255]);
        assert_pixel_eq!(buffer, 0, 0, [0, 0, 0, 0]);
    }
}
