//! Common fixtures for rasterizer tests.

use raster_common::Color;

/// A small lithology table: `(id, name, color)`.
pub mod lithology {
    use super::Color;

    pub const SANDSTONE: (i32, &str, Color) = (1, "Sandstone", Color::rgb(230, 200, 120));
    pub const SHALE: (i32, &str, Color) = (2, "Shale", Color::rgb(90, 110, 90));
    pub const LIMESTONE: (i32, &str, Color) = (3, "Limestone", Color::rgb(170, 200, 230));
    pub const COAL: (i32, &str, Color) = (4, "Coal", Color::rgb(20, 20, 20));

    pub const ALL: [(i32, &str, Color); 4] = [SANDSTONE, SHALE, LIMESTONE, COAL];
}

/// Range-axis layouts as `(lower, upper, slots)`.
pub mod ranges {
    /// Two adjacent ranges over `[0, 20)` with 10 slots each.
    pub const TWO_BY_TEN: [(f64, f64, usize); 2] = [(0.0, 10.0, 10), (10.0, 20.0, 10)];

    /// Disjoint ranges with a gap between 10 and 20.
    pub const GAPPED: [(f64, f64, usize); 2] = [(0.0, 10.0, 5), (20.0, 30.0, 5)];
}

/// Distinct colors for out-of-range and invalid values.
pub mod sentinels {
    use super::Color;

    pub const LOW: Color = Color::rgb(0, 0, 255);
    pub const HIGH: Color = Color::rgb(255, 0, 0);
    pub const INVALID: Color = Color::rgb(128, 128, 128);
}

/// Fallback colors handed out for unknown categories.
pub const DEFAULT_CYCLE: [Color; 3] = [
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
];
