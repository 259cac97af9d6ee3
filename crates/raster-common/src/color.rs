//! Colors and palettes.
//!
//! A [`Color`] is either a concrete RGBA value or the `Automatic` sentinel,
//! which means "not configured, let the host pick". Palettes are immutable,
//! non-empty color sequences addressed either 0-based (storage) or 1-based
//! (packed palette indices).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{RasterError, RasterResult};

/// RGBA color with an "automatic" sentinel distinct from every real color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// Not configured; resolved later by the host.
    #[default]
    Automatic,
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub const TRANSPARENT: Color = Color::Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::Rgba { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self::TRANSPARENT
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, Color::Automatic)
    }

    /// A real color, i.e. anything but `Automatic`.
    pub fn is_defined(&self) -> bool {
        !self.is_automatic()
    }

    /// Convert to RGBA tuple. `Automatic` has no pixel value and maps to transparent.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match *self {
            Color::Automatic => (0, 0, 0, 0),
            Color::Rgba { r, g, b, a } => (r, g, b, a),
        }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        let (r, g, b, a) = self.to_rgba();
        [r, g, b, a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Color::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Same color with a replaced alpha channel. `Automatic` stays automatic.
    pub fn with_alpha(&self, alpha: u8) -> Color {
        match *self {
            Color::Automatic => Color::Automatic,
            Color::Rgba { r, g, b, .. } => Color::rgba(r, g, b, alpha),
        }
    }

    /// Multiply the alpha channel by `alpha / 255`. Transparent stays transparent.
    pub fn scale_alpha(&self, alpha: u8) -> Color {
        match *self {
            Color::Automatic => Color::Automatic,
            Color::Rgba { r, g, b, a } => {
                let scaled = (a as u16 * alpha as u16 + 127) / 255;
                Color::rgba(r, g, b, scaled as u8)
            }
        }
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let (r1, g1, b1, a1) = self.to_rgba();
        let (r2, g2, b2, a2) = other.to_rgba();

        let t = t.clamp(0.0, 1.0);

        let lerp_u8 = |a: u8, b: u8, t: f64| -> u8 {
            ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8
        };

        Color::rgba(
            lerp_u8(r1, r2, t),
            lerp_u8(g1, g2, t),
            lerp_u8(b1, b2, t),
            lerp_u8(a1, a2, t),
        )
    }
}

impl FromStr for Color {
    type Err = RasterError;

    /// Accepts `#RRGGBB`, `#RRGGBBAA`, a named color, or `auto`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") || s.eq_ignore_ascii_case("automatic") {
            return Ok(Color::Automatic);
        }
        if s.starts_with('#') {
            return parse_hex_color(s).ok_or_else(|| RasterError::InvalidColor(s.to_string()));
        }
        named_color(s).ok_or_else(|| RasterError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = RasterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Automatic => write!(f, "auto"),
            Color::Rgba { r, g, b, a: 255 } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Rgba { r, g, b, a } => write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a),
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim_start_matches('#');
    if !s.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();

    match s.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::rgb(0, 0, 0),
        "white" => Color::rgb(255, 255, 255),
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 255, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" => Color::rgb(0, 255, 255),
        "magenta" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// Ordered, immutable, non-empty sequence of colors.
///
/// Cloning is cheap; the colors are shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Arc<[Color]>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> RasterResult<Self> {
        if colors.is_empty() {
            return Err(RasterError::EmptyPalette);
        }
        Ok(Self {
            colors: colors.into(),
        })
    }

    /// Build an `n`-color palette by linear interpolation through `stops`.
    ///
    /// Stops are spread evenly over the palette; a single stop yields a
    /// uniform palette.
    pub fn interpolate(stops: &[Color], n: usize) -> RasterResult<Self> {
        if stops.is_empty() || n == 0 {
            return Err(RasterError::EmptyPalette);
        }
        if stops.len() == 1 || n == 1 {
            return Self::new(vec![stops[0]; n]);
        }

        let segments = (stops.len() - 1) as f64;
        let colors = (0..n)
            .map(|i| {
                let x = i as f64 / (n - 1) as f64 * segments;
                let lo = (x.floor() as usize).min(stops.len() - 2);
                stops[lo].lerp(&stops[lo + 1], x - lo as f64)
            })
            .collect();
        Self::new(colors)
    }

    /// Black-to-white ramp.
    pub fn gray(n: usize) -> RasterResult<Self> {
        Self::interpolate(&[Color::BLACK, Color::WHITE], n)
    }

    pub fn reversed(&self) -> Self {
        let colors: Vec<Color> = self.colors.iter().rev().copied().collect();
        Self {
            colors: colors.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// 0-based access.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = RasterError;

    fn try_from(value: Vec<Color>) -> Result<Self, Self::Error> {
        Palette::new(value)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(
            "#00FF0080".parse::<Color>().unwrap(),
            Color::rgba(0, 255, 0, 128)
        );
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("#FFF".parse::<Color>().is_err());
    }

    #[test]
    fn test_automatic_is_not_a_real_color() {
        let auto: Color = "auto".parse().unwrap();
        assert!(auto.is_automatic());
        assert_ne!(auto, Color::TRANSPARENT);
        assert_eq!(auto.to_rgba(), (0, 0, 0, 0));
    }

    #[test]
    fn test_display_round_trips_alpha() {
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_scale_alpha() {
        assert_eq!(Color::rgb(9, 8, 7).scale_alpha(210), Color::rgba(9, 8, 7, 210));
        assert_eq!(Color::rgba(9, 8, 7, 128).scale_alpha(255), Color::rgba(9, 8, 7, 128));
        assert_eq!(Color::rgba(9, 8, 7, 128).scale_alpha(128), Color::rgba(9, 8, 7, 64));
        assert_eq!(Color::TRANSPARENT.scale_alpha(210), Color::TRANSPARENT);
        assert!(Color::Automatic.scale_alpha(210).is_automatic());
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(Palette::new(vec![]), Err(RasterError::EmptyPalette)));
    }

    #[test]
    fn test_interpolate_endpoints() {
        let p = Palette::interpolate(&[Color::rgb(0, 0, 0), Color::rgb(200, 100, 0)], 5).unwrap();
        assert_eq!(p.len(), 5);
        assert_eq!(p.get(0), Some(Color::rgb(0, 0, 0)));
        assert_eq!(p.get(2), Some(Color::rgb(100, 50, 0)));
        assert_eq!(p.get(4), Some(Color::rgb(200, 100, 0)));
    }
}
