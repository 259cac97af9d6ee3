//! Tests for color parsing, serialization and palettes.

use raster_common::{Color, Palette, RasterError};

// ============================================================================
// Parsing tests
// ============================================================================

#[test]
fn test_parse_forms() {
    assert_eq!("#FF8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
    assert_eq!("#ff800080".parse::<Color>().unwrap(), Color::rgba(255, 128, 0, 128));
    assert_eq!("Orange".parse::<Color>().unwrap(), Color::rgb(255, 165, 0));
    assert_eq!(" auto ".parse::<Color>().unwrap(), Color::Automatic);
    assert_eq!("transparent".parse::<Color>().unwrap(), Color::TRANSPARENT);
}

#[test]
fn test_parse_rejects_garbage() {
    for bad in ["#FF80", "#GGHHII", "chartreuse", "", "#ÿÿÿ"] {
        assert!(
            matches!(bad.parse::<Color>(), Err(RasterError::InvalidColor(_))),
            "{:?} should not parse",
            bad
        );
    }
}

#[test]
fn test_display_forms() {
    assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
    assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    assert_eq!(Color::Automatic.to_string(), "auto");
}

// ============================================================================
// Serde tests
// ============================================================================

#[test]
fn test_serde_as_strings() {
    let colors = vec![Color::rgb(10, 20, 30), Color::Automatic];
    let json = serde_json::to_string(&colors).unwrap();
    assert_eq!(json, r##"["#0A141E","auto"]"##);

    let back: Vec<Color> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, colors);
    assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
}

#[test]
fn test_palette_serde_rejects_empty() {
    let palette: Palette = serde_json::from_str(r##"["red", "#0000FF"]"##).unwrap();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette.get(1), Some(Color::rgb(0, 0, 255)));
    assert!(serde_json::from_str::<Palette>("[]").is_err());
}

// ============================================================================
// Color math tests
// ============================================================================

#[test]
fn test_with_alpha_and_lerp() {
    assert_eq!(Color::rgb(9, 8, 7).with_alpha(210), Color::rgba(9, 8, 7, 210));
    assert_eq!(Color::Automatic.with_alpha(10), Color::Automatic);
    assert_eq!(Color::BLACK.lerp(&Color::WHITE, 0.5), Color::rgb(128, 128, 128));
    assert_eq!(Color::BLACK.lerp(&Color::WHITE, 7.0), Color::WHITE);
}

#[test]
fn test_automatic_has_no_pixel_value() {
    assert_eq!(Color::Automatic.to_bytes(), [0, 0, 0, 0]);
    assert!(!Color::Automatic.is_defined());
    assert!(Color::TRANSPARENT.is_defined());
}

// ============================================================================
// Palette tests
// ============================================================================

#[test]
fn test_gray_ramp() {
    let gray = Palette::gray(3).unwrap();
    assert_eq!(
        gray.colors(),
        &[Color::BLACK, Color::rgb(128, 128, 128), Color::WHITE]
    );
    assert_eq!(gray.reversed().get(0), Some(Color::WHITE));
}

#[test]
fn test_interpolate_through_middle_stop() {
    let stops = [Color::rgb(0, 0, 0), Color::rgb(200, 0, 0), Color::rgb(200, 200, 0)];
    let palette = Palette::interpolate(&stops, 5).unwrap();
    assert_eq!(palette.get(0), Some(stops[0]));
    assert_eq!(palette.get(2), Some(stops[1]));
    assert_eq!(palette.get(4), Some(stops[2]));
    assert_eq!(palette.get(3), Some(Color::rgb(200, 100, 0)));
    assert_eq!(palette.get(5), None);
}

#[test]
fn test_interpolate_degenerate_inputs() {
    assert!(Palette::interpolate(&[], 4).is_err());
    assert!(Palette::interpolate(&[Color::WHITE], 0).is_err());
    let flat = Palette::interpolate(&[Color::WHITE], 3).unwrap();
    assert!(flat.colors().iter().all(|c| *c == Color::WHITE));
}
