//! Tests for the colour-mapped, false-colour and mask encoders.

use ndarray::{array, Array2};
use renderer::encode::{encode_colormapped, encode_false_colour, encode_mask};
use renderer::palette::Palette;
use renderer::{Channels, RenderError};

// ============================================================================
// Colour-mapped encoding
// ============================================================================

#[test]
fn test_colormapped_uses_palette_on_normalized_values() {
    let data = array![[0.0, 5.0], [10.0, 2.0]];
    let img = encode_colormapped(data.view(), 0.0, 10.0, "viridis").unwrap();
    let palette = Palette::by_name("viridis").unwrap();

    assert_eq!(img.width, 2);
    assert_eq!(img.height, 2);
    assert_eq!(img.channels, Channels::Rgba);
    assert_eq!(img.pixel(0, 0), &palette.map(0.0));
    assert_eq!(img.pixel(1, 0), &palette.map(0.5));
    assert_eq!(img.pixel(0, 1), &palette.map(1.0));
    assert_eq!(img.pixel(1, 1), &palette.map(0.2));
}

#[test]
fn test_colormapped_unknown_palette() {
    let data = array![[1.0]];
    let err = encode_colormapped(data.view(), 0.0, 1.0, "nonesuch").unwrap_err();
    match err {
        RenderError::UnknownPalette(name) => assert_eq!(name, "nonesuch"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_colormapped_is_deterministic() {
    let data = Array2::from_shape_fn((16, 24), |(y, x)| (x as f64 * 0.37 + y as f64).sin());
    let a = encode_colormapped(data.view(), -1.0, 1.0, "coolwarm").unwrap();
    let b = encode_colormapped(data.view(), -1.0, 1.0, "coolwarm").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_colormapped_out_of_range_passes_through_palette() {
    let data = array![[-50.0, 50.0]];
    let img = encode_colormapped(data.view(), 0.0, 10.0, "coolwarm").unwrap();
    let palette = Palette::by_name("coolwarm").unwrap();
    assert_eq!(img.pixel(0, 0), &palette.map(-5.0));
    assert_eq!(img.pixel(1, 0), &palette.map(5.0));
}

#[test]
fn test_colormapped_nan_is_transparent() {
    let data = array![[f64::NAN, 1.0]];
    let img = encode_colormapped(data.view(), 0.0, 1.0, "coolwarm").unwrap();
    assert_eq!(img.pixel(0, 0)[3], 0);
    assert_eq!(img.pixel(1, 0)[3], 255);
}

// ============================================================================
// False-colour encoding
// ============================================================================

#[test]
fn test_false_colour_per_band_stretch() {
    let red = array![[0.0, 4.0]];
    let green = array![[100.0, 0.0]];
    let blue = array![[-1.0, 1.0]];
    let img = encode_false_colour(red.view(), green.view(), blue.view()).unwrap();

    assert_eq!(img.channels, Channels::Rgb);
    assert_eq!(img.pixel(0, 0), &[0, 255, 0]);
    assert_eq!(img.pixel(1, 0), &[255, 0, 255]);
}

#[test]
fn test_false_colour_sqrt_brightens_midtones() {
    let band = array![[0.0, 25.0, 100.0]];
    let img = encode_false_colour(band.view(), band.view(), band.view()).unwrap();
    // sqrt(0.25) = 0.5 -> 127
    assert_eq!(img.pixel(1, 0), &[127, 127, 127]);
}

#[test]
fn test_false_colour_constant_band_is_zero_not_nan() {
    let constant = array![[3.0, 3.0], [3.0, 3.0]];
    let varying = array![[0.0, 1.0], [2.0, 3.0]];
    let img = encode_false_colour(constant.view(), varying.view(), constant.view()).unwrap();

    for y in 0..2 {
        for x in 0..2 {
            let px = img.pixel(x, y);
            assert_eq!(px[0], 0);
            assert_eq!(px[2], 0);
        }
    }
    assert_eq!(img.pixel(1, 1)[1], 255);
}

#[test]
fn test_false_colour_ignores_nan_for_range() {
    let band = array![[f64::NAN, 0.0, 1.0]];
    let img = encode_false_colour(band.view(), band.view(), band.view()).unwrap();
    assert_eq!(img.pixel(0, 0), &[0, 0, 0]);
    assert_eq!(img.pixel(2, 0), &[255, 255, 255]);
}

#[test]
fn test_false_colour_shape_mismatch() {
    let a = array![[0.0, 1.0]];
    let b = array![[0.0], [1.0]];
    let err = encode_false_colour(a.view(), b.view(), a.view()).unwrap_err();
    assert!(matches!(err, RenderError::ShapeMismatch(_, _)));
}

// ============================================================================
// Mask encoding
// ============================================================================

#[test]
fn test_mask_alpha_follows_truthiness() {
    let data = array![[0, 1, -3], [7, 0, 2]];
    let img = encode_mask(data.view(), [10, 20, 30]);

    assert_eq!(img.channels, Channels::Rgba);
    let expected_alpha = [[0, 255, 0], [255, 0, 255]];
    for y in 0..2 {
        for x in 0..3 {
            let px = img.pixel(x, y);
            assert_eq!(&px[..3], &[10, 20, 30], "colour must be constant");
            assert_eq!(px[3], expected_alpha[y][x]);
        }
    }
}
