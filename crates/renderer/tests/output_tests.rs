//! Tests for extension-based image output.

use ndarray::{array, Array2};
use renderer::{encode_colormapped, encode_mask, save_image, RenderError};
use tempfile::tempdir;

#[test]
fn test_save_png_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mask.png");
    let img = encode_mask(array![[1, 0], [0, 1]].view(), [255, 0, 0]);

    save_image(&img, &path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 2));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
}

#[test]
fn test_save_jpeg_drops_alpha() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("band.jpg");
    let img = encode_colormapped(array![[0.0, 1.0], [0.5, 0.25]].view(), 0.0, 1.0, "gray").unwrap();

    save_image(&img, &path).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (2, 2));
}

#[test]
fn test_save_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("band.xyz");
    let img = encode_mask(array![[1]].view(), [0, 0, 0]);

    let err = save_image(&img, &path).unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedFormat(_)));
    assert!(!path.exists());
}

#[test]
fn test_large_colormapped_png_is_byte_identical() {
    // 100x100 takes the parallel palette path
    let grid = Array2::from_shape_fn((100, 100), |(y, x)| ((x * 7 + y * 3) % 200) as f64);
    let dir = tempdir().unwrap();

    let first_path = dir.path().join("first.png");
    save_image(&encode_colormapped(grid.view(), 0.0, 199.0, "viridis").unwrap(), &first_path).unwrap();
    let first = std::fs::read(&first_path).unwrap();

    for i in 0..4 {
        let path = dir.path().join(format!("again_{}.png", i));
        save_image(&encode_colormapped(grid.view(), 0.0, 199.0, "viridis").unwrap(), &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first, "encoding {} differs", i);
    }
}
