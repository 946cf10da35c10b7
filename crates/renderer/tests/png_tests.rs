//! Tests for PNG encoding.
//!
//! Encoded output is decoded again with the `image` crate so the pixel data,
//! not just the byte layout, is checked.

use renderer::png::{create_png_truecolor, encode_png};
use renderer::{Channels, RasterImage};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

fn decode_rgba(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("valid PNG")
        .to_rgba8()
}

/// Gradient with one unique colour per pixel, forcing truecolour output.
fn many_colour_image(width: usize, height: usize, channels: Channels) -> RasterImage {
    let mut img = RasterImage::new(width, height, channels);
    let n = channels.count();
    for i in 0..width * height {
        let px = &mut img.pixels[i * n..(i + 1) * n];
        px[0] = (i % 256) as u8;
        px[1] = (i / 256) as u8;
        px[2] = 99;
        if n == 4 {
            px[3] = 200;
        }
    }
    img
}

#[test]
fn test_indexed_round_trip_with_transparency() {
    let img = RasterImage {
        width: 2,
        height: 2,
        channels: Channels::Rgba,
        pixels: vec![
            255, 0, 0, 255, //
            255, 0, 0, 0, //
            255, 0, 0, 0, //
            255, 0, 0, 255,
        ],
    };
    let png = encode_png(&img).unwrap();
    assert_eq!(&png[0..8], &SIGNATURE);
    // color type byte in IHDR
    assert_eq!(png[25], 3);

    let decoded = decode_rgba(&png);
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
    assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
}

#[test]
fn test_truecolour_rgb_fallback() {
    let img = many_colour_image(30, 20, Channels::Rgb);
    let png = encode_png(&img).unwrap();
    assert_eq!(png[25], 2);

    let decoded = decode_rgba(&png);
    assert_eq!(decoded.dimensions(), (30, 20));
    assert_eq!(decoded.get_pixel(5, 10).0, [49, 1, 99, 255]);
}

#[test]
fn test_truecolour_rgba_fallback() {
    let img = many_colour_image(30, 20, Channels::Rgba);
    let png = create_png_truecolor(&img).unwrap();
    assert_eq!(png[25], 6);

    let decoded = decode_rgba(&png);
    assert_eq!(decoded.get_pixel(3, 0).0, [3, 0, 99, 200]);
}

#[test]
fn test_large_indexed_image_parallel_path() {
    let mut img = RasterImage::new(128, 128, Channels::Rgba);
    for (i, px) in img.pixels.chunks_exact_mut(4).enumerate() {
        let on = (i / 128 + i % 128) % 2 == 0;
        px.copy_from_slice(if on { &[0, 0, 255, 255] } else { &[0, 0, 255, 0] });
    }
    let png = encode_png(&img).unwrap();
    assert_eq!(png[25], 3);

    let decoded = decode_rgba(&png);
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
    assert_eq!(decoded.get_pixel(1, 1).0[3], 255);
}
