//! Encoders turning 2D grids into raster images.
//!
//! All encoders take row-major grids (row 0 = top of the image) and return
//! a [`RasterImage`] of the same width and height.

use ndarray::ArrayView2;
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::palette::Palette;
use crate::raster::{Channels, RasterImage};

/// Colour-map a single band.
///
/// Values are normalized as `(v - vmin) / (vmax - vmin)` and passed to the
/// named palette without further clamping; the palette decides how values
/// outside [0, 1] are coloured.
pub fn encode_colormapped(
    data: ArrayView2<f64>,
    vmin: f64,
    vmax: f64,
    palette_name: &str,
) -> RenderResult<RasterImage> {
    let palette = Palette::by_name(palette_name)
        .ok_or_else(|| RenderError::UnknownPalette(palette_name.to_string()))?;

    let (height, width) = data.dim();
    let mut image = RasterImage::new(width, height, Channels::Rgba);
    let range = vmax - vmin;

    for ((y, x), value) in data.indexed_iter() {
        let rgba = palette.map((value - vmin) / range);
        let idx = (y * width + x) * 4;
        image.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    debug!(width, height, palette = palette_name, vmin, vmax, "Encoded colour-mapped band");
    Ok(image)
}

/// Compose three bands into a false-colour RGB image.
///
/// Each band is stretched independently: normalized by its own NaN-ignoring
/// minimum and maximum, square-rooted, then scaled to 8 bits. A band with no
/// spread (constant or entirely NaN) encodes as 0. NaN samples encode as 0.
pub fn encode_false_colour<'a>(
    red: ArrayView2<'a, f64>,
    green: ArrayView2<'a, f64>,
    blue: ArrayView2<'a, f64>,
) -> RenderResult<RasterImage> {
    for band in [&green, &blue] {
        if band.dim() != red.dim() {
            return Err(RenderError::ShapeMismatch(
                red.shape().to_vec(),
                band.shape().to_vec(),
            ));
        }
    }

    let (height, width) = red.dim();
    let mut image = RasterImage::new(width, height, Channels::Rgb);

    for (channel, band) in [red, green, blue].iter().enumerate() {
        let stretch = BandStretch::of(band);
        for ((y, x), value) in band.indexed_iter() {
            image.pixels[(y * width + x) * 3 + channel] = stretch.apply(*value);
        }
    }

    debug!(width, height, "Encoded false-colour composite");
    Ok(image)
}

/// Flat-colour stencil: every pixel has `colour`, alpha is 255 where the
/// source value is positive and 0 elsewhere.
pub fn encode_mask(data: ArrayView2<i64>, colour: [u8; 3]) -> RasterImage {
    let (height, width) = data.dim();
    let mut image = RasterImage::new(width, height, Channels::Rgba);
    let [r, g, b] = colour;

    for ((y, x), value) in data.indexed_iter() {
        let alpha = if *value > 0 { 255 } else { 0 };
        let idx = (y * width + x) * 4;
        image.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, alpha]);
    }

    debug!(width, height, ?colour, "Encoded mask overlay");
    image
}

/// Per-band contrast stretch parameters.
struct BandStretch {
    min: f64,
    range: f64,
}

impl BandStretch {
    fn of(band: &ArrayView2<f64>) -> Self {
        let (min, max) = band
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        Self {
            min,
            range: max - min,
        }
    }

    fn apply(&self, value: f64) -> u8 {
        // NaN range (all-NaN band) fails this comparison as well.
        if !(self.range > 0.0) || !self.range.is_finite() {
            return 0;
        }
        let v = ((value - self.min) / self.range).sqrt();
        (255.0 * v) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_stretch_degenerate() {
        let band = array![[4.0, 4.0], [4.0, 4.0]];
        let s = BandStretch::of(&band.view());
        assert_eq!(s.apply(4.0), 0);

        let nan_band = array![[f64::NAN]];
        let s = BandStretch::of(&nan_band.view());
        assert_eq!(s.apply(f64::NAN), 0);
    }

    #[test]
    fn test_stretch_sqrt() {
        let band = array![[0.0, 100.0]];
        let s = BandStretch::of(&band.view());
        assert_eq!(s.apply(0.0), 0);
        assert_eq!(s.apply(100.0), 255);
        assert_eq!(s.apply(25.0), 127);
    }
}
