//! In-memory raster produced by the encoders.

/// Pixel layout of a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb,
    Rgba,
}

impl Channels {
    /// Bytes per pixel.
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }
}

/// An interleaved 8-bit image, row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: usize,
    pub height: usize,
    pub channels: Channels,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Allocate a zeroed image.
    pub fn new(width: usize, height: usize, channels: Channels) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: vec![0; width * height * channels.count()],
        }
    }

    /// The channel values of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let n = self.channels.count();
        let start = (y * self.width + x) * n;
        &self.pixels[start..start + n]
    }

    /// Copy of the pixel data with an opaque alpha channel added (RGB) or
    /// kept as-is (RGBA).
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.channels {
            Channels::Rgba => self.pixels.clone(),
            Channels::Rgb => {
                let mut out = Vec::with_capacity(self.width * self.height * 4);
                for px in self.pixels.chunks_exact(3) {
                    out.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                out
            }
        }
    }

    /// Copy of the pixel data with any alpha channel dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        match self.channels {
            Channels::Rgb => self.pixels.clone(),
            Channels::Rgba => self
                .pixels
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        }
    }
}
