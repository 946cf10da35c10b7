//! Writing encoded images to disk.

use std::fs;
use std::path::Path;

use image::{ColorType, ImageFormat};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::png::encode_png;
use crate::raster::{Channels, RasterImage};

/// Write `image` to `path`, choosing the format from the file extension.
///
/// PNG goes through the in-house encoder; other extensions are delegated
/// to the `image` crate. JPEG output drops the alpha channel.
pub fn save_image(image: &RasterImage, path: &Path) -> RenderResult<()> {
    let unsupported = || RenderError::UnsupportedFormat(path.display().to_string());
    let format = ImageFormat::from_path(path).map_err(|_| unsupported())?;

    if format == ImageFormat::Png {
        let bytes = encode_png(image)?;
        fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote PNG");
        return Ok(());
    }

    let (buffer, color) = match (format, image.channels) {
        (ImageFormat::Jpeg, _) | (_, Channels::Rgb) => (image.to_rgb(), ColorType::Rgb8),
        (_, Channels::Rgba) => (image.to_rgba(), ColorType::Rgba8),
    };
    image::save_buffer_with_format(
        path,
        &buffer,
        image.width as u32,
        image.height as u32,
        color,
        format,
    )?;
    debug!(path = %path.display(), ?format, "Wrote image");
    Ok(())
}
