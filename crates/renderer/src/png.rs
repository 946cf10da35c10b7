//! PNG encoding for [`RasterImage`]s.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: used when the image has ≤256 unique
//!   colours. Mask overlays and legends always land here.
//! - **Truecolour PNG (color type 2 or 6)**: fallback for images with more
//!   colours, RGB or RGBA depending on the image channels.
//!
//! Use [`encode_png`] for automatic mode selection.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::error::{RenderError, RenderResult};
use crate::raster::{Channels, RasterImage};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

type PaletteEntry = (u8, u8, u8, u8);

/// Encode an image as PNG, choosing indexed or truecolour output.
pub fn encode_png(image: &RasterImage) -> RenderResult<Vec<u8>> {
    let num_pixels = image.width * image.height;
    let bpp = image.channels.count();

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(&image.pixels, bpp)
    } else {
        extract_palette_sequential(&image.pixels, bpp)
    };

    match palette_result {
        Some((palette, indices)) => {
            create_png_indexed(image.width, image.height, &palette, &indices)
        }
        None => create_png_truecolor(image),
    }
}

/// Pack a pixel into a u32 for faster hashing. RGB pixels are packed as opaque.
#[inline(always)]
fn pack_pixel(px: &[u8]) -> u32 {
    let a = if px.len() == 4 { px[3] } else { 255 };
    (px[0] as u32) | ((px[1] as u32) << 8) | ((px[2] as u32) << 16) | ((a as u32) << 24)
}

#[inline(always)]
fn unpack_pixel(packed: u32) -> PaletteEntry {
    (
        packed as u8,
        (packed >> 8) as u8,
        (packed >> 16) as u8,
        (packed >> 24) as u8,
    )
}

/// Sequential palette extraction for small images.
fn extract_palette_sequential(pixels: &[u8], bpp: usize) -> Option<(Vec<PaletteEntry>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<PaletteEntry> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / bpp);

    for px in pixels.chunks_exact(bpp) {
        let packed = pack_pixel(px);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(unpack_pixel(packed));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// Unique colours are collected per chunk in first-occurrence order and
/// merged in chunk order, so palette indices match the sequential path and
/// the output is the same on every call. Only if the merged set fits in a
/// palette are pixels mapped to indices (again in parallel).
fn extract_palette_parallel(pixels: &[u8], bpp: usize) -> Option<(Vec<PaletteEntry>, Vec<u8>)> {
    let pixels_per_chunk = (pixels.len() / bpp / rayon::current_num_threads()).max(256);
    let chunk_size = pixels_per_chunk * bpp;

    let unique_colors: Vec<u32> = pixels
        .par_chunks(chunk_size)
        .flat_map_iter(|chunk| {
            let mut seen: HashSet<u32> = HashSet::with_capacity(MAX_PALETTE_SIZE);
            let mut ordered: Vec<u32> = Vec::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(bpp) {
                let packed = pack_pixel(px);
                if seen.insert(packed) {
                    ordered.push(packed);
                    if ordered.len() > MAX_PALETTE_SIZE {
                        break;
                    }
                }
            }
            ordered
        })
        .collect();

    let mut global: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<PaletteEntry> = Vec::with_capacity(MAX_PALETTE_SIZE);
    for packed in unique_colors {
        if !global.contains_key(&packed) {
            if palette.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            global.insert(packed, palette.len() as u8);
            palette.push(unpack_pixel(packed));
        }
    }

    let mut indices = vec![0u8; pixels.len() / bpp];
    indices
        .par_chunks_mut(pixels_per_chunk)
        .zip(pixels.par_chunks(chunk_size))
        .for_each(|(idx_chunk, px_chunk)| {
            for (idx, px) in idx_chunk.iter_mut().zip(px_chunk.chunks_exact(bpp)) {
                *idx = *global.get(&pack_pixel(px)).unwrap_or(&0);
            }
        });

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[PaletteEntry],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte_data: Vec<u8> = palette.iter().flat_map(|(r, g, b, _)| [*r, *g, *b]).collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS only if any palette entry is not fully opaque
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_scanlines(indices, width, height, 1)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a truecolour PNG: color type 2 for RGB images, 6 for RGBA.
pub fn create_png_truecolor(image: &RasterImage) -> RenderResult<Vec<u8>> {
    let color_type = match image.channels {
        Channels::Rgb => 2,
        Channels::Rgba => 6,
    };

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(image.width, image.height, color_type));

    let idat_data = deflate_scanlines(
        &image.pixels,
        image.width,
        image.height,
        image.channels.count(),
    )?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each scanline with filter byte 0 and zlib-compress.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> RenderResult<Vec<u8>> {
    let stride = width * bytes_per_pixel;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in data.chunks_exact(stride.max(1)).take(height) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }
    if stride == 0 {
        uncompressed.resize(height, 0);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&uncompressed)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}
