//! Image rendering for gridded dataset layers.
//!
//! Implements the encoders used by the layer variants:
//! - Colour-mapped single band (named palette)
//! - False-colour RGB composite (per-band contrast stretch)
//! - Boolean mask overlay (flat colour stencil)
//!
//! Encoded images are written by [`output::save_image`], which picks the
//! file format from the path extension.

pub mod colours;
pub mod encode;
pub mod error;
pub mod output;
pub mod palette;
pub mod png;
pub mod raster;

pub use colours::lookup_colour;
pub use encode::{encode_colormapped, encode_false_colour, encode_mask};
pub use error::{RenderError, RenderResult};
pub use output::save_image;
pub use palette::Palette;
pub use raster::{Channels, RasterImage};
