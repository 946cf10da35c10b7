//! Overlay layers rendered from gridded dataset variables.
//!
//! A layer turns one dataset variable (or three, or none) into one image
//! file. Four variants exist:
//! - [`SingleBandLayer`]: colour-mapped band with a gradient legend
//! - [`RgbLayer`]: false-colour composite of three bands
//! - [`MaskLayer`]: flat-colour stencil of a boolean/bitmask band
//! - [`RemoteTileLayer`]: pre-rendered image fetched from a tile service
//!   covering the dataset's extent
//!
//! Layers are built from declarative definitions by [`LayerFactory`],
//! validated with [`RenderLayer::check`] and rendered with
//! [`RenderLayer::build`]. Validation returns a [`ValidationError`] rather
//! than failing fast so a whole layer set can be checked at once (see
//! [`validate_layers`]).

pub mod bbox;
pub mod binding;
pub mod error;
pub mod extract;
pub mod factory;
pub mod fetch;
pub mod template;
pub mod tile_cache;
pub mod variants;

pub use binding::{CoordinateNames, LayerCore, LayerState, Orientation};
pub use bbox::BoundingBox;
pub use error::{CoordinateRole, FetchError, LayerError, LayerResult, ValidationError};
pub use factory::LayerFactory;
pub use fetch::{HttpTileFetcher, TileFetcher, DEFAULT_FETCH_TIMEOUT};
pub use template::{Placeholder, UrlTemplate};
pub use tile_cache::{RemoteTileCache, TileOutcome};
pub use variants::{
    validate_layers, Layer, LayerIssue, MaskLayer, RemoteTileLayer, RenderLayer, RgbLayer,
    SingleBandLayer, TileRequest, LEGEND_HEIGHT, LEGEND_WIDTH,
};
