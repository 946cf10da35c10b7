use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use netcdf_dataset::{DataArray, Dataset};
use tracing::{info, instrument};

use super::RenderLayer;
use crate::bbox::BoundingBox;
use crate::binding::LayerCore;
use crate::error::{LayerError, LayerResult, ValidationError};
use crate::fetch::TileFetcher;
use crate::template::UrlTemplate;
use crate::tile_cache::{remove_existing, RemoteTileCache, TileOutcome};

/// Size and extent of the tile covering a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRequest {
    pub width: usize,
    pub height: usize,
    pub bbox: BoundingBox,
}

impl TileRequest {
    /// One pixel per grid cell times `scale`, with the extent running from
    /// the outer edge of the first cell to the outer edge of the last.
    pub fn from_coordinates(x: &DataArray, y: &DataArray, scale: u32) -> LayerResult<Self> {
        let (x_range, x_spacing) = axis_extent(x)?;
        let (y_range, y_spacing) = axis_extent(y)?;
        Ok(Self {
            width: x.len() * scale as usize,
            height: y.len() * scale as usize,
            bbox: BoundingBox::from_cell_centres(x_range, y_range, x_spacing, y_spacing),
        })
    }
}

fn axis_extent(coord: &DataArray) -> LayerResult<((f64, f64), f64)> {
    let invalid = |reason: &str| LayerError::InvalidGeometry {
        coordinate: coord.name().to_string(),
        reason: reason.to_string(),
    };
    let (min, max) = coord
        .min()
        .zip(coord.max())
        .ok_or_else(|| invalid("no finite values"))?;

    let mut values = coord.values().iter().copied();
    let spacing = match (values.next(), values.next()) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => 0.0,
    };
    Ok(((min, max), spacing))
}

/// Pre-rendered imagery fetched from a tile service that covers the
/// dataset's extent.
pub struct RemoteTileLayer {
    core: LayerCore,
    template: UrlTemplate,
    scale: u32,
    fetcher: Arc<dyn TileFetcher>,
    cache: Mutex<RemoteTileCache>,
}

impl RemoteTileLayer {
    pub fn new(core: LayerCore, template: UrlTemplate, scale: u32, fetcher: Arc<dyn TileFetcher>) -> Self {
        Self {
            core,
            template,
            scale,
            fetcher,
            cache: Mutex::new(RemoteTileCache::new()),
        }
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The tile request for `dataset`'s bound X and Y coordinates.
    pub fn tile_request(&self, dataset: &dyn Dataset) -> LayerResult<TileRequest> {
        let coords = self.core.coordinates();
        let lookup = |name: &str| {
            dataset
                .variable(name)
                .ok_or_else(|| LayerError::MissingVariable(name.to_string()))
        };
        TileRequest::from_coordinates(
            lookup(&coords.x_coordinate)?,
            lookup(&coords.y_coordinate)?,
            self.scale,
        )
    }

    /// Fetch into or link `path` for `dataset`, returning what happened.
    ///
    /// Any earlier file at `path` is gone unless it already is the tile,
    /// including when the dataset has no usable geometry.
    pub fn build_tile(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<TileOutcome> {
        self.core.warn_if_unchecked();
        let request = match self.tile_request(dataset) {
            Ok(request) => request,
            Err(e) => {
                remove_existing(path)?;
                return Err(e);
            }
        };
        let url = self.template.render(&request);

        // held across the fetch so concurrent builds of one URL fetch once
        let mut cache = self.cache.lock().map_err(|_| LayerError::CachePoisoned)?;
        cache.resolve(&url, path, self.fetcher.as_ref())
    }

    #[instrument(skip_all, fields(layer = %self.core.name(), path = %path.display()))]
    pub(crate) fn build_logged(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<TileOutcome> {
        let outcome = self.build_tile(dataset, path)?;
        info!(produced = outcome.produced_output(), ?outcome, "Built remote tile layer");
        Ok(outcome)
    }
}

impl fmt::Debug for RemoteTileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTileLayer")
            .field("core", &self.core)
            .field("template", &self.template.as_str())
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl RenderLayer for RemoteTileLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn check(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError> {
        self.core.check_coordinates(dataset)?;
        self.core.mark_checked();
        Ok(())
    }

    /// A failed fetch is logged and leaves no file; it is not an error.
    fn build(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<()> {
        self.build_logged(dataset, path).map(|_| ())
    }
}
