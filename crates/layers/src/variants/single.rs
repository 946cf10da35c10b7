use std::path::Path;

use ndarray::Array2;
use netcdf_dataset::Dataset;
use renderer::{encode_colormapped, save_image};
use tracing::{info, instrument};

use super::{band, RenderLayer};
use crate::binding::LayerCore;
use crate::error::{LayerResult, ValidationError};

/// Legend image size in pixels.
pub const LEGEND_WIDTH: usize = 200;
pub const LEGEND_HEIGHT: usize = 20;

/// One band through a named colour map, scaled between fixed bounds.
#[derive(Debug, Clone)]
pub struct SingleBandLayer {
    core: LayerCore,
    band: String,
    min_value: f64,
    max_value: f64,
    palette: String,
}

impl SingleBandLayer {
    pub fn new(core: LayerCore, band: &str, min_value: f64, max_value: f64, palette: &str) -> Self {
        Self {
            core,
            band: band.to_string(),
            min_value,
            max_value,
            palette: palette.to_string(),
        }
    }

    pub fn band(&self) -> &str {
        &self.band
    }

    pub fn palette(&self) -> &str {
        &self.palette
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }
}

impl RenderLayer for SingleBandLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn check(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError> {
        self.core.check_coordinates(dataset)?;
        LayerCore::require_band(dataset, &self.band)?;
        self.core.mark_checked();
        Ok(())
    }

    #[instrument(skip_all, fields(layer = %self.core.name(), path = %path.display()))]
    fn build(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<()> {
        self.core.warn_if_unchecked();
        let grid = self.core.extract(band(dataset, &self.band)?)?;
        let image = encode_colormapped(grid.view(), self.min_value, self.max_value, &self.palette)?;
        save_image(&image, path)?;
        info!(width = image.width, height = image.height, "Built single band layer");
        Ok(())
    }

    fn has_legend(&self) -> bool {
        true
    }

    /// A horizontal ramp from `min_value` (left) towards `max_value`.
    fn build_legend(&self, path: &Path) -> LayerResult<()> {
        let (vmin, vmax) = self.range();
        let ramp = Array2::from_shape_fn((LEGEND_HEIGHT, LEGEND_WIDTH), |(_, i)| {
            vmin + (i as f64 / LEGEND_WIDTH as f64) * (vmax - vmin)
        });
        let image = encode_colormapped(ramp.view(), vmin, vmax, &self.palette)?;
        save_image(&image, path)?;
        info!(layer = %self.core.name(), path = %path.display(), "Built legend");
        Ok(())
    }
}
