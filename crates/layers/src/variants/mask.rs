use std::path::Path;

use netcdf_dataset::Dataset;
use renderer::{encode_mask, save_image};
use tracing::{info, instrument};

use super::{band, RenderLayer};
use crate::binding::LayerCore;
use crate::error::{LayerResult, ValidationError};

/// Flat-colour stencil: opaque where the (optionally bit-masked) integer
/// value of a band is positive, transparent elsewhere.
#[derive(Debug, Clone)]
pub struct MaskLayer {
    core: LayerCore,
    band: String,
    colour: [u8; 3],
    bitmask: Option<i64>,
}

impl MaskLayer {
    pub fn new(core: LayerCore, band: &str, colour: [u8; 3], bitmask: Option<i64>) -> Self {
        Self {
            core,
            band: band.to_string(),
            colour,
            bitmask,
        }
    }

    pub fn band(&self) -> &str {
        &self.band
    }

    pub fn colour(&self) -> [u8; 3] {
        self.colour
    }

    pub fn bitmask(&self) -> Option<i64> {
        self.bitmask
    }
}

impl RenderLayer for MaskLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    /// Only the band is checked; orientation flags keep their previous
    /// values.
    fn check(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError> {
        LayerCore::require_band(dataset, &self.band)?;
        self.core.mark_checked();
        Ok(())
    }

    #[instrument(skip_all, fields(layer = %self.core.name(), path = %path.display()))]
    fn build(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<()> {
        self.core.warn_if_unchecked();
        // NaN casts to 0 and so renders transparent
        let values = band(dataset, &self.band)?.map(|v| *v as i64);
        let values = match self.bitmask {
            Some(mask) if mask != 0 => values.map(|v| v & mask),
            _ => values,
        };

        let grid = self.core.extract(&values)?;
        let image = encode_mask(grid.view(), self.colour);
        save_image(&image, path)?;
        info!(width = image.width, height = image.height, "Built mask layer");
        Ok(())
    }
}
