use std::path::Path;

use netcdf_dataset::Dataset;
use renderer::{encode_false_colour, save_image};
use tracing::{info, instrument};

use super::{band, RenderLayer};
use crate::binding::LayerCore;
use crate::error::{LayerResult, ValidationError};

/// False-colour composite of three bands, each stretched independently.
#[derive(Debug, Clone)]
pub struct RgbLayer {
    core: LayerCore,
    bands: [String; 3],
}

impl RgbLayer {
    pub fn new(core: LayerCore, red: &str, green: &str, blue: &str) -> Self {
        Self {
            core,
            bands: [red.to_string(), green.to_string(), blue.to_string()],
        }
    }

    /// Red, green and blue band names.
    pub fn bands(&self) -> &[String; 3] {
        &self.bands
    }
}

impl RenderLayer for RgbLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn check(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError> {
        self.core.check_coordinates(dataset)?;
        for name in &self.bands {
            LayerCore::require_band(dataset, name)?;
        }
        self.core.mark_checked();
        Ok(())
    }

    #[instrument(skip_all, fields(layer = %self.core.name(), path = %path.display()))]
    fn build(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<()> {
        self.core.warn_if_unchecked();
        let [red, green, blue] = &self.bands;
        let red = self.core.extract(band(dataset, red)?)?;
        let green = self.core.extract(band(dataset, green)?)?;
        let blue = self.core.extract(band(dataset, blue)?)?;

        let image = encode_false_colour(red.view(), green.view(), blue.view())?;
        save_image(&image, path)?;
        info!(width = image.width, height = image.height, "Built RGB layer");
        Ok(())
    }
}
