//! The layer variants and the interface they share.

mod mask;
mod remote;
mod rgb;
mod single;

use std::path::Path;

use netcdf_dataset::{DataArray, Dataset};
use tracing::{info, warn};

use crate::binding::{CoordinateNames, LayerCore, LayerState};
use crate::error::{LayerError, LayerResult, ValidationError};

pub use mask::MaskLayer;
pub use remote::{RemoteTileLayer, TileRequest};
pub use rgb::RgbLayer;
pub use single::{SingleBandLayer, LEGEND_HEIGHT, LEGEND_WIDTH};

/// Behaviour every layer provides.
pub trait RenderLayer {
    fn core(&self) -> &LayerCore;

    fn core_mut(&mut self) -> &mut LayerCore;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn label(&self) -> &str {
        self.core().label()
    }

    fn state(&self) -> LayerState {
        self.core().state()
    }

    /// Record the dataset's structural names.
    fn bind(&mut self, coords: CoordinateNames) {
        self.core_mut().bind(coords)
    }

    /// Validate against `dataset`. On success the layer is `Checked` and
    /// its orientation reflects the dataset.
    fn check(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError>;

    /// Render one image for `dataset` to `path`; the format follows the
    /// extension.
    fn build(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<()>;

    fn has_legend(&self) -> bool {
        false
    }

    fn build_legend(&self, _path: &Path) -> LayerResult<()> {
        Err(LayerError::NoLegend(self.name().to_string()))
    }
}

/// Any configured layer.
#[derive(Debug)]
pub enum Layer {
    Single(SingleBandLayer),
    Rgb(RgbLayer),
    Mask(MaskLayer),
    Remote(RemoteTileLayer),
}

impl Layer {
    /// The definition `type` this layer was created from.
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Single(_) => "single",
            Layer::Rgb(_) => "rgb",
            Layer::Mask(_) => "mask",
            Layer::Remote(_) => "wms",
        }
    }

    /// Build like [`RenderLayer::build`], reporting whether an image was
    /// written. A remote tile whose fetch failed builds without output.
    pub fn build_output(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<bool> {
        match self {
            Layer::Remote(layer) => Ok(layer.build_logged(dataset, path)?.produced_output()),
            layer => layer.build(dataset, path).map(|()| true),
        }
    }

    fn inner(&self) -> &dyn RenderLayer {
        match self {
            Layer::Single(layer) => layer,
            Layer::Rgb(layer) => layer,
            Layer::Mask(layer) => layer,
            Layer::Remote(layer) => layer,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn RenderLayer {
        match self {
            Layer::Single(layer) => layer,
            Layer::Rgb(layer) => layer,
            Layer::Mask(layer) => layer,
            Layer::Remote(layer) => layer,
        }
    }
}

impl RenderLayer for Layer {
    fn core(&self) -> &LayerCore {
        self.inner().core()
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        self.inner_mut().core_mut()
    }

    fn check(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError> {
        self.inner_mut().check(dataset)
    }

    fn build(&self, dataset: &dyn Dataset, path: &Path) -> LayerResult<()> {
        self.inner().build(dataset, path)
    }

    fn has_legend(&self) -> bool {
        self.inner().has_legend()
    }

    fn build_legend(&self, path: &Path) -> LayerResult<()> {
        self.inner().build_legend(path)
    }
}

/// A validation problem attributed to a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerIssue {
    pub layer: String,
    pub error: ValidationError,
}

/// Check every layer against `dataset`, collecting the problems instead of
/// stopping at the first.
pub fn validate_layers(layers: &mut [Layer], dataset: &dyn Dataset) -> Vec<LayerIssue> {
    let mut issues = Vec::new();
    for layer in layers.iter_mut() {
        if let Err(error) = layer.check(dataset) {
            warn!(layer = %layer.name(), %error, "Layer failed validation");
            issues.push(LayerIssue {
                layer: layer.name().to_string(),
                error,
            });
        }
    }
    info!(layers = layers.len(), issues = issues.len(), "Validated layers");
    issues
}

pub(crate) fn band<'a>(dataset: &'a dyn Dataset, name: &str) -> LayerResult<&'a DataArray> {
    dataset
        .variable(name)
        .ok_or_else(|| LayerError::MissingVariable(name.to_string()))
}
