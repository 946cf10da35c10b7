//! Construction of layers from declarative definitions.
//!
//! A definition is a mapping with a `type` key (`single`, `mask`, `rgb` or
//! `wms`), optional `label`, `selectors`, `x` and `y`, plus the keys of
//! its type:
//!
//! | type | keys |
//! |---|---|
//! | `single` | `band`, `min_value`, `max_value`, `cmap` (default `coolwarm`) |
//! | `mask` | `band`, `r`/`g`/`b` or `colour`, `mask` |
//! | `rgb` | `red_band`, `green_band`, `blue_band` |
//! | `wms` | `url`, `scale` (default 1) |

use std::sync::Arc;
use std::time::Duration;

use netcdf_dataset::Selectors;
use renderer::lookup_colour;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::binding::{CoordinateNames, LayerCore};
use crate::error::{LayerError, LayerResult};
use crate::fetch::{HttpTileFetcher, TileFetcher};
use crate::template::UrlTemplate;
use crate::variants::{Layer, MaskLayer, RemoteTileLayer, RenderLayer, RgbLayer, SingleBandLayer};

#[derive(Debug, Deserialize)]
struct CommonFields {
    #[serde(rename = "type")]
    layer_type: String,
    label: Option<String>,
    #[serde(default)]
    selectors: Selectors,
    x: Option<String>,
    y: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SingleFields {
    #[serde(default)]
    band: String,
    min_value: f64,
    max_value: f64,
    #[serde(default = "default_cmap")]
    cmap: String,
}

fn default_cmap() -> String {
    renderer::palette::DEFAULT_PALETTE.to_string()
}

#[derive(Debug, Deserialize)]
struct MaskFields {
    #[serde(default)]
    band: String,
    r: Option<u8>,
    g: Option<u8>,
    b: Option<u8>,
    colour: Option<String>,
    mask: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RgbFields {
    red_band: String,
    green_band: String,
    blue_band: String,
}

#[derive(Debug, Deserialize)]
struct WmsFields {
    url: String,
    #[serde(default = "default_scale")]
    scale: u32,
}

fn default_scale() -> u32 {
    1
}

/// Builds layers and binds them to the shared coordinate names.
pub struct LayerFactory {
    fetcher: Arc<dyn TileFetcher>,
}

impl LayerFactory {
    /// Factory whose remote tile layers use `fetcher`.
    pub fn new(fetcher: Arc<dyn TileFetcher>) -> Self {
        Self { fetcher }
    }

    /// Factory whose remote tile layers fetch over HTTP.
    pub fn with_http(timeout: Duration) -> LayerResult<Self> {
        let fetcher = HttpTileFetcher::new(timeout).map_err(LayerError::HttpClient)?;
        Ok(Self::new(Arc::new(fetcher)))
    }

    /// Create and bind one layer. Per-layer `x`/`y` keys override the
    /// shared X/Y names in `defaults`.
    pub fn create(&self, name: &str, definition: &Value, defaults: &CoordinateNames) -> LayerResult<Layer> {
        if !definition.is_object() {
            return Err(invalid(name, "definition must be a mapping"));
        }
        let common: CommonFields = parse(name, definition)?;
        let label = common.label.clone().unwrap_or_else(|| name.to_string());
        let core = LayerCore::new(name, label, common.selectors.clone());

        let mut layer = match common.layer_type.as_str() {
            "single" => {
                let f: SingleFields = parse(name, definition)?;
                Layer::Single(SingleBandLayer::new(core, &f.band, f.min_value, f.max_value, &f.cmap))
            }
            "mask" => {
                let f: MaskFields = parse(name, definition)?;
                let colour = mask_colour(name, &f)?;
                Layer::Mask(MaskLayer::new(core, &f.band, colour, f.mask))
            }
            "rgb" => {
                let f: RgbFields = parse(name, definition)?;
                Layer::Rgb(RgbLayer::new(core, &f.red_band, &f.green_band, &f.blue_band))
            }
            "wms" => {
                let f: WmsFields = parse(name, definition)?;
                if f.scale == 0 {
                    return Err(invalid(name, "scale must be at least 1"));
                }
                Layer::Remote(RemoteTileLayer::new(
                    core,
                    UrlTemplate::parse(&f.url),
                    f.scale,
                    Arc::clone(&self.fetcher),
                ))
            }
            other => return Err(LayerError::UnknownLayerType(other.to_string())),
        };

        let mut coords = defaults.clone();
        if let Some(x) = common.x {
            coords.x_coordinate = x;
        }
        if let Some(y) = common.y {
            coords.y_coordinate = y;
        }
        layer.bind(coords);

        debug!(layer = name, kind = layer.kind(), "Created layer");
        Ok(layer)
    }

    /// Create every layer of a `name -> definition` mapping, in order.
    pub fn create_all<'a, I>(&self, definitions: I, defaults: &CoordinateNames) -> LayerResult<Vec<Layer>>
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        definitions
            .into_iter()
            .map(|(name, definition)| self.create(name, definition, defaults))
            .collect()
    }
}

fn parse<T: DeserializeOwned>(name: &str, definition: &Value) -> LayerResult<T> {
    T::deserialize(definition).map_err(|e| invalid(name, &e.to_string()))
}

fn invalid(name: &str, message: &str) -> LayerError {
    LayerError::InvalidDefinition {
        layer: name.to_string(),
        message: message.to_string(),
    }
}

/// Explicit `r`/`g`/`b` win; otherwise a named or `#rrggbb` `colour`.
fn mask_colour(name: &str, fields: &MaskFields) -> LayerResult<[u8; 3]> {
    if let (Some(r), Some(g), Some(b)) = (fields.r, fields.g, fields.b) {
        return Ok([r, g, b]);
    }
    match &fields.colour {
        Some(colour) => lookup_colour(colour).ok_or_else(|| invalid(name, &format!("unknown colour {}", colour))),
        None => Err(invalid(name, "mask needs r, g and b or a colour")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;
    use std::path::Path;

    struct NoFetch;

    impl TileFetcher for NoFetch {
        fn fetch(&self, _url: &str, _dest: &Path) -> Result<(), FetchError> {
            Err(FetchError::Transport("offline".into()))
        }
    }

    fn factory() -> LayerFactory {
        LayerFactory::new(Arc::new(NoFetch))
    }

    #[test]
    fn test_mask_colour_by_name() {
        let layer = factory()
            .create(
                "cloud",
                &json!({"type": "mask", "band": "cloud", "colour": "white", "mask": 4}),
                &CoordinateNames::new("lon", "lat"),
            )
            .unwrap();
        match layer {
            Layer::Mask(mask) => {
                assert_eq!(mask.colour(), [255, 255, 255]);
                assert_eq!(mask.bitmask(), Some(4));
            }
            other => panic!("expected mask, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_mask_without_colour_rejected() {
        let err = factory()
            .create(
                "cloud",
                &json!({"type": "mask", "band": "cloud", "r": 1}),
                &CoordinateNames::default(),
            )
            .unwrap_err();
        assert!(matches!(err, LayerError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_single_defaults() {
        let layer = factory()
            .create(
                "sst",
                &json!({"type": "single", "band": "sst", "min_value": 270, "max_value": 300}),
                &CoordinateNames::new("lon", "lat"),
            )
            .unwrap();
        assert_eq!(layer.label(), "sst");
        match layer {
            Layer::Single(single) => {
                assert_eq!(single.palette(), "coolwarm");
                assert_eq!(single.range(), (270.0, 300.0));
            }
            other => panic!("expected single, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_missing_type_rejected() {
        let err = factory()
            .create("x", &json!({"band": "b"}), &CoordinateNames::default())
            .unwrap_err();
        assert!(matches!(err, LayerError::InvalidDefinition { .. }));
    }
}
