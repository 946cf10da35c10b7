//! Layer construction from definitions.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use layers::{CoordinateNames, FetchError, Layer, LayerError, LayerFactory, RenderLayer, TileFetcher};
use serde_json::{json, Value};

struct Offline;

impl TileFetcher for Offline {
    fn fetch(&self, _url: &str, _dest: &Path) -> Result<(), FetchError> {
        Err(FetchError::Timeout)
    }
}

fn factory() -> LayerFactory {
    LayerFactory::new(Arc::new(Offline))
}

fn defaults() -> CoordinateNames {
    CoordinateNames::new("lon", "lat")
        .with_time("time")
        .with_case_dimension("time")
}

#[test]
fn test_unknown_type_is_named() {
    let err = factory()
        .create("iso", &json!({"type": "contour", "band": "sst"}), &defaults())
        .unwrap_err();
    assert!(matches!(err, LayerError::UnknownLayerType(ref t) if t == "contour"));
    assert_eq!(err.to_string(), "Unknown layer type contour");
}

#[test]
fn test_shared_names_bound() {
    let layer = factory()
        .create(
            "tc",
            &json!({"type": "rgb", "red_band": "r", "green_band": "g", "blue_band": "b", "label": "True colour"}),
            &defaults(),
        )
        .unwrap();
    assert_eq!(layer.label(), "True colour");
    assert_eq!(layer.core().coordinates(), &defaults());
}

#[test]
fn test_per_layer_coordinate_override() {
    let layer = factory()
        .create(
            "sst",
            &json!({
                "type": "single", "band": "sst", "min_value": 0, "max_value": 1,
                "x": "longitude", "selectors": {"depth": 0}
            }),
            &defaults(),
        )
        .unwrap();
    let coords = layer.core().coordinates();
    assert_eq!(coords.x_coordinate, "longitude");
    assert_eq!(coords.y_coordinate, "lat");
    assert_eq!(coords.time_coordinate, "time");
    assert_eq!(layer.core().selectors().get("depth"), Some(&0));
}

#[test]
fn test_wms_scale_defaults_to_one() {
    let layer = factory()
        .create("base", &json!({"type": "wms", "url": "http://x/{WIDTH}"}), &defaults())
        .unwrap();
    match layer {
        Layer::Remote(remote) => {
            assert_eq!(remote.scale(), 1);
            assert_eq!(remote.template().as_str(), "http://x/{WIDTH}");
        }
        other => panic!("expected remote layer, got {}", other.kind()),
    }
}

#[test]
fn test_missing_required_key() {
    let err = factory()
        .create("sst", &json!({"type": "single", "band": "sst", "min_value": 0}), &defaults())
        .unwrap_err();
    match err {
        LayerError::InvalidDefinition { layer, message } => {
            assert_eq!(layer, "sst");
            assert!(message.contains("max_value"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_create_all_keeps_order() {
    let mut definitions: BTreeMap<String, Value> = BTreeMap::new();
    definitions.insert("a_mask".into(), json!({"type": "mask", "band": "m", "r": 1, "g": 2, "b": 3}));
    definitions.insert("b_sst".into(), json!({"type": "single", "band": "sst", "min_value": 0, "max_value": 1, "cmap": "viridis_r"}));

    let layers = factory().create_all(&definitions, &defaults()).unwrap();
    let names: Vec<_> = layers.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["a_mask", "b_sst"]);
    assert_eq!(layers[0].kind(), "mask");
}
