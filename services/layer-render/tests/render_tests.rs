//! Whole-run rendering from a YAML configuration.

use std::path::Path;
use std::sync::Arc;

use layer_render::render::{case_path, legend_path};
use layer_render::{load_dataset, render_all, RenderConfig};
use layers::{validate_layers, FetchError, LayerFactory, TileFetcher, DEFAULT_FETCH_TIMEOUT};
use test_utils::{grid_dataset, json_dataset_file, time_cube};

const CONFIG: &str = r##"
x_coordinate: lon
y_coordinate: lat
case_dimension: time
layers:
  sst:
    type: single
    band: sst
    min_value: 0
    max_value: 5000
    cmap: viridis
  cold:
    type: mask
    band: sst
    colour: "#0000ff"
    mask: 1
"##;

fn render(config: &RenderConfig, dataset: &netcdf_dataset::MemoryDataset, out: &Path) -> layer_render::RenderSummary {
    let factory = LayerFactory::with_http(DEFAULT_FETCH_TIMEOUT).unwrap();
    let mut layers = factory.create_all(&config.layers, &config.coordinate_names()).unwrap();
    assert!(validate_layers(&mut layers, dataset).is_empty());
    render_all(&layers, dataset, &config.case_dimension, out, &config.image_format).unwrap()
}

#[test]
fn test_every_case_and_legend_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig::from_yaml_str(CONFIG).unwrap();
    let dataset = grid_dataset(4, 3).with_variable(time_cube("sst", 2, 4, 3));

    let summary = render(&config, &dataset, dir.path());
    assert_eq!(summary.cases, 2);
    assert_eq!(summary.images, 4);
    assert_eq!(summary.legends, 1);
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);

    for case in 0..2 {
        assert!(case_path(dir.path(), "sst", case, "png").exists());
        assert!(case_path(dir.path(), "cold", case, "png").exists());
    }
    assert!(legend_path(dir.path(), "sst").exists());
    assert!(!legend_path(dir.path(), "cold").exists());
}

#[test]
fn test_missing_case_dimension_renders_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig::from_yaml_str(&CONFIG.replace("case_dimension: time", "case_dimension: member"))
        .unwrap();
    let dataset = grid_dataset(4, 3).with_variable(
        netcdf_dataset::DataArray::from_vec("sst", &["lat", "lon"], &[3, 4], vec![1.0; 12]).unwrap(),
    );

    let summary = render(&config, &dataset, dir.path());
    assert_eq!(summary.cases, 1);
    assert_eq!(summary.images, 2);
    assert!(case_path(dir.path(), "sst", 0, "png").exists());
}

#[test]
fn test_build_failures_collected() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig::from_yaml_str(&CONFIG.replace("cmap: viridis", "cmap: not_a_map")).unwrap();
    let dataset = grid_dataset(4, 3).with_variable(time_cube("sst", 2, 4, 3));

    let summary = render(&config, &dataset, dir.path());
    // sst fails for both cases and its legend; the mask still renders
    assert_eq!(summary.images, 2);
    assert_eq!(summary.failures.len(), 3);
    assert!(summary.failures.iter().any(|f| f.starts_with("sst/legend")));
}

struct Unreachable;

impl TileFetcher for Unreachable {
    fn fetch(&self, _url: &str, _dest: &Path) -> Result<(), FetchError> {
        Err(FetchError::Status(503))
    }
}

#[test]
fn test_failed_tile_fetch_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        "{}  basemap:\n    type: wms\n    url: \"http://tiles.test/{{WIDTH}}x{{HEIGHT}}\"\n",
        CONFIG
    );
    let config = RenderConfig::from_yaml_str(&yaml).unwrap();
    let dataset = grid_dataset(4, 3).with_variable(time_cube("sst", 2, 4, 3));

    let factory = LayerFactory::new(Arc::new(Unreachable));
    let mut layers = factory.create_all(&config.layers, &config.coordinate_names()).unwrap();
    assert!(validate_layers(&mut layers, &dataset).is_empty());
    let summary = render_all(&layers, &dataset, &config.case_dimension, dir.path(), &config.image_format).unwrap();

    assert_eq!(summary.images, 4);
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert!(!case_path(dir.path(), "basemap", 0, "png").exists());
}

#[test]
fn test_load_json_dataset() {
    let (dir, path) = json_dataset_file(
        r#"{ "variables": {
            "lat": { "dims": ["lat"], "data": [1.0, 0.0] },
            "lon": { "dims": ["lon"], "data": [0.0, 1.0] },
            "sst": { "dims": ["lat", "lon"], "shape": [2, 2], "data": [1, 2, 3, null] }
        } }"#,
    );

    let dataset = load_dataset(&path).unwrap();
    assert_eq!(dataset.len(), 3);
    assert!(load_dataset(&dir.path().join("ds.grib2")).is_err());
}
