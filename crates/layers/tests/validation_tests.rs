//! Validation of layer definitions against datasets.

use layers::{
    validate_layers, CoordinateNames, CoordinateRole, Layer, LayerCore, LayerState, MaskLayer, RenderLayer,
    RgbLayer, SingleBandLayer, ValidationError,
};
use netcdf_dataset::{DataArray, MemoryDataset, Selectors};
use test_utils::{grid_dataset, LAT, LON, TIME};

fn core(name: &str) -> LayerCore {
    LayerCore::new(name, name, Selectors::new())
}

fn single(band: &str) -> Layer {
    let mut layer = Layer::Single(SingleBandLayer::new(core(band), band, 0.0, 1.0, "viridis"));
    layer.bind(CoordinateNames::new(LON, LAT));
    layer
}

#[test]
fn test_check_passes_and_marks_checked() {
    let mut layer = single("band");
    assert_eq!(layer.state(), LayerState::Unvalidated);
    layer.check(&grid_dataset(3, 2)).unwrap();
    assert_eq!(layer.state(), LayerState::Checked);
}

#[test]
fn test_missing_band() {
    let mut layer = single("chlor_a");
    let err = layer.check(&grid_dataset(3, 2)).unwrap_err();
    assert_eq!(err.to_string(), "No variable chlor_a");
    assert_eq!(layer.state(), LayerState::Unvalidated);
}

#[test]
fn test_missing_coordinate_reported_before_band() {
    let mut layer = single("chlor_a");
    layer.bind(CoordinateNames::new("longitude", LAT));
    let err = layer.check(&grid_dataset(3, 2)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingVariable {
            name: "longitude".into()
        }
    );
}

#[test]
fn test_two_dimensional_coordinate_rejected() {
    let ds = grid_dataset(3, 2).with_variable(
        DataArray::from_vec(LON, &[LAT, LON], &[2, 3], vec![0.0; 6]).unwrap(),
    );
    let mut layer = single("band");
    let err = layer.check(&ds).unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotOneDimensional {
            role: CoordinateRole::X,
            name: LON.into(),
            ndim: 2
        }
    );
    assert!(err.to_string().starts_with("x_coordinate lon must be 1-dimensional"));
}

#[test]
fn test_unbound_time_is_not_checked() {
    // empty time name is skipped, a bound one must exist
    let mut layer = single("band");
    layer.check(&grid_dataset(2, 2)).unwrap();

    layer.bind(CoordinateNames::new(LON, LAT).with_time(TIME));
    let err = layer.check(&grid_dataset(2, 2)).unwrap_err();
    assert_eq!(err.to_string(), "No variable time");
}

#[test]
fn test_rgb_requires_every_band() {
    let mut layer = Layer::Rgb(RgbLayer::new(core("tc"), "band", "band", "blue"));
    layer.bind(CoordinateNames::new(LON, LAT));
    let err = layer.check(&grid_dataset(2, 2)).unwrap_err();
    assert_eq!(err.to_string(), "No variable blue");
}

#[test]
fn test_mask_check_ignores_coordinates() {
    let ds = MemoryDataset::new()
        .with_variable(DataArray::from_vec("flags", &["row", "col"], &[1, 2], vec![1.0, 0.0]).unwrap());
    let mut layer = Layer::Mask(MaskLayer::new(core("flags"), "flags", [255, 0, 0], None));
    layer.bind(CoordinateNames::new("nope_x", "nope_y"));
    layer.check(&ds).unwrap();
    assert_eq!(layer.state(), LayerState::Checked);
}

#[test]
fn test_validate_layers_collects_all_issues() {
    let mut layers = vec![single("band"), single("sst"), single("chl")];
    let issues = validate_layers(&mut layers, &grid_dataset(2, 2));

    let names: Vec<_> = issues.iter().map(|i| i.layer.as_str()).collect();
    assert_eq!(names, vec!["sst", "chl"]);
    assert_eq!(issues[1].error.to_string(), "No variable chl");
    assert_eq!(layers[0].state(), LayerState::Checked);
}
