//! Common coordinate names and small canned datasets.

use std::fs;
use std::path::PathBuf;

use netcdf_dataset::{DataArray, MemoryDataset};
use tempfile::TempDir;

/// Default X coordinate name.
pub const LON: &str = "lon";
/// Default Y coordinate name.
pub const LAT: &str = "lat";
/// Default time coordinate name.
pub const TIME: &str = "time";

/// The 2×2 grid `[[0, 5], [10, 2]]` stored north-up, west-left, as `band`.
pub fn two_by_two_dataset() -> MemoryDataset {
    MemoryDataset::new()
        .with_variable(DataArray::coordinate(LAT, vec![10.0, 0.0]))
        .with_variable(DataArray::coordinate(LON, vec![0.0, 10.0]))
        .with_variable(
            DataArray::from_vec("band", &[LAT, LON], &[2, 2], vec![0.0, 5.0, 10.0, 2.0])
                .expect("2x2 fixture"),
        )
}

/// Write `json` to `dataset.json` in a fresh temp directory. Keep the
/// returned `TempDir` alive for as long as the file is needed.
pub fn json_dataset_file(json: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("dataset.json");
    fs::write(&path, json).expect("write dataset json");
    (dir, path)
}
