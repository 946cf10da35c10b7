//! Synthetic grid and dataset generators.
//!
//! These generators create predictable, verifiable data patterns so tests
//! can check exactly where every value ends up after extraction.

use netcdf_dataset::{DataArray, MemoryDataset};

use crate::fixtures::{LAT, LON, TIME};

/// Creates a row-major grid where each cell is `col * 1000 + row`.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Evenly spaced coordinate values.
pub fn linspace(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A dataset with `lat`/`lon` coordinates and a `band` variable laid out
/// `(lat, lon)` holding [`create_test_grid`] values.
///
/// Latitudes run north to south from 60 in steps of -1, longitudes west to
/// east from -10 in steps of 1, so no flips are needed.
pub fn grid_dataset(width: usize, height: usize) -> MemoryDataset {
    grid_dataset_with(linspace(60.0, -1.0, height), linspace(-10.0, 1.0, width))
}

/// Like [`grid_dataset`] with explicit coordinate values.
pub fn grid_dataset_with(lat: Vec<f64>, lon: Vec<f64>) -> MemoryDataset {
    let (height, width) = (lat.len(), lon.len());
    MemoryDataset::new()
        .with_variable(DataArray::coordinate(LAT, lat))
        .with_variable(DataArray::coordinate(LON, lon))
        .with_variable(
            DataArray::from_vec("band", &[LAT, LON], &[height, width], create_test_grid(width, height))
                .expect("grid matches coordinates"),
        )
}

/// A `(time, lat, lon)` cube named `name`; value = `t * 1_000_000 + col * 1000 + row`.
pub fn time_cube(name: &str, times: usize, width: usize, height: usize) -> DataArray {
    let grid = create_test_grid(width, height);
    let data = (0..times)
        .flat_map(|t| grid.iter().map(move |v| t as f64 * 1_000_000.0 + v))
        .collect();
    DataArray::from_vec(name, &[TIME, LAT, LON], &[times, height, width], data)
        .expect("cube matches shape")
}
