//! Native netCDF reading using the netcdf library.
//!
//! Variables are read eagerly into a [`MemoryDataset`]. Packed variables are
//! unpacked with their `scale_factor`/`add_offset` attributes and samples
//! equal to `_FillValue` become NaN.

use std::path::Path;
use std::sync::Once;

use tracing::{debug, info};

use crate::array::DataArray;
use crate::dataset::MemoryDataset;
use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics even for errors the Rust side
/// handles (e.g. probing for optional attributes). Call early in `main()`,
/// before any netCDF file is opened; repeated calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Load variables from a netCDF file.
///
/// With `names`, exactly those variables are read and a missing or
/// non-numeric one is an error. Without, every variable that can be read as
/// floating point is loaded and the rest are skipped.
pub fn load_netcdf(path: impl AsRef<Path>, names: Option<&[&str]>) -> NetCdfResult<MemoryDataset> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF {}: {}", path.display(), e)))?;

    let mut dataset = MemoryDataset::new();
    match names {
        Some(names) => {
            for name in names {
                let var = file
                    .variable(name)
                    .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;
                dataset.insert(read_variable(&var)?);
            }
        }
        None => {
            for var in file.variables() {
                match read_variable(&var) {
                    Ok(array) => dataset.insert(array),
                    Err(e) => debug!(variable = %var.name(), error = %e, "Skipping variable"),
                }
            }
        }
    }

    info!(path = %path.display(), variables = dataset.len(), "Loaded NetCDF dataset");
    Ok(dataset)
}

fn read_variable(var: &netcdf::Variable) -> NetCdfResult<DataArray> {
    let name = var.name();
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let raw: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f64_attr(var, "_FillValue");

    let data = raw
        .into_iter()
        .map(|val| {
            if fill_value == Some(val) {
                f64::NAN
            } else {
                val * scale_factor + add_offset
            }
        })
        .collect();

    let dim_refs: Vec<&str> = dims.iter().map(String::as_str).collect();
    DataArray::from_vec(name, &dim_refs, &shape, data)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}
