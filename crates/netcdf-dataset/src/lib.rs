//! Dataset access for gridded scientific data.
//!
//! Variables are labelled n-dimensional arrays ([`DataArray`]): an
//! `ndarray` of values plus one dimension name per axis. A [`Dataset`] is
//! anything that can hand out variables by name; [`MemoryDataset`] is the
//! in-memory implementation, loadable from JSON or (with the `netcdf`
//! feature) from netCDF files.

pub mod array;
pub mod dataset;
pub mod error;
#[cfg(feature = "netcdf")]
pub mod native;

pub use array::{DataArray, Selectors};
pub use dataset::{Dataset, MemoryDataset};
pub use error::{NetCdfError, NetCdfResult};
#[cfg(feature = "netcdf")]
pub use native::{load_netcdf, silence_hdf5_errors};
