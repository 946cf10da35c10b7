//! Labelled n-dimensional arrays.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayD, Axis, IxDyn};

use crate::error::{NetCdfError, NetCdfResult};

/// Index selections keyed by dimension name (e.g. `time -> 3`).
///
/// Negative indices count from the end of the dimension.
pub type Selectors = BTreeMap<String, i64>;

/// A named variable: values plus one dimension name per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray<T = f64> {
    name: String,
    dims: Vec<String>,
    values: ArrayD<T>,
}

impl<T: Clone> DataArray<T> {
    /// Wrap `values` with dimension names. The number of names must match
    /// the array's dimensionality and names must be distinct.
    pub fn new(name: impl Into<String>, dims: Vec<String>, values: ArrayD<T>) -> NetCdfResult<Self> {
        let name = name.into();
        if dims.len() != values.ndim() {
            return Err(NetCdfError::InvalidFormat(format!(
                "variable {} has {} dimension names for {} axes",
                name,
                dims.len(),
                values.ndim()
            )));
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(NetCdfError::InvalidFormat(format!(
                    "variable {} repeats dimension {}",
                    name, dim
                )));
            }
        }
        Ok(Self { name, dims, values })
    }

    /// Build from a flat row-major vector.
    pub fn from_vec(
        name: impl Into<String>,
        dims: &[&str],
        shape: &[usize],
        data: Vec<T>,
    ) -> NetCdfResult<Self> {
        let name = name.into();
        let values = ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|e| {
            NetCdfError::InvalidFormat(format!("variable {} data does not fit shape {:?}: {}", name, shape, e))
        })?;
        Self::new(name, dims.iter().map(|d| d.to_string()).collect(), values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &ArrayD<T> {
        &self.values
    }

    /// Axis position of a named dimension.
    pub fn dim_index(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Length of a named dimension.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.dim_index(dim).map(|axis| self.values.len_of(Axis(axis)))
    }

    /// Select one index along each named dimension, dropping those axes.
    pub fn isel(&self, selectors: &Selectors) -> NetCdfResult<Self> {
        let mut dims = self.dims.clone();
        let mut values = self.values.clone();

        for (dim, &index) in selectors {
            let axis = dims.iter().position(|d| d == dim).ok_or_else(|| {
                NetCdfError::UnknownDimension {
                    variable: self.name.clone(),
                    dim: dim.clone(),
                }
            })?;
            let len = values.len_of(Axis(axis));
            let resolved = if index < 0 { index + len as i64 } else { index };
            if resolved < 0 || resolved >= len as i64 {
                return Err(NetCdfError::IndexOutOfRange {
                    dim: dim.clone(),
                    index,
                    len,
                });
            }
            values = values.index_axis_move(Axis(axis), resolved as usize);
            dims.remove(axis);
        }

        Ok(Self {
            name: self.name.clone(),
            dims,
            values,
        })
    }

    /// Drop every axis of length 1.
    pub fn squeeze(&self) -> Self {
        let mut dims = self.dims.clone();
        let mut values = self.values.clone();
        for axis in (0..dims.len()).rev() {
            if values.len_of(Axis(axis)) == 1 {
                values = values.index_axis_move(Axis(axis), 0);
                dims.remove(axis);
            }
        }
        Self {
            name: self.name.clone(),
            dims,
            values,
        }
    }

    /// Convert every element, keeping names and dimensions.
    pub fn map<U, F>(&self, f: F) -> DataArray<U>
    where
        F: Fn(&T) -> U,
    {
        DataArray {
            name: self.name.clone(),
            dims: self.dims.clone(),
            values: self.values.map(f),
        }
    }
}

impl DataArray<f64> {
    /// A 1-D coordinate variable whose single dimension shares its name.
    pub fn coordinate(name: impl Into<String>, values: Vec<f64>) -> Self {
        let name = name.into();
        Self {
            dims: vec![name.clone()],
            name,
            values: Array1::from(values).into_dyn(),
        }
    }

    /// First element in storage order.
    pub fn first(&self) -> Option<f64> {
        self.values.iter().next().copied()
    }

    /// Last element in storage order.
    pub fn last(&self) -> Option<f64> {
        self.values.iter().last().copied()
    }

    /// Minimum ignoring NaN.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).reduce(f64::min)
    }

    /// Maximum ignoring NaN.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).reduce(f64::max)
    }
}
