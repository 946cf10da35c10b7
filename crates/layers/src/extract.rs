//! Reduce a dataset variable to a north-up, west-left 2-D grid.

use ndarray::{Array2, Axis, Ix2};
use netcdf_dataset::DataArray;
use tracing::trace;

use crate::binding::LayerCore;
use crate::error::{LayerError, LayerResult};

impl LayerCore {
    /// Apply the layer's selectors to `array`, drop singleton axes and
    /// return a `(rows, cols)` grid with rows along Y and columns along X.
    ///
    /// The result is transposed when the Y axis comes after the X axis in
    /// the variable, then flipped vertically and horizontally according to
    /// the orientation found by the last coordinate check. Works for any
    /// element type so mask bands can be extracted after integer
    /// conversion.
    pub fn extract<T: Clone>(&self, array: &DataArray<T>) -> LayerResult<Array2<T>> {
        let selected = if self.selectors().is_empty() {
            array.squeeze()
        } else {
            array.isel(self.selectors())?.squeeze()
        };

        let not_2d = || LayerError::NotTwoDimensional {
            variable: array.name().to_string(),
            dims: selected.dims().to_vec(),
        };
        if selected.ndim() != 2 {
            return Err(not_2d());
        }

        let coords = self.coordinates();
        let dim_index = |dim: &str| {
            selected
                .dim_index(dim)
                .ok_or_else(|| LayerError::DimensionNotFound {
                    variable: array.name().to_string(),
                    dim: dim.to_string(),
                })
        };
        let x_index = dim_index(&coords.x_coordinate)?;
        let y_index = dim_index(&coords.y_coordinate)?;

        let mut grid = selected
            .values()
            .clone()
            .into_dimensionality::<Ix2>()
            .map_err(|_| not_2d())?;

        if y_index > x_index {
            grid = grid.reversed_axes();
        }
        let orientation = self.orientation();
        if orientation.flip_vertical {
            grid.invert_axis(Axis(0));
        }
        if orientation.flip_horizontal {
            grid.invert_axis(Axis(1));
        }

        trace!(layer = %self.name(), shape = ?grid.shape(), ?orientation, "Extracted grid");
        Ok(grid.as_standard_layout().into_owned())
    }
}
