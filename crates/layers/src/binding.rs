//! State shared by every layer variant: identity, selectors, coordinate
//! binding and the orientation derived from it.

use netcdf_dataset::{Dataset, Selectors};
use tracing::{debug, warn};

use crate::error::{CoordinateRole, ValidationError};

/// Names of the dataset's structural variables. An empty string means
/// "not bound".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateNames {
    pub case_dimension: String,
    pub x_coordinate: String,
    pub y_coordinate: String,
    pub time_coordinate: String,
}

impl CoordinateNames {
    pub fn new(x_coordinate: &str, y_coordinate: &str) -> Self {
        Self {
            x_coordinate: x_coordinate.to_string(),
            y_coordinate: y_coordinate.to_string(),
            ..Self::default()
        }
    }

    pub fn with_time(mut self, time_coordinate: &str) -> Self {
        self.time_coordinate = time_coordinate.to_string();
        self
    }

    pub fn with_case_dimension(mut self, case_dimension: &str) -> Self {
        self.case_dimension = case_dimension.to_string();
        self
    }

    fn named(&self, role: CoordinateRole) -> &str {
        match role {
            CoordinateRole::X => &self.x_coordinate,
            CoordinateRole::Y => &self.y_coordinate,
            CoordinateRole::Time => &self.time_coordinate,
        }
    }
}

/// Flips applied to extracted grids so row 0 is north and column 0 is west.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orientation {
    /// Reverse rows: the Y coordinate increases along its axis.
    pub flip_vertical: bool,
    /// Reverse columns: the X coordinate decreases along its axis.
    pub flip_horizontal: bool,
}

/// Lifecycle of a layer against a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerState {
    #[default]
    Unvalidated,
    Checked,
}

/// Fields and behaviour common to all layer variants.
#[derive(Debug, Clone)]
pub struct LayerCore {
    name: String,
    label: String,
    selectors: Selectors,
    coords: CoordinateNames,
    orientation: Orientation,
    state: LayerState,
}

impl LayerCore {
    pub fn new(name: impl Into<String>, label: impl Into<String>, selectors: Selectors) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            selectors,
            coords: CoordinateNames::default(),
            orientation: Orientation::default(),
            state: LayerState::Unvalidated,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub fn coordinates(&self) -> &CoordinateNames {
        &self.coords
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    /// Record the dataset's structural names. Rebinding invalidates any
    /// earlier check.
    pub fn bind(&mut self, coords: CoordinateNames) {
        self.coords = coords;
        self.state = LayerState::Unvalidated;
    }

    /// Validate the bound coordinates against `dataset` and derive the
    /// orientation flags from the first and last coordinate values.
    ///
    /// Existence is checked for every bound name (X, then Y, then time);
    /// X and Y must be bound and one-dimensional.
    pub fn check_coordinates(&mut self, dataset: &dyn Dataset) -> Result<(), ValidationError> {
        for role in [CoordinateRole::X, CoordinateRole::Y, CoordinateRole::Time] {
            let name = self.coords.named(role);
            if !name.is_empty() && !dataset.contains(name) {
                return Err(ValidationError::missing(name));
            }
        }

        let x = self.coordinate(dataset, CoordinateRole::X)?;
        let y = self.coordinate(dataset, CoordinateRole::Y)?;

        // x increasing left to right, y decreasing top to bottom
        let orientation = Orientation {
            flip_horizontal: matches!((x.first(), x.last()), (Some(first), Some(last)) if first > last),
            flip_vertical: matches!((y.first(), y.last()), (Some(first), Some(last)) if first < last),
        };
        debug!(layer = %self.name, ?orientation, "Coordinates checked");
        self.orientation = orientation;
        Ok(())
    }

    fn coordinate<'a>(
        &self,
        dataset: &'a dyn Dataset,
        role: CoordinateRole,
    ) -> Result<&'a netcdf_dataset::DataArray, ValidationError> {
        let name = self.coords.named(role);
        if name.is_empty() {
            return Err(ValidationError::UnboundCoordinate { role });
        }
        let var = dataset
            .variable(name)
            .ok_or_else(|| ValidationError::missing(name))?;
        if var.ndim() != 1 {
            return Err(ValidationError::NotOneDimensional {
                role,
                name: name.to_string(),
                ndim: var.ndim(),
            });
        }
        Ok(var)
    }

    /// Require a band variable to exist.
    pub fn require_band(dataset: &dyn Dataset, band: &str) -> Result<(), ValidationError> {
        if dataset.contains(band) {
            Ok(())
        } else {
            Err(ValidationError::missing(band))
        }
    }

    pub fn mark_checked(&mut self) {
        self.state = LayerState::Checked;
    }

    /// Rendering an unchecked layer is allowed but its orientation may be
    /// stale, so say so.
    pub(crate) fn warn_if_unchecked(&self) {
        if self.state != LayerState::Checked {
            warn!(layer = %self.name, "Building layer that has not been checked against the dataset");
        }
    }
}
