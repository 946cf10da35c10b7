//! The dataset abstraction and its in-memory implementation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::array::{DataArray, Selectors};
use crate::error::{NetCdfError, NetCdfResult};

/// Named coordinate and data variables.
pub trait Dataset {
    /// Look up a variable by name.
    fn variable(&self, name: &str) -> Option<&DataArray>;

    /// Names of all variables.
    fn variable_names(&self) -> Vec<&str>;

    fn contains(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }
}

/// A dataset held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDataset {
    variables: BTreeMap<String, DataArray>,
}

#[derive(Debug, Deserialize)]
struct JsonDataset {
    variables: BTreeMap<String, JsonVariable>,
}

#[derive(Debug, Deserialize)]
struct JsonVariable {
    dims: Vec<String>,
    #[serde(default)]
    shape: Option<Vec<usize>>,
    /// `null` entries become NaN.
    data: Vec<Option<f64>>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_variable(mut self, variable: DataArray) -> Self {
        self.insert(variable);
        self
    }

    /// Insert or replace a variable, keyed by its name.
    pub fn insert(&mut self, variable: DataArray) {
        self.variables.insert(variable.name().to_string(), variable);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Parse the JSON dataset format:
    ///
    /// ```json
    /// { "variables": { "lat": { "dims": ["lat"], "data": [50.0, 40.0] },
    ///                  "sst": { "dims": ["lat", "lon"], "shape": [2, 3], "data": [...] } } }
    /// ```
    ///
    /// `shape` may be omitted for 1-D variables.
    pub fn from_json_str(json: &str) -> NetCdfResult<Self> {
        let parsed: JsonDataset = serde_json::from_str(json)
            .map_err(|e| NetCdfError::InvalidFormat(format!("dataset JSON: {}", e)))?;

        let mut dataset = Self::new();
        for (name, var) in parsed.variables {
            let shape = match var.shape {
                Some(shape) => shape,
                None if var.dims.len() == 1 => vec![var.data.len()],
                None => {
                    return Err(NetCdfError::MissingData(format!(
                        "shape for {}-dimensional variable {}",
                        var.dims.len(),
                        name
                    )))
                }
            };
            let data = var.data.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
            dataset.insert(DataArray::from_vec(name, &dims, &shape, data)?);
        }

        debug!(variables = dataset.len(), "Loaded JSON dataset");
        Ok(dataset)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Length of a dimension, taken from the first variable that has it.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.variables.values().find_map(|v| v.dim_len(dim))
    }

    /// One case of the dataset: index `index` selected along `dim` on every
    /// variable that has that dimension. Other variables are kept unchanged.
    pub fn select_case(&self, dim: &str, index: i64) -> NetCdfResult<Self> {
        if self.dim_len(dim).is_none() {
            return Err(NetCdfError::MissingData(format!("dimension {}", dim)));
        }

        let selectors = Selectors::from([(dim.to_string(), index)]);
        let mut case = Self::new();
        for var in self.variables.values() {
            if var.dim_index(dim).is_some() {
                case.insert(var.isel(&selectors)?);
            } else {
                case.insert(var.clone());
            }
        }
        Ok(case)
    }
}

impl Dataset for MemoryDataset {
    fn variable(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name)
    }

    fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }
}
