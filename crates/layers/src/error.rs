//! Error types for layer validation, rendering and remote fetches.

use std::fmt;
use std::path::PathBuf;

use netcdf_dataset::NetCdfError;
use renderer::RenderError;
use thiserror::Error;

/// Result type alias using LayerError.
pub type LayerResult<T> = Result<T, LayerError>;

/// Which bound coordinate a validation problem concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateRole {
    X,
    Y,
    Time,
}

impl fmt::Display for CoordinateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoordinateRole::X => "x_coordinate",
            CoordinateRole::Y => "y_coordinate",
            CoordinateRole::Time => "time_coordinate",
        })
    }
}

/// A layer definition that does not fit a dataset.
///
/// Returned from `check` instead of aborting so callers can collect the
/// problems of every configured layer before rendering anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No variable {name}")]
    MissingVariable { name: String },

    #[error("{role} {name} must be 1-dimensional (has {ndim} dimensions)")]
    NotOneDimensional {
        role: CoordinateRole,
        name: String,
        ndim: usize,
    },

    #[error("{role} is not bound")]
    UnboundCoordinate { role: CoordinateRole },
}

impl ValidationError {
    pub fn missing(name: &str) -> Self {
        ValidationError::MissingVariable {
            name: name.to_string(),
        }
    }
}

/// Errors that abort construction or rendering of a layer.
#[derive(Debug, Error)]
pub enum LayerError {
    // === Construction ===
    #[error("Unknown layer type {0}")]
    UnknownLayerType(String),

    #[error("Invalid definition for layer {layer}: {message}")]
    InvalidDefinition { layer: String, message: String },

    // === Data ===
    #[error("No variable {0}")]
    MissingVariable(String),

    #[error("Data is not 2D: {variable} has dimensions {dims:?} after selection")]
    NotTwoDimensional { variable: String, dims: Vec<String> },

    #[error("Variable {variable} has no dimension {dim}")]
    DimensionNotFound { variable: String, dim: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(#[from] NetCdfError),

    #[error("Cannot size remote tile from coordinate {coordinate}: {reason}")]
    InvalidGeometry { coordinate: String, reason: String },

    // === Output ===
    #[error("Unknown colour map: {0}")]
    UnknownPalette(String),

    #[error(transparent)]
    Render(RenderError),

    #[error("Layer {0} has no legend")]
    NoLegend(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(FetchError),

    #[error("Tile cache lock poisoned")]
    CachePoisoned,
}

impl From<RenderError> for LayerError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::UnknownPalette(name) => LayerError::UnknownPalette(name),
            other => LayerError::Render(other),
        }
    }
}

impl LayerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LayerError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to retrieve a remote tile. Recorded in the negative cache and
/// logged; never returned from a layer build.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Writing response failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
