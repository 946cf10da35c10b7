//! Render configuration (YAML).
//!
//! ```yaml
//! x_coordinate: lon
//! y_coordinate: lat
//! time_coordinate: time
//! case_dimension: time
//! fetch_timeout_secs: 30
//! layers:
//!   sst:
//!     type: single
//!     band: analysed_sst
//!     min_value: 270
//!     max_value: 305
//!     cmap: ${SST_CMAP:-coolwarm}
//! ```
//!
//! `${VAR}` and `${VAR:-default}` are replaced from the environment before
//! parsing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use layers::CoordinateNames;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub x_coordinate: String,
    pub y_coordinate: String,
    #[serde(default)]
    pub time_coordinate: String,
    /// Dimension enumerating cases; empty renders the dataset as one case.
    #[serde(default)]
    pub case_dimension: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Extension of per-case images (`png`, `jpg`, ...). Legends are PNG.
    #[serde(default = "default_image_format")]
    pub image_format: String,
    pub layers: BTreeMap<String, Value>,
}

fn default_fetch_timeout_secs() -> u64 {
    layers::DEFAULT_FETCH_TIMEOUT.as_secs()
}

fn default_image_format() -> String {
    "png".to_string()
}

impl RenderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read render config from {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid render config {:?}", path.as_ref()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: RenderConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse render config YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.x_coordinate.is_empty(), "x_coordinate cannot be empty");
        anyhow::ensure!(!self.y_coordinate.is_empty(), "y_coordinate cannot be empty");
        anyhow::ensure!(self.fetch_timeout_secs > 0, "fetch_timeout_secs must be greater than 0");
        anyhow::ensure!(!self.layers.is_empty(), "No layers configured");
        anyhow::ensure!(
            !self.image_format.is_empty() && !self.image_format.contains(['.', '/']),
            "image_format must be a bare extension, got {:?}",
            self.image_format
        );
        Ok(())
    }

    pub fn coordinate_names(&self) -> CoordinateNames {
        CoordinateNames::new(&self.x_coordinate, &self.y_coordinate)
            .with_time(&self.time_coordinate)
            .with_case_dimension(&self.case_dimension)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Expand `${VAR}` and `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed variable substitution: ${{{}", after))?;
        result.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
