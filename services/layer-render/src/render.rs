//! Dataset loading and the per-case render loop.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use layers::{Layer, RenderLayer};
use netcdf_dataset::MemoryDataset;
use rayon::prelude::*;
use tracing::{error, info, warn};

/// Counts from one render run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub cases: usize,
    pub images: usize,
    pub legends: usize,
    /// `layer/case: error` for every build that failed.
    pub failures: Vec<String>,
}

/// Load a dataset by extension: `.json` always, `.nc`/`.nc4`/`.cdf` with
/// the `netcdf` feature.
pub fn load_dataset(path: &Path) -> Result<MemoryDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "json" => MemoryDataset::from_json_file(path)
            .with_context(|| format!("Failed to load JSON dataset {:?}", path)),
        "nc" | "nc4" | "cdf" => load_netcdf(path),
        other => bail!("Unsupported dataset extension {:?} for {:?}", other, path),
    }
}

#[cfg(feature = "netcdf")]
fn load_netcdf(path: &Path) -> Result<MemoryDataset> {
    netcdf_dataset::load_netcdf(path, None).with_context(|| format!("Failed to load NetCDF dataset {:?}", path))
}

#[cfg(not(feature = "netcdf"))]
fn load_netcdf(path: &Path) -> Result<MemoryDataset> {
    bail!("{:?} is netCDF but layer-render was built without the netcdf feature", path)
}

/// Path of the image for `layer` and case `case`.
pub fn case_path(output: &Path, layer: &str, case: usize, extension: &str) -> PathBuf {
    output.join(layer).join(format!("{}.{}", case, extension))
}

pub fn legend_path(output: &Path, layer: &str) -> PathBuf {
    output.join(layer).join("legend.png")
}

/// Build every layer for every case of `dataset`, then every legend.
///
/// Cases are the indices of `case_dimension`; when it is empty or absent
/// from the dataset the whole dataset is one case. Layers should already
/// be checked. A failed build is logged and recorded in the summary
/// without stopping the run.
pub fn render_all(
    layers: &[Layer],
    dataset: &MemoryDataset,
    case_dimension: &str,
    output: &Path,
    extension: &str,
) -> Result<RenderSummary> {
    for layer in layers {
        let dir = output.join(layer.name());
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create output directory {:?}", dir))?;
    }

    let case_count = if case_dimension.is_empty() {
        None
    } else {
        dataset.dim_len(case_dimension)
    };
    if case_count.is_none() && !case_dimension.is_empty() {
        warn!(dimension = case_dimension, "Case dimension not in dataset, rendering as one case");
    }
    let cases = case_count.unwrap_or(1);
    info!(cases, layers = layers.len(), "Rendering");

    let results: Vec<(usize, Vec<String>)> = (0..cases)
        .into_par_iter()
        .map(|case| {
            let case_data = match case_count {
                Some(_) => match dataset.select_case(case_dimension, case as i64) {
                    Ok(data) => Cow::Owned(data),
                    Err(e) => {
                        error!(case, error = %e, "Failed to select case");
                        return (0, vec![format!("case {}: {}", case, e)]);
                    }
                },
                None => Cow::Borrowed(dataset),
            };

            let mut built = 0;
            let mut failures = Vec::new();
            for layer in layers {
                let path = case_path(output, layer.name(), case, extension);
                match layer.build_output(case_data.as_ref(), &path) {
                    Ok(true) => built += 1,
                    Ok(false) => {}
                    Err(e) => {
                        error!(layer = %layer.name(), case, error = %e, "Layer build failed");
                        failures.push(format!("{}/{}: {}", layer.name(), case, e));
                    }
                }
            }
            (built, failures)
        })
        .collect();

    let mut summary = RenderSummary {
        cases,
        ..RenderSummary::default()
    };
    for (built, failures) in results {
        summary.images += built;
        summary.failures.extend(failures);
    }

    for layer in layers.iter().filter(|l| l.has_legend()) {
        let path = legend_path(output, layer.name());
        match layer.build_legend(&path) {
            Ok(()) => summary.legends += 1,
            Err(e) => {
                error!(layer = %layer.name(), error = %e, "Legend build failed");
                summary.failures.push(format!("{}/legend: {}", layer.name(), e));
            }
        }
    }

    info!(
        images = summary.images,
        legends = summary.legends,
        failures = summary.failures.len(),
        "Render complete"
    );
    Ok(summary)
}
