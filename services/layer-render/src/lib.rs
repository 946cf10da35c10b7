//! Batch renderer for overlay layers.
//!
//! Loads a YAML layer configuration and a dataset, validates every layer,
//! then writes one image per (case, layer) pair plus a legend for each
//! layer that has one.

pub mod config;
pub mod render;

pub use config::RenderConfig;
pub use render::{load_dataset, render_all, RenderSummary};
