//! Shared test utilities for the overlay-layers workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic grid and dataset generators
//! - Common coordinate name fixtures
//! - Float comparison macros
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality for RGB(A) pixels, channel by channel.
#[macro_export]
macro_rules! assert_pixel_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left: &[u8] = &$left[..];
        let right: &[u8] = &$right[..];
        assert_eq!(left.len(), right.len(), "pixel channel counts differ");
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let diff = (*l as i32 - *r as i32).abs();
            if diff > $tolerance as i32 {
                panic!(
                    "assertion failed: pixel channel {} differs: left {:?}, right {:?}",
                    i, left, right
                );
            }
        }
    }};
}
