//! Shared value types used across the viewport crates.
//!
//! # Invariants
//! - `SurfaceSize` dimensions are never zero.
//! - Pixel ratios handed to a surface are clamped by `clamp_pixel_ratio`.

mod types;

pub use types::{clamp_pixel_ratio, Color, SurfaceSize, Transform, DEFAULT_MAX_PIXEL_RATIO};
