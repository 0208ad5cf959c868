//! Viewport Harness: keeps a drawing surface, a camera projection and damped
//! orbit controls in sync, and drives one render per display refresh.
//!
//! # Invariants
//! - After a resize is processed, the camera aspect and projection match the
//!   viewport size; no frame renders with a stale aspect.
//! - Pixel ratio handed to the surface never exceeds the configured maximum.
//! - Work is single-threaded: resize and pointer tasks run between ticks,
//!   never inside one.
//! - The clock is read once per tick and never runs backwards.

mod clock;
pub mod config;
mod error;
mod scheduler;
mod viewport;

pub use clock::{Clock, ClockReading};
pub use config::{ConfigError, HarnessConfig, PixelRatioPolicy};
pub use error::HarnessError;
pub use scheduler::{Flow, FrameScheduler, Task};
pub use viewport::{FrameInfo, HarnessSnapshot, Viewport, ViewportState};

pub fn crate_info() -> &'static str {
    "viewport-harness v0.1.0"
}
