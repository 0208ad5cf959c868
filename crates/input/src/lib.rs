//! Pointer input mapped to camera motion.
//!
//! # Invariants
//! - Hosts translate raw window events into `PointerAction`s; controls never see
//!   platform events.
//! - Orbit motion eases toward the goal without overshooting it.

pub mod action;
pub mod orbit;

pub use action::PointerAction;
pub use orbit::{OrbitControls, OrbitSettings, Spherical};
