//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene or the camera.
//! - A camera's projection matrix always matches its current aspect ratio.
//!
//! The `Renderer` trait is the seam between the harness and a backend. The
//! debug text renderer implements it headlessly for the CLI and for tests;
//! the wgpu backend lives in `viewport-render-wgpu`.

mod camera;
mod renderer;
mod scene;

pub use camera::PerspectiveCamera;
pub use renderer::{DebugTextRenderer, RenderError, Renderer};
pub use scene::{BasicMaterial, BoxGeometry, Mesh, Scene};

pub fn crate_info() -> &'static str {
    "viewport-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
