//! wgpu render backend for the viewport harness.
//!
//! Owns the window surface, the device and the queue, and draws every mesh of
//! a scene as an instanced unit cube with an unlit color material.
//!
//! # Invariants
//! - The surface is configured at the logical size times the pixel ratio.
//! - Renderer never mutates the scene or the camera.
//! - A lost surface is reported, never silently recreated.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
