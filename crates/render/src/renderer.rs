use crate::camera::PerspectiveCamera;
use crate::scene::Scene;
use std::fmt::Write as _;
use viewport_common::SurfaceSize;

/// Errors a renderer reports while drawing or while being set up.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The drawing surface or its device was invalidated. Not recoverable.
    #[error("drawing surface lost: {0}")]
    SurfaceLost(String),
    #[error("renderer initialization failed: {0}")]
    Init(String),
}

/// Renderer-agnostic interface. A renderer is bound to exactly one drawing
/// surface and produces one frame per `render` call.
///
/// The renderer reads the scene and the camera; it never mutates them.
pub trait Renderer {
    /// The output type produced by one frame.
    type Output;

    /// Pixel ratio reported by the display the surface lives on.
    fn device_pixel_ratio(&self) -> f64;

    /// Resize the surface to a logical size.
    fn set_size(&mut self, size: SurfaceSize);

    /// Set the ratio between buffer pixels and logical pixels.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Render one frame.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<Self::Output, RenderError>;
}

/// Headless renderer producing a human-readable description of each frame.
///
/// Used by the CLI and by tests to drive the harness without a GPU. It can be
/// told to lose its surface to exercise the fatal render path.
#[derive(Debug)]
pub struct DebugTextRenderer {
    device_pixel_ratio: f64,
    size: SurfaceSize,
    pixel_ratio: f64,
    frames: u64,
    lost: bool,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DebugTextRenderer {
    /// Size of a surface nobody has resized yet.
    pub const DEFAULT_SIZE: SurfaceSize = SurfaceSize {
        width: 300,
        height: 150,
    };

    pub fn new(device_pixel_ratio: f64) -> Self {
        Self {
            device_pixel_ratio,
            size: Self::DEFAULT_SIZE,
            pixel_ratio: 1.0,
            frames: 0,
            lost: false,
        }
    }

    /// Simulate the display moving to a monitor with a different density.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = ratio;
    }

    /// Invalidate the surface; every later `render` fails.
    pub fn lose_surface(&mut self) {
        self.lost = true;
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn buffer_size(&self) -> SurfaceSize {
        self.size.scaled(self.pixel_ratio)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<String, RenderError> {
        if self.lost {
            return Err(RenderError::SurfaceLost("debug surface invalidated".into()));
        }
        self.frames += 1;

        let buffer = self.buffer_size();
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{} @{:.2}x, buffer {}x{}) ===",
            self.frames,
            self.size.width,
            self.size.height,
            self.pixel_ratio,
            buffer.width,
            buffer.height
        );
        let (eye, target) = (camera.position, camera.target);
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            eye.x,
            eye.y,
            eye.z,
            target.x,
            target.y,
            target.z,
            camera.fov_degrees(),
            camera.aspect()
        );
        let _ = writeln!(out, "Meshes: {}", scene.meshes().len());
        for (i, mesh) in scene.meshes().iter().enumerate() {
            let c = mesh.material.color;
            let p = mesh.transform.position;
            let _ = writeln!(
                out,
                "  [{i}] box {:.1}x{:.1}x{:.1} color=#{:02x}{:02x}{:02x} pos=({:.2}, {:.2}, {:.2})",
                mesh.geometry.width,
                mesh.geometry.height,
                mesh.geometry.depth,
                (c.r * 255.0).round() as u8,
                (c.g * 255.0).round() as u8,
                (c.b * 255.0).round() as u8,
                p.x,
                p.y,
                p.z
            );
        }

        tracing::trace!(frame = self.frames, "debug frame rendered");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use viewport_common::Color;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 100.0)
            .with_position(Vec3::new(0.0, 0.0, 2.0))
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let mut renderer = DebugTextRenderer::new(1.0);
        let output = renderer.render(&Scene::new(), &camera()).unwrap();

        assert!(output.contains("Frame 1"));
        assert!(output.contains("Meshes: 0"));
        assert!(output.contains("300x150"));
    }

    #[test]
    fn debug_renderer_with_cube() {
        let mut renderer = DebugTextRenderer::new(2.0);
        renderer.set_size(SurfaceSize::new(800, 600));
        renderer.set_pixel_ratio(2.0);
        let output = renderer.render(&Scene::single_cube(Color::RED), &camera()).unwrap();

        assert!(output.contains("Meshes: 1"));
        assert!(output.contains("color=#ff0000"));
        assert!(output.contains("buffer 1600x1200"));
        assert!(output.contains("fov=75"));
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn lost_surface_fails_every_frame() {
        let mut renderer = DebugTextRenderer::default();
        renderer.lose_surface();
        let scene = Scene::new();
        assert!(matches!(
            renderer.render(&scene, &camera()),
            Err(RenderError::SurfaceLost(_))
        ));
        assert!(renderer.render(&scene, &camera()).is_err());
        assert_eq!(renderer.frames_rendered(), 0);
    }
}
