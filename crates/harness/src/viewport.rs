use crate::clock::Clock;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::scheduler::Flow;
use glam::Quat;
use serde::Serialize;
use viewport_common::SurfaceSize;
use viewport_input::{OrbitControls, PointerAction, Spherical};
use viewport_render::{PerspectiveCamera, Renderer, Scene};

/// Size and density of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    pub size: SurfaceSize,
    pub pixel_ratio: f64,
    pub aspect: f32,
}

impl ViewportState {
    fn new(size: SurfaceSize, pixel_ratio: f64) -> Self {
        Self {
            size,
            pixel_ratio,
            aspect: size.aspect(),
        }
    }

    /// Backing buffer size in physical pixels.
    pub fn buffer_size(&self) -> SurfaceSize {
        self.size.scaled(self.pixel_ratio)
    }
}

/// Timing of the most recent rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameInfo {
    /// 1-based frame counter.
    pub index: u64,
    pub elapsed: f64,
    pub delta: f64,
}

/// Serializable view of the harness state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarnessSnapshot {
    pub viewport: ViewportState,
    pub camera: PerspectiveCamera,
    pub orbit: Option<Spherical>,
    pub last_frame: Option<FrameInfo>,
}

/// The harness context: owns the renderer (and through it the drawing
/// surface), the camera, the orbit controls, the clock and the scene.
///
/// Every operation takes `&mut self`; there is no ambient state.
pub struct Viewport<R: Renderer> {
    config: HarnessConfig,
    state: ViewportState,
    camera: PerspectiveCamera,
    controls: Option<OrbitControls>,
    clock: Clock,
    scene: Scene,
    renderer: R,
    last_frame: Option<FrameInfo>,
    last_output: Option<R::Output>,
}

impl<R: Renderer> Viewport<R> {
    /// Build the harness around a drawing surface.
    ///
    /// Fails with [`HarnessError::MissingSurface`] when `surface` is `None`;
    /// nothing else is constructed in that case. Zero dimensions are clamped
    /// to 1.
    pub fn initialize(
        surface: Option<R>,
        size: SurfaceSize,
        scene: Scene,
        config: HarnessConfig,
    ) -> Result<Self, HarnessError> {
        let Some(mut renderer) = surface else {
            return Err(HarnessError::MissingSurface);
        };

        let size = SurfaceSize::new(size.width, size.height);
        let pixel_ratio = config.pixel_ratio.resolve(renderer.device_pixel_ratio());
        let state = ViewportState::new(size, pixel_ratio);

        let camera =
            PerspectiveCamera::new(config.fov_degrees, state.aspect, config.near, config.far)
                .with_position(config.camera_position);

        renderer.set_size(size);
        renderer.set_pixel_ratio(pixel_ratio);

        let controls = config.controls.map(|settings| OrbitControls::new(&camera, settings));

        tracing::info!(
            width = size.width,
            height = size.height,
            pixel_ratio,
            controls = controls.is_some(),
            "viewport initialized"
        );

        Ok(Self {
            config,
            state,
            camera,
            controls,
            clock: Clock::new(),
            scene,
            renderer,
            last_frame: None,
            last_output: None,
        })
    }

    /// Apply a new surface size: aspect, projection, surface size and pixel
    /// ratio are all updated before this returns. Idempotent.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        let size = SurfaceSize::new(width, height);
        let pixel_ratio = self
            .config
            .pixel_ratio
            .resolve(self.renderer.device_pixel_ratio());
        self.state = ViewportState::new(size, pixel_ratio);

        self.camera.set_aspect(self.state.aspect);

        self.renderer.set_size(size);
        self.renderer.set_pixel_ratio(pixel_ratio);

        tracing::debug!(width = size.width, height = size.height, pixel_ratio, "viewport resized");
    }

    /// Forward a pointer gesture to the orbit controls, if any.
    pub fn on_pointer(&mut self, action: PointerAction) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        if action.is_noop() {
            return;
        }
        controls.apply(action, &self.camera, self.state.size.height as f32);
    }

    /// Run one frame: read the clock, step the controls, render.
    ///
    /// Returns [`Flow::Continue`] when the harness wants another frame on the
    /// next refresh. A render failure is returned as-is; there is no retry.
    pub fn tick(&mut self) -> Result<Flow, HarnessError> {
        let reading = self.clock.read();

        if self.config.spin_rate != 0.0 {
            let rotation = Quat::from_rotation_y(reading.elapsed as f32 * self.config.spin_rate);
            for mesh in self.scene.meshes_mut() {
                mesh.transform.rotation = rotation;
            }
        }

        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }

        let output = self.renderer.render(&self.scene, &self.camera)?;
        self.last_output = Some(output);

        let index = self.last_frame.map_or(1, |f| f.index + 1);
        self.last_frame = Some(FrameInfo {
            index,
            elapsed: reading.elapsed,
            delta: reading.delta,
        });
        tracing::trace!(frame = index, elapsed = reading.elapsed, "frame rendered");

        Ok(if self.config.continuous {
            Flow::Continue
        } else {
            Flow::Stop
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.controls.as_mut()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn last_frame(&self) -> Option<FrameInfo> {
        self.last_frame
    }

    /// Take the output of the most recent frame.
    pub fn take_output(&mut self) -> Option<R::Output> {
        self.last_output.take()
    }

    pub fn snapshot(&self) -> HarnessSnapshot {
        HarnessSnapshot {
            viewport: self.state,
            camera: self.camera.clone(),
            orbit: self.controls.as_ref().map(|c| c.current()),
            last_frame: self.last_frame,
        }
    }
}
