mod pointer;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pointer::PointerTracker;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use viewport_common::SurfaceSize;
use viewport_harness::{Flow, FrameScheduler, HarnessConfig, Viewport};
use viewport_render::{Renderer, Scene};
use viewport_render_wgpu::WgpuRenderer;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window size used when the config leaves it to the host.
const DEFAULT_WINDOW_SIZE: (u32, u32) = (1280, 720);

#[derive(Parser)]
#[command(name = "viewport-desktop", about = "Interactive 3D viewport")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Which demo preset to run
    #[arg(long, value_enum, default_value_t = Demo::Orbit)]
    demo: Demo,

    /// YAML harness config; replaces the demo preset
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    /// Fixed 800x600 surface, one frame, no controls
    Fixed,
    /// Window-sized surface, damped orbit controls, continuous loop
    Orbit,
}

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> SurfaceSize {
    let logical: LogicalSize<f64> = size.to_logical(scale_factor);
    SurfaceSize::new(logical.width.round() as u32, logical.height.round() as u32)
}

struct ViewportApp {
    config: HarnessConfig,
    window: Option<Arc<Window>>,
    viewport: Option<Viewport<WgpuRenderer>>,
    scheduler: FrameScheduler,
    pointer: PointerTracker,
    fatal: Option<anyhow::Error>,
}

impl ViewportApp {
    fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            window: None,
            viewport: None,
            scheduler: FrameScheduler::new(),
            pointer: PointerTracker::default(),
            fatal: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self
            .config
            .initial_size
            .map_or(DEFAULT_WINDOW_SIZE, |s| (s.width, s.height));
        let attrs = Window::default_attributes()
            .with_title("Viewport")
            .with_inner_size(LogicalSize::new(w, h))
            .with_resizable(self.config.track_resize);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let scale = window.scale_factor();
        let size = match self.config.initial_size {
            Some(size) => size,
            None => logical_size(window.inner_size(), scale),
        };

        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), size, scale))
            .context("create renderer")?;

        let mut scene = Scene::single_cube(self.config.cube_color);
        scene.background = self.config.background;

        let viewport = Viewport::initialize(Some(renderer), size, scene, self.config.clone())?;

        self.scheduler.request_frame();
        window.request_redraw();
        self.window = Some(window);
        self.viewport = Some(viewport);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewportApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let scale = window.scale_factor();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if self.config.track_resize {
                    let size = logical_size(new_size, scale);
                    self.scheduler.post_resize(size.width, size.height);
                    window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(viewport) = self.viewport.as_mut() {
                    viewport.renderer_mut().set_device_pixel_ratio(scale_factor);
                    tracing::debug!(
                        scale_factor,
                        device_pixel_ratio = viewport.renderer().device_pixel_ratio(),
                        "scale factor changed"
                    );
                }
                if self.config.track_resize {
                    let size = logical_size(window.inner_size(), scale_factor);
                    self.scheduler.post_resize(size.width, size.height);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.pointer.button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(scale);
                if let Some(action) = self.pointer.moved(logical.x, logical.y) {
                    self.scheduler.post_pointer(action);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.left();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let action = self.pointer.wheel(delta);
                self.scheduler.post_pointer(action);
            }
            WindowEvent::RedrawRequested => {
                let Some(viewport) = self.viewport.as_mut() else {
                    return;
                };
                if !self.config.continuous {
                    // A single-shot scene still repaints when the window is exposed.
                    self.scheduler.request_frame();
                }
                match self.scheduler.refresh(viewport) {
                    Ok(Flow::Continue) => window.request_redraw(),
                    Ok(Flow::Stop) => {}
                    Err(err) => self.fail(event_loop, err.into()),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            if self.scheduler.tick_pending() || self.scheduler.pending_tasks() > 0 {
                window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match cli.demo {
            Demo::Fixed => HarnessConfig::fixed(),
            Demo::Orbit => HarnessConfig::orbit(),
        },
    };
    config.validate()?;

    tracing::info!("viewport-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(if config.continuous {
        ControlFlow::Poll
    } else {
        ControlFlow::Wait
    });

    let mut app = ViewportApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
