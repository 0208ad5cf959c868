use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use viewport_common::SurfaceSize;
use viewport_harness::{Flow, FrameScheduler, HarnessConfig, HarnessSnapshot, Viewport};
use viewport_input::PointerAction;
use viewport_render::{DebugTextRenderer, Scene};

/// Surface size used when neither the config nor `--size` sets one.
const DEFAULT_SURFACE_SIZE: SurfaceSize = SurfaceSize {
    width: 800,
    height: 600,
};

#[derive(Parser)]
#[command(name = "viewport-cli", about = "Headless tools for the viewport harness")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    Fixed,
    Orbit,
}

impl Demo {
    fn config(self) -> HarnessConfig {
        match self {
            Demo::Fixed => HarnessConfig::fixed(),
            Demo::Orbit => HarnessConfig::orbit(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the harness headlessly against the debug text renderer
    Simulate {
        #[arg(long, value_enum, default_value_t = Demo::Orbit)]
        demo: Demo,
        /// YAML harness config; replaces the demo preset
        #[arg(long)]
        config: Option<PathBuf>,
        /// Initial surface size, e.g. 800x600 [default: 800x600]
        #[arg(long, value_parser = parse_size)]
        size: Option<SurfaceSize>,
        /// Device pixel ratio reported by the fake display
        #[arg(long, default_value = "1.0")]
        dpr: f64,
        /// Number of display refreshes to run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Orbit the camera by this many degrees of azimuth before the first tick
        #[arg(long, allow_negative_numbers = true)]
        drag_degrees: Option<f32>,
        /// Horizontal drag in pixels, delivered as a pointer event
        #[arg(long, allow_negative_numbers = true)]
        drag_pixels: Option<f32>,
        /// Resize the surface halfway through, e.g. 400x300
        #[arg(long, value_parser = parse_size)]
        resize: Option<SurfaceSize>,
        /// Invalidate the surface before this refresh
        #[arg(long)]
        lose_after: Option<u64>,
        /// Print every rendered frame
        #[arg(long)]
        frames: bool,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a demo preset as YAML
    Config {
        #[arg(long, value_enum, default_value_t = Demo::Orbit)]
        demo: Demo,
    },
}

fn parse_size(s: &str) -> Result<SurfaceSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got {s:?}"));
    }
    Ok(SurfaceSize::new(w, h))
}

fn print_summary(snapshot: &HarnessSnapshot) {
    let v = &snapshot.viewport;
    let buffer = v.buffer_size();
    println!(
        "Viewport: {}x{} @{:.2}x (buffer {}x{}) aspect={:.4}",
        v.size.width,
        v.size.height,
        v.pixel_ratio,
        buffer.width,
        buffer.height,
        v.aspect
    );
    let cam = &snapshot.camera;
    println!(
        "Camera: eye=({:.3}, {:.3}, {:.3}) target=({:.3}, {:.3}, {:.3}) fov={:.0} aspect={:.4}",
        cam.position.x,
        cam.position.y,
        cam.position.z,
        cam.target.x,
        cam.target.y,
        cam.target.z,
        cam.fov_degrees(),
        cam.aspect()
    );
    match snapshot.orbit {
        Some(orbit) => println!(
            "Orbit: azimuth={:.3} deg polar={:.3} deg distance={:.3}",
            orbit.azimuth.to_degrees(),
            orbit.polar.to_degrees(),
            orbit.radius
        ),
        None => println!("Orbit: disabled"),
    }
    match snapshot.last_frame {
        Some(frame) => println!("Frames: {} (elapsed {:.4}s)", frame.index, frame.elapsed),
        None => println!("Frames: 0"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("viewport-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("harness: {}", viewport_harness::crate_info());
            println!("render: {}", viewport_render::crate_info());
        }
        Commands::Simulate {
            demo,
            config,
            size,
            dpr,
            ticks,
            drag_degrees,
            drag_pixels,
            resize,
            lose_after,
            frames,
            json,
        } => {
            let config = match config {
                Some(path) => HarnessConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => demo.config(),
            };
            config.validate()?;

            let size = match (config.initial_size, size) {
                (Some(fixed), Some(requested)) => {
                    tracing::warn!(
                        requested_width = requested.width,
                        requested_height = requested.height,
                        width = fixed.width,
                        height = fixed.height,
                        "config fixes the surface size, ignoring --size"
                    );
                    fixed
                }
                (Some(fixed), None) => fixed,
                (None, requested) => requested.unwrap_or(DEFAULT_SURFACE_SIZE),
            };
            let mut scene = Scene::single_cube(config.cube_color);
            scene.background = config.background;
            let mut viewport =
                Viewport::initialize(Some(DebugTextRenderer::new(dpr)), size, scene, config)?;
            let mut scheduler = FrameScheduler::new();

            if let Some(degrees) = drag_degrees {
                match viewport.controls_mut() {
                    Some(controls) => controls.rotate(degrees.to_radians(), 0.0),
                    None => tracing::warn!("demo has no orbit controls, ignoring --drag-degrees"),
                }
            }
            if let Some(dx) = drag_pixels {
                scheduler.post_pointer(PointerAction::Rotate { dx, dy: 0.0 });
            }

            scheduler.request_frame();
            for i in 0..ticks {
                if i == ticks / 2 {
                    if let Some(s) = resize {
                        scheduler.post_resize(s.width, s.height);
                    }
                }
                if lose_after == Some(i) {
                    viewport.renderer_mut().lose_surface();
                }
                let flow = scheduler
                    .refresh(&mut viewport)
                    .with_context(|| format!("refresh {i}"))?;
                if frames {
                    if let Some(text) = viewport.take_output() {
                        print!("{text}");
                    }
                }
                if flow == Flow::Stop {
                    tracing::debug!(refresh = i, "loop stopped");
                    break;
                }
            }

            let snapshot = viewport.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_summary(&snapshot);
            }
        }
        Commands::Config { demo } => {
            print!("{}", demo.config().to_yaml_string()?);
        }
    }

    Ok(())
}
