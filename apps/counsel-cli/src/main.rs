use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use counsel_render::{HeadlessBackend, RenderBackend, ResourceKind};
use counsel_scene::SceneConfig;
use counsel_stage::{HeadlessHost, MountOutcome, SceneRenderer};
use counsel_tools::SceneInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "counsel-cli", about = "CLI tool for the hero scene renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and a configuration summary
    Info,
    /// Mount headlessly, hold the pointer and run frames
    Simulate {
        #[arg(short, long, default_value = "240")]
        frames: usize,
        /// Normalized pointer x in [-1, 1]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pointer_x: f32,
        /// Normalized pointer y in [-1, 1]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pointer_y: f32,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.0166667")]
        delta: f64,
    },
    /// Mount and unmount repeatedly, then print the resource ledger
    Cycle {
        #[arg(short, long, default_value = "3")]
        count: usize,
        /// Frames to run while each instance is mounted
        #[arg(long, default_value = "10")]
        frames: usize,
    },
    /// Print the effective configuration as YAML
    Config,
}

/// Client coordinates that normalize back to `(x, y)` in a `width` x `height` window.
fn client_point(x: f32, y: f32, width: u32, height: u32) -> (f32, f32) {
    let x = x.clamp(-1.0, 1.0);
    let y = y.clamp(-1.0, 1.0);
    ((x + 1.0) / 2.0 * width as f32, (1.0 - y) / 2.0 * height as f32)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading scene config");
            SceneConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => SceneConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("counsel-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", counsel_scene::crate_info());
            println!("render: {}", counsel_render::crate_info());
            println!("stage: {}", counsel_stage::crate_info());
            println!("tools: {}", counsel_tools::crate_info());
            println!("chat: {}", counsel_chat::crate_info());
            println!(
                "camera: fov={}deg near={} far={} distance={}",
                config.camera.fov_degrees,
                config.camera.near,
                config.camera.far,
                config.camera.distance
            );
            println!(
                "ring: r={} tube={} segments={}x{}",
                config.ring.radius,
                config.ring.tube,
                config.ring.radial_segments,
                config.ring.tubular_segments
            );
            println!(
                "stars: count={} extent={} seed={}",
                config.stars.count,
                config.stars.extent,
                config
                    .seed
                    .map_or_else(|| "entropy".to_string(), |s| s.to_string())
            );
        }
        Commands::Simulate {
            frames,
            pointer_x,
            pointer_y,
            width,
            height,
            delta,
        } => {
            if width == 0 || height == 0 {
                bail!("window size must be non-zero, got {width}x{height}");
            }
            println!(
                "Simulating {frames} frames at {width}x{height}, pointer=({pointer_x}, {pointer_y}), delta={delta}"
            );

            tracing::info!(frames, width, height, "starting headless simulation");
            let mut host = HeadlessHost::new(width, height);
            let mut renderer = SceneRenderer::with_config(HeadlessBackend::new(), config);
            match renderer.mount(&mut host)? {
                MountOutcome::Mounted(id) => println!("Mounted instance {id}"),
                other => bail!("scene did not mount: {other:?}"),
            }

            let (cx, cy) = client_point(pointer_x, pointer_y, width, height);
            host.pointer_move(&mut renderer, cx, cy);
            let fired = host.run_frames(&mut renderer, frames, delta);

            println!("{}", SceneInspector::summary(&renderer));
            if let Some(graph) = renderer.graph() {
                for node in SceneInspector::list_nodes(graph) {
                    println!("  {node}");
                }
            }
            print!("{}", renderer.backend().describe());
            println!("Frames fired: {fired}");

            renderer.unmount(&mut host);
            let ledger = renderer.backend().ledger();
            println!(
                "After unmount: live={} balanced={}",
                ledger.live_count(),
                ledger.is_balanced()
            );
        }
        Commands::Cycle { count, frames } => {
            println!("Lifecycle demo: {count} mount/unmount cycles");

            let mut host = HeadlessHost::new(1280, 720);
            let mut renderer = SceneRenderer::with_config(HeadlessBackend::new(), config);
            for i in 0..count {
                let outcome = renderer.mount(&mut host)?;
                host.run_frames(&mut renderer, frames, 1.0 / 60.0);
                let summary = SceneInspector::summary(&renderer);
                renderer.unmount(&mut host);
                println!(
                    "Cycle {}: {outcome:?} frames={} live_after_unmount={}",
                    i + 1,
                    summary.frames,
                    renderer.backend().ledger().live_count()
                );
            }

            let ledger = renderer.backend().ledger();
            tracing::info!(
                cycles = count,
                live = ledger.live_count(),
                "lifecycle demo finished"
            );
            for kind in ResourceKind::ALL {
                println!(
                    "  {kind}: allocated={} disposed={}",
                    ledger.allocated(kind),
                    ledger.disposed(kind)
                );
            }
            println!(
                "Balanced: {}",
                if ledger.is_balanced() { "OK" } else { "LEAK" }
            );
            if !ledger.is_balanced() {
                bail!("resource ledger is unbalanced");
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_point_corners() {
        assert_eq!(client_point(1.0, 1.0, 800, 600), (800.0, 0.0));
        assert_eq!(client_point(-1.0, -1.0, 800, 600), (0.0, 600.0));
        assert_eq!(client_point(0.0, 0.0, 800, 600), (400.0, 300.0));
        assert_eq!(client_point(5.0, -5.0, 10, 10), (10.0, 10.0));
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "counsel-cli",
            "simulate",
            "--frames",
            "60",
            "--pointer-x",
            "-0.5",
            "--width",
            "400",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                frames,
                pointer_x,
                width,
                ..
            } => {
                assert_eq!(frames, 60);
                assert_eq!(pointer_x, -0.5);
                assert_eq!(width, 400);
            }
            _ => panic!("expected simulate"),
        }
    }
}
