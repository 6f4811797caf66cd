mod host;

use anyhow::Result;
use clap::Parser;
use counsel_input::InputEvent;
use counsel_render::RenderBackend;
use counsel_render_wgpu::WgpuBackend;
use counsel_scene::SceneConfig;
use counsel_stage::{MountOutcome, SceneRenderer};
use counsel_tools::FrameStats;
use host::WindowHost;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const TITLE: &str = "AI Lawyer";

#[derive(Parser)]
#[command(name = "counsel-desktop", about = "Hero scene in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

struct SceneApp {
    config: SceneConfig,
    host: Option<WindowHost>,
    renderer: Option<SceneRenderer<WgpuBackend>>,
    /// Set while a mount was skipped because the window had no area.
    mount_deferred: bool,
    stats: FrameStats,
    last_redraw: Instant,
    last_title: Instant,
}

impl SceneApp {
    fn new(config: SceneConfig) -> Self {
        Self {
            config,
            host: None,
            renderer: None,
            mount_deferred: false,
            stats: FrameStats::default(),
            last_redraw: Instant::now(),
            last_title: Instant::now(),
        }
    }

    fn mount(&mut self) {
        let (Some(host), Some(renderer)) = (&mut self.host, &mut self.renderer) else {
            return;
        };
        self.mount_deferred = false;
        match renderer.mount(host) {
            Ok(MountOutcome::Mounted(id)) => tracing::info!("hero scene mounted ({id})"),
            Ok(MountOutcome::Detached) => {
                tracing::debug!("window has no area yet, mount deferred");
                self.mount_deferred = true;
            }
            Ok(outcome) => tracing::warn!("scene not mounted: {outcome:?}"),
            Err(e) => tracing::warn!("{e}"),
        }
        self.stats.reset();
    }

    fn unmount(&mut self) {
        self.mount_deferred = false;
        if let (Some(host), Some(renderer)) = (&mut self.host, &mut self.renderer) {
            renderer.unmount(host);
        }
    }

    /// Simulated navigation away and back.
    fn remount(&mut self) {
        tracing::info!("remounting scene");
        self.unmount();
        self.mount();
    }

    fn dispatch(&mut self, event: InputEvent) {
        if let (Some(host), Some(renderer)) = (&mut self.host, &mut self.renderer) {
            host.dispatch(renderer, event);
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        self.stats
            .record((now - self.last_redraw).as_secs_f32().min(0.1));
        self.last_redraw = now;

        let (Some(host), Some(renderer)) = (&mut self.host, &mut self.renderer) else {
            return;
        };
        host.fire_frames(renderer);

        if (now - self.last_title).as_secs_f32() >= 0.5 {
            self.last_title = now;
            let live = renderer.backend().ledger().live_count();
            let title = if renderer.is_mounted() {
                format!("{TITLE} | {:.0} fps | live {live}", self.stats.fps())
            } else {
                format!("{TITLE} | unmounted | live {live}")
            };
            host.window().set_title(&title);
        }
    }
}

/// A deferred mount is retried on the first resize that gives the window an area.
fn retry_mount_on_resize(deferred: bool, mounted: bool, width: u32, height: u32) -> bool {
    deferred && !mounted && width > 0 && height > 0
}

fn create_backend(window: Arc<Window>, transparent: bool) -> WgpuBackend {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let surface = match instance.create_surface(window) {
        Ok(surface) => surface,
        Err(e) => {
            tracing::warn!("cannot create window surface: {e}");
            return WgpuBackend::unavailable(e.to_string());
        }
    };
    WgpuBackend::new(&instance, surface, transparent).unwrap_or_else(|e| {
        tracing::warn!("graphics unavailable, background stays blank: {e}");
        WgpuBackend::unavailable(e.to_string())
    })
}

impl ApplicationHandler for SceneApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_some() {
            return;
        }

        let background = self.config.surface.background;
        tracing::debug!(%background, "creating window");
        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280u32, 720))
            .with_transparent(self.config.surface.transparent);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let backend = create_backend(window.clone(), self.config.surface.transparent);
        self.renderer = Some(SceneRenderer::with_config(backend, self.config.clone()));
        self.host = Some(WindowHost::new(window));
        self.mount();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let mounted = self.renderer.as_ref().is_some_and(|r| r.is_mounted());
                if retry_mount_on_resize(self.mount_deferred, mounted, size.width, size.height) {
                    self.mount();
                } else {
                    self.dispatch(InputEvent::Resized);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.dispatch(InputEvent::Resized);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(host) = &self.host else {
                    return;
                };
                let window = host.window();
                let scale = window.scale_factor();
                let cursor = position.to_logical::<f32>(scale);
                let size = window.inner_size().to_logical::<f32>(scale);
                self.dispatch(InputEvent::PointerMoved {
                    client_x: cursor.x,
                    client_y: cursor.y,
                    window_width: size.width,
                    window_height: size.height,
                });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::KeyR => self.remount(),
                KeyCode::Escape => {
                    self.unmount();
                    event_loop.exit();
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
        if let Some(renderer) = &self.renderer {
            let ledger = renderer.backend().ledger();
            tracing::info!(balanced = ledger.is_balanced(), "{}", ledger.summary());
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
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    tracing::info!("counsel-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SceneApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deferred_mount_waits_for_a_non_empty_window() {
        assert!(!retry_mount_on_resize(true, false, 0, 0));
        assert!(!retry_mount_on_resize(true, false, 1280, 0));
        assert!(retry_mount_on_resize(true, false, 1280, 720));
    }

    #[test]
    fn resize_without_a_deferred_mount_is_only_dispatched() {
        assert!(!retry_mount_on_resize(false, false, 1280, 720));
        assert!(!retry_mount_on_resize(true, true, 1280, 720));
    }
}
