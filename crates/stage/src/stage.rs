use crate::clock::FrameClock;
use crate::host::{FrameToken, Host, ListenerId};
use counsel_common::{InstanceId, Viewport};
use counsel_input::{EventKind, InputEvent, PointerState};
use counsel_render::{
    ClearColor, Frame, GeometryHandle, MaterialHandle, NodeBinding, RenderBackend, RenderError,
    SurfaceHandle,
};
use counsel_scene::{Animator, NodeId, PerspectiveCamera, SceneConfig, SceneGraph};

/// Errors from lifecycle misuse. Resource and render failures never surface
/// here; they degrade to a blank container.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("scene is already mounted as instance {0}")]
    AlreadyMounted(InstanceId),
}

/// Result of a mount attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    /// Resources acquired and the frame loop is scheduled.
    Mounted(InstanceId),
    /// The container is not in the document. Nothing was touched.
    Detached,
    /// Allocation failed; everything acquired was released again.
    Unavailable(String),
}

/// Everything owned while `mounted-animating`.
struct Mounted {
    id: InstanceId,
    span: tracing::Span,
    surface: SurfaceHandle,
    bindings: Vec<NodeBinding>,
    pointer_listener: ListenerId,
    resize_listener: ListenerId,
    pending_frame: Option<FrameToken>,
    clock: FrameClock,
    graph: SceneGraph,
    camera: PerspectiveCamera,
    pointer: PointerState,
    viewport: Viewport,
    frames: u64,
}

enum Stage {
    Unmounted,
    Mounted(Box<Mounted>),
}

/// The hero scene renderer: a two-state machine (`unmounted`,
/// `mounted-animating`) over a render backend.
///
/// Pointer, camera and transform state are private to the mounted instance and
/// only change through `&mut self`. Remounting builds a new instance from
/// scratch; nothing carries over from the previous mount.
pub struct SceneRenderer<B: RenderBackend> {
    backend: B,
    config: SceneConfig,
    animator: Animator,
    stage: Stage,
}

impl<B: RenderBackend> SceneRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SceneConfig::default())
    }

    pub fn with_config(backend: B, config: SceneConfig) -> Self {
        Self {
            animator: Animator::new(&config),
            backend,
            config,
            stage: Stage::Unmounted,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.stage, Stage::Mounted(_))
    }

    pub fn instance_id(&self) -> Option<InstanceId> {
        self.mounted().map(|m| m.id)
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.mounted().map(|m| &m.camera)
    }

    pub fn graph(&self) -> Option<&SceneGraph> {
        self.mounted().map(|m| &m.graph)
    }

    pub fn pointer(&self) -> Option<PointerState> {
        self.mounted().map(|m| m.pointer)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.mounted().map(|m| m.viewport)
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.mounted().map(|m| m.surface)
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.mounted().and_then(|m| m.pending_frame)
    }

    /// Frames rendered by the current instance.
    pub fn frames_rendered(&self) -> u64 {
        self.mounted().map_or(0, |m| m.frames)
    }

    /// Seconds of animation time consumed by the current instance.
    pub fn elapsed(&self) -> f64 {
        self.mounted().map_or(0.0, |m| m.clock.elapsed())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn mounted(&self) -> Option<&Mounted> {
        match &self.stage {
            Stage::Mounted(m) => Some(&**m),
            Stage::Unmounted => None,
        }
    }

    fn clear_color(&self) -> ClearColor {
        ClearColor {
            color: self.config.surface.background,
            alpha: if self.config.surface.transparent { 0.0 } else { 1.0 },
        }
    }

    /// `unmounted -> mounted-animating`.
    ///
    /// A detached container is a silent no-op. An allocation failure releases
    /// whatever was acquired and leaves the renderer unmounted.
    pub fn mount(&mut self, host: &mut impl Host) -> Result<MountOutcome, StageError> {
        if let Stage::Mounted(m) = &self.stage {
            return Err(StageError::AlreadyMounted(m.id));
        }
        if !host.container_attached() {
            tracing::debug!("container detached, scene not mounted");
            return Ok(MountOutcome::Detached);
        }

        let id = InstanceId::new();
        let span = tracing::info_span!("scene", instance = %id);
        let guard = span.enter();

        let viewport = host.container_viewport();
        let surface = match self.backend.create_surface(viewport) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::warn!("no rendering surface, background stays blank: {e}");
                return Ok(MountOutcome::Unavailable(e.to_string()));
            }
        };
        host.append_surface(surface);

        let graph = SceneGraph::build(&self.config);
        let mut bindings = Vec::with_capacity(NodeId::ALL.len());
        for node in NodeId::ALL {
            match self.acquire_node(&graph, node) {
                Ok(binding) => bindings.push(binding),
                Err(e) => {
                    tracing::warn!("failed to allocate {}: {e}", node.name());
                    host.remove_surface(surface);
                    self.release(&bindings, surface);
                    return Ok(MountOutcome::Unavailable(e.to_string()));
                }
            }
        }

        let pointer_listener = host.add_listener(EventKind::PointerMove);
        let resize_listener = host.add_listener(EventKind::Resize);
        let pending_frame = Some(host.request_frame());
        let clock = FrameClock::start(host.now_seconds());
        let camera = PerspectiveCamera::new(&self.config.camera, viewport.aspect());

        tracing::info!(
            backend = self.backend.name(),
            width = viewport.width,
            height = viewport.height,
            "scene mounted"
        );
        drop(guard);

        self.stage = Stage::Mounted(Box::new(Mounted {
            id,
            span,
            surface,
            bindings,
            pointer_listener,
            resize_listener,
            pending_frame,
            clock,
            graph,
            camera,
            pointer: PointerState::default(),
            viewport,
            frames: 0,
        }));
        Ok(MountOutcome::Mounted(id))
    }

    fn acquire_node(
        &mut self,
        graph: &SceneGraph,
        node: NodeId,
    ) -> Result<NodeBinding, RenderError> {
        let mesh = graph.node(node);
        let geometry = self.backend.create_geometry(&mesh.geometry)?;
        let material = match self.backend.create_material(&mesh.material) {
            Ok(material) => material,
            Err(e) => {
                self.dispose_geometry(geometry);
                return Err(e);
            }
        };
        Ok(NodeBinding {
            node,
            geometry,
            material,
        })
    }

    fn dispose_geometry(&mut self, handle: GeometryHandle) {
        if let Err(e) = self.backend.dispose_geometry(handle) {
            tracing::warn!("geometry release failed: {e}");
        }
    }

    fn dispose_material(&mut self, handle: MaterialHandle) {
        if let Err(e) = self.backend.dispose_material(handle) {
            tracing::warn!("material release failed: {e}");
        }
    }

    /// Release node resources in reverse acquisition order, then the surface.
    fn release(&mut self, bindings: &[NodeBinding], surface: SurfaceHandle) {
        for binding in bindings.iter().rev() {
            self.dispose_material(binding.material);
            self.dispose_geometry(binding.geometry);
        }
        if let Err(e) = self.backend.dispose_surface(surface) {
            tracing::warn!("surface release failed: {e}");
        }
    }

    /// Deliver a host event. Returns whether the mounted instance consumed it.
    pub fn handle_event(&mut self, host: &impl Host, event: &InputEvent) -> bool {
        let Stage::Mounted(m) = &mut self.stage else {
            return false;
        };
        match event {
            InputEvent::PointerMoved { .. } => m.pointer.apply(event),
            InputEvent::Resized => {
                let _enter = m.span.enter();
                let viewport = host.container_viewport();
                if viewport.is_empty() {
                    tracing::debug!(
                        width = viewport.width,
                        height = viewport.height,
                        "zero-sized container, keeping previous size"
                    );
                    return true;
                }
                m.camera.set_aspect(viewport.aspect());
                m.viewport = viewport;
                if let Err(e) = self.backend.resize_surface(m.surface, viewport) {
                    tracing::warn!("surface resize failed: {e}");
                }
                tracing::debug!(width = viewport.width, height = viewport.height, "resized");
                true
            }
        }
    }

    /// Frame callback. Re-schedules the next frame, advances the animation
    /// and submits one frame. Tokens that are not the pending one are ignored.
    pub fn on_frame(&mut self, host: &mut impl Host, token: FrameToken) -> bool {
        let clear = self.clear_color();
        let Stage::Mounted(m) = &mut self.stage else {
            tracing::trace!(?token, "frame after unmount ignored");
            return false;
        };
        if m.pending_frame != Some(token) {
            tracing::trace!(?token, "stale frame token ignored");
            return false;
        }
        m.pending_frame = Some(host.request_frame());

        let delta = m.clock.delta(host.now_seconds());
        self.animator.step(&mut m.graph, &mut m.camera, m.pointer, delta);

        let frame = Frame::compose(&m.graph, &m.camera, &m.bindings, clear);
        match self.backend.render(m.surface, &frame) {
            Ok(()) => m.frames += 1,
            Err(e) => {
                let _enter = m.span.enter();
                tracing::warn!("frame not rendered: {e}");
            }
        }
        true
    }

    /// `mounted-animating -> unmounted`. Removes both listeners, cancels the
    /// pending frame, detaches the surface, then releases every resource.
    /// Returns false (and does nothing) when already unmounted.
    pub fn unmount(&mut self, host: &mut impl Host) -> bool {
        let Stage::Mounted(m) = std::mem::replace(&mut self.stage, Stage::Unmounted) else {
            return false;
        };
        let m = *m;
        let _enter = m.span.enter();

        host.remove_listener(m.resize_listener);
        host.remove_listener(m.pointer_listener);
        if let Some(token) = m.pending_frame {
            host.cancel_frame(token);
        }
        if !host.remove_surface(m.surface) {
            tracing::debug!("surface was already detached from the container");
        }
        self.release(&m.bindings, m.surface);

        tracing::info!(frames = m.frames, "scene unmounted");
        true
    }
}
