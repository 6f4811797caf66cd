use counsel_common::Viewport;
use counsel_input::{EventKind, InputEvent};
use counsel_render::{RenderBackend, SurfaceHandle};
use counsel_stage::{FrameToken, Host, ListenerId, SceneRenderer};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;
use winit::window::Window;

/// A winit window acting as the scene's container.
///
/// Frame requests turn into redraw requests; the pending tokens fire on the
/// next `RedrawRequested`.
pub struct WindowHost {
    window: Arc<Window>,
    started: Instant,
    children: Vec<SurfaceHandle>,
    listeners: BTreeMap<ListenerId, EventKind>,
    next_listener: u64,
    pending_frames: BTreeSet<FrameToken>,
    next_token: u64,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            started: Instant::now(),
            children: Vec::new(),
            listeners: BTreeMap::new(),
            next_listener: 0,
            pending_frames: BTreeSet::new(),
            next_token: 0,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Deliver an event if a listener of its kind is registered.
    pub fn dispatch<B: RenderBackend>(
        &mut self,
        renderer: &mut SceneRenderer<B>,
        event: InputEvent,
    ) -> bool {
        if !self.has_listener(event.kind()) {
            return false;
        }
        renderer.handle_event(&*self, &event)
    }

    /// Fire every frame that was pending when the redraw arrived.
    pub fn fire_frames<B: RenderBackend>(&mut self, renderer: &mut SceneRenderer<B>) -> usize {
        let due = std::mem::take(&mut self.pending_frames);
        let mut fired = 0;
        for token in due {
            if renderer.on_frame(self, token) {
                fired += 1;
            }
        }
        fired
    }
}

impl Host for WindowHost {
    fn container_attached(&self) -> bool {
        let size = self.window.inner_size();
        size.width > 0 && size.height > 0
    }

    fn container_viewport(&self) -> Viewport {
        let scale = self.window.scale_factor();
        let logical = self.window.inner_size().to_logical::<f64>(scale);
        Viewport::new(logical.width.round() as u32, logical.height.round() as u32)
            .with_pixel_ratio(scale as f32)
    }

    fn now_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn append_surface(&mut self, surface: SurfaceHandle) {
        self.children.push(surface);
    }

    fn remove_surface(&mut self, surface: SurfaceHandle) -> bool {
        let before = self.children.len();
        self.children.retain(|s| *s != surface);
        self.children.len() != before
    }

    fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn request_frame(&mut self) -> FrameToken {
        self.next_token += 1;
        let token = FrameToken(self.next_token);
        self.pending_frames.insert(token);
        self.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending_frames.remove(&token);
    }
}
