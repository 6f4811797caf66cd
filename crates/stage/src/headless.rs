use crate::host::{FrameToken, Host, ListenerId};
use crate::stage::SceneRenderer;
use counsel_common::Viewport;
use counsel_input::{EventKind, InputEvent};
use counsel_render::{RenderBackend, SurfaceHandle};
use std::collections::{BTreeMap, BTreeSet};

/// Deterministic in-memory host.
///
/// Models a container (attached flag, client size, child surfaces and a count
/// of every child mutation), the global listener table, the pending frame set
/// and a clock that only moves when told to. The window is the same size as
/// the container.
#[derive(Debug)]
pub struct HeadlessHost {
    attached: bool,
    viewport: Viewport,
    children: Vec<SurfaceHandle>,
    mutations: usize,
    listeners: BTreeMap<ListenerId, EventKind>,
    next_listener: u64,
    pending_frames: BTreeSet<FrameToken>,
    next_token: u64,
    now: f64,
}

impl HeadlessHost {
    /// An attached container of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            attached: true,
            viewport: Viewport::new(width, height),
            children: Vec::new(),
            mutations: 0,
            listeners: BTreeMap::new(),
            next_listener: 0,
            pending_frames: BTreeSet::new(),
            next_token: 0,
            now: 0.0,
        }
    }

    /// A container that is not part of the document yet.
    pub fn detached(width: u32, height: u32) -> Self {
        Self {
            attached: false,
            ..Self::new(width, height)
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.viewport.device_pixel_ratio = ratio;
        self
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn children(&self) -> &[SurfaceHandle] {
        &self.children
    }

    /// Number of child insertions and removals performed on the container.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn pending_frames(&self) -> impl Iterator<Item = FrameToken> + '_ {
        self.pending_frames.iter().copied()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Change the container (and window) size without notifying anyone.
    pub fn set_container_size(&mut self, width: u32, height: u32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Remove a surface behind the renderer's back, as page code might.
    pub fn remove_child_externally(&mut self, surface: SurfaceHandle) -> bool {
        self.remove_surface(surface)
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

    /// Pointer move at client coordinates inside the window.
    pub fn pointer_move<B: RenderBackend>(
        &mut self,
        renderer: &mut SceneRenderer<B>,
        client_x: f32,
        client_y: f32,
    ) -> bool {
        let event = InputEvent::PointerMoved {
            client_x,
            client_y,
            window_width: self.viewport.width as f32,
            window_height: self.viewport.height as f32,
        };
        self.dispatch(renderer, event)
    }

    /// Resize the container, then fire a resize event.
    pub fn resize<B: RenderBackend>(
        &mut self,
        renderer: &mut SceneRenderer<B>,
        width: u32,
        height: u32,
    ) -> bool {
        self.set_container_size(width, height);
        self.dispatch(renderer, InputEvent::Resized)
    }

    /// Advance the clock by `delta` seconds and fire every frame that was
    /// pending before the call. Frames requested while firing wait for the
    /// next call. Returns how many callbacks ran.
    pub fn advance<B: RenderBackend>(
        &mut self,
        renderer: &mut SceneRenderer<B>,
        delta: f64,
    ) -> usize {
        self.now += delta;
        let due = std::mem::take(&mut self.pending_frames);
        let mut fired = 0;
        for token in due {
            if renderer.on_frame(self, token) {
                fired += 1;
            }
        }
        fired
    }

    /// `advance` repeated `frames` times with a fixed delta.
    pub fn run_frames<B: RenderBackend>(
        &mut self,
        renderer: &mut SceneRenderer<B>,
        frames: usize,
        delta: f64,
    ) -> usize {
        (0..frames).map(|_| self.advance(renderer, delta)).sum()
    }
}

impl Host for HeadlessHost {
    fn container_attached(&self) -> bool {
        self.attached
    }

    fn container_viewport(&self) -> Viewport {
        self.viewport
    }

    fn now_seconds(&self) -> f64 {
        self.now
    }

    fn append_surface(&mut self, surface: SurfaceHandle) {
        self.children.push(surface);
        self.mutations += 1;
    }

    fn remove_surface(&mut self, surface: SurfaceHandle) -> bool {
        match self.children.iter().position(|s| *s == surface) {
            Some(index) => {
                self.children.remove(index);
                self.mutations += 1;
                true
            }
            None => false,
        }
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
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending_frames.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_child_bookkeeping() {
        let mut host = HeadlessHost::new(100, 50);
        host.append_surface(SurfaceHandle(1));
        assert_eq!(host.children(), &[SurfaceHandle(1)]);
        assert!(host.remove_surface(SurfaceHandle(1)));
        assert!(!host.remove_surface(SurfaceHandle(1)));
        assert_eq!(host.mutations(), 2);
    }

    #[test]
    fn frame_tokens_are_unique_and_cancellable() {
        let mut host = HeadlessHost::new(1, 1);
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        host.cancel_frame(a);
        host.cancel_frame(a);
        assert_eq!(host.pending_frames().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn listeners_register_and_unregister() {
        let mut host = HeadlessHost::new(1, 1);
        let id = host.add_listener(EventKind::Resize);
        assert!(host.has_listener(EventKind::Resize));
        assert!(!host.has_listener(EventKind::PointerMove));
        assert!(host.remove_listener(id));
        assert!(!host.remove_listener(id));
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn detached_container_can_be_attached_later() {
        let mut host = HeadlessHost::detached(10, 10).with_pixel_ratio(2.0);
        assert!(!host.container_attached());
        host.attach();
        assert!(host.container_attached());
        assert_eq!(host.container_viewport().device_pixel_ratio, 2.0);
    }
}
