use counsel_common::Viewport;
use counsel_input::EventKind;
use counsel_render::SurfaceHandle;

/// Registration of one global event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// One scheduled frame callback. Tokens are never reused by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// The environment a scene is mounted into: a container, two global event
/// sources, a run-before-next-repaint scheduler and a monotonic clock.
///
/// Everything runs on one thread. A host delivers events only for listener
/// kinds that are currently registered, and fires only frame tokens that are
/// still pending.
pub trait Host {
    /// Whether the container is part of the document and can be measured.
    fn container_attached(&self) -> bool;

    /// Current client size of the container and the device pixel ratio.
    fn container_viewport(&self) -> Viewport;

    /// Seconds since an arbitrary fixed origin.
    fn now_seconds(&self) -> f64;

    /// Append a rendering surface as a child of the container.
    fn append_surface(&mut self, surface: SurfaceHandle);

    /// Remove a rendering surface from the container. Returns false when it
    /// was not a child (for instance, removed externally).
    fn remove_surface(&mut self, surface: SurfaceHandle) -> bool;

    fn add_listener(&mut self, kind: EventKind) -> ListenerId;

    /// Returns false when the listener was not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Schedule one frame callback before the next repaint.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a scheduled frame. Cancelling a fired or unknown token is a no-op.
    fn cancel_frame(&mut self, token: FrameToken);
}
