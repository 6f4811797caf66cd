//! Scene lifecycle: mounts the hero scene into a host container, drives its
//! frame loop, and tears it down.
//!
//! # Invariants
//! - Two states only: `unmounted` (nothing held) and `mounted-animating`.
//! - Every resource acquired at mount is released exactly once on unmount,
//!   after the pending frame has been cancelled.
//! - A frame callback only runs for the currently pending token.

mod clock;
mod headless;
mod host;
mod stage;

pub use clock::FrameClock;
pub use headless::HeadlessHost;
pub use host::{FrameToken, Host, ListenerId};
pub use stage::{MountOutcome, SceneRenderer, StageError};

pub fn crate_info() -> &'static str {
    "counsel-stage v0.1.0"
}
