//! Host input: the events a host can deliver to a mounted scene, and the
//! normalized pointer they update.
//!
//! # Invariants
//! - Every host (headless, windowed) produces the same `InputEvent` values.
//! - Pointer coordinates are normalized against the window, not the container.

pub mod event;

pub use event::{EventKind, InputEvent, PointerState};
