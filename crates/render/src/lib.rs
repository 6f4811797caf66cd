//! Rendering adapter: renderer-agnostic backend interface.
//!
//! # Invariants
//! - Backends never mutate the scene; they consume a composed [`Frame`].
//! - Every handle a backend returns is accounted for in its [`ResourceLedger`]
//!   and is released exactly once.
//!
//! [`HeadlessBackend`] records calls instead of drawing. The trait is the
//! stable seam; the wgpu backend plugs in without changing consumers.

mod frame;
mod renderer;
mod resource;

pub use frame::{ClearColor, DrawItem, Frame, NodeBinding};
pub use renderer::{BackendCall, FrameSummary, HeadlessBackend, RenderBackend, SurfaceState};
pub use resource::{
    GeometryHandle, MaterialHandle, RenderError, ResourceKind, ResourceLedger, SurfaceHandle,
};

pub fn crate_info() -> &'static str {
    "counsel-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
