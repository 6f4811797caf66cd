//! Scene description for the counsel hero visualization.
//!
//! Holds everything about the scene that does not touch a host or a GPU:
//! configuration, procedural geometry, materials and lights, the camera, the
//! scene graph, and the per-frame animation step.
//!
//! # Invariants
//! - Nothing here allocates GPU resources; backends consume these values.
//! - The animation step is a pure function of (graph, camera, pointer, delta).

pub mod animate;
pub mod camera;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod material;

pub use animate::{Animator, ease};
pub use camera::PerspectiveCamera;
pub use config::{ConfigError, SceneConfig};
pub use geometry::{Geometry, Topology};
pub use graph::{MeshNode, NodeId, SceneGraph};
pub use material::{Light, Material};

pub fn crate_info() -> &'static str {
    "counsel-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
