//! wgpu render backend for the hero scene.
//!
//! Draws the ring and core as lit meshes and the star field as a point list
//! into a window surface, cleared to a transparent or opaque background.
//!
//! # Invariants
//! - The backend never mutates the scene; it only reads composed frames.
//! - Buffers are destroyed when their handle is disposed, not when the
//!   backend is dropped.
//! - A lost or outdated surface skips the frame and reconfigures; the next
//!   frame draws normally.

mod backend;
mod gpu;
mod shaders;

pub use backend::WgpuBackend;
