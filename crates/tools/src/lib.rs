//! Developer tooling: scene inspector and frame statistics.
//!
//! # Invariants
//! - Tools only read renderer state; they never drive the lifecycle.

mod inspector;
mod stats;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
pub use stats::FrameStats;

pub fn crate_info() -> &'static str {
    "counsel-tools v0.1.0"
}
