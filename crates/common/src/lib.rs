//! Shared value types for the counsel scene workspace.

mod types;

pub use types::{InstanceId, Rgb, Transform, Viewport};
