//! The built, cross-referenced action list graph.

pub mod affect;
pub mod context;
pub mod entity;

pub use affect::*;
pub use context::*;
pub use entity::*;
