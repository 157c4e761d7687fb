//! Radial layout for valued hierarchies.
//!
//! The partitioner splits one parent band among weighted children; the
//! sunburst driver walks the tree from the selected root, producing one
//! slot-indexed frame of shape descriptors per pass.

pub mod levels;
pub mod partition;
pub mod sunburst;

pub use levels::{LevelMap, LevelOptions};
pub use partition::partition;
pub use sunburst::{compute_layout, drill_target, LayoutError, LayoutResult, SunburstFrame};
