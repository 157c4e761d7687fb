//! Spatial indexing over arc centroids.
//!
//! This module provides an R-tree based index for efficient nearest-anchor
//! and range queries on the laid-out frame.

mod rtree;

pub use rtree::AnchorIndex;
