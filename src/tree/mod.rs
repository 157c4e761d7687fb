//! Hierarchy storage and value aggregation.
//!
//! This module provides the engine facade over point rows, with the
//! parent/child topology kept in petgraph's StableGraph for stable indices
//! and SoA buffers for the computed shape descriptors, plus the per-pass
//! valued tree the layout consumes.

mod engine;
mod node;
pub mod values;

pub use engine::{ChartOptions, LayoutStats, PointInit, PointView, SunburstEngine};
pub use node::{NodeId, NodeState};
