//! Geometry resolution for centered (radial) series.

pub mod centered;

pub use centered::{get_center, start_end_radians, ResolvedGeometry, Size};
