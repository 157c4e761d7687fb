//! Radial partitioner: one parent band into proportional child bands.
//!
//! Pure and stateless. Children split the parent's angular span in input
//! order, each receiving a share proportional to its value, and all land on
//! the band immediately outside the parent (`inner = parent.r`,
//! `outer = parent.r + parent.thickness`). The running-cursor construction
//! guarantees an exact contiguous partition: the first child starts at the
//! parent's start angle, each child starts where the previous one ended, and
//! the last child ends at the parent's end angle.

use crate::render::shape::ArcShape;

/// Partition a parent band among weighted children.
///
/// `total` is the weight the shares are taken from and must be the sum of
/// `values` for the spans to tile the parent exactly. A non-positive total
/// with non-empty children is a defined degenerate case: every child
/// collapses to a zero-width span at the parent's start angle instead of
/// propagating a division by zero.
pub fn partition(parent: &ArcShape, total: f64, values: &[f64]) -> Vec<ArcShape> {
    let range = parent.end - parent.start;
    let inner_r = parent.r;
    let outer_r = parent.r + parent.thickness;

    let mut cursor = parent.start;
    values
        .iter()
        .map(|&value| {
            let width = if total > 0.0 {
                (value / total) * range
            } else {
                0.0
            };
            let band = ArcShape {
                x: parent.x,
                y: parent.y,
                inner_r,
                r: outer_r,
                thickness: parent.thickness,
                start: cursor,
                end: cursor + width,
            };
            cursor = band.end;
            band
        })
        .collect()
}
