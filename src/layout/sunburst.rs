//! Sunburst layout driver.
//!
//! Walks the valued tree top-down from the selected root, partitioning each
//! parent's angular span among its visible children and assigning every
//! reached node an annular band plus a label centroid. Depth maps to radius
//! through a per-level increment that is computed once per pass from the top
//! node's height and never varies across subtrees.
//!
//! The "top" node is the parent of the selected root (the super-root when the
//! root is the super-root itself). Only the root is laid out at the first
//! level below the top, which is what gives a drilled-into root the full
//! chart span; below the root, caller-controlled visibility filters children
//! out of the partition entirely.

use thiserror::Error;

use super::partition::partition;
use crate::geom::centered::ResolvedGeometry;
use crate::render::shape::ArcShape;
use crate::tree::values::{ValuedTree, SUPER_ROOT};

/// Errors surfaced by a layout pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// The requested root id does not resolve to any node in the tree.
    /// The pass aborts before mutating any shape data; the caller should
    /// fall back to the synthetic super-root (empty id).
    #[error("no node with id {0:?} in the current tree")]
    MissingNode(String),
}

/// Result alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Slot-indexed output of one layout pass.
///
/// Buffers are sized to the engine's slot bound; only slots flagged in
/// `laid_out` carry meaningful data from this pass. The owner merges the
/// frame into its stable buffers so unreached slots keep their previous
/// (stale) descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct SunburstFrame {
    /// Start angles in radians.
    pub starts: Vec<f64>,
    /// End angles in radians.
    pub ends: Vec<f64>,
    /// Inner band radii.
    pub inner_radii: Vec<f64>,
    /// Outer band radii.
    pub outer_radii: Vec<f64>,
    /// Band thickness per node (constant within a pass, kept per slot so
    /// stale descriptors stay self-contained).
    pub thicknesses: Vec<f64>,
    /// Chart center x per node.
    pub center_x: Vec<f64>,
    /// Chart center y per node.
    pub center_y: Vec<f64>,
    /// Centroid x per node.
    pub plot_x: Vec<f64>,
    /// Centroid y per node.
    pub plot_y: Vec<f64>,
    /// Resolved plotted values.
    pub values: Vec<f64>,
    /// Topological depth from the top node (top = 0).
    pub depths: Vec<u32>,
    /// Whether the slot was reached by this pass.
    pub laid_out: Vec<bool>,
    /// The top node's own band: full angular span, zero radial extent at the
    /// overall inner radius, carrying the per-level thickness.
    pub top_shape: ArcShape,
    /// Constant band thickness of the pass.
    pub radius_per_level: f64,
    /// Number of slots reached.
    pub laid_out_count: usize,
}

impl SunburstFrame {
    fn new(slot_bound: usize, top_shape: ArcShape, radius_per_level: f64) -> Self {
        Self {
            starts: vec![0.0; slot_bound],
            ends: vec![0.0; slot_bound],
            inner_radii: vec![0.0; slot_bound],
            outer_radii: vec![0.0; slot_bound],
            thicknesses: vec![0.0; slot_bound],
            center_x: vec![0.0; slot_bound],
            center_y: vec![0.0; slot_bound],
            plot_x: vec![0.0; slot_bound],
            plot_y: vec![0.0; slot_bound],
            values: vec![0.0; slot_bound],
            depths: vec![0; slot_bound],
            laid_out: vec![false; slot_bound],
            top_shape,
            radius_per_level,
            laid_out_count: 0,
        }
    }

    fn write(&mut self, slot: usize, shape: &ArcShape, value: f64, depth: u32) {
        if slot >= self.laid_out.len() {
            return;
        }
        let (px, py) = shape.centroid();
        self.starts[slot] = shape.start;
        self.ends[slot] = shape.end;
        self.inner_radii[slot] = shape.inner_r;
        self.outer_radii[slot] = shape.r;
        self.thicknesses[slot] = shape.thickness;
        self.center_x[slot] = shape.x;
        self.center_y[slot] = shape.y;
        self.plot_x[slot] = px;
        self.plot_y[slot] = py;
        self.values[slot] = value;
        self.depths[slot] = depth;
        if !self.laid_out[slot] {
            self.laid_out[slot] = true;
            self.laid_out_count += 1;
        }
    }
}

/// Compute one layout pass.
///
/// `visible` is indexed by engine slot; slots beyond its length count as
/// visible. Fails with [`LayoutError::MissingNode`] before any output is
/// produced when `root_id` does not resolve.
pub fn compute_layout(
    tree: &ValuedTree,
    root_id: &str,
    geometry: &ResolvedGeometry,
    visible: &[bool],
    slot_bound: usize,
) -> LayoutResult<SunburstFrame> {
    let root = tree
        .arena_of(root_id)
        .ok_or_else(|| LayoutError::MissingNode(root_id.to_string()))?;

    // The top node sets the radial scale for the whole pass. A childless top
    // still gets one band.
    let top = tree.node(root).parent.unwrap_or(root);
    let height = tree.node(top).height.max(1);
    let radius_per_level = (geometry.outer_r - geometry.inner_r) / f64::from(height);

    let seed = ArcShape {
        x: geometry.cx,
        y: geometry.cy,
        inner_r: geometry.inner_r,
        r: geometry.inner_r,
        thickness: radius_per_level,
        start: geometry.start_rad,
        end: geometry.end_rad,
    };

    let mut frame = SunburstFrame::new(slot_bound, seed, radius_per_level);
    if let Some(slot) = tree.node(top).slot {
        frame.write(slot.raw() as usize, &seed, tree.node(top).resolved, 0);
    }

    // First level: only the selected root is laid out below the top, even if
    // the root itself is marked invisible. Siblings of the root belong to
    // passes rooted higher up.
    let first_level: Vec<usize> = if top == root {
        visible_children(tree, root, visible)
    } else {
        vec![root]
    };
    layout_children(tree, &mut frame, &seed, &first_level, 1, visible);

    Ok(frame)
}

/// Partition one parent band among `children` and recurse.
fn layout_children(
    tree: &ValuedTree,
    frame: &mut SunburstFrame,
    parent_shape: &ArcShape,
    children: &[usize],
    depth: u32,
    visible: &[bool],
) {
    if children.is_empty() {
        return;
    }
    let values: Vec<f64> = children.iter().map(|&c| tree.node(c).resolved).collect();
    let total: f64 = values.iter().sum();
    let bands = partition(parent_shape, total, &values);

    for (&child, band) in children.iter().zip(&bands) {
        let node = tree.node(child);
        if let Some(slot) = node.slot {
            frame.write(slot.raw() as usize, band, node.resolved, depth);
        }
        let grandchildren = visible_children(tree, child, visible);
        if !grandchildren.is_empty() {
            layout_children(tree, frame, band, &grandchildren, depth + 1, visible);
        }
    }
}

/// Children of `arena` that participate in the angular partition.
fn visible_children(tree: &ValuedTree, arena: usize, visible: &[bool]) -> Vec<usize> {
    tree.node(arena)
        .children
        .iter()
        .copied()
        .filter(|&c| {
            tree.node(c)
                .slot
                .map(|s| visible.get(s.raw() as usize).copied().unwrap_or(true))
                .unwrap_or(true)
        })
        .collect()
}

/// Resolve the target of a drill interaction.
///
/// Activating the current root drills up to its parent; activating any other
/// point drills down into it. Returns None when already at the synthetic
/// super-root (nowhere further up to go).
pub fn drill_target(tree: &ValuedTree, point_id: &str, current_root: &str) -> Option<String> {
    if point_id != current_root {
        return Some(point_id.to_string());
    }
    let arena = tree.arena_of(point_id)?;
    let parent = tree.node(arena).parent?;
    Some(tree.node(parent).id.clone())
}
