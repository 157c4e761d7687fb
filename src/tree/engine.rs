//! SunburstEngine - core hierarchy store and layout facade.
//!
//! The engine stores point rows keyed by caller-facing string ids, keeps the
//! parent/child topology in petgraph's StableGraph, and maintains SoA
//! (Structure of Arrays) buffers for the computed shape descriptors to enable
//! zero-copy handoff to a JavaScript or GPU renderer.
//!
//! A layout pass is triggered explicitly (resize, root change, data change)
//! and runs synchronously; the SoA buffers always hold the last good frame.
//! Slots not reached by the latest pass keep their previous descriptors and
//! are distinguishable through the per-pass laid-out flag.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::node::{NodeId, NodeState};
use super::values::{PointLink, ValuedTree};
use crate::geom::centered::{get_center, start_end_radians, ResolvedGeometry, Size};
use crate::layout::levels::{LevelMap, LevelOptions};
use crate::layout::sunburst::{self, LayoutResult};
use crate::render::animation::{enter_tween, ArcTween, TweenContext};
use crate::render::shape::{ArcShape, DataLabelPos};
use crate::render::Drawable;
use crate::spatial::AnchorIndex;

/// Chart-level options, deserializable from the JS boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    /// Chart center relative to the plot area.
    pub center: [Size; 2],
    /// Outer diameter, relative to the smaller plot dimension.
    pub size: Size,
    /// Inner diameter (center hole).
    pub inner_size: Size,
    /// Start angle in degrees, 0 at 12 o'clock.
    pub start_angle: f64,
    /// End angle in degrees; absent or invalid spans the full circle.
    pub end_angle: Option<f64>,
    /// Which point to use as the root of the visualization.
    pub root_id: Option<String>,
    /// Per-level style overrides.
    pub levels: Vec<LevelOptions>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            center: [Size::percent(50.0), Size::percent(50.0)],
            size: Size::percent(100.0),
            inner_size: Size::Px(0.0),
            start_angle: 0.0,
            end_angle: None,
            root_id: None,
            levels: Vec::new(),
        }
    }
}

/// One point as supplied by the caller for bulk loading.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointInit {
    /// Unique point id.
    pub id: String,
    /// Id of the parent point; empty or unknown attaches to the super-root.
    #[serde(default)]
    pub parent: String,
    /// Explicit value; absent for pure container nodes.
    #[serde(default)]
    pub value: Option<f64>,
    /// Initial visibility.
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

/// Summary of a completed layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    /// Number of nodes reached by the pass.
    pub laid_out: u32,
    /// Constant band thickness of the pass.
    pub radius_per_level: f64,
}

/// Read-only view of one point for renderer-side decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct PointView {
    /// Caller-facing id.
    pub id: String,
    /// Last written shape descriptor, possibly stale.
    pub shape: Option<ArcShape>,
    /// Caller-controlled visibility.
    pub visible: bool,
    /// Whether the latest pass reached the point.
    pub laid_out: bool,
    /// Resolved plotted value.
    pub value: f64,
    /// Depth from the top node in the latest pass that reached the point.
    pub depth: u32,
}

impl Drawable for PointView {
    fn shape_args(&self) -> Option<ArcShape> {
        self.shape
    }

    fn should_draw(&self) -> bool {
        self.visible && self.laid_out
    }
}

#[derive(Debug, Clone, Default)]
struct PointRow {
    id: String,
    parent_id: String,
    value: Option<f64>,
}

/// The core sunburst engine.
///
/// This struct manages:
/// - Point rows and their parent links via petgraph (stable indices)
/// - Shape-descriptor buffers in SoA layout
/// - Node state (visible, laid out, has shape)
/// - The centroid spatial index for anchor queries
/// - ID mapping between caller ids, stable slots, and internal indices
pub struct SunburstEngine {
    /// Parent→child topology. Node weights are stable slot ids, edge weights
    /// the child's slot (which is its insertion sequence).
    graph: StableGraph<NodeId, u32, Directed>,

    /// Map from stable slot id to petgraph NodeIndex.
    node_id_to_index: HashMap<NodeId, NodeIndex>,

    /// Map from caller-facing point id to stable slot id.
    point_id_to_node: HashMap<String, NodeId>,

    /// Next slot id to assign. Monotonic; slots are never reused, so the SoA
    /// buffers stay aligned across removals.
    next_node_id: u32,

    /// Point rows (slot-indexed; dead slots are reset to defaults).
    rows: Vec<PointRow>,

    /// Node states (slot-indexed).
    states: Vec<NodeState>,

    // Shape descriptor buffers (SoA layout, slot-indexed).
    starts: Vec<f64>,
    ends: Vec<f64>,
    inner_radii: Vec<f64>,
    outer_radii: Vec<f64>,
    thicknesses: Vec<f64>,
    center_x: Vec<f64>,
    center_y: Vec<f64>,
    plot_x: Vec<f64>,
    plot_y: Vec<f64>,
    values: Vec<f64>,
    depths: Vec<u32>,

    /// Chart options as last supplied.
    options: ChartOptions,

    /// Level → style override lookup, rebuilt each pass.
    level_map: LevelMap,

    /// Current root id ("" = synthetic super-root).
    root_id: String,

    /// Whether the root was set explicitly (options no longer override it).
    root_explicit: bool,

    /// Root id before the most recent root change, for drill animations.
    previous_root: Option<String>,

    /// Whether the renderer has completed its first paint.
    has_rendered: bool,

    /// Band thickness of the latest pass.
    radius_per_level: f64,

    /// Geometry of the latest pass.
    geometry: Option<ResolvedGeometry>,

    /// The top node's band from the latest pass.
    top_shape: Option<ArcShape>,

    /// Spatial index over the latest frame's centroids.
    anchors: AnchorIndex,

    /// Valued hierarchy, rebuilt when rows change.
    tree: Option<ValuedTree>,

    /// Whether rows changed since the tree was last built.
    tree_dirty: bool,
}

impl SunburstEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_id_to_index: HashMap::new(),
            point_id_to_node: HashMap::new(),
            next_node_id: 0,
            rows: Vec::new(),
            states: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            inner_radii: Vec::new(),
            outer_radii: Vec::new(),
            thicknesses: Vec::new(),
            center_x: Vec::new(),
            center_y: Vec::new(),
            plot_x: Vec::new(),
            plot_y: Vec::new(),
            values: Vec::new(),
            depths: Vec::new(),
            options: ChartOptions::default(),
            level_map: LevelMap::default(),
            root_id: String::new(),
            root_explicit: false,
            previous_root: None,
            has_rendered: false,
            radius_per_level: 0.0,
            geometry: None,
            top_shape: None,
            anchors: AnchorIndex::new(),
            tree: None,
            tree_dirty: true,
        }
    }

    /// Create an engine with pre-allocated capacity.
    pub fn with_capacity(point_capacity: usize) -> Self {
        let mut engine = Self::new();
        engine.graph = StableGraph::with_capacity(point_capacity, point_capacity);
        engine.node_id_to_index = HashMap::with_capacity(point_capacity);
        engine.point_id_to_node = HashMap::with_capacity(point_capacity);
        engine.rows = Vec::with_capacity(point_capacity);
        engine.states = Vec::with_capacity(point_capacity);
        engine.starts = Vec::with_capacity(point_capacity);
        engine.ends = Vec::with_capacity(point_capacity);
        engine.inner_radii = Vec::with_capacity(point_capacity);
        engine.outer_radii = Vec::with_capacity(point_capacity);
        engine.thicknesses = Vec::with_capacity(point_capacity);
        engine.center_x = Vec::with_capacity(point_capacity);
        engine.center_y = Vec::with_capacity(point_capacity);
        engine.plot_x = Vec::with_capacity(point_capacity);
        engine.plot_y = Vec::with_capacity(point_capacity);
        engine.values = Vec::with_capacity(point_capacity);
        engine.depths = Vec::with_capacity(point_capacity);
        engine
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Add a point, or update it in place when the id already exists.
    ///
    /// Returns the point's stable slot id. Insertion order defines the
    /// angular order of siblings.
    pub fn add_point(&mut self, id: &str, parent_id: &str, value: Option<f64>) -> NodeId {
        if let Some(&existing) = self.point_id_to_node.get(id) {
            let slot = existing.raw() as usize;
            self.rows[slot].parent_id = parent_id.to_string();
            self.rows[slot].value = value;
            self.tree_dirty = true;
            return existing;
        }

        let node = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let index = self.graph.add_node(node);
        self.node_id_to_index.insert(node, index);
        self.point_id_to_node.insert(id.to_string(), node);

        self.rows.push(PointRow {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            value,
        });
        self.states.push(NodeState::new());
        self.starts.push(0.0);
        self.ends.push(0.0);
        self.inner_radii.push(0.0);
        self.outer_radii.push(0.0);
        self.thicknesses.push(0.0);
        self.center_x.push(0.0);
        self.center_y.push(0.0);
        self.plot_x.push(0.0);
        self.plot_y.push(0.0);
        self.values.push(0.0);
        self.depths.push(0);

        self.tree_dirty = true;
        node
    }

    /// Bulk-load points. Returns the number of points added or updated.
    pub fn set_data(&mut self, points: &[PointInit]) -> u32 {
        let mut count = 0;
        for point in points {
            let node = self.add_point(&point.id, &point.parent, point.value);
            self.states[node.raw() as usize].set_visible(point.visible);
            count += 1;
        }
        count
    }

    /// Remove a point. Its children reattach to the super-root on the next
    /// build, since their parent link no longer resolves.
    ///
    /// Returns true if the point existed and was removed.
    pub fn remove_point(&mut self, id: &str) -> bool {
        let Some(node) = self.point_id_to_node.remove(id) else {
            return false;
        };
        if let Some(index) = self.node_id_to_index.remove(&node) {
            self.graph.remove_node(index);
        }

        // Reset the dead slot; the slot id itself is never reused.
        let slot = node.raw() as usize;
        self.rows[slot] = PointRow::default();
        self.states[slot] = NodeState::new();
        self.starts[slot] = 0.0;
        self.ends[slot] = 0.0;
        self.inner_radii[slot] = 0.0;
        self.outer_radii[slot] = 0.0;
        self.thicknesses[slot] = 0.0;
        self.center_x[slot] = 0.0;
        self.center_y[slot] = 0.0;
        self.plot_x[slot] = 0.0;
        self.plot_y[slot] = 0.0;
        self.values[slot] = 0.0;
        self.depths[slot] = 0;

        self.tree_dirty = true;
        true
    }

    /// Set a point's explicit value.
    pub fn set_value(&mut self, id: &str, value: Option<f64>) -> bool {
        let Some(&node) = self.point_id_to_node.get(id) else {
            return false;
        };
        self.rows[node.raw() as usize].value = value;
        self.tree_dirty = true;
        true
    }

    /// Set a point's visibility. Does not invalidate the aggregated tree;
    /// visibility filters the angular partition at layout time only.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        let Some(&node) = self.point_id_to_node.get(id) else {
            return false;
        };
        self.states[node.raw() as usize].set_visible(visible);
        true
    }

    /// Number of live points.
    pub fn point_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Upper bound on slot ids (max slot + 1). May exceed `point_count`
    /// after removals; SoA buffers are sized to this bound.
    pub fn slot_bound(&self) -> u32 {
        self.next_node_id
    }

    /// Look up a point's stable slot id.
    pub fn slot_of(&self, id: &str) -> Option<NodeId> {
        self.point_id_to_node.get(id).copied()
    }

    /// Children ids of a point (or of the super-root for ""), in angular
    /// order.
    pub fn children_of(&self, id: &str) -> Vec<String> {
        if id.is_empty() {
            // Super-root children only exist in the built tree.
            if let Some(tree) = &self.tree {
                return tree
                    .node(crate::tree::values::SUPER_ROOT)
                    .children
                    .iter()
                    .map(|&c| tree.node(c).id.clone())
                    .collect();
            }
            return Vec::new();
        }
        let Some(&node) = self.point_id_to_node.get(id) else {
            return Vec::new();
        };
        let Some(&index) = self.node_id_to_index.get(&node) else {
            return Vec::new();
        };
        let mut edges: Vec<(u32, NodeIndex)> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        edges.sort_by_key(|&(seq, _)| seq);
        edges
            .into_iter()
            .filter_map(|(_, target)| self.graph.node_weight(target))
            .map(|&n| self.rows[n.raw() as usize].id.clone())
            .collect()
    }

    // =========================================================================
    // Options and Root Selection
    // =========================================================================

    /// Replace the chart options. The options' root id applies unless a root
    /// was already selected explicitly.
    pub fn set_options(&mut self, options: ChartOptions) {
        if !self.root_explicit {
            if let Some(root) = &options.root_id {
                self.root_id = root.clone();
            }
        }
        self.options = options;
    }

    /// Current chart options.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Current root id ("" = synthetic super-root).
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Select the root to lay out from. A change records the previous root
    /// for drill animations.
    pub fn set_root(&mut self, id: &str) {
        if id != self.root_id {
            self.previous_root = Some(std::mem::replace(&mut self.root_id, id.to_string()));
        }
        self.root_explicit = true;
    }

    /// Resolve the drill target for an activated point: the point itself,
    /// or its parent when the point is the current root. None when already
    /// at the super-root.
    pub fn drill_target(&mut self, point_id: &str) -> Option<String> {
        self.ensure_tree();
        let tree = self.tree.as_ref()?;
        sunburst::drill_target(tree, point_id, &self.root_id)
    }

    /// Drill into (or out of) a point: resolve the target and make it the
    /// root. Returns the new root id, or None when there is nowhere to go.
    pub fn drill_to(&mut self, point_id: &str) -> Option<String> {
        let target = self.drill_target(point_id)?;
        self.set_root(&target);
        Some(target)
    }

    /// Mark that the renderer completed its first paint; subsequent tween
    /// queries animate updates instead of the initial sweep.
    pub fn mark_rendered(&mut self) {
        self.has_rendered = true;
    }

    /// Whether the first paint has happened.
    pub fn has_rendered(&self) -> bool {
        self.has_rendered
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn ensure_tree(&mut self) {
        if !self.tree_dirty && self.tree.is_some() {
            return;
        }
        self.rebuild_topology();
        self.tree = Some(ValuedTree::build(&self.links()));
        self.tree_dirty = false;
    }

    /// Rebuild graph edges from the rows' parent ids. Unknown, empty, and
    /// self-referential parents leave the point without an incoming edge,
    /// which attaches it to the super-root at build time.
    fn rebuild_topology(&mut self) {
        self.graph.clear_edges();
        for slot in 0..self.next_node_id {
            let node = NodeId(slot);
            let Some(&child_index) = self.node_id_to_index.get(&node) else {
                continue;
            };
            let parent_id = self.rows[slot as usize].parent_id.clone();
            if parent_id.is_empty() || parent_id == self.rows[slot as usize].id {
                continue;
            }
            if let Some(&parent) = self.point_id_to_node.get(&parent_id) {
                if let Some(&parent_index) = self.node_id_to_index.get(&parent) {
                    self.graph.add_edge(parent_index, child_index, slot);
                }
            }
        }
    }

    /// Extract resolved links in insertion order for the tree builder.
    fn links(&self) -> Vec<PointLink> {
        let mut links = Vec::with_capacity(self.graph.node_count());
        for slot in 0..self.next_node_id {
            let node = NodeId(slot);
            let Some(&index) = self.node_id_to_index.get(&node) else {
                continue;
            };
            let parent = self
                .graph
                .neighbors_directed(index, Direction::Incoming)
                .next()
                .and_then(|p| self.graph.node_weight(p))
                .copied();
            let row = &self.rows[slot as usize];
            links.push(PointLink {
                node,
                id: row.id.clone(),
                parent,
                value: row.value,
            });
        }
        links
    }

    /// Run one layout pass against the given plot area.
    ///
    /// On error nothing is mutated and the previous frame's descriptors stay
    /// valid. On success the SoA buffers, laid-out flags, and the centroid
    /// index reflect the new frame.
    pub fn compute_layout(&mut self, plot_width: f64, plot_height: f64) -> LayoutResult<LayoutStats> {
        self.level_map = LevelMap::from_options(&self.options.levels);
        self.ensure_tree();

        let (cx, cy, diameter, inner_diameter) = get_center(
            &self.options.center,
            &self.options.size,
            &self.options.inner_size,
            plot_width,
            plot_height,
        );
        let (start_rad, end_rad) =
            start_end_radians(self.options.start_angle, self.options.end_angle);
        let geometry = ResolvedGeometry {
            cx,
            cy,
            inner_r: inner_diameter / 2.0,
            outer_r: diameter / 2.0,
            start_rad,
            end_rad,
        };

        let visible: Vec<bool> = self.states.iter().map(|s| s.is_visible()).collect();
        let frame = match &self.tree {
            Some(tree) => sunburst::compute_layout(
                tree,
                &self.root_id,
                &geometry,
                &visible,
                self.next_node_id as usize,
            )?,
            None => {
                return Ok(LayoutStats {
                    laid_out: 0,
                    radius_per_level: 0.0,
                });
            }
        };

        for slot in 0..self.next_node_id as usize {
            if frame.laid_out[slot] {
                self.starts[slot] = frame.starts[slot];
                self.ends[slot] = frame.ends[slot];
                self.inner_radii[slot] = frame.inner_radii[slot];
                self.outer_radii[slot] = frame.outer_radii[slot];
                self.thicknesses[slot] = frame.thicknesses[slot];
                self.center_x[slot] = frame.center_x[slot];
                self.center_y[slot] = frame.center_y[slot];
                self.plot_x[slot] = frame.plot_x[slot];
                self.plot_y[slot] = frame.plot_y[slot];
                self.values[slot] = frame.values[slot];
                self.depths[slot] = frame.depths[slot];
                self.states[slot].set_has_shape(true);
            }
            self.states[slot].set_laid_out(frame.laid_out[slot]);
        }

        self.radius_per_level = frame.radius_per_level;
        self.geometry = Some(geometry);
        self.top_shape = Some(frame.top_shape);

        let anchor_points: Vec<(NodeId, f64, f64)> = (0..self.next_node_id as usize)
            .filter(|&slot| frame.laid_out[slot])
            .map(|slot| (NodeId(slot as u32), self.plot_x[slot], self.plot_y[slot]))
            .collect();
        self.anchors.rebuild(&anchor_points);

        Ok(LayoutStats {
            laid_out: frame.laid_out_count as u32,
            radius_per_level: frame.radius_per_level,
        })
    }

    // =========================================================================
    // Shape Queries
    // =========================================================================

    fn live_slot(&self, id: &str) -> Option<usize> {
        self.point_id_to_node.get(id).map(|n| n.raw() as usize)
    }

    fn shape_at(&self, slot: usize) -> ArcShape {
        ArcShape {
            x: self.center_x[slot],
            y: self.center_y[slot],
            inner_r: self.inner_radii[slot],
            r: self.outer_radii[slot],
            thickness: self.thicknesses[slot],
            start: self.starts[slot],
            end: self.ends[slot],
        }
    }

    /// Last written shape descriptor for a point, possibly stale. The empty
    /// id returns the top band of the latest pass.
    pub fn shape(&self, id: &str) -> Option<ArcShape> {
        if id.is_empty() {
            return self.top_shape;
        }
        let slot = self.live_slot(id)?;
        if !self.states[slot].has_shape() {
            return None;
        }
        Some(self.shape_at(slot))
    }

    /// Whether the latest pass reached the point.
    pub fn is_laid_out(&self, id: &str) -> bool {
        self.live_slot(id)
            .map(|slot| self.states[slot].is_laid_out())
            .unwrap_or(false)
    }

    /// A point's caller-controlled visibility.
    pub fn is_visible(&self, id: &str) -> bool {
        self.live_slot(id)
            .map(|slot| self.states[slot].is_visible())
            .unwrap_or(false)
    }

    /// Resolved plotted value from the latest pass that reached the point.
    pub fn value(&self, id: &str) -> Option<f64> {
        let slot = self.live_slot(id)?;
        self.states[slot].has_shape().then(|| self.values[slot])
    }

    /// Depth from the top node in the latest pass that reached the point.
    pub fn depth(&self, id: &str) -> Option<u32> {
        let slot = self.live_slot(id)?;
        self.states[slot].has_shape().then(|| self.depths[slot])
    }

    /// Read-only renderer view of one point.
    pub fn point_view(&self, id: &str) -> Option<PointView> {
        let slot = self.live_slot(id)?;
        let state = self.states[slot];
        Some(PointView {
            id: self.rows[slot].id.clone(),
            shape: state.has_shape().then(|| self.shape_at(slot)),
            visible: state.is_visible(),
            laid_out: state.is_laid_out(),
            value: self.values[slot],
            depth: self.depths[slot],
        })
    }

    /// Data-label placement for a point reached by the latest pass, with any
    /// per-level rotation override applied.
    pub fn data_label(&self, id: &str) -> Option<DataLabelPos> {
        let slot = self.live_slot(id)?;
        if !self.states[slot].is_laid_out() {
            return None;
        }
        let mut label = DataLabelPos::for_shape(&self.shape_at(slot));
        if let Some(rotation) = self
            .level_map
            .get(self.depths[slot])
            .and_then(|level| level.label_rotation)
        {
            label.rotation = rotation;
        }
        Some(label)
    }

    /// Style overrides configured for a nesting level.
    pub fn level_options(&self, level: u32) -> Option<&LevelOptions> {
        self.level_map.get(level)
    }

    /// Tween descriptor for a point reached by the latest pass.
    ///
    /// `has_graphic` tells whether the renderer already has an on-screen arc
    /// for the point.
    pub fn arc_tween(&self, id: &str, has_graphic: bool) -> Option<ArcTween> {
        let slot = self.live_slot(id)?;
        if !self.states[slot].is_laid_out() {
            return None;
        }
        let geometry = self.geometry?;
        let ctx = TweenContext {
            has_rendered: self.has_rendered,
            chart_start: geometry.start_rad,
            chart_end: geometry.end_rad,
            center_inner_r: geometry.inner_r,
            previous_root: self
                .previous_root
                .as_deref()
                .and_then(|prev| self.shape(prev)),
        };
        let shape = self.shape_at(slot);
        Some(enter_tween(&shape, id == self.root_id, has_graphic, &ctx))
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the arc containing a point, if any. Bands are disjoint, so at
    /// most one laid-out arc matches.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<String> {
        for slot in 0..self.next_node_id as usize {
            if self.states[slot].is_laid_out()
                && !self.rows[slot].id.is_empty()
                && self.shape_at(slot).contains(x, y)
            {
                return Some(self.rows[slot].id.clone());
            }
        }
        None
    }

    /// Nearest label anchor within a maximum distance.
    pub fn nearest_anchor(&self, x: f64, y: f64, max_distance: f64) -> Option<String> {
        self.anchors
            .nearest_within(x, y, max_distance)
            .map(|node| self.rows[node.raw() as usize].id.clone())
    }

    /// Ids of all label anchors inside a rectangle.
    pub fn anchors_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<String> {
        self.anchors
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|node| self.rows[node.raw() as usize].id.clone())
            .collect()
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Start angles slice (slot-indexed).
    pub fn starts(&self) -> &[f64] {
        &self.starts
    }

    /// End angles slice.
    pub fn ends(&self) -> &[f64] {
        &self.ends
    }

    /// Inner radii slice.
    pub fn inner_radii(&self) -> &[f64] {
        &self.inner_radii
    }

    /// Outer radii slice.
    pub fn outer_radii(&self) -> &[f64] {
        &self.outer_radii
    }

    /// Centroid x slice.
    pub fn plot_x(&self) -> &[f64] {
        &self.plot_x
    }

    /// Centroid y slice.
    pub fn plot_y(&self) -> &[f64] {
        &self.plot_y
    }

    /// Resolved values slice.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Depths slice.
    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    /// Band thickness of the latest pass.
    pub fn radius_per_level(&self) -> f64 {
        self.radius_per_level
    }

    /// Geometry of the latest pass.
    pub fn geometry(&self) -> Option<ResolvedGeometry> {
        self.geometry
    }

    /// Clear all points and computed state, resetting the engine.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_id_to_index.clear();
        self.point_id_to_node.clear();
        self.next_node_id = 0;
        self.rows.clear();
        self.states.clear();
        self.starts.clear();
        self.ends.clear();
        self.inner_radii.clear();
        self.outer_radii.clear();
        self.thicknesses.clear();
        self.center_x.clear();
        self.center_y.clear();
        self.plot_x.clear();
        self.plot_y.clear();
        self.values.clear();
        self.depths.clear();
        self.root_id = String::new();
        self.root_explicit = false;
        self.previous_root = None;
        self.has_rendered = false;
        self.radius_per_level = 0.0;
        self.geometry = None;
        self.top_shape = None;
        self.anchors.clear();
        self.tree = None;
        self.tree_dirty = true;
    }
}

impl Default for SunburstEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// a(6 via children a1=2, a2=4) and b(2) under the super-root.
    fn sample_engine() -> SunburstEngine {
        let mut engine = SunburstEngine::new();
        engine.add_point("a", "", None);
        engine.add_point("b", "", Some(2.0));
        engine.add_point("a1", "a", Some(2.0));
        engine.add_point("a2", "a", Some(4.0));
        engine
    }

    #[test]
    fn test_add_and_count() {
        let engine = sample_engine();
        assert_eq!(engine.point_count(), 4);
        assert_eq!(engine.slot_bound(), 4);
        assert_eq!(engine.slot_of("a"), Some(NodeId(0)));
    }

    #[test]
    fn test_add_existing_updates_in_place() {
        let mut engine = sample_engine();
        let slot = engine.add_point("b", "", Some(10.0));
        assert_eq!(slot, NodeId(1));
        assert_eq!(engine.point_count(), 4);

        engine.compute_layout(400.0, 400.0).unwrap();
        assert_eq!(engine.value("b"), Some(10.0));
    }

    #[test]
    fn test_layout_and_values() {
        let mut engine = sample_engine();
        let stats = engine.compute_layout(400.0, 400.0).unwrap();
        assert_eq!(stats.laid_out, 4);
        // Height 2, outer radius 200.
        assert_eq!(stats.radius_per_level, 100.0);

        // Container value resolves to the children total.
        assert_eq!(engine.value("a"), Some(6.0));
        assert_eq!(engine.value("b"), Some(2.0));
        assert_eq!(engine.depth("a"), Some(1));
        assert_eq!(engine.depth("a1"), Some(2));
    }

    #[test]
    fn test_missing_root_no_partial_mutation() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        let before: Vec<f64> = engine.starts().to_vec();
        let laid_before = engine.is_laid_out("a");

        engine.set_root("nonexistent");
        let err = engine.compute_layout(400.0, 400.0).unwrap_err();
        assert_eq!(
            err,
            crate::layout::sunburst::LayoutError::MissingNode("nonexistent".to_string())
        );

        // The previous frame is untouched.
        assert_eq!(engine.starts(), &before[..]);
        assert_eq!(engine.is_laid_out("a"), laid_before);

        // Recovery: fall back to the super-root.
        engine.set_root("");
        assert!(engine.compute_layout(400.0, 400.0).is_ok());
    }

    #[test]
    fn test_idempotent_passes_bit_identical() {
        let mut engine = sample_engine();
        engine.compute_layout(640.0, 480.0).unwrap();
        let starts = engine.starts().to_vec();
        let ends = engine.ends().to_vec();
        let plot_x = engine.plot_x().to_vec();

        engine.compute_layout(640.0, 480.0).unwrap();
        assert_eq!(engine.starts(), &starts[..]);
        assert_eq!(engine.ends(), &ends[..]);
        assert_eq!(engine.plot_x(), &plot_x[..]);
    }

    #[test]
    fn test_visibility_toggle_restores_partition() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        let original_end_a = engine.ends()[0];

        engine.set_visible("b", false);
        engine.compute_layout(400.0, 400.0).unwrap();
        assert!(!engine.is_laid_out("b"));
        // a absorbs the full circle.
        assert!((engine.ends()[0] - engine.starts()[0] - 2.0 * PI).abs() < 1e-9);

        engine.set_visible("b", true);
        engine.compute_layout(400.0, 400.0).unwrap();
        assert_eq!(engine.ends()[0], original_end_a);
        assert!(engine.is_laid_out("b"));
    }

    #[test]
    fn test_drill_down_and_up() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();

        // Drill into a non-root point.
        assert_eq!(engine.drill_target("a"), Some("a".to_string()));
        assert_eq!(engine.drill_to("a"), Some("a".to_string()));
        assert_eq!(engine.root_id(), "a");
        engine.compute_layout(400.0, 400.0).unwrap();
        assert!(engine.is_laid_out("a"));
        assert!(!engine.is_laid_out("b"));

        // Activating the root drills up to its parent.
        assert_eq!(engine.drill_target("a"), Some(String::new()));
        assert_eq!(engine.drill_to("a"), Some(String::new()));
        assert_eq!(engine.root_id(), "");

        // Nowhere up from the super-root.
        engine.compute_layout(400.0, 400.0).unwrap();
        assert_eq!(engine.drill_target(""), None);
    }

    #[test]
    fn test_stale_shape_survives_drill() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        let b_shape = engine.shape("b").unwrap();

        engine.drill_to("a");
        engine.compute_layout(400.0, 400.0).unwrap();

        // b was not reached, but its last descriptor is still readable.
        assert!(!engine.is_laid_out("b"));
        assert_eq!(engine.shape("b"), Some(b_shape));
        let view = engine.point_view("b").unwrap();
        assert!(!view.should_draw());
        assert!(view.shape_args().is_some());
    }

    #[test]
    fn test_tween_after_drill_enters_from_center() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        engine.mark_rendered();

        engine.drill_to("a");
        engine.compute_layout(400.0, 400.0).unwrap();

        // The new root expands from the full chart span at the center hole.
        let tween = engine.arc_tween("a", false).unwrap();
        let from = tween.from.unwrap();
        let geometry = engine.geometry().unwrap();
        assert_eq!(from.start, geometry.start_rad);
        assert_eq!(from.end, geometry.end_rad);
        assert_eq!(from.inner_r, geometry.inner_r);
        assert_eq!(from.r, geometry.inner_r);

        // A child without a graphic also grows out of the center.
        let child = engine.arc_tween("a1", false).unwrap();
        assert_eq!(child.from.unwrap().r, geometry.inner_r);

        // A child that kept its graphic just retargets.
        let kept = engine.arc_tween("a2", true).unwrap();
        assert!(kept.from.is_none());
    }

    #[test]
    fn test_first_render_tween_sweeps_in() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        let tween = engine.arc_tween("b", false).unwrap();
        let from = tween.from.unwrap();
        let geometry = engine.geometry().unwrap();
        assert_eq!(from.start, geometry.start_rad);
        assert_eq!(from.end, geometry.start_rad);
    }

    #[test]
    fn test_hit_test_and_anchors() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();

        // Probe the centroid of each laid-out arc.
        for id in ["a", "b", "a1", "a2"] {
            let shape = engine.shape(id).unwrap();
            let (px, py) = shape.centroid();
            assert_eq!(engine.hit_test(px, py).as_deref(), Some(id));
            assert_eq!(engine.nearest_anchor(px, py, 1.0).as_deref(), Some(id));
        }

        // Far outside the outer radius.
        assert!(engine.hit_test(5000.0, 5000.0).is_none());
    }

    #[test]
    fn test_remove_point_reattaches_children() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();

        assert!(engine.remove_point("a"));
        assert!(!engine.remove_point("a"));
        assert_eq!(engine.point_count(), 3);

        engine.compute_layout(400.0, 400.0).unwrap();
        // a1 and a2 now sit on the first ring.
        assert_eq!(engine.depth("a1"), Some(1));
        assert_eq!(engine.depth("a2"), Some(1));
    }

    #[test]
    fn test_children_of_order() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        assert_eq!(engine.children_of("a"), vec!["a1", "a2"]);
        assert_eq!(engine.children_of(""), vec!["a", "b"]);
        assert!(engine.children_of("a1").is_empty());
    }

    #[test]
    fn test_options_root_and_levels() {
        let mut engine = sample_engine();
        engine.set_options(ChartOptions {
            root_id: Some("a".to_string()),
            levels: vec![LevelOptions {
                level: 1,
                label_rotation: Some(0.0),
                ..Default::default()
            }],
            ..Default::default()
        });
        engine.compute_layout(400.0, 400.0).unwrap();
        assert_eq!(engine.root_id(), "a");

        // Level override pins the label rotation.
        let label = engine.data_label("a").unwrap();
        assert_eq!(label.rotation, 0.0);
        // Unconfigured levels keep the computed rotation.
        assert!(engine.level_options(2).is_none());
    }

    #[test]
    fn test_clear_resets_slots() {
        let mut engine = sample_engine();
        engine.compute_layout(400.0, 400.0).unwrap();
        engine.clear();
        assert_eq!(engine.point_count(), 0);
        assert_eq!(engine.slot_bound(), 0);

        // Reload gets fresh slot ids starting at zero.
        let slot = engine.add_point("x", "", Some(1.0));
        assert_eq!(slot, NodeId(0));
        engine.compute_layout(400.0, 400.0).unwrap();
        assert!(engine.is_laid_out("x"));
    }
}
