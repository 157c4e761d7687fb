//! R-tree index over arc centroids using the rstar crate.
//!
//! Rebuilt after every successful layout pass from the centroids of the
//! laid-out nodes. Backs tooltip anchoring (nearest label anchor to the
//! cursor) and label collision candidate queries; exact arc containment is a
//! polar test on the shape itself and lives with the engine.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::tree::NodeId;

/// A label anchor in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    /// The node whose band the anchor belongs to.
    pub id: NodeId,
    /// Anchor x (band centroid).
    pub x: f64,
    /// Anchor y (band centroid).
    pub y: f64,
}

impl AnchorPoint {
    /// Create a new AnchorPoint.
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for AnchorPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for AnchorPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        (self.x - point[0]).abs() < f64::EPSILON && (self.y - point[1]).abs() < f64::EPSILON
    }
}

/// Spatial index over the current frame's label anchors.
pub struct AnchorIndex {
    tree: RTree<AnchorPoint>,
}

impl AnchorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert an anchor into the index.
    pub fn insert(&mut self, id: NodeId, x: f64, y: f64) {
        self.tree.insert(AnchorPoint::new(id, x, y));
    }

    /// Find the nearest anchor to a point.
    pub fn nearest(&self, x: f64, y: f64) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[x, y]).map(|point| point.id)
    }

    /// Find the nearest anchor within a maximum distance.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<NodeId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.id)
    }

    /// Find all anchors within a rectangle (label culling regions).
    pub fn in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<NodeId> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|point| point.id)
            .collect()
    }

    /// Find all anchors within a radius of a point (collision candidates).
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<NodeId> {
        let radius_sq = radius * radius;
        self.tree
            .locate_within_distance([x, y], radius_sq)
            .map(|point| point.id)
            .collect()
    }

    /// Rebuild the index from a list of (id, x, y) tuples.
    ///
    /// Bulk loading is cheaper than incremental inserts for a whole frame.
    pub fn rebuild(&mut self, points: &[(NodeId, f64, f64)]) {
        let anchors: Vec<_> = points
            .iter()
            .map(|&(id, x, y)| AnchorPoint::new(id, x, y))
            .collect();

        self.tree = RTree::bulk_load(anchors);
    }

    /// Clear all anchors from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Number of anchors in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for AnchorIndex {
    fn default() -> Self {
        Self::new()
    }
}
