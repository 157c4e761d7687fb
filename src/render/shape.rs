//! Arc shape descriptors consumed by the downstream renderer.
//!
//! The layout emits one `ArcShape` per reached node: an annular sector
//! described by its center point, inner/outer radius and angular span, plus
//! the constant band thickness of the pass. The centroid (mid-angle,
//! mid-radius of the node's own band) anchors data labels and tooltips.

use serde::{Deserialize, Serialize};

/// Degrees per radian, for data-label rotation.
const RAD2DEG: f64 = 180.0 / std::f64::consts::PI;

/// Find a point given a start coordinate, an angle, and a distance.
#[inline]
pub fn end_point(x: f64, y: f64, angle: f64, distance: f64) -> (f64, f64) {
    (x + angle.cos() * distance, y + angle.sin() * distance)
}

/// An annular sector assigned to one node.
///
/// Angles are radians in the standard trig convention (0 along +x,
/// increasing counter-clockwise in math coordinates; screen-space y-down
/// flips the visual direction, which is the renderer's concern).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcShape {
    /// Chart center x.
    pub x: f64,
    /// Chart center y.
    pub y: f64,
    /// Inner radius of this node's band.
    pub inner_r: f64,
    /// Outer radius of this node's band.
    pub r: f64,
    /// Band thickness of the pass (constant across depths).
    pub thickness: f64,
    /// Start angle in radians.
    pub start: f64,
    /// End angle in radians.
    pub end: f64,
}

impl ArcShape {
    /// Angle at the middle of the span.
    #[inline]
    pub fn mid_angle(&self) -> f64 {
        self.start + (self.end - self.start) / 2.0
    }

    /// Radius at the middle of the band.
    #[inline]
    pub fn mid_radius(&self) -> f64 {
        self.inner_r + (self.r - self.inner_r) / 2.0
    }

    /// Label-anchor point at mid-angle, mid-radius of the band.
    pub fn centroid(&self) -> (f64, f64) {
        end_point(self.x, self.y, self.mid_angle(), self.mid_radius())
    }

    /// Data-label rotation in degrees, folded modulo 180 so labels never
    /// render upside-down.
    pub fn label_rotation_deg(&self) -> f64 {
        (self.mid_angle() * RAD2DEG) % 180.0
    }

    /// Test whether a point lies inside the annular sector.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        let dist = dx.hypot(dy);
        if dist < self.inner_r || dist > self.r {
            return false;
        }
        // Normalize the point's angle into [start, start + 2π).
        let mut angle = dy.atan2(dx);
        while angle < self.start {
            angle += std::f64::consts::TAU;
        }
        angle <= self.end
    }
}

/// Placement of a node's data label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLabelPos {
    /// Anchor x (band centroid).
    pub x: f64,
    /// Anchor y (band centroid).
    pub y: f64,
    /// Rotation in degrees, folded modulo 180.
    pub rotation: f64,
    /// Available width for the label (band thickness).
    pub width: f64,
}

impl DataLabelPos {
    /// Compute the label placement for a shape.
    pub fn for_shape(shape: &ArcShape) -> Self {
        let (x, y) = shape.centroid();
        Self {
            x,
            y,
            rotation: shape.label_rotation_deg(),
            width: shape.thickness,
        }
    }
}
