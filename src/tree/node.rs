//! Node identity and per-node state flags.
//!
//! Every data point gets a stable slot identifier when it is added to the
//! engine. The identifier survives removals of other points, so slot-indexed
//! output buffers stay valid across mutations.

use std::fmt;

/// Stable node identifier.
///
/// This ID remains valid even after other points are removed from the tree.
/// It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Node state flags packed into a single byte.
///
/// `VISIBLE` is caller-controlled and participates in the angular partition.
/// `LAID_OUT` marks nodes reached by the most recent layout pass; `HAS_SHAPE`
/// is sticky and records that a shape was written at some point, so stale
/// descriptors from an earlier pass can still be read back.
#[derive(Debug, Clone, Copy)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const VISIBLE: u8 = 0b0000_0001;
    const LAID_OUT: u8 = 0b0000_0010;
    const HAS_SHAPE: u8 = 0b0000_0100;

    /// Create a new default node state (visible, not yet laid out).
    #[inline]
    pub fn new() -> Self {
        Self {
            flags: Self::VISIBLE,
        }
    }

    /// Check if the node participates in layout and rendering.
    #[inline]
    pub fn is_visible(self) -> bool {
        self.flags & Self::VISIBLE != 0
    }

    /// Set the visible state.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.flags |= Self::VISIBLE;
        } else {
            self.flags &= !Self::VISIBLE;
        }
    }

    /// Check if the node was reached by the most recent layout pass.
    #[inline]
    pub fn is_laid_out(self) -> bool {
        self.flags & Self::LAID_OUT != 0
    }

    /// Set the laid-out state.
    #[inline]
    pub fn set_laid_out(&mut self, laid_out: bool) {
        if laid_out {
            self.flags |= Self::LAID_OUT;
        } else {
            self.flags &= !Self::LAID_OUT;
        }
    }

    /// Check if a shape descriptor has ever been written for the node.
    #[inline]
    pub fn has_shape(self) -> bool {
        self.flags & Self::HAS_SHAPE != 0
    }

    /// Set the has-shape state.
    #[inline]
    pub fn set_has_shape(&mut self, has_shape: bool) {
        if has_shape {
            self.flags |= Self::HAS_SHAPE;
        } else {
            self.flags &= !Self::HAS_SHAPE;
        }
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.0, 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_id_conversion() {
        let id: NodeId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_node_state_default() {
        let state = NodeState::new();
        assert!(state.is_visible());
        assert!(!state.is_laid_out());
        assert!(!state.has_shape());
    }

    #[test]
    fn test_node_state_visibility() {
        let mut state = NodeState::new();
        state.set_visible(false);
        assert!(!state.is_visible());
        assert!(!state.is_laid_out());

        state.set_visible(true);
        assert!(state.is_visible());
    }

    #[test]
    fn test_laid_out_independent_of_has_shape() {
        let mut state = NodeState::new();
        state.set_laid_out(true);
        state.set_has_shape(true);
        assert!(state.is_laid_out());
        assert!(state.has_shape());

        // A later pass that does not reach the node clears LAID_OUT but keeps
        // the sticky HAS_SHAPE bit.
        state.set_laid_out(false);
        assert!(!state.is_laid_out());
        assert!(state.has_shape());
    }
}
