//! Valued hierarchy built from parent-linked point rows.
//!
//! One `ValuedTree` is built per layout pass from the engine's current rows
//! and discarded wholesale on the next structural change. The build resolves
//! parent links (unknown or empty parents attach to the synthetic super-root),
//! breaks parent-link cycles, and aggregates per-node totals bottom-up:
//!
//! - `children_total`: sum of the resolved values of the direct children
//!   (which transitively covers all descendants); 0 for leaves.
//! - `resolved`: the effective plotted weight. An explicit point value never
//!   shrinks a node below its children's sum: `own.max(children_total)` when
//!   an own value is present, otherwise `children_total`.
//! - `height`: maximum depth of descendants below the node; 0 for leaves.
//!
//! Aggregation ignores visibility on purpose. Invisible siblings are excluded
//! from the angular partition at layout time, not from the totals here.

use std::collections::HashMap;

use super::node::NodeId;

/// One resolved parent link, in point insertion order.
#[derive(Debug, Clone)]
pub struct PointLink {
    /// Engine slot of the point.
    pub node: NodeId,
    /// Caller-facing string id of the point.
    pub id: String,
    /// Resolved parent slot (None attaches the point to the super-root).
    pub parent: Option<NodeId>,
    /// Explicit point value, absent for pure container nodes.
    pub value: Option<f64>,
}

/// One node of the built hierarchy.
#[derive(Debug)]
pub struct ValuedNode {
    /// Engine slot; None for the synthetic super-root.
    pub slot: Option<NodeId>,
    /// Caller-facing id ("" for the super-root).
    pub id: String,
    /// Arena index of the parent (None for the super-root).
    pub parent: Option<usize>,
    /// Arena indices of the children, in point insertion order.
    pub children: Vec<usize>,
    /// Explicit point value, if any.
    pub own_value: Option<f64>,
    /// Sum of the resolved values of the direct children.
    pub children_total: f64,
    /// Effective plotted weight (see module docs).
    pub resolved: f64,
    /// Max depth of descendants below this node (leaves: 0).
    pub height: u32,
}

/// The valued hierarchy for one layout pass.
///
/// Arena index 0 is always the synthetic super-root with the empty id.
#[derive(Debug)]
pub struct ValuedTree {
    nodes: Vec<ValuedNode>,
    id_to_arena: HashMap<String, usize>,
}

/// Arena index of the synthetic super-root.
pub const SUPER_ROOT: usize = 0;

impl ValuedTree {
    /// Build the hierarchy from resolved links, in insertion order.
    ///
    /// Rows that name a parent caught in a parent-link cycle are reattached
    /// to the super-root so the result is always a tree.
    pub fn build(links: &[PointLink]) -> Self {
        let mut nodes: Vec<ValuedNode> = Vec::with_capacity(links.len() + 1);
        let mut id_to_arena: HashMap<String, usize> = HashMap::with_capacity(links.len() + 1);

        nodes.push(ValuedNode {
            slot: None,
            id: String::new(),
            parent: None,
            children: Vec::new(),
            own_value: None,
            children_total: 0.0,
            resolved: 0.0,
            height: 0,
        });
        id_to_arena.insert(String::new(), SUPER_ROOT);

        let mut slot_to_arena: HashMap<u32, usize> = HashMap::with_capacity(links.len());
        for link in links {
            let arena = nodes.len();
            nodes.push(ValuedNode {
                slot: Some(link.node),
                id: link.id.clone(),
                parent: None,
                children: Vec::new(),
                own_value: link.value,
                children_total: 0.0,
                resolved: 0.0,
                height: 0,
            });
            slot_to_arena.insert(link.node.raw(), arena);
            id_to_arena.insert(link.id.clone(), arena);
        }

        // Link children in insertion order. A parent slot that no longer
        // resolves attaches the child to the super-root.
        for (i, link) in links.iter().enumerate() {
            let arena = i + 1;
            let parent_arena = link
                .parent
                .and_then(|p| slot_to_arena.get(&p.raw()).copied())
                .filter(|&p| p != arena)
                .unwrap_or(SUPER_ROOT);
            nodes[arena].parent = Some(parent_arena);
            nodes[parent_arena].children.push(arena);
        }

        let mut tree = Self { nodes, id_to_arena };
        tree.break_cycles();
        tree.aggregate(SUPER_ROOT);
        tree
    }

    /// Reattach any node unreachable from the super-root.
    ///
    /// Parent links form a cycle when rows reference each other; the lowest
    /// arena index of each cycle is moved under the super-root, which makes
    /// the rest of the cycle reachable again.
    fn break_cycles(&mut self) {
        let mut reached = vec![false; self.nodes.len()];
        self.mark_reached(SUPER_ROOT, &mut reached);

        for idx in 1..self.nodes.len() {
            if reached[idx] {
                continue;
            }
            if let Some(old_parent) = self.nodes[idx].parent {
                let pos = self.nodes[old_parent]
                    .children
                    .iter()
                    .position(|&c| c == idx);
                if let Some(pos) = pos {
                    self.nodes[old_parent].children.remove(pos);
                }
            }
            self.nodes[idx].parent = Some(SUPER_ROOT);
            self.nodes[SUPER_ROOT].children.push(idx);
            self.mark_reached(idx, &mut reached);
        }
    }

    fn mark_reached(&self, idx: usize, reached: &mut [bool]) {
        if reached[idx] {
            return;
        }
        reached[idx] = true;
        let children = self.nodes[idx].children.clone();
        for child in children {
            self.mark_reached(child, reached);
        }
    }

    /// Bottom-up aggregation of totals, resolved values, and heights.
    fn aggregate(&mut self, idx: usize) {
        let children = self.nodes[idx].children.clone();
        let mut total = 0.0;
        let mut height = 0u32;
        for &child in &children {
            self.aggregate(child);
            total += self.nodes[child].resolved;
            height = height.max(self.nodes[child].height + 1);
        }
        let node = &mut self.nodes[idx];
        node.children_total = total;
        node.resolved = match node.own_value {
            Some(own) => own.max(total),
            None => total,
        };
        node.height = height;
    }

    /// Look up a node's arena index by its caller-facing id.
    ///
    /// The empty id resolves to the synthetic super-root.
    pub fn arena_of(&self, id: &str) -> Option<usize> {
        self.id_to_arena.get(id).copied()
    }

    /// Access a node by arena index.
    #[inline]
    pub fn node(&self, idx: usize) -> &ValuedNode {
        &self.nodes[idx]
    }

    /// Number of nodes including the super-root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the super-root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(slot: u32, id: &str, parent: Option<u32>, value: Option<f64>) -> PointLink {
        PointLink {
            node: NodeId(slot),
            id: id.to_string(),
            parent: parent.map(NodeId),
            value,
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree = ValuedTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.arena_of(""), Some(SUPER_ROOT));
        assert_eq!(tree.node(SUPER_ROOT).resolved, 0.0);
    }

    #[test]
    fn test_orphans_attach_to_super_root() {
        let links = [
            link(0, "a", None, Some(1.0)),
            link(1, "b", Some(99), Some(2.0)),
        ];
        let tree = ValuedTree::build(&links);
        let root = tree.node(SUPER_ROOT);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.resolved, 3.0);
    }

    #[test]
    fn test_children_in_insertion_order() {
        let links = [
            link(0, "p", None, None),
            link(1, "c", Some(0), Some(1.0)),
            link(2, "a", Some(0), Some(1.0)),
            link(3, "b", Some(0), Some(1.0)),
        ];
        let tree = ValuedTree::build(&links);
        let p = tree.arena_of("p").unwrap();
        let ids: Vec<&str> = tree.node(p)
            .children
            .iter()
            .map(|&c| tree.node(c).id.as_str())
            .collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_value_override_rule() {
        // Explicit value below the children sum is lifted to the sum;
        // above it, the explicit value wins.
        let links = [
            link(0, "small", None, Some(5.0)),
            link(1, "s1", Some(0), Some(7.0)),
            link(2, "s2", Some(0), Some(5.0)),
            link(3, "big", None, Some(20.0)),
            link(4, "b1", Some(3), Some(12.0)),
        ];
        let tree = ValuedTree::build(&links);
        let small = tree.node(tree.arena_of("small").unwrap());
        assert_eq!(small.children_total, 12.0);
        assert_eq!(small.resolved, 12.0);

        let big = tree.node(tree.arena_of("big").unwrap());
        assert_eq!(big.children_total, 12.0);
        assert_eq!(big.resolved, 20.0);
    }

    #[test]
    fn test_container_without_value() {
        let links = [
            link(0, "dir", None, None),
            link(1, "f1", Some(0), Some(3.0)),
            link(2, "f2", Some(0), Some(4.0)),
        ];
        let tree = ValuedTree::build(&links);
        let dir = tree.node(tree.arena_of("dir").unwrap());
        assert_eq!(dir.resolved, 7.0);
        assert_eq!(dir.children_total, 7.0);
    }

    #[test]
    fn test_heights() {
        // root -> a -> b -> c
        let links = [
            link(0, "a", None, None),
            link(1, "b", Some(0), None),
            link(2, "c", Some(1), Some(1.0)),
        ];
        let tree = ValuedTree::build(&links);
        assert_eq!(tree.node(SUPER_ROOT).height, 3);
        assert_eq!(tree.node(tree.arena_of("a").unwrap()).height, 2);
        assert_eq!(tree.node(tree.arena_of("b").unwrap()).height, 1);
        assert_eq!(tree.node(tree.arena_of("c").unwrap()).height, 0);
    }

    #[test]
    fn test_cycle_reattached_to_super_root() {
        // a -> b -> a plus a normal child under the super-root.
        let links = [
            link(0, "a", Some(1), Some(1.0)),
            link(1, "b", Some(0), Some(2.0)),
            link(2, "c", None, Some(4.0)),
        ];
        let tree = ValuedTree::build(&links);
        let a = tree.node(tree.arena_of("a").unwrap());
        // The lowest arena index of the cycle lands under the super-root.
        assert_eq!(a.parent, Some(SUPER_ROOT));
        let b = tree.node(tree.arena_of("b").unwrap());
        assert!(b.parent == Some(tree.arena_of("a").unwrap()));
        // "a" is lifted to its child's total; all weight still aggregates
        // into the super-root.
        assert_eq!(a.resolved, 2.0);
        assert_eq!(tree.node(SUPER_ROOT).resolved, 6.0);
    }

    #[test]
    fn test_leaf_children_total_zero() {
        let links = [link(0, "leaf", None, Some(9.0))];
        let tree = ValuedTree::build(&links);
        let leaf = tree.node(tree.arena_of("leaf").unwrap());
        assert_eq!(leaf.children_total, 0.0);
        assert_eq!(leaf.resolved, 9.0);
        assert_eq!(leaf.height, 0);
    }
}
