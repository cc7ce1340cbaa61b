//! Partition tree node implementation.

use serde::Serialize;

use crate::{Axis, Triangle};

/// A node in the partition tree.
///
/// A branch records an axis-aligned cut; everything at or below the cut
/// value lives under `child1`, everything at or above it under `child2`.
/// A leaf holds the triangles that ended up in its region. Triangles that
/// straddled a cut were clipped during construction, so each leaf's
/// triangles lie entirely within the leaf's region.
///
/// The serialized form is the external interface consumed by the runtime:
/// `{"kind": "branch", "axis", "value", "child1", "child2"}` for branches
/// and `{"kind": "leaf", "triangles": [[i, j, k], ...]}` for leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PartitionNode {
    Branch {
        axis: Axis,
        value: f64,
        child1: Box<PartitionNode>,
        child2: Box<PartitionNode>,
    },
    Leaf {
        triangles: Vec<Triangle>,
    },
}

impl PartitionNode {
    /// Creates a leaf holding no triangles.
    pub fn empty_leaf() -> Self {
        PartitionNode::Leaf {
            triangles: Vec::new(),
        }
    }

    /// Returns `true` if this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, PartitionNode::Leaf { .. })
    }

    /// Returns the depth of this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        match self {
            PartitionNode::Branch { child1, child2, .. } => 1 + child1.depth().max(child2.depth()),
            PartitionNode::Leaf { .. } => 1,
        }
    }

    /// Returns the total number of triangles in this subtree.
    pub fn triangle_count(&self) -> usize {
        match self {
            PartitionNode::Branch { child1, child2, .. } => {
                child1.triangle_count() + child2.triangle_count()
            }
            PartitionNode::Leaf { triangles } => triangles.len(),
        }
    }

    /// Visits every leaf's triangle list in tree order (`child1` before
    /// `child2`).
    pub fn for_each_leaf<F: FnMut(&[Triangle])>(&self, f: &mut F) {
        match self {
            PartitionNode::Branch { child1, child2, .. } => {
                child1.for_each_leaf(f);
                child2.for_each_leaf(f);
            }
            PartitionNode::Leaf { triangles } => f(triangles),
        }
    }

    /// Visits every leaf's triangle list mutably in tree order.
    ///
    /// Used by the compaction pass to rewrite triangle indices in place.
    pub fn for_each_leaf_mut<F: FnMut(&mut Vec<Triangle>)>(&mut self, f: &mut F) {
        match self {
            PartitionNode::Branch { child1, child2, .. } => {
                child1.for_each_leaf_mut(f);
                child2.for_each_leaf_mut(f);
            }
            PartitionNode::Leaf { triangles } => f(triangles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_branch(axis: Axis, value: f64, c1: PartitionNode, c2: PartitionNode) -> PartitionNode {
        PartitionNode::Branch {
            axis,
            value,
            child1: Box::new(c1),
            child2: Box::new(c2),
        }
    }

    fn make_leaf(triangles: Vec<Triangle>) -> PartitionNode {
        PartitionNode::Leaf { triangles }
    }

    #[test]
    fn empty_leaf_properties() {
        let node = PartitionNode::empty_leaf();
        assert!(node.is_leaf());
        assert_eq!(node.depth(), 1);
        assert_eq!(node.triangle_count(), 0);
    }

    #[test]
    fn depth_and_count_recursive() {
        let tree = make_branch(
            Axis::X,
            0.5,
            make_leaf(vec![[0, 1, 2]]),
            make_branch(
                Axis::Y,
                0.25,
                make_leaf(vec![[3, 4, 5], [0, 4, 5]]),
                make_leaf(vec![]),
            ),
        );
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.triangle_count(), 3);
    }

    #[test]
    fn leaf_visit_order_is_child1_first() {
        let tree = make_branch(
            Axis::X,
            0.0,
            make_leaf(vec![[0, 0, 0]]),
            make_branch(Axis::Y, 0.0, make_leaf(vec![[1, 1, 1]]), make_leaf(vec![[2, 2, 2]])),
        );
        let mut seen = Vec::new();
        tree.for_each_leaf(&mut |triangles| seen.push(triangles[0][0]));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn serialized_shape() {
        let tree = make_branch(Axis::X, 0.5, make_leaf(vec![[0, 1, 2]]), make_leaf(vec![]));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["kind"], "branch");
        assert_eq!(json["axis"], "x");
        assert_eq!(json["value"], 0.5);
        assert_eq!(json["child1"]["kind"], "leaf");
        assert_eq!(json["child1"]["triangles"], serde_json::json!([[0, 1, 2]]));
        assert_eq!(json["child2"]["triangles"], serde_json::json!([]));
    }
}
