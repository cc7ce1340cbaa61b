//! Volume hierarchy construction.

use log::debug;
use serde::Serialize;

use crate::{Axis, BBox};

use super::node::{VolumeLeaf, VolumeNode};

/// A bounding-volume hierarchy over whole polygons and entities.
///
/// Construction groups the input leaf records into a binary tree of
/// bounding boxes, choosing at each node the split that minimizes the
/// overlap between the two resulting groups. No new geometry is created.
///
/// Serializes as the root node, or `null` when built from no records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VolumeTree {
    root: Option<VolumeNode>,
}

impl VolumeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Builds a volume hierarchy from a flat list of leaf records.
    ///
    /// Returns an empty tree for empty input; never fails otherwise.
    pub fn build(leaves: Vec<VolumeLeaf>) -> Self {
        if leaves.is_empty() {
            return Self { root: None };
        }
        let count = leaves.len();

        // Two views of the working set, sorted by bbox center on each axis.
        // Splits cut one sorted list in two; the other list is filtered to
        // match, so both stay consistently ordered all the way down.
        let centers: Vec<[f64; 2]> = leaves
            .iter()
            .map(|leaf| [leaf.bbox.center(Axis::X), leaf.bbox.center(Axis::Y)])
            .collect();
        let mut by_x: Vec<usize> = (0..count).collect();
        let mut by_y: Vec<usize> = (0..count).collect();
        by_x.sort_by(|&a, &b| centers[a][0].total_cmp(&centers[b][0]));
        by_y.sort_by(|&a, &b| centers[a][1].total_cmp(&centers[b][1]));

        let mut arena: Vec<Option<VolumeLeaf>> = leaves.into_iter().map(Some).collect();
        let root = build_node(&mut arena, by_x, by_y);
        debug!(
            "volume tree built: {} leaves, depth {}",
            count,
            root.depth()
        );
        Self { root: Some(root) }
    }

    /// Returns `true` if the tree holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a reference to the root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&VolumeNode> {
        self.root.as_ref()
    }

    /// Returns the maximum depth of the tree (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |node| node.depth())
    }

    /// Returns the number of leaf records in the tree.
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, |node| node.leaf_count())
    }
}

/// Recursively builds a node from two consistently ordered id lists.
fn build_node(arena: &mut [Option<VolumeLeaf>], by_x: Vec<usize>, by_y: Vec<usize>) -> VolumeNode {
    debug_assert_eq!(by_x.len(), by_y.len());
    if by_x.len() == 1 {
        let leaf = arena[by_x[0]].take().expect("volume leaf grouped twice");
        return VolumeNode::Leaf(leaf);
    }

    // Try the median split (and, for odd counts, the one next to it) on
    // each axis; keep the candidate whose two group bboxes overlap least.
    // Strict comparison: the first candidate evaluated wins ties.
    let n = by_x.len();
    let mut splits = vec![n / 2];
    if n.div_ceil(2) != n / 2 {
        splits.push(n.div_ceil(2));
    }
    let mut best: Option<(f64, Axis, usize)> = None;
    for axis in Axis::BOTH {
        let list = match axis {
            Axis::X => &by_x,
            Axis::Y => &by_y,
        };
        for &split in &splits {
            let bbox1 = union_of(arena, &list[..split]);
            let bbox2 = union_of(arena, &list[split..]);
            let overlap = bbox1.intersection_area(&bbox2);
            if best.is_none_or(|(least, _, _)| overlap < least) {
                best = Some((overlap, axis, split));
            }
        }
    }
    let (_, axis, split) = best.expect("at least one split candidate");

    // Membership in the first group comes from the chosen axis' order;
    // the other list is filtered to match, preserving its own order.
    let chosen = match axis {
        Axis::X => &by_x,
        Axis::Y => &by_y,
    };
    let mut in_first = vec![false; arena.len()];
    for &id in &chosen[..split] {
        in_first[id] = true;
    }
    let (x1, x2): (Vec<usize>, Vec<usize>) = by_x.iter().copied().partition(|&id| in_first[id]);
    let (y1, y2): (Vec<usize>, Vec<usize>) = by_y.iter().copied().partition(|&id| in_first[id]);

    let child1 = Box::new(build_node(arena, x1, y1));
    let child2 = Box::new(build_node(arena, x2, y2));
    let bbox = child1.bbox().union(&child2.bbox());
    VolumeNode::Branch {
        bbox,
        child1,
        child2,
    }
}

/// Union bbox of a non-empty group of leaf ids.
fn union_of(arena: &[Option<VolumeLeaf>], ids: &[usize]) -> BBox {
    let mut iter = ids
        .iter()
        .map(|&id| arena[id].as_ref().expect("volume leaf grouped twice").bbox);
    let first = iter.next().expect("split groups are never empty");
    iter.fold(first, |acc, bbox| acc.union(&bbox))
}
