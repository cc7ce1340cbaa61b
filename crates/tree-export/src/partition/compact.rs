//! Post-build vertex compaction.
//!
//! Walks the finished tree leaf to leaf and assigns every vertex a dense
//! index in first-encounter order, then reorders the vertex, color, and
//! texcoord arrays to match. Vertices referenced by spatially nearby leaves
//! end up stored near each other, and vertices no triangle references are
//! dropped.

use std::collections::HashMap;

use log::debug;

use super::builder::PartitionTree;
use crate::VertexArrays;

/// Renumbers the tree's triangle indices densely in leaf order and rewrites
/// the arrays to match.
///
/// Running this twice in a row is a no-op: after one pass the first-encounter
/// order is already the array order.
pub fn compact(tree: &mut PartitionTree) {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut order: Vec<usize> = Vec::new();

    tree.root.for_each_leaf_mut(&mut |triangles| {
        for triangle in triangles {
            for index in triangle.iter_mut() {
                let old = *index;
                let next = remap.len();
                *index = *remap.entry(old).or_insert_with(|| {
                    order.push(old);
                    next
                });
            }
        }
    });

    let dropped = tree.arrays.len() - order.len();
    let old = std::mem::take(&mut tree.arrays);
    tree.arrays = VertexArrays {
        vertices: order.iter().map(|&i| old.vertices[i]).collect(),
        colors: order.iter().map(|&i| old.colors[i]).collect(),
        texcoords: order.iter().map(|&i| old.texcoords[i]).collect(),
    };
    if dropped > 0 {
        debug!("compaction dropped {dropped} unreferenced vertices");
    }
}
