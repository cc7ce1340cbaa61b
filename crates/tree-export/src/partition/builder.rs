//! Partition tree construction.

use log::debug;
use serde::Serialize;

use crate::{Axis, BuildError, Triangle, VertexArrays};

use super::compact;
use super::node::PartitionNode;

/// Maximum partition tree depth.
pub const MAX_TREE_DEPTH: u32 = 8;

/// Minimum number of triangles on each side of an accepted cut.
const MIN_TRIANGLE_COUNT: usize = 2;
/// Maximum share of triangles a cut may add through clipping (percent).
const MAX_EXTRA_TRIANGLES: f64 = 50.0;
/// Minimum size of a child node relative to its parent (percent).
const MIN_CHILD_NODE_SIZE: f64 = 25.0;
/// Minimum size of a child node relative to the root node (percent).
const MIN_LEAF_NODE_SIZE: f64 = 1.0;
/// Minimum distance between successive candidate cut values, relative to the
/// node's extent (percent).
const MIN_ALGORITHM_STEP: f64 = 0.1;

/// A finished partition build: the tree plus the compacted vertex arrays.
///
/// The serialized form is `{"root": ..., "vertices": [...], "colors": [...],
/// "texcoords": [...]}`, the document shape consumed by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionTree {
    pub root: PartitionNode,
    #[serde(flatten)]
    pub arrays: VertexArrays,
}

impl PartitionTree {
    /// Builds a partition tree from a polygon list and its vertex arrays.
    ///
    /// Each polygon is consumed as successive triples of its index list.
    /// Clipping may append interpolated vertices; the returned arrays are
    /// the compacted result (densely renumbered in leaf order, unreferenced
    /// entries dropped), so they generally differ from the input arrays in
    /// both length and order.
    ///
    /// An empty polygon list produces a single empty leaf and empty arrays.
    pub fn build(polygons: &[Vec<usize>], arrays: VertexArrays) -> Result<Self, BuildError> {
        Self::build_with_depth(polygons, arrays, MAX_TREE_DEPTH)
    }

    /// Like [`PartitionTree::build`], with an explicit depth budget.
    pub fn build_with_depth(
        polygons: &[Vec<usize>],
        arrays: VertexArrays,
        max_depth: u32,
    ) -> Result<Self, BuildError> {
        arrays.check_consistent()?;
        let triangles = triangulate(polygons, &arrays)?;
        let input_count = triangles.len();

        // The root extent is fixed once, before recursion: the minimum leaf
        // size rule compares against the whole model, not the current node.
        let root_extent = match arrays.bounds() {
            Some(bbox) => [bbox.width(), bbox.height()],
            None => [0.0, 0.0],
        };

        let mut context = BuildContext {
            arrays,
            root_extent,
        };
        let root = context.create_node(triangles, max_depth);
        let mut tree = Self {
            root,
            arrays: context.arrays,
        };
        compact::compact(&mut tree);

        debug!(
            "partition tree built: {} triangles in, {} out, depth {}, {} vertices",
            input_count,
            tree.root.triangle_count(),
            tree.root.depth(),
            tree.arrays.len(),
        );
        Ok(tree)
    }

    /// Resolves an index into the pre-build arrays to an index into the
    /// compacted arrays, for vertices referenced by entities.
    ///
    /// Compaction drops vertices not referenced by any triangle, which
    /// includes vertices used only by entities. This finds the vertex by
    /// value in the compacted arrays, or appends it (with its original
    /// color and texture coordinate) if it was dropped.
    pub fn resolve_entity_vertex(
        &mut self,
        original: &VertexArrays,
        index: usize,
    ) -> Result<usize, BuildError> {
        original.check_index(index)?;
        let vertex = original.vertices[index];
        if let Some(position) = self.arrays.vertices.iter().position(|v| *v == vertex) {
            return Ok(position);
        }
        Ok(self
            .arrays
            .push(vertex, original.colors[index], original.texcoords[index]))
    }

    /// Rewrites every entity's indices through [`Self::resolve_entity_vertex`].
    pub fn resolve_entities(
        &mut self,
        original: &VertexArrays,
        entities: &mut [crate::Entity],
    ) -> Result<(), BuildError> {
        for entity in entities {
            for index in &mut entity.indices {
                *index = self.resolve_entity_vertex(original, *index)?;
            }
        }
        Ok(())
    }
}

/// Flattens polygons into a triangle soup, validating indices.
fn triangulate(polygons: &[Vec<usize>], arrays: &VertexArrays) -> Result<Vec<Triangle>, BuildError> {
    let mut triangles = Vec::new();
    for polygon in polygons {
        if polygon.is_empty() {
            continue;
        }
        if polygon.len() % 3 != 0 {
            return Err(BuildError::PolygonNotTriangulated {
                len: polygon.len(),
            });
        }
        for &index in polygon {
            arrays.check_index(index)?;
        }
        for triple in polygon.chunks_exact(3) {
            triangles.push([triple[0], triple[1], triple[2]]);
        }
    }
    Ok(triangles)
}

/// Working state of one build: the growing vertex arrays plus the root
/// extent fixed before recursion.
struct BuildContext {
    arrays: VertexArrays,
    root_extent: [f64; 2],
}

impl BuildContext {
    /// Recursively builds a node from a triangle set and a depth budget.
    fn create_node(&mut self, triangles: Vec<Triangle>, depth: u32) -> PartitionNode {
        if depth <= 1 || triangles.is_empty() {
            return PartitionNode::Leaf { triangles };
        }

        let (score_x, value_x) = self.determine_division_value(Axis::X, &triangles);
        let (score_y, value_y) = self.determine_division_value(Axis::Y, &triangles);
        if score_x.is_none() && score_y.is_none() {
            return PartitionNode::Leaf { triangles };
        }

        let score_x = score_x.unwrap_or(f64::INFINITY);
        let score_y = score_y.unwrap_or(f64::INFINITY);
        let (axis, value) = if score_x < score_y {
            (Axis::X, value_x)
        } else {
            (Axis::Y, value_y)
        };

        let mut side1 = Vec::new();
        let mut side2 = Vec::new();
        for triangle in triangles {
            self.divide_triangle(axis, value, triangle, &mut side1, &mut side2);
        }

        let child1 = Box::new(self.create_node(side1, depth - 1));
        let child2 = Box::new(self.create_node(side2, depth - 1));
        PartitionNode::Branch {
            axis,
            value,
            child1,
            child2,
        }
    }

    /// Returns the triangle's indices sorted by coordinate along `axis`.
    /// The sort is stable so that tied coordinates keep their input order.
    fn sort_by_axis(&self, axis: Axis, triangle: Triangle) -> Triangle {
        let mut sorted = triangle;
        sorted.sort_by(|&a, &b| {
            axis.coord(&self.arrays.vertices[a]).total_cmp(&axis.coord(&self.arrays.vertices[b]))
        });
        sorted
    }

    /// Divides one triangle along the cut, appending the resulting triangles
    /// to `side1` (below the cut) and `side2` (above it).
    ///
    /// The five cases by position of the axis-sorted vertices relative to
    /// the cut value; clipping appends an interpolated vertex wherever an
    /// edge crosses the cut.
    fn divide_triangle(
        &mut self,
        axis: Axis,
        value: f64,
        triangle: Triangle,
        side1: &mut Vec<Triangle>,
        side2: &mut Vec<Triangle>,
    ) {
        let [i1, i2, i3] = self.sort_by_axis(axis, triangle);
        let c1 = axis.coord(&self.arrays.vertices[i1]);
        let c2 = axis.coord(&self.arrays.vertices[i2]);
        let c3 = axis.coord(&self.arrays.vertices[i3]);

        if c1 >= value {
            // Whole triangle at or above the cut.
            side2.push([i1, i2, i3]);
        } else if c3 <= value {
            // Whole triangle at or below the cut.
            side1.push([i1, i2, i3]);
        } else if c2 == value {
            // Middle vertex exactly on the cut: one split of the long edge.
            let i4 = self.arrays.split_edge(axis, value, i1, i3);
            side1.push([i1, i2, i4]);
            side2.push([i2, i3, i4]);
        } else if c2 > value {
            // Middle vertex above the cut: clip both edges leaving i1.
            let i4 = self.arrays.split_edge(axis, value, i1, i2);
            let i5 = self.arrays.split_edge(axis, value, i1, i3);
            side1.push([i1, i4, i5]);
            side2.push([i2, i3, i4]);
            side2.push([i3, i4, i5]);
        } else {
            // Middle vertex below the cut: clip both edges entering i3.
            let i4 = self.arrays.split_edge(axis, value, i1, i3);
            let i5 = self.arrays.split_edge(axis, value, i2, i3);
            side1.push([i1, i2, i4]);
            side1.push([i2, i4, i5]);
            side2.push([i3, i4, i5]);
        }
    }

    /// Estimates the per-side triangle counts for a candidate cut, without
    /// materializing any clipped triangles.
    fn count_division(&self, axis: Axis, value: f64, triangles: &[Triangle]) -> (usize, usize) {
        let mut n1 = 0;
        let mut n2 = 0;
        for &triangle in triangles {
            let [i1, i2, i3] = self.sort_by_axis(axis, triangle);
            let c1 = axis.coord(&self.arrays.vertices[i1]);
            let c2 = axis.coord(&self.arrays.vertices[i2]);
            let c3 = axis.coord(&self.arrays.vertices[i3]);
            if c1 >= value {
                n2 += 1;
            } else if c3 <= value {
                n1 += 1;
            } else if c2 == value {
                n1 += 1;
                n2 += 1;
            } else if c2 > value {
                n1 += 1;
                n2 += 2;
            } else {
                n1 += 2;
                n2 += 1;
            }
        }
        (n1, n2)
    }

    /// Scores a candidate cut, or rejects it with `None`.
    ///
    /// Lower is better. The score penalizes triangles added by clipping and
    /// imbalance between the two sides, and divides by the node's extent so
    /// that cutting the longer side of a stretched node wins (squarer
    /// children score better).
    fn division_score(
        &self,
        axis: Axis,
        value: f64,
        min_value: f64,
        max_value: f64,
        count_total: usize,
        count1: usize,
        count2: usize,
    ) -> Option<f64> {
        let size_total = max_value - min_value;
        // Zero-extent nodes cannot be split.
        if size_total <= 0.0 {
            return None;
        }
        // Each side must keep enough triangles.
        if count1 < MIN_TRIANGLE_COUNT || count2 < MIN_TRIANGLE_COUNT {
            return None;
        }
        // Clipping must not add too many triangles.
        let count_extra = (count1 + count2) - count_total;
        if count_extra as f64 / count_total as f64 > MAX_EXTRA_TRIANGLES / 100.0 {
            return None;
        }
        // Neither side may be too small relative to this node or the root.
        let size1 = value - min_value;
        let size2 = max_value - value;
        let size_min = size1.min(size2);
        if size_min / size_total < MIN_CHILD_NODE_SIZE / 100.0 {
            return None;
        }
        let root_extent = self.root_extent[axis.index()];
        if root_extent <= 0.0 || size_min / root_extent < MIN_LEAF_NODE_SIZE / 100.0 {
            return None;
        }

        let count_diff = count1.abs_diff(count2);
        Some((count_extra + count_diff) as f64 / size_total)
    }

    /// Finds the best cut value for `axis` over the given triangle set.
    ///
    /// Starts at the sorted-median coordinate and walks the cut index one
    /// step at a time toward the side with more triangles, re-scoring each
    /// candidate that moved at least the minimum step, until the sides
    /// balance, an array bound is hit, or a perfect score is reached.
    ///
    /// Returns `(score, value)`; a `None` score means no acceptable cut
    /// exists on this axis.
    fn determine_division_value(&self, axis: Axis, triangles: &[Triangle]) -> (Option<f64>, f64) {
        let mut coords: Vec<f64> = triangles
            .iter()
            .flatten()
            .map(|&index| axis.coord(&self.arrays.vertices[index]))
            .collect();
        coords.sort_unstable_by(f64::total_cmp);
        let min_value = coords[0];
        let max_value = coords[coords.len() - 1];
        let min_step = (max_value - min_value) * (MIN_ALGORITHM_STEP / 100.0);

        let mut div_index = coords.len() / 2;
        let mut div_value = coords[div_index];
        let (mut n1, mut n2) = self.count_division(axis, div_value, triangles);
        let mut best_score = self.division_score(
            axis,
            div_value,
            min_value,
            max_value,
            triangles.len(),
            n1,
            n2,
        );
        let mut best_value = div_value;

        // Walk toward the heavier side. The direction is fixed on the first
        // counts and the walk stops as soon as the imbalance flips.
        let direction: isize = match n1.cmp(&n2) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Equal => 0,
        };
        loop {
            if best_score == Some(0.0) {
                break;
            } else if direction < 0 && n1 < n2 && div_index > 0 {
                div_index -= 1;
            } else if direction > 0 && n1 > n2 && div_index < coords.len() - 1 {
                div_index += 1;
            } else {
                break;
            }
            // Skip candidates closer than the minimum step to the last
            // scored value; the index keeps moving until one is far enough.
            if (div_value - coords[div_index]).abs() >= min_step {
                div_value = coords[div_index];
                (n1, n2) = self.count_division(axis, div_value, triangles);
                let score = self.division_score(
                    axis,
                    div_value,
                    min_value,
                    max_value,
                    triangles.len(),
                    n1,
                    n2,
                );
                if let Some(score) = score {
                    if best_score.is_none_or(|best| best > score) {
                        best_score = Some(score);
                        best_value = div_value;
                    }
                }
            }
        }
        (best_score, best_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn make_arrays(points: &[(f64, f64)]) -> VertexArrays {
        let mut arrays = VertexArrays::new();
        for &(x, y) in points {
            arrays.push(Point2::new(x, y), [1.0, 1.0, 1.0, 1.0], [x, y]);
        }
        arrays
    }

    /// A w x h grid of unit quads, two triangles each, with shared vertices.
    fn make_grid(w: usize, h: usize) -> (Vec<Vec<usize>>, VertexArrays) {
        let mut arrays = VertexArrays::new();
        for y in 0..=h {
            for x in 0..=w {
                arrays.push(
                    Point2::new(x as f64, y as f64),
                    [1.0, 1.0, 1.0, 1.0],
                    [0.0, 0.0],
                );
            }
        }
        let at = |x: usize, y: usize| y * (w + 1) + x;
        let mut polygons = Vec::new();
        for y in 0..h {
            for x in 0..w {
                polygons.push(vec![
                    at(x, y),
                    at(x + 1, y),
                    at(x + 1, y + 1),
                    at(x, y),
                    at(x + 1, y + 1),
                    at(x, y + 1),
                ]);
            }
        }
        (polygons, arrays)
    }

    fn check_invariants(node: &PartitionNode, arrays: &VertexArrays, budget: u32) {
        assert!(budget >= 1, "tree deeper than the depth budget");
        match node {
            PartitionNode::Branch {
                axis,
                value,
                child1,
                child2,
            } => {
                // The split value must lie strictly inside the node's
                // coordinate range along the split axis.
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                node.for_each_leaf(&mut |triangles| {
                    for triangle in triangles {
                        for &index in triangle {
                            let c = axis.coord(&arrays.vertices[index]);
                            min = min.min(c);
                            max = max.max(c);
                        }
                    }
                });
                assert!(min < *value && *value < max, "split value not strictly inside ({min}, {max})");
                check_invariants(child1, arrays, budget - 1);
                check_invariants(child2, arrays, budget - 1);
            }
            PartitionNode::Leaf { triangles } => {
                for triangle in triangles {
                    for &index in triangle {
                        assert!(index < arrays.len(), "triangle index out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn empty_input_gives_single_empty_leaf() {
        let tree = PartitionTree::build(&[], VertexArrays::new()).unwrap();
        assert_eq!(tree.root, PartitionNode::empty_leaf());
        assert!(tree.arrays.is_empty());
    }

    #[test]
    fn single_square_stays_one_leaf() {
        // Two triangles forming a unit square: any cut would leave fewer
        // than two triangles on a side, so no split is accepted even with
        // the full depth budget.
        let arrays = make_arrays(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let polygons = vec![vec![0, 1, 2, 0, 2, 3]];

        let tree = PartitionTree::build_with_depth(&polygons, arrays.clone(), 1).unwrap();
        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.triangle_count(), 2);

        let tree = PartitionTree::build(&polygons, arrays).unwrap();
        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.triangle_count(), 2);
    }

    #[test]
    fn straddling_triangle_clips_with_interpolation() {
        let mut context = BuildContext {
            arrays: make_arrays(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
            root_extent: [1.0, 1.0],
        };
        let mut side1 = Vec::new();
        let mut side2 = Vec::new();
        context.divide_triangle(Axis::X, 0.5, [0, 1, 2], &mut side1, &mut side2);

        // Two vertices of the triangle sit below x = 0.5, so the below side
        // receives two triangles and the above side one.
        assert_eq!(side1.len(), 2);
        assert_eq!(side2.len(), 1);

        // Two new vertices, on the cut.
        assert_eq!(context.arrays.len(), 5);
        assert_eq!(context.arrays.vertices[3], Point2::new(0.5, 0.0));
        assert_eq!(context.arrays.vertices[4], Point2::new(0.5, 0.5));
        // Attributes interpolated by the same crossing fraction.
        assert_eq!(context.arrays.texcoords[3], [0.5, 0.0]);
        assert_eq!(context.arrays.texcoords[4], [0.5, 0.5]);
    }

    #[test]
    fn middle_vertex_on_cut_splits_once() {
        let mut context = BuildContext {
            arrays: make_arrays(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]),
            root_extent: [1.0, 1.0],
        };
        let mut side1 = Vec::new();
        let mut side2 = Vec::new();
        context.divide_triangle(Axis::X, 0.5, [0, 1, 2], &mut side1, &mut side2);

        assert_eq!(side1.len(), 1);
        assert_eq!(side2.len(), 1);
        // Only the long edge is split: a single new vertex.
        assert_eq!(context.arrays.len(), 4);
        assert_eq!(context.arrays.vertices[3], Point2::new(0.5, 0.0));
    }

    #[test]
    fn non_straddling_triangle_is_not_clipped() {
        let mut context = BuildContext {
            arrays: make_arrays(&[(0.0, 0.0), (0.4, 0.0), (0.2, 1.0)]),
            root_extent: [1.0, 1.0],
        };
        let mut side1 = Vec::new();
        let mut side2 = Vec::new();
        context.divide_triangle(Axis::X, 0.5, [0, 1, 2], &mut side1, &mut side2);
        assert_eq!(side1, vec![[0, 1, 2]]);
        assert!(side2.is_empty());
        assert_eq!(context.arrays.len(), 3);
    }

    #[test]
    fn count_estimate_matches_materialized_division() {
        let (polygons, arrays) = make_grid(4, 3);
        let triangles = triangulate(&polygons, &arrays).unwrap();
        let context = BuildContext {
            arrays,
            root_extent: [4.0, 3.0],
        };
        for axis in Axis::BOTH {
            for value in [0.5, 1.0, 2.0, 2.5] {
                let (n1, n2) = context.count_division(axis, value, &triangles);
                let mut check = BuildContext {
                    arrays: context.arrays.clone(),
                    root_extent: context.root_extent,
                };
                let mut side1 = Vec::new();
                let mut side2 = Vec::new();
                for &triangle in &triangles {
                    check.divide_triangle(axis, value, triangle, &mut side1, &mut side2);
                }
                assert_eq!((n1, n2), (side1.len(), side2.len()), "axis {axis:?} value {value}");
            }
        }
    }

    #[test]
    fn grid_build_splits_and_keeps_invariants() {
        let (polygons, arrays) = make_grid(4, 4);
        let input_triangles = 4 * 4 * 2;
        let tree = PartitionTree::build(&polygons, arrays).unwrap();

        assert!(!tree.root.is_leaf(), "a 4x4 grid should be divisible");
        // Clipping only adds triangles.
        assert!(tree.root.triangle_count() >= input_triangles);
        assert!(tree.root.depth() <= MAX_TREE_DEPTH as usize);
        assert!(tree.arrays.check_consistent().is_ok());
        check_invariants(&tree.root, &tree.arrays, MAX_TREE_DEPTH);
    }

    #[test]
    fn clipping_preserves_total_area() {
        fn area(arrays: &VertexArrays, triangle: &Triangle) -> f64 {
            let a = arrays.vertices[triangle[0]];
            let b = arrays.vertices[triangle[1]];
            let c = arrays.vertices[triangle[2]];
            (b - a).perp(&(c - a)).abs() / 2.0
        }

        // A 4x4 grid plus one large triangle that straddles every interior
        // cut line, so whatever cut the builder picks must clip it.
        let (mut polygons, mut arrays) = make_grid(4, 4);
        let base = arrays.len();
        arrays.push(Point2::new(0.25, 0.25), [1.0, 1.0, 1.0, 1.0], [0.0, 0.0]);
        arrays.push(Point2::new(3.75, 0.5), [1.0, 1.0, 1.0, 1.0], [0.0, 0.0]);
        arrays.push(Point2::new(2.0, 3.5), [1.0, 1.0, 1.0, 1.0], [0.0, 0.0]);
        polygons.push(vec![base, base + 1, base + 2]);

        let input_triangles = triangulate(&polygons, &arrays).unwrap();
        let input_area: f64 = input_triangles.iter().map(|t| area(&arrays, t)).sum();

        let tree = PartitionTree::build(&polygons, arrays).unwrap();
        assert!(!tree.root.is_leaf());
        assert!(
            tree.root.triangle_count() > input_triangles.len(),
            "expected the straddling triangle to be clipped"
        );

        // Clipping replaces a triangle with pieces covering the same region.
        let mut output_area = 0.0;
        tree.root.for_each_leaf(&mut |triangles| {
            for triangle in triangles {
                output_area += area(&tree.arrays, triangle);
            }
        });
        assert!(
            (input_area - output_area).abs() < 1e-9,
            "total area changed: {input_area} vs {output_area}"
        );
    }

    #[test]
    fn wide_grid_first_cut_is_on_the_long_axis() {
        // 8 wide, 1 tall: the score divides by the node extent, so the X
        // axis must win the first cut.
        let (polygons, arrays) = make_grid(8, 1);
        let tree = PartitionTree::build(&polygons, arrays).unwrap();
        match &tree.root {
            PartitionNode::Branch { axis, .. } => assert_eq!(*axis, Axis::X),
            PartitionNode::Leaf { .. } => panic!("expected a branch"),
        }
    }

    #[test]
    fn degenerate_extent_stops_splitting() {
        // All vertices on a vertical line: X extent is zero, and Y cuts are
        // rejected by the minimum child size rules relative to a zero-area
        // root. Must not divide by zero.
        let arrays = make_arrays(&[(1.0, 0.0), (1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        let polygons = vec![vec![0, 1, 2], vec![1, 2, 3]];
        let tree = PartitionTree::build(&polygons, arrays).unwrap();
        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.triangle_count(), 2);
    }

    #[test]
    fn out_of_range_index_is_fatal() {
        let arrays = make_arrays(&[(0.0, 0.0), (1.0, 0.0)]);
        let polygons = vec![vec![0, 1, 2]];
        assert_eq!(
            PartitionTree::build(&polygons, arrays),
            Err(BuildError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn untriangulated_polygon_is_fatal() {
        let arrays = make_arrays(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let polygons = vec![vec![0, 1, 2, 3]];
        assert_eq!(
            PartitionTree::build(&polygons, arrays),
            Err(BuildError::PolygonNotTriangulated { len: 4 })
        );
    }

    #[test]
    fn resolve_entity_vertex_finds_or_appends() {
        let original = make_arrays(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (9.0, 9.0)]);
        let polygons = vec![vec![0, 1, 2, 0, 2, 3]];
        let mut tree = PartitionTree::build(&polygons, original.clone()).unwrap();
        let compacted_len = tree.arrays.len();

        // Vertex 1 survives compaction: found by value, nothing appended.
        let resolved = tree.resolve_entity_vertex(&original, 1).unwrap();
        assert_eq!(tree.arrays.vertices[resolved], Point2::new(1.0, 0.0));
        assert_eq!(tree.arrays.len(), compacted_len);

        // Vertex 4 is entity-only and was dropped: appended back.
        let resolved = tree.resolve_entity_vertex(&original, 4).unwrap();
        assert_eq!(resolved, compacted_len);
        assert_eq!(tree.arrays.vertices[resolved], Point2::new(9.0, 9.0));
        assert!(tree.arrays.check_consistent().is_ok());

        assert_eq!(
            tree.resolve_entity_vertex(&original, 99),
            Err(BuildError::IndexOutOfRange { index: 99, len: 5 })
        );
    }

    #[test]
    fn serialized_document_shape() {
        let arrays = make_arrays(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let polygons = vec![vec![0, 1, 2, 0, 2, 3]];
        let tree = PartitionTree::build(&polygons, arrays).unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["root"]["kind"], "leaf");
        assert_eq!(json["vertices"].as_array().unwrap().len(), 4);
        assert_eq!(json["colors"].as_array().unwrap().len(), 4);
        assert_eq!(json["texcoords"].as_array().unwrap().len(), 4);
    }
}
