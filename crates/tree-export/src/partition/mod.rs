//! Triangle-clipping space partition tree.
//!
//! This module builds a binary tree over a triangle soup by recursively
//! cutting it along axis-aligned values. Triangles that straddle a cut are
//! clipped, synthesizing interpolated vertices, so every leaf's triangles
//! lie entirely within the leaf's region. Cut values are chosen by a scoring
//! heuristic that balances the two sides' triangle counts against the cost
//! of clipped duplicates and prefers cutting a node's longer axis.
//!
//! # Example
//!
//! ```ignore
//! use tree_export::{PartitionTree, VertexArrays};
//!
//! let arrays: VertexArrays = /* vertices, colors, texcoords */;
//! let polygons: Vec<Vec<usize>> = /* index triples */;
//! let tree = PartitionTree::build(&polygons, arrays)?;
//!
//! // tree.root is the node tree; tree.arrays the compacted vertex data.
//! let json = serde_json::to_string(&tree)?;
//! ```
//!
//! # Architecture
//!
//! - [`PartitionTree`]: a finished build (root node + compacted arrays)
//! - [`PartitionNode`]: the branch/leaf sum type
//! - [`compact`]: the post-build dense renumbering pass (run automatically
//!   by [`PartitionTree::build`])

mod builder;
mod compact;
mod node;

pub use builder::{MAX_TREE_DEPTH, PartitionTree};
pub use compact::compact;
pub use node::PartitionNode;
