//! Bounding-volume hierarchy over whole polygons and entities.
//!
//! Unlike the partition tree, this builder never clips anything: each input
//! record (a polygon with its draw order, or an entity) becomes exactly one
//! leaf, and branches carry the union bounding box of their children. Splits
//! are chosen per node from the median positions of two center-sorted views
//! of the working set, taking the candidate whose two group bboxes overlap
//! least.
//!
//! # Example
//!
//! ```ignore
//! use tree_export::{VolumeLeaf, VolumeTree};
//!
//! let mut leaves = Vec::new();
//! for (order, polygon) in polygons.iter().enumerate() {
//!     leaves.push(VolumeLeaf::for_polygon(order, polygon.clone(), &arrays)?);
//! }
//! let tree = VolumeTree::build(leaves);
//! let json = serde_json::to_string(&tree)?;
//! ```
//!
//! # Architecture
//!
//! - [`VolumeTree`]: the container holding the optional root
//! - [`VolumeNode`]: the branch/leaf sum type
//! - [`VolumeLeaf`], [`VolumeItem`]: input records and their payloads

mod builder;
mod node;

pub use builder::VolumeTree;
pub use node::{VolumeItem, VolumeLeaf, VolumeNode};
