//! Spatial-tree export builder for 2D polygon/entity models.
//!
//! Converts an editable model (parallel vertex/color/texcoord arrays plus
//! polygons and point-like entities) into serialized spatial indexes:
//!
//! - [`PartitionTree`]: a triangle-clipping space partition along
//!   axis-aligned cuts, with interpolated vertex synthesis and a post-build
//!   compaction pass
//! - [`VolumeTree`]: a bounding-volume hierarchy over whole polygons and
//!   entities, built by minimal-overlap splits

mod axis;
mod bbox;
mod error;
mod model;
pub mod partition;
pub mod volume;

pub use axis::Axis;
pub use bbox::BBox;
pub use error::BuildError;
pub use model::{Color, Entity, EntityKind, TexCoord, Triangle, Vertex, VertexArrays};
pub use partition::{MAX_TREE_DEPTH, PartitionNode, PartitionTree};
pub use volume::{VolumeItem, VolumeLeaf, VolumeNode, VolumeTree};
