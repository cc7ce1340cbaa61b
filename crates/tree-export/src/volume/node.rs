//! Volume hierarchy node implementation.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{BBox, BuildError, Entity, VertexArrays};

/// A node in the volume hierarchy.
///
/// Branches carry the union bounding box of their children; leaves carry one
/// input record. Construction never creates geometry, so every input record
/// appears in exactly one leaf.
///
/// The serialized branch form is `{"kind": "branch", "bbox", "child1",
/// "child2"}`. Leaves serialize as their item only (the leaf bbox is
/// construction state, recomputable from the indices), giving
/// `{"kind": "polygon", "order", "indices"}` for polygons and
/// `{"kind": <entity-kind>, "name", "indices"}` for entities.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeNode {
    Branch {
        bbox: BBox,
        child1: Box<VolumeNode>,
        child2: Box<VolumeNode>,
    },
    Leaf(VolumeLeaf),
}

impl VolumeNode {
    /// Returns this node's bounding box.
    pub fn bbox(&self) -> BBox {
        match self {
            VolumeNode::Branch { bbox, .. } => *bbox,
            VolumeNode::Leaf(leaf) => leaf.bbox,
        }
    }

    /// Returns the depth of this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        match self {
            VolumeNode::Branch { child1, child2, .. } => 1 + child1.depth().max(child2.depth()),
            VolumeNode::Leaf(_) => 1,
        }
    }

    /// Returns the number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            VolumeNode::Branch { child1, child2, .. } => {
                child1.leaf_count() + child2.leaf_count()
            }
            VolumeNode::Leaf(_) => 1,
        }
    }

    /// Visits every leaf in tree order (`child1` before `child2`).
    pub fn for_each_leaf<F: FnMut(&VolumeLeaf)>(&self, f: &mut F) {
        match self {
            VolumeNode::Branch { child1, child2, .. } => {
                child1.for_each_leaf(f);
                child2.for_each_leaf(f);
            }
            VolumeNode::Leaf(leaf) => f(leaf),
        }
    }
}

/// One input record of the volume hierarchy: a payload plus its bounding
/// box, derived once from the referenced vertices before building.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeLeaf {
    pub bbox: BBox,
    pub item: VolumeItem,
}

impl VolumeLeaf {
    /// Creates a leaf record for a polygon, tagged with its draw order.
    pub fn for_polygon(
        order: usize,
        indices: Vec<usize>,
        arrays: &VertexArrays,
    ) -> Result<Self, BuildError> {
        let bbox = bbox_of_indices(&indices, arrays)?;
        Ok(Self {
            bbox,
            item: VolumeItem::Polygon { order, indices },
        })
    }

    /// Creates a leaf record for an entity.
    pub fn for_entity(entity: Entity, arrays: &VertexArrays) -> Result<Self, BuildError> {
        let bbox = bbox_of_indices(&entity.indices, arrays)?;
        Ok(Self {
            bbox,
            item: VolumeItem::Entity(entity),
        })
    }
}

/// The payload of a volume hierarchy leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeItem {
    /// A whole polygon, tagged with its original draw order.
    Polygon { order: usize, indices: Vec<usize> },
    /// A point-like entity.
    Entity(Entity),
}

fn bbox_of_indices(indices: &[usize], arrays: &VertexArrays) -> Result<BBox, BuildError> {
    let mut bbox: Option<BBox> = None;
    for &index in indices {
        arrays.check_index(index)?;
        let point = &arrays.vertices[index];
        match &mut bbox {
            Some(bbox) => bbox.include_point(point),
            None => bbox = Some(BBox::from_point(point)),
        }
    }
    bbox.ok_or(BuildError::EmptyLeafRecord)
}

impl Serialize for VolumeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VolumeNode::Branch {
                bbox,
                child1,
                child2,
            } => {
                let mut node = serializer.serialize_struct("VolumeNode", 4)?;
                node.serialize_field("kind", "branch")?;
                node.serialize_field("bbox", bbox)?;
                node.serialize_field("child1", child1)?;
                node.serialize_field("child2", child2)?;
                node.end()
            }
            VolumeNode::Leaf(leaf) => leaf.serialize(serializer),
        }
    }
}

impl Serialize for VolumeLeaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.item {
            VolumeItem::Polygon { order, indices } => {
                let mut leaf = serializer.serialize_struct("VolumeLeaf", 3)?;
                leaf.serialize_field("kind", "polygon")?;
                leaf.serialize_field("order", order)?;
                leaf.serialize_field("indices", indices)?;
                leaf.end()
            }
            VolumeItem::Entity(entity) => {
                let mut leaf = serializer.serialize_struct("VolumeLeaf", 3)?;
                leaf.serialize_field("kind", &entity.kind)?;
                leaf.serialize_field("name", &entity.name)?;
                leaf.serialize_field("indices", &entity.indices)?;
                leaf.end()
            }
        }
    }
}
