//! Batch export of saved model documents to spatial-tree documents.
//!
//! The editor saves a model as a JSON document: polygons, the vertex table
//! (per animation, a list of frames), the parallel color/texcoord arrays
//! (omitted when they are all defaults), and named entity containers. This
//! crate reads that document, runs the builders on one frame's snapshot, and
//! writes the export documents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tree_export::{
    BuildError, Color, Entity, EntityKind, PartitionTree, TexCoord, Vertex, VertexArrays,
    VolumeLeaf, VolumeTree,
};

/// Default color for vertices when the document omits the color table.
const INIT_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

/// Errors surfaced by an export run. A failed export has no partial output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// The vertex table of a saved model document.
///
/// The editor saves the full animation table, a map from animation name to a
/// list of frames (each frame one vertex array). Hand-assembled documents may
/// carry a single flat vertex array instead; both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VertexTable {
    Frame(Vec<Vertex>),
    Animations(BTreeMap<String, Vec<Vec<Vertex>>>),
}

impl VertexTable {
    /// Returns the snapshot the exporters operate on: the first frame of the
    /// lexicographically first animation, the frame the editor selects right
    /// after loading.
    pub fn frame(&self) -> &[Vertex] {
        match self {
            VertexTable::Frame(vertices) => vertices,
            VertexTable::Animations(animations) => animations
                .values()
                .next()
                .and_then(|frames| frames.first())
                .map_or(&[], Vec::as_slice),
        }
    }
}

impl Default for VertexTable {
    fn default() -> Self {
        VertexTable::Frame(Vec::new())
    }
}

/// A saved model document.
///
/// Entity containers map a display name (possibly empty) to the index
/// payloads of all entities sharing that name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelDoc {
    #[serde(default)]
    pub polygons: Vec<Vec<usize>>,
    #[serde(default)]
    pub vertices: VertexTable,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub texcoords: Vec<TexCoord>,
    #[serde(default)]
    pub points: BTreeMap<String, Vec<usize>>,
    #[serde(default)]
    pub edges: BTreeMap<String, Vec<[usize; 2]>>,
    #[serde(default)]
    pub rectangles: BTreeMap<String, Vec<[usize; 2]>>,
    #[serde(default)]
    pub circles: BTreeMap<String, Vec<[usize; 2]>>,
}

impl ModelDoc {
    /// Returns the selected frame's vertex arrays, with omitted color and
    /// texcoord tables filled with their defaults.
    pub fn normalized_arrays(&self) -> VertexArrays {
        let vertices = self.vertices.frame().to_vec();
        let colors = if self.colors.is_empty() {
            vec![INIT_COLOR; vertices.len()]
        } else {
            self.colors.clone()
        };
        let texcoords = if self.texcoords.is_empty() {
            vec![[0.0, 0.0]; vertices.len()]
        } else {
            self.texcoords.clone()
        };
        VertexArrays {
            vertices,
            colors,
            texcoords,
        }
    }

    /// Flattens the entity containers into a single entity list.
    pub fn entities(&self) -> Vec<Entity> {
        let mut entities = Vec::new();
        for (name, indices) in &self.points {
            for &index in indices {
                entities.push(Entity::new(EntityKind::Point, name.clone(), vec![index]));
            }
        }
        let containers = [
            (EntityKind::Edge, &self.edges),
            (EntityKind::Rectangle, &self.rectangles),
            (EntityKind::Circle, &self.circles),
        ];
        for (kind, container) in containers {
            for (name, payloads) in container {
                for payload in payloads {
                    entities.push(Entity::new(kind, name.clone(), payload.to_vec()));
                }
            }
        }
        entities
    }
}

/// The partition export document: the tree and compacted arrays, plus the
/// entity containers with their indices re-resolved against those arrays.
#[derive(Debug, Serialize)]
pub struct PartitionDoc {
    #[serde(flatten)]
    pub tree: PartitionTree,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub points: BTreeMap<String, Vec<usize>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub edges: BTreeMap<String, Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rectangles: BTreeMap<String, Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub circles: BTreeMap<String, Vec<Vec<usize>>>,
}

/// Builds the partition tree export for a model document.
pub fn export_partition(model: &ModelDoc) -> Result<PartitionDoc, BuildError> {
    let arrays = model.normalized_arrays();
    let mut tree = PartitionTree::build(&model.polygons, arrays.clone())?;

    // Compaction dropped entity-only vertices; resolve them back in.
    let mut entities = model.entities();
    tree.resolve_entities(&arrays, &mut entities)?;

    let mut doc = PartitionDoc {
        tree,
        points: BTreeMap::new(),
        edges: BTreeMap::new(),
        rectangles: BTreeMap::new(),
        circles: BTreeMap::new(),
    };
    for entity in entities {
        let name = entity.name.unwrap_or_default();
        match entity.kind {
            EntityKind::Point => doc.points.entry(name).or_default().push(entity.indices[0]),
            EntityKind::Edge => doc.edges.entry(name).or_default().push(entity.indices),
            EntityKind::Rectangle => doc
                .rectangles
                .entry(name)
                .or_default()
                .push(entity.indices),
            EntityKind::Circle => doc.circles.entry(name).or_default().push(entity.indices),
        }
    }
    Ok(doc)
}

/// Builds the volume hierarchy export for a model document.
pub fn export_volume(model: &ModelDoc) -> Result<VolumeTree, BuildError> {
    let arrays = model.normalized_arrays();
    arrays.check_consistent()?;

    let mut leaves = Vec::new();
    for (order, polygon) in model.polygons.iter().enumerate() {
        if polygon.is_empty() {
            continue;
        }
        leaves.push(VolumeLeaf::for_polygon(order, polygon.clone(), &arrays)?);
    }
    for entity in model.entities() {
        leaves.push(VolumeLeaf::for_entity(entity, &arrays)?);
    }
    Ok(VolumeTree::build(leaves))
}
