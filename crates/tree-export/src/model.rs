//! Model data shared by both builders.
//!
//! The editable model arrives as parallel arrays: one vertex table plus a
//! color and a texture-coordinate table aligned with it by index. Polygons
//! and entities reference vertices by index into these arrays and never own
//! coordinates themselves.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Axis, BBox, BuildError};

/// A model vertex: a 2D position.
pub type Vertex = Point2<f64>;

/// An RGBA color with components in `[0, 1]`, index-aligned with vertices.
pub type Color = [f64; 4];

/// A texture coordinate pair, index-aligned with vertices.
pub type TexCoord = [f64; 2];

/// Three vertex indices. Always drawn from one contiguous triple of a
/// polygon's index list.
pub type Triangle = [usize; 3];

/// The index-aligned vertex, color, and texture-coordinate tables.
///
/// The three arrays always have equal length; [`VertexArrays::check_consistent`]
/// enforces this at build entry. Clipping appends interpolated entries via
/// [`VertexArrays::split_edge`], so a build may grow the arrays but never
/// reorders or removes entries (compaction produces fresh arrays instead).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexArrays {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub texcoords: Vec<TexCoord>,
}

impl VertexArrays {
    /// Creates empty arrays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Verifies that the three arrays are index-aligned.
    pub fn check_consistent(&self) -> Result<(), BuildError> {
        if self.vertices.len() != self.colors.len() || self.vertices.len() != self.texcoords.len() {
            return Err(BuildError::ArrayLengthMismatch {
                vertices: self.vertices.len(),
                colors: self.colors.len(),
                texcoords: self.texcoords.len(),
            });
        }
        Ok(())
    }

    /// Verifies that `index` refers to an existing vertex.
    pub fn check_index(&self, index: usize) -> Result<(), BuildError> {
        if index >= self.vertices.len() {
            return Err(BuildError::IndexOutOfRange {
                index,
                len: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Appends a vertex with its color and texture coordinate, returning the
    /// new index.
    pub fn push(&mut self, vertex: Vertex, color: Color, texcoord: TexCoord) -> usize {
        self.vertices.push(vertex);
        self.colors.push(color);
        self.texcoords.push(texcoord);
        self.vertices.len() - 1
    }

    /// Splits the edge `ix1`–`ix2` at coordinate `value` along `axis`.
    ///
    /// A new vertex is appended at the crossing point, with its color and
    /// texture coordinate linearly interpolated by the crossing fraction.
    /// Returns the index of the new vertex.
    ///
    /// `value` must lie strictly between the two endpoint coordinates along
    /// `axis`; the partition builder only calls this for edges it has
    /// classified as straddling the cut.
    pub fn split_edge(&mut self, axis: Axis, value: f64, ix1: usize, ix2: usize) -> usize {
        let c1 = axis.coord(&self.vertices[ix1]);
        let c2 = axis.coord(&self.vertices[ix2]);
        let f = (c2 - value) / (c2 - c1);
        let lerp = |a: f64, b: f64| a * f + b * (1.0 - f);

        let v1 = self.vertices[ix1];
        let v2 = self.vertices[ix2];
        let vertex = Point2::new(lerp(v1.x, v2.x), lerp(v1.y, v2.y));
        let color = std::array::from_fn(|i| lerp(self.colors[ix1][i], self.colors[ix2][i]));
        let texcoord = std::array::from_fn(|i| lerp(self.texcoords[ix1][i], self.texcoords[ix2][i]));
        self.push(vertex, color, texcoord)
    }

    /// Computes the bounding box of all vertices, or `None` if empty.
    pub fn bounds(&self) -> Option<BBox> {
        BBox::of_points(&self.vertices)
    }
}

/// The kind of a non-polygon entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A single vertex.
    Point,
    /// Two vertices: the endpoints of a line segment.
    Edge,
    /// Two vertices: opposite corners of an axis-aligned rectangle.
    Rectangle,
    /// Two vertices: the center and a point defining the radius.
    Circle,
}

/// A point-like model entity: a tagged vertex-index record with an optional
/// display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: Option<String>,
    pub indices: Vec<usize>,
}

impl Entity {
    /// Creates an entity; an empty name is treated as absent.
    pub fn new(kind: EntityKind, name: impl Into<String>, indices: Vec<usize>) -> Self {
        let name = name.into();
        Self {
            kind,
            name: (!name.is_empty()).then_some(name),
            indices,
        }
    }
}
