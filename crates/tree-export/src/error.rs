//! Build error taxonomy.

use thiserror::Error;

/// Errors raised by the tree builders.
///
/// All of these are contract violations in the caller-supplied model; a
/// failed build has no partial output. Degenerate geometry (a zero-extent
/// axis on a node being split) is not an error: the builder stops splitting
/// that node instead. Empty input is not an error either and produces an
/// empty leaf or an absent root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The vertex, color, and texcoord arrays must be index-aligned.
    #[error(
        "parallel arrays differ in length: {vertices} vertices, {colors} colors, {texcoords} texcoords"
    )]
    ArrayLengthMismatch {
        vertices: usize,
        colors: usize,
        texcoords: usize,
    },

    /// A triangle or entity references a vertex outside the arrays.
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    /// A polygon's index list is not a whole number of triangles.
    #[error("polygon index list length {len} is not a multiple of 3")]
    PolygonNotTriangulated { len: usize },

    /// A volume-hierarchy leaf record references no vertices at all.
    #[error("leaf record references no vertices")]
    EmptyLeafRecord,
}
