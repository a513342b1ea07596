//! Geometry tables produced by the OBJ parser.

use crate::error::{ObjError, ObjResult};
use crate::mtl::MtlLibrary;

/// Three floats; serves as a position, a normal, or a texture coordinate
/// depending on the table it sits in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One triangle after fan triangulation: three 1-based indices into a
/// vertex-like table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriFace {
    pub indices: [u32; 3],
}

impl TriFace {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }
}

/// A parsed OBJ model: indexed geometry tables plus the material library.
///
/// Populated append-only while streaming the file; dropping the model
/// releases every table and texture buffer it owns.
#[derive(Debug, Default)]
pub struct ObjModel {
    /// Vertex positions (`v` lines).
    pub positions: Vec<Vertex>,
    /// Texture coordinates (`vt` lines).
    pub texcoords: Vec<Vertex>,
    /// Normals (`vn` lines).
    pub normals: Vec<Vertex>,
    /// Per-triangle indices into `positions`.
    pub position_faces: Vec<TriFace>,
    /// Per-triangle indices into `texcoords`; populated only when the source
    /// faces carried texcoord indices.
    pub texcoord_faces: Vec<TriFace>,
    /// Per-triangle indices into `normals`; populated only when the source
    /// faces carried normal indices.
    pub normal_faces: Vec<TriFace>,
    /// Materials gathered from `mtllib` references, in declaration order.
    pub materials: MtlLibrary,
    /// Material index for each triangle emitted while a `usemtl` selection
    /// was active; empty when no material was ever selected.
    pub face_materials: Vec<usize>,
}

impl ObjModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Componentwise min and max over the vertex positions, or `None` for a
    /// model with no positions.
    pub fn bounding_box(&self) -> Option<(Vertex, Vertex)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.positions[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        Some((min, max))
    }

    /// Number of triangles in the model.
    pub fn triangle_count(&self) -> usize {
        self.position_faces.len()
    }

    /// Flatten the indexed face tables into unindexed per-triangle buffers
    /// (nine floats per triangle per channel), the layout a
    /// `glBufferData`-style upload consumes.
    ///
    /// Normal and texcoord buffers are produced only for channels the model
    /// populated; a populated channel whose face table disagrees in length
    /// with the vertex faces is an error, as is any index past the end of
    /// its table.
    pub fn triangle_buffers(&self) -> ObjResult<TriangleBuffers> {
        if !self.normal_faces.is_empty() && self.normal_faces.len() != self.position_faces.len() {
            return Err(ObjError::FaceChannelMismatch {
                vertex_faces: self.position_faces.len(),
                other_faces: self.normal_faces.len(),
                channel: "normal",
            });
        }
        if !self.texcoord_faces.is_empty()
            && self.texcoord_faces.len() != self.position_faces.len()
        {
            return Err(ObjError::FaceChannelMismatch {
                vertex_faces: self.position_faces.len(),
                other_faces: self.texcoord_faces.len(),
                channel: "texcoord",
            });
        }

        Ok(TriangleBuffers {
            triangle_count: self.position_faces.len(),
            positions: flatten_channel(&self.position_faces, &self.positions)?,
            normals: flatten_channel(&self.normal_faces, &self.normals)?,
            texcoords: flatten_channel(&self.texcoord_faces, &self.texcoords)?,
        })
    }
}

/// Unindexed triangle data ready for buffer upload.
#[derive(Debug)]
pub struct TriangleBuffers {
    pub triangle_count: usize,
    /// `triangle_count * 9` floats, or empty.
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
}

fn flatten_channel(faces: &[TriFace], table: &[Vertex]) -> ObjResult<Vec<f32>> {
    let mut buffer = Vec::with_capacity(faces.len() * 9);
    for face in faces {
        for &index in &face.indices {
            // Indices are 1-based; 0 never survives parsing but is still
            // rejected here rather than wrapping.
            let vertex = (index as usize)
                .checked_sub(1)
                .and_then(|i| table.get(i))
                .ok_or(ObjError::IndexOutOfRange {
                    index,
                    count: table.len(),
                })?;
            buffer.extend_from_slice(&[vertex.x, vertex.y, vertex.z]);
        }
    }
    Ok(buffer)
}
