use glam::Vec3;

use crate::error::MeshError;

/// Flat GPU-ready buffers. Positions and normals are xyz triples, one normal
/// per vertex. `indices` is `None` for flat (duplicated-vertex) meshes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Option<Vec<u32>>,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[vertex * 3..vertex * 3 + 3])
    }

    pub fn normal(&self, vertex: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[vertex * 3..vertex * 3 + 3])
    }

    /// Vertex ids of every triangle, in draw order.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| match &self.indices {
            Some(indices) => [
                indices[t * 3] as usize,
                indices[t * 3 + 1] as usize,
                indices[t * 3 + 2] as usize,
            ],
            None => [t * 3, t * 3 + 1, t * 3 + 2],
        })
    }

    /// The index buffer narrowed to 16 bits, if every vertex fits.
    pub fn indices_u16(&self) -> Option<Vec<u16>> {
        let indices = self.indices.as_ref()?;
        if self.vertex_count() > u16::MAX as usize + 1 {
            return None;
        }
        Some(indices.iter().map(|&i| i as u16).collect())
    }

    /// Axis-aligned bounds over finite positions. `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.vertices
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .filter(|p| p.is_finite())
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            })
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertices.len() != self.normals.len() {
            return Err(MeshError::LengthMismatch {
                vertices: self.vertices.len(),
                normals: self.normals.len(),
            });
        }
        if self.vertices.len() % 3 != 0 {
            return Err(MeshError::NotTriples(self.vertices.len()));
        }

        match &self.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::PartialTriangle(indices.len() % 3));
                }
                let vertex_count = self.vertex_count();
                if let Some((position, &index)) = indices
                    .iter()
                    .enumerate()
                    .find(|(_, i)| **i as usize >= vertex_count)
                {
                    return Err(MeshError::IndexOutOfRange {
                        index,
                        position,
                        vertex_count,
                    });
                }
            }
            None => {
                let leftover = self.vertex_count() % 3;
                if leftover != 0 {
                    return Err(MeshError::PartialTriangle(leftover));
                }
            }
        }

        Ok(())
    }
}
