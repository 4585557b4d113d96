//! Mesh data structures for voxel rendering.
//!
//! A `Mesh` is an indexed triangle list: four vertices and two triangles per
//! visible face. Meshes are never patched; every rebuild produces a new one.

use cgmath::{InnerSpace, Point3, Vector3};

use super::face::Face;
use crate::engine_state::{
    rendering::{atlas::TextureAtlas, Vertex},
    voxels::block::Block,
};

/// Triangle corner order of every quad, counter-clockwise from outside.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Renderable geometry of one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// The vertex data, four per quad
    pub vertices: Vec<Vertex>,
    /// The index data, six per quad
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends one face, textured from the block's atlas tile for that side.
    ///
    /// # Arguments
    /// * `face` - The face to emit
    /// * `atlas` - Atlas used to resolve the tile index into UVs
    pub fn push_face(&mut self, face: &Face, atlas: &TextureAtlas) {
        let tile_index = Block::get_texture_indices(face.block_type).for_side(face.block_side);
        let tile = atlas.tile(tile_index);
        let uvs = [
            [tile.u_min, tile.v_min],
            [tile.u_max, tile.v_min],
            [tile.u_max, tile.v_max],
            [tile.u_min, tile.v_max],
        ];

        let base = self.vertices.len() as u32;
        for (corner, uv) in face.corners().into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(corner, uv));
        }
        self.indices.extend(QUAD_INDICES.iter().map(|index| base + index));
    }

    /// Iterates the triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.indices.chunks_exact(3).map(|triangle| {
            [
                self.vertices[triangle[0] as usize].point(),
                self.vertices[triangle[1] as usize].point(),
                self.vertices[triangle[2] as usize].point(),
            ]
        })
    }

    /// Raw bytes of the vertex buffer, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Unit normal of a triangle under counter-clockwise winding.
pub fn triangle_normal(triangle: &[Point3<f32>; 3]) -> Vector3<f32> {
    (triangle[1] - triangle[0]).cross(triangle[2] - triangle[0]).normalize()
}
