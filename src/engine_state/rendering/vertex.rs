//! Vertex data structures for voxel meshes.
//!
//! This module defines the vertex format emitted by the mesh builder. The
//! layout is plain old data so a whole vertex list can be uploaded as bytes.

use cgmath::Point3;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), local to the chunk origin
/// - Texture Coordinates: [f32; 2] (8 bytes), atlas UV with V pointing up
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the chunk's (0, 0, 0) cell
    pub position: [f32; 3],
    /// UV texture coordinates into the atlas (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - The position of the vertex in chunk space
    /// * `tex_coords` - Atlas UV coordinates
    pub fn new(pos: Point3<f32>, tex_coords: [f32; 2]) -> Self {
        Vertex {
            position: [pos.x, pos.y, pos.z],
            tex_coords,
        }
    }

    /// Position as a point.
    pub fn point(&self) -> Point3<f32> {
        Point3::new(self.position[0], self.position[1], self.position[2])
    }
}
