use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// Represents a single visible quad face of a voxel.
///
/// A face is described by an origin corner and two edge vectors `u` and `v`.
/// The corners are `origin`, `origin + u`, `origin + u + v` and `origin + v`;
/// `u × v` is the outward normal, so the corners run counter-clockwise when
/// seen from outside the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// First corner of the face in chunk coordinates
    pub origin: Point3<f32>,
    /// Edge from the first to the second corner
    pub u: Vector3<f32>,
    /// Edge from the first to the fourth corner
    pub v: Vector3<f32>,
    /// The block this face belongs to, used for texture mapping
    pub block_type: BlockType,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of the cell at `(i, j, k)` on the given side.
    ///
    /// # Arguments
    /// * `i`, `j`, `k` - The coordinates of the voxel in chunk space
    /// * `block_type` - The type of the block, used for texture mapping
    /// * `block_side` - Which side of the block this face represents
    pub fn new(i: usize, j: usize, k: usize, block_type: BlockType, block_side: BlockSide) -> Self {
        let (x, y, z) = (i as f32, j as f32, k as f32);
        let (origin, u, v) = match block_side {
            BlockSide::Top => (
                Point3::new(x, y + 1.0, z + 1.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, -1.0),
            ),
            BlockSide::Bottom => (
                Point3::new(x, y, z),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ),
            BlockSide::Front => (
                Point3::new(x, y, z + 1.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ),
            BlockSide::Back => (
                Point3::new(x + 1.0, y, z),
                Vector3::new(-1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ),
            BlockSide::Right => (
                Point3::new(x + 1.0, y, z + 1.0),
                Vector3::new(0.0, 0.0, -1.0),
                Vector3::new(0.0, 1.0, 0.0),
            ),
            BlockSide::Left => (
                Point3::new(x, y, z),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(0.0, 1.0, 0.0),
            ),
        };
        Face {
            origin,
            u,
            v,
            block_type,
            block_side,
        }
    }

    /// The four corners in winding order.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        [
            self.origin,
            self.origin + self.u,
            self.origin + self.u + self.v,
            self.origin + self.v,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_vectors_span_the_outward_normal() {
        for side in BlockSide::all() {
            let face = Face::new(2, 3, 4, BlockType::Stone, side);
            let normal = face.u.cross(face.v);
            let expected = side.normal().cast::<f32>().unwrap();
            assert_eq!(normal, expected, "{side:?}");
        }
    }

    #[test]
    fn corners_lie_on_the_cell_boundary() {
        for side in BlockSide::all() {
            let face = Face::new(0, 0, 0, BlockType::Dirt, side);
            for corner in face.corners() {
                for c in [corner.x, corner.y, corner.z] {
                    assert!(c == 0.0 || c == 1.0);
                }
            }
        }
    }
}
