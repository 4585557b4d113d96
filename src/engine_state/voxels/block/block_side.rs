//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the neighbor offset
//! each face looks through when deciding visibility.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants index per-face tables such as texture lookups.
/// The order is: [Front, Back, Bottom, Top, Left, Right]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    Front = 0,

    /// The back face (facing negative Z)
    Back = 1,

    /// The bottom face (facing negative Y)
    Bottom = 2,

    /// The top face (facing positive Y)
    Top = 3,

    /// The left face (facing negative X)
    Left = 4,

    /// The right face (facing positive X)
    Right = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [Front, Back, Bottom, Top, Left, Right]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Front,
            BlockSide::Back,
            BlockSide::Bottom,
            BlockSide::Top,
            BlockSide::Left,
            BlockSide::Right,
        ]
    }

    /// Offset from a block to the neighbor this face touches.
    ///
    /// A face is visible when the block at this offset is transparent.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::Front => Vector3::new(0, 0, 1),
            BlockSide::Back => Vector3::new(0, 0, -1),
            BlockSide::Bottom => Vector3::new(0, -1, 0),
            BlockSide::Top => Vector3::new(0, 1, 0),
            BlockSide::Left => Vector3::new(-1, 0, 0),
            BlockSide::Right => Vector3::new(1, 0, 0),
        }
    }

    /// The face on the other side of the shared boundary.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::Front => BlockSide::Back,
            BlockSide::Back => BlockSide::Front,
            BlockSide::Bottom => BlockSide::Top,
            BlockSide::Top => BlockSide::Bottom,
            BlockSide::Left => BlockSide::Right,
            BlockSide::Right => BlockSide::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_faces_have_opposite_normals() {
        for side in BlockSide::all() {
            assert_eq!(side.normal(), -side.opposite().normal());
            assert_eq!(side.opposite().opposite(), side);
        }
    }
}
