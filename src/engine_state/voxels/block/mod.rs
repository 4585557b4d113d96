//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the static
//! per-type tables (atlas textures, minimap colors).

use block_side::BlockSide;
use block_type::{BlockType, BLOCK_TYPE_COUNT};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// Chunk volumes store blocks in this compact form.
pub type BlockTypeSize = u8;

/// Atlas tile indices for each face of a block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceTextures {
    /// Texture on the +Y face
    pub up: usize,
    /// Texture on the -Y face
    pub down: usize,
    /// Texture on the +Z face
    pub front: usize,
    /// Texture on the -Z face
    pub back: usize,
    /// Texture on the -X face
    pub left: usize,
    /// Texture on the +X face
    pub right: usize,
}

impl FaceTextures {
    /// Same tile on every face.
    pub const fn all(index: usize) -> Self {
        FaceTextures {
            up: index,
            down: index,
            front: index,
            back: index,
            left: index,
            right: index,
        }
    }

    /// Distinct top and bottom tiles, one tile shared by the four sides.
    pub const fn top_side_bottom(top: usize, side: usize, bottom: usize) -> Self {
        FaceTextures {
            up: top,
            down: bottom,
            front: side,
            back: side,
            left: side,
            right: side,
        }
    }

    /// Tile used for one face.
    pub fn for_side(&self, side: BlockSide) -> usize {
        match side {
            BlockSide::Front => self.front,
            BlockSide::Back => self.back,
            BlockSide::Bottom => self.down,
            BlockSide::Top => self.up,
            BlockSide::Left => self.left,
            BlockSide::Right => self.right,
        }
    }
}

/// Maps each block type to its atlas tiles, indexed by `BlockType as usize`.
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [FaceTextures; BLOCK_TYPE_COUNT] = [
    FaceTextures::all(0),                     // AIR (never meshed)
    FaceTextures::all(1),                     // DIRT
    FaceTextures::top_side_bottom(3, 2, 1),   // GRASS
    FaceTextures::all(4),                     // COBBLESTONE
    FaceTextures::all(5),                     // STONE
    FaceTextures::all(6),                     // WATER
    FaceTextures::all(7),                     // COAL
    FaceTextures::all(8),                     // IRON
    FaceTextures::all(9),                     // GOLD
    FaceTextures::top_side_bottom(17, 16, 17), // WOOD
    FaceTextures::all(18),                    // LEAVES GREEN
    FaceTextures::all(19),                    // LEAVES BROWN
    FaceTextures::all(20),                    // LEAVES RED
    FaceTextures::all(21),                    // TRANSPARENT LEAVES GREEN
    FaceTextures::all(22),                    // TRANSPARENT LEAVES BROWN
    FaceTextures::all(23),                    // TRANSPARENT LEAVES RED
];

/// RGB color used when a block is seen from above on the minimap.
pub static BLOCK_TYPE_TO_MINIMAP_COLOR: [[f32; 3]; BLOCK_TYPE_COUNT] = [
    [0.8, 0.8, 1.0],    // AIR
    [0.6, 0.4, 0.2],    // DIRT
    [0.3, 0.8, 0.3],    // GRASS
    [0.45, 0.45, 0.45], // COBBLESTONE
    [0.5, 0.5, 0.5],    // STONE
    [0.2, 0.2, 0.8],    // WATER
    [0.2, 0.2, 0.2],    // COAL
    [0.8, 0.7, 0.6],    // IRON
    [1.0, 0.8, 0.0],    // GOLD
    [0.6, 0.3, 0.0],    // WOOD
    [0.0, 0.5, 0.0],    // LEAVES GREEN
    [0.45, 0.32, 0.18], // LEAVES BROWN
    [0.6, 0.1, 0.1],    // LEAVES RED
    [0.2, 0.7, 0.2],    // TRANSPARENT LEAVES GREEN
    [0.55, 0.42, 0.28], // TRANSPARENT LEAVES BROWN
    [0.8, 0.2, 0.2],    // TRANSPARENT LEAVES RED
];

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the essential block data.
/// The actual block properties are looked up from the block type.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the layout stable so whole volumes can be
/// viewed as raw bytes. The block type is stored as a compact `BlockTypeSize`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored type.
    pub fn get_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type)
    }

    /// Gets the texture indices for all faces of a block type.
    pub fn get_texture_indices(block_type: BlockType) -> &'static FaceTextures {
        &BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize]
    }

    /// Gets the minimap color of a block type.
    pub fn get_minimap_color(block_type: BlockType) -> [f32; 3] {
        BLOCK_TYPE_TO_MINIMAP_COLOR[block_type as usize]
    }
}
