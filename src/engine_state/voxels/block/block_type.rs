//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides block type identification, compact-integer conversion, name lookup
//! and the leaf-variant helpers used by tree decoration.

use std::fmt;

use num_derive::FromPrimitive;
use phf::phf_map;

use super::BlockTypeSize;

/// Number of distinct block types. Used to size the static lookup tables.
pub const BLOCK_TYPE_COUNT: usize = 16;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion back from the compact
/// `BlockTypeSize` representation stored inside chunk volumes.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Transparent, never meshed.
    Air,
    /// Plain dirt, found in the strata band below grass.
    Dirt,
    /// Surface block with distinct top, side and bottom textures.
    Grass,
    /// Player building material; never generated.
    Cobblestone,
    /// Bulk underground material and the only block eligible for ore.
    Stone,
    /// Fills the space between terrain and sea level. Transparent.
    Water,
    /// Shallowest ore.
    Coal,
    /// Mid-depth ore.
    Iron,
    /// Deepest ore.
    Gold,
    /// Tree trunk.
    Wood,
    /// Forest leaves.
    LeavesGreen,
    /// Savanna leaves.
    LeavesBrown,
    /// Autumn leaves.
    LeavesRed,
    /// Forest leaves drawn with the see-through material.
    TransparentLeavesGreen,
    /// Savanna leaves drawn with the see-through material.
    TransparentLeavesBrown,
    /// Autumn leaves drawn with the see-through material.
    TransparentLeavesRed,
}

/// Color family of a leaf block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LeafColor {
    /// Green leaves.
    Green,
    /// Brown leaves.
    Brown,
    /// Red leaves.
    Red,
}

/// Lookup from lower-case block names to block types, for config files and
/// inventory tooling that refer to blocks by name.
static BLOCK_TYPE_BY_NAME: phf::Map<&'static str, BlockType> = phf_map! {
    "air" => BlockType::Air,
    "dirt" => BlockType::Dirt,
    "grass" => BlockType::Grass,
    "cobblestone" => BlockType::Cobblestone,
    "stone" => BlockType::Stone,
    "water" => BlockType::Water,
    "coal" => BlockType::Coal,
    "iron" => BlockType::Iron,
    "gold" => BlockType::Gold,
    "wood" => BlockType::Wood,
    "leaves_green" => BlockType::LeavesGreen,
    "leaves_brown" => BlockType::LeavesBrown,
    "leaves_red" => BlockType::LeavesRed,
    "transparent_leaves_green" => BlockType::TransparentLeavesGreen,
    "transparent_leaves_brown" => BlockType::TransparentLeavesBrown,
    "transparent_leaves_red" => BlockType::TransparentLeavesRed,
};

impl BlockType {
    /// Converts a compact `BlockTypeSize` back to a `BlockType`.
    ///
    /// Values that do not name a block type decode as `Air`; volumes only ever
    /// store values written from a `BlockType`, so this is not reachable in
    /// practice.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        num_traits::FromPrimitive::from_u8(btype).unwrap_or(BlockType::Air)
    }

    /// Looks a block type up by its lower-case snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_BY_NAME.get(name).copied()
    }

    /// Whether faces of neighboring blocks are visible through this block.
    ///
    /// Air, water and every leaf variant are transparent; the "transparent"
    /// leaf variants differ only in the material used to draw them.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::Air | BlockType::Water) || self.leaf_variant().is_some()
    }

    /// Whether this is the empty block.
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    /// Builds the leaf block for a color and material.
    pub fn leaves(color: LeafColor, transparent: bool) -> Self {
        match (color, transparent) {
            (LeafColor::Green, false) => BlockType::LeavesGreen,
            (LeafColor::Brown, false) => BlockType::LeavesBrown,
            (LeafColor::Red, false) => BlockType::LeavesRed,
            (LeafColor::Green, true) => BlockType::TransparentLeavesGreen,
            (LeafColor::Brown, true) => BlockType::TransparentLeavesBrown,
            (LeafColor::Red, true) => BlockType::TransparentLeavesRed,
        }
    }

    /// Splits a leaf block into `(color, transparent)`. `None` for non-leaves.
    pub fn leaf_variant(self) -> Option<(LeafColor, bool)> {
        match self {
            BlockType::LeavesGreen => Some((LeafColor::Green, false)),
            BlockType::LeavesBrown => Some((LeafColor::Brown, false)),
            BlockType::LeavesRed => Some((LeafColor::Red, false)),
            BlockType::TransparentLeavesGreen => Some((LeafColor::Green, true)),
            BlockType::TransparentLeavesBrown => Some((LeafColor::Brown, true)),
            BlockType::TransparentLeavesRed => Some((LeafColor::Red, true)),
            _ => None,
        }
    }

    /// Human readable name, as shown in inventory slots.
    pub fn display_name(self) -> &'static str {
        match self {
            BlockType::Air => "Air",
            BlockType::Dirt => "Dirt",
            BlockType::Grass => "Grass Block",
            BlockType::Cobblestone => "Cobblestone",
            BlockType::Stone => "Stone",
            BlockType::Water => "Water",
            BlockType::Coal => "Coal Ore",
            BlockType::Iron => "Iron Ore",
            BlockType::Gold => "Gold Ore",
            BlockType::Wood => "Wood",
            BlockType::LeavesGreen => "Green Leaves",
            BlockType::LeavesBrown => "Brown Leaves",
            BlockType::LeavesRed => "Red Leaves",
            BlockType::TransparentLeavesGreen => "Transparent Green Leaves",
            BlockType::TransparentLeavesBrown => "Transparent Brown Leaves",
            BlockType::TransparentLeavesRed => "Transparent Red Leaves",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
