//! Per-chunk biome classification.

use crate::config::BiomeConfig;

use super::block::block_type::LeafColor;

/// Decorative climate of a chunk. Governs only the leaf color of its trees.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BiomeType {
    /// Green leaves.
    Forest,
    /// Red leaves.
    Autumn,
    /// Brown leaves.
    Savanna,
}

impl BiomeType {
    /// Classifies a biome noise sample against the configured cut points.
    pub fn classify(value: f64, config: &BiomeConfig) -> Self {
        if value < config.forest_below {
            BiomeType::Forest
        } else if value < config.autumn_below {
            BiomeType::Autumn
        } else {
            BiomeType::Savanna
        }
    }

    /// Leaf color used by trees in this biome.
    pub fn leaf_color(self) -> LeafColor {
        match self {
            BiomeType::Forest => LeafColor::Green,
            BiomeType::Autumn => LeafColor::Red,
            BiomeType::Savanna => LeafColor::Brown,
        }
    }
}
