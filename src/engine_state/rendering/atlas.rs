//! Texture atlas addressing.
//!
//! The atlas is a single square image split into `N × N` tiles. Tile `i` sits
//! in column `i % N` and row `i / N`, with row 0 at the top of the image. UVs
//! use a bottom-left origin, so rows are flipped when converted.

use crate::config::AtlasConfig;

/// UV rectangle of one atlas tile, already shrunk by the padding.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileRect {
    /// Left edge.
    pub u_min: f32,
    /// Bottom edge.
    pub v_min: f32,
    /// Right edge.
    pub u_max: f32,
    /// Top edge.
    pub v_max: f32,
}

/// Maps atlas tile indices to UV rectangles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureAtlas {
    tiles_per_side: u32,
    padding: f32,
}

impl TextureAtlas {
    /// Creates an atlas with `tiles_per_side` tiles per row and column.
    ///
    /// `padding` is the inward inset applied to every tile edge, as a fraction
    /// of one tile; it keeps bilinear sampling from bleeding into neighbors.
    pub fn new(tiles_per_side: u32, padding: f32) -> Self {
        TextureAtlas {
            tiles_per_side: tiles_per_side.max(1),
            padding,
        }
    }

    /// Tiles per atlas row and column.
    pub fn tiles_per_side(&self) -> u32 {
        self.tiles_per_side
    }

    /// UV rectangle of a tile.
    pub fn tile(&self, index: usize) -> TileRect {
        let n = self.tiles_per_side as usize;
        let tile = 1.0 / n as f32;
        let inset = self.padding * tile;
        let column = (index % n) as f32;
        let row = (n - 1 - (index / n) % n) as f32;
        TileRect {
            u_min: column * tile + inset,
            v_min: row * tile + inset,
            u_max: (column + 1.0) * tile - inset,
            v_max: (row + 1.0) * tile - inset,
        }
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self::from(&AtlasConfig::default())
    }
}

impl From<&AtlasConfig> for TextureAtlas {
    fn from(config: &AtlasConfig) -> Self {
        TextureAtlas::new(config.tiles_per_side, config.padding)
    }
}
