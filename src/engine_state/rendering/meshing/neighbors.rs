//! Cross-chunk occupancy used for boundary face culling.
//!
//! A chunk's faces on its four lateral edges look into the adjacent chunk.
//! Rather than borrowing whole neighbor volumes, the mesh builder receives
//! one transparency bit per boundary cell of each neighbor.

use bitvec::prelude::*;

use crate::engine_state::voxels::{block::block_side::BlockSide, chunk::Volume};

/// Transparency of one lateral boundary layer of a volume.
///
/// Cells are addressed by `(h, y)` where `h` runs along the layer: Z for the
/// left and right layers, X for the front and back layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryLayer {
    width: usize,
    height: usize,
    transparent: BitVec,
}

impl BoundaryLayer {
    /// Extracts the layer of `volume` on the given lateral side.
    ///
    /// # Returns
    /// `None` for `Top` and `Bottom`, which have no chunk neighbor.
    pub fn from_volume(volume: &Volume, side: BlockSide) -> Option<Self> {
        let dims = volume.dimensions();
        let width = match side {
            BlockSide::Left | BlockSide::Right => dims.size_z,
            BlockSide::Back | BlockSide::Front => dims.size_x,
            BlockSide::Top | BlockSide::Bottom => return None,
        };

        let mut transparent = bitvec![0; width * dims.size_y];
        for y in 0..dims.size_y {
            for h in 0..width {
                let (x, z) = match side {
                    BlockSide::Left => (0, h),
                    BlockSide::Right => (dims.size_x - 1, h),
                    BlockSide::Back => (h, 0),
                    _ => (h, dims.size_z - 1),
                };
                transparent.set(y * width + h, volume.get(x, y, z).is_transparent());
            }
        }
        Some(BoundaryLayer {
            width,
            height: dims.size_y,
            transparent,
        })
    }

    /// Whether the cell at `(h, y)` is transparent. Cells outside the layer
    /// are reported as transparent.
    pub fn is_transparent(&self, h: usize, y: usize) -> bool {
        if h >= self.width || y >= self.height {
            return true;
        }
        self.transparent[y * self.width + h]
    }
}

/// Boundary layers of the four lateral neighbors of a chunk.
///
/// Each entry holds the neighbor's layer that touches this chunk: the left
/// neighbor contributes its right layer, and so on. An absent entry means the
/// neighbor is not resident, and faces against it are emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborContext {
    /// Layer of the chunk at -X.
    pub left: Option<BoundaryLayer>,
    /// Layer of the chunk at +X.
    pub right: Option<BoundaryLayer>,
    /// Layer of the chunk at -Z.
    pub back: Option<BoundaryLayer>,
    /// Layer of the chunk at +Z.
    pub front: Option<BoundaryLayer>,
}

impl NeighborContext {
    /// Context with no known neighbors.
    pub fn none() -> Self {
        NeighborContext::default()
    }

    /// Records the neighbor volume lying on `side` of the chunk being meshed.
    pub fn with_neighbor(mut self, side: BlockSide, neighbor: &Volume) -> Self {
        let layer = BoundaryLayer::from_volume(neighbor, side.opposite());
        match side {
            BlockSide::Left => self.left = layer,
            BlockSide::Right => self.right = layer,
            BlockSide::Back => self.back = layer,
            BlockSide::Front => self.front = layer,
            BlockSide::Top | BlockSide::Bottom => {}
        }
        self
    }

    /// Layer of the neighbor on a side, if known.
    pub fn layer(&self, side: BlockSide) -> Option<&BoundaryLayer> {
        match side {
            BlockSide::Left => self.left.as_ref(),
            BlockSide::Right => self.right.as_ref(),
            BlockSide::Back => self.back.as_ref(),
            BlockSide::Front => self.front.as_ref(),
            BlockSide::Top | BlockSide::Bottom => None,
        }
    }
}
