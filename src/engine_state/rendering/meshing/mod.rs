//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk volume into an indexed triangle mesh with
//! per-face culling. The goals are:
//! 1. Emit exactly one quad between an opaque cell and anything see-through
//! 2. Emit nothing between two opaque cells
//! 3. Stay consistent across chunk seams by consulting neighbor boundaries
//!
//! # Architecture
//! - `MeshBuilder`: stateless builder holding only the atlas layout
//! - `NeighborContext`: transparency of the four lateral neighbor boundaries
//! - `mesh/`: the `Mesh` and `Face` data structures
//!
//! # Visibility Rules
//! A non-air cell shows a face when the cell across it is transparent (air,
//! water, any leaves) or lies outside the volume's vertical range. Lateral
//! lookups that leave the volume go through the neighbor context; a known
//! neighbor is obeyed, an unknown one shows the face.
//!
//! Building is a pure function of its inputs, so the same volume and context
//! always produce the same mesh.

mod mesh;
mod neighbors;

pub use mesh::*;
pub use neighbors::{BoundaryLayer, NeighborContext};

use crate::engine_state::{
    rendering::atlas::TextureAtlas,
    voxels::{block::block_side::BlockSide, chunk::Volume},
};

/// Builds chunk meshes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MeshBuilder {
    atlas: TextureAtlas,
}

impl MeshBuilder {
    /// Creates a builder that maps tiles through the given atlas.
    pub fn new(atlas: TextureAtlas) -> Self {
        MeshBuilder { atlas }
    }

    /// Atlas layout used for UVs.
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// Builds the full mesh of a volume.
    ///
    /// # Arguments
    /// * `volume` - The chunk's blocks
    /// * `neighbors` - Boundary transparency of the lateral neighbors
    ///
    /// # Returns
    /// A new mesh; callers replace the previous mesh with it wholesale.
    pub fn build(&self, volume: &Volume, neighbors: &NeighborContext) -> Mesh {
        let mut mesh = Mesh::new();
        for (position, block_type) in volume.solid_blocks() {
            for side in BlockSide::all() {
                if face_visible(volume, neighbors, position.x, position.y, position.z, side) {
                    let face = Face::new(position.x, position.y, position.z, block_type, side);
                    mesh.push_face(&face, &self.atlas);
                }
            }
        }
        mesh
    }
}

/// Whether the face of cell `(x, y, z)` on `side` is exposed.
fn face_visible(volume: &Volume, neighbors: &NeighborContext, x: usize, y: usize, z: usize, side: BlockSide) -> bool {
    let dims = volume.dimensions();
    let normal = side.normal();
    let nx = x as i64 + normal.x as i64;
    let ny = y as i64 + normal.y as i64;
    let nz = z as i64 + normal.z as i64;

    if ny < 0 || ny >= dims.size_y as i64 {
        return true;
    }
    let ny = ny as usize;

    let lateral = if nx < 0 {
        Some((BlockSide::Left, z))
    } else if nx >= dims.size_x as i64 {
        Some((BlockSide::Right, z))
    } else if nz < 0 {
        Some((BlockSide::Back, x))
    } else if nz >= dims.size_z as i64 {
        Some((BlockSide::Front, x))
    } else {
        None
    };

    match lateral {
        None => volume.get(nx as usize, ny, nz as usize).is_transparent(),
        Some((side, h)) => neighbors
            .layer(side)
            .map_or(true, |layer| layer.is_transparent(h, ny)),
    }
}
