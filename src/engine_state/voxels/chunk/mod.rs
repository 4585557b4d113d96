//! # Chunk Module
//!
//! This module provides the chunk coordinate type, the dense block `Volume`
//! produced by terrain generation, and the resident `Chunk` that owns a volume
//! together with its current mesh.
//!
//! ## Storage
//!
//! A volume stores one compact `Block` per cell in y-major order
//! (`index = (y * SZ + z) * SX + x`), so every horizontal slice is contiguous.
//! Volumes are moved between pipeline stages, never shared.

use cgmath::{Point2, Point3};
use serde::{Deserialize, Serialize};

use super::block::{block_type::BlockType, Block};
use crate::engine_state::rendering::meshing::Mesh;

pub mod chunk_iteration;

/// Default chunk footprint along X.
pub const CHUNK_SIZE_X: usize = 16;
/// Default chunk height.
pub const CHUNK_SIZE_Y: usize = 384;
/// Default chunk footprint along Z.
pub const CHUNK_SIZE_Z: usize = 16;

/// Identifies a column of the world. Unique key of every chunk-indexed map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Column index along world X.
    pub x: i32,
    /// Column index along world Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The four chunks sharing a face with this one, in -X, +X, -Z, +Z order.
    pub fn lateral_neighbors(self) -> [ChunkCoord; 4] {
        [self.offset(-1, 0), self.offset(1, 0), self.offset(0, -1), self.offset(0, 1)]
    }

    /// Offsets this coordinate by a number of chunks, saturating at the ends
    /// of the `i32` range.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoord::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }
}

impl From<Point2<i32>> for ChunkCoord {
    fn from(point: Point2<i32>) -> Self {
        ChunkCoord::new(point.x, point.y)
    }
}

/// Shape of every chunk, fixed for the lifetime of a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkDimensions {
    /// Footprint along X.
    pub size_x: usize,
    /// Height along Y.
    pub size_y: usize,
    /// Footprint along Z.
    pub size_z: usize,
}

impl Default for ChunkDimensions {
    fn default() -> Self {
        ChunkDimensions {
            size_x: CHUNK_SIZE_X,
            size_y: CHUNK_SIZE_Y,
            size_z: CHUNK_SIZE_Z,
        }
    }
}

impl ChunkDimensions {
    /// Number of cells in one volume.
    pub fn cell_count(&self) -> usize {
        self.size_x * self.size_y * self.size_z
    }

    /// Chunk containing a world-space position (floor division by the footprint).
    ///
    /// Positions beyond the `i32` range clamp to the outermost chunk.
    pub fn chunk_of_position(&self, position: Point3<f32>) -> ChunkCoord {
        ChunkCoord::new(
            (position.x / self.size_x as f32).floor() as i32,
            (position.z / self.size_z as f32).floor() as i32,
        )
    }

    /// Splits a world block position into its chunk and the local cell.
    ///
    /// Returns `None` when `y` lies outside `[0, size_y)`. Negative X/Z resolve
    /// to the chunk on the negative side with a non-negative local cell.
    pub fn world_to_local(&self, position: Point3<i32>) -> Option<(ChunkCoord, Point3<usize>)> {
        if position.y < 0 || position.y as usize >= self.size_y {
            return None;
        }
        let size_x = self.size_x as i32;
        let size_z = self.size_z as i32;
        let coord = ChunkCoord::new(position.x.div_euclid(size_x), position.z.div_euclid(size_z));
        let local = Point3::new(
            position.x.rem_euclid(size_x) as usize,
            position.y as usize,
            position.z.rem_euclid(size_z) as usize,
        );
        Some((coord, local))
    }

    /// World position of a chunk's (0, 0, 0) cell, saturating for chunks
    /// beyond the `i32` block range.
    pub fn chunk_origin(&self, coord: ChunkCoord) -> Point3<i32> {
        Point3::new(
            coord.x.saturating_mul(self.size_x as i32),
            0,
            coord.z.saturating_mul(self.size_z as i32),
        )
    }
}

/// Dense block storage for one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Volume {
    dimensions: ChunkDimensions,
    blocks: Vec<Block>,
}

impl Volume {
    /// Creates a volume filled with air.
    pub fn new(dimensions: ChunkDimensions) -> Self {
        Volume {
            dimensions,
            blocks: vec![Block::new(BlockType::Air); dimensions.cell_count()],
        }
    }

    /// Creates a volume filled with one block type.
    pub fn filled(dimensions: ChunkDimensions, block_type: BlockType) -> Self {
        Volume {
            dimensions,
            blocks: vec![Block::new(block_type); dimensions.cell_count()],
        }
    }

    /// Shape of this volume.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.dimensions
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.dimensions.size_z + z) * self.dimensions.size_x + x
    }

    /// Whether the signed cell coordinates fall inside the volume.
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.dimensions.size_x
            && (y as usize) < self.dimensions.size_y
            && (z as usize) < self.dimensions.size_z
    }

    /// Block type at a cell.
    ///
    /// # Panics
    /// Panics if the cell is outside the volume.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.blocks[self.index(x, y, z)].get_type()
    }

    /// Block type at signed cell coordinates, `None` outside the volume.
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        if self.contains(x, y, z) {
            Some(self.get(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Overwrites one cell.
    ///
    /// # Panics
    /// Panics if the cell is outside the volume.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block_type: BlockType) {
        let index = self.index(x, y, z);
        self.blocks[index] = Block::new(block_type);
    }

    /// Height of the highest non-air cell in a column, if any.
    pub fn top_block_height(&self, x: usize, z: usize) -> Option<usize> {
        (0..self.dimensions.size_y)
            .rev()
            .find(|&y| !self.get(x, y, z).is_air())
    }

    /// Highest non-air block in a column, `Air` for an empty column.
    pub fn top_block(&self, x: usize, z: usize) -> BlockType {
        self.top_block_height(x, z)
            .map(|y| self.get(x, y, z))
            .unwrap_or(BlockType::Air)
    }

    /// Raw compact bytes of the volume, in storage order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }
}

/// A chunk instantiated near the observer: its volume plus the mesh built from it.
#[derive(Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkCoord,
    /// World position of the chunk's (0, 0, 0) cell; meshes are local to it.
    pub origin: Point3<i32>,
    /// Block data. Mutated only by edits on the control thread.
    pub volume: Volume,
    /// Current mesh; replaced wholesale on every rebuild.
    pub mesh: Mesh,
    /// Number of times the mesh has been built. Starts at zero before the first build.
    pub mesh_revision: u64,
}

impl Chunk {
    /// Wraps a freshly generated volume. The mesh is empty until the first build.
    pub fn new(position: ChunkCoord, volume: Volume) -> Self {
        let origin = volume.dimensions().chunk_origin(position);
        Chunk {
            position,
            origin,
            volume,
            mesh: Mesh::new(),
            mesh_revision: 0,
        }
    }

    /// Installs a rebuilt mesh.
    pub fn replace_mesh(&mut self, mesh: Mesh) {
        self.mesh = mesh;
        self.mesh_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ChunkDimensions {
        ChunkDimensions {
            size_x: 4,
            size_y: 6,
            size_z: 5,
        }
    }

    #[test]
    fn set_and_get_address_distinct_cells() {
        let mut volume = Volume::new(small());
        volume.set(3, 5, 4, BlockType::Stone);
        volume.set(0, 0, 0, BlockType::Dirt);
        assert_eq!(volume.get(3, 5, 4), BlockType::Stone);
        assert_eq!(volume.get(0, 0, 0), BlockType::Dirt);
        assert_eq!(volume.get(3, 4, 4), BlockType::Air);
        assert_eq!(volume.get_checked(4, 0, 0), None);
        assert_eq!(volume.get_checked(0, -1, 0), None);
        assert_eq!(volume.as_bytes().len(), 4 * 6 * 5);
    }

    #[test]
    fn world_positions_split_with_floor_semantics() {
        let dims = ChunkDimensions::default();
        let (coord, local) = dims.world_to_local(Point3::new(-1, 10, 16)).unwrap();
        assert_eq!(coord, ChunkCoord::new(-1, 1));
        assert_eq!(local, Point3::new(15, 10, 0));

        let (coord, local) = dims.world_to_local(Point3::new(-16, 0, -17)).unwrap();
        assert_eq!(coord, ChunkCoord::new(-1, -2));
        assert_eq!(local, Point3::new(0, 0, 15));

        assert!(dims.world_to_local(Point3::new(0, -1, 0)).is_none());
        assert!(dims.world_to_local(Point3::new(0, CHUNK_SIZE_Y as i32, 0)).is_none());
    }

    #[test]
    fn observer_positions_floor_into_chunks() {
        let dims = ChunkDimensions::default();
        assert_eq!(dims.chunk_of_position(Point3::new(0.5, 80.0, 15.9)), ChunkCoord::new(0, 0));
        assert_eq!(dims.chunk_of_position(Point3::new(-0.1, 0.0, 16.0)), ChunkCoord::new(-1, 1));
    }

    #[test]
    fn far_positions_saturate_instead_of_overflowing() {
        let dims = ChunkDimensions::default();
        let corner = dims.chunk_of_position(Point3::new(f32::MAX, 0.0, -f32::MAX));
        assert_eq!(corner, ChunkCoord::new(i32::MAX, i32::MIN));
        assert_eq!(dims.chunk_origin(corner), Point3::new(i32::MAX, 0, i32::MIN));
        assert_eq!(
            corner.lateral_neighbors(),
            [
                ChunkCoord::new(i32::MAX - 1, i32::MIN),
                corner,
                corner,
                ChunkCoord::new(i32::MAX, i32::MIN + 1),
            ]
        );
        assert_eq!(corner.offset(3, -3), corner);
    }

    #[test]
    fn top_block_skips_air() {
        let mut volume = Volume::new(small());
        assert_eq!(volume.top_block(1, 1), BlockType::Air);
        volume.set(1, 2, 1, BlockType::Grass);
        volume.set(1, 0, 1, BlockType::Stone);
        assert_eq!(volume.top_block(1, 1), BlockType::Grass);
        assert_eq!(volume.top_block_height(1, 1), Some(2));
    }

    #[test]
    fn replacing_the_mesh_bumps_the_revision() {
        let mut chunk = Chunk::new(ChunkCoord::new(2, -1), Volume::new(small()));
        assert_eq!(chunk.origin, Point3::new(8, 0, -5));
        assert_eq!(chunk.mesh_revision, 0);
        chunk.replace_mesh(Mesh::new());
        assert_eq!(chunk.mesh_revision, 1);
    }
}
