//! # World Module
//!
//! This module provides the `World` struct which owns every resident chunk.
//! It is the single place where chunks are inserted, looked up, edited,
//! re-meshed and dropped.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks that the streaming manager has
//! promoted are kept. Resident volumes are owned by the control thread, so no
//! locking is needed; background workers never see them.
//!
//! ## Coordinates
//!
//! World block positions are split into a chunk coordinate and a local cell
//! with Euclidean division, so negative positions resolve to the chunk on the
//! negative side.

use std::collections::HashMap;

use cgmath::Point3;
use log::warn;

use crate::engine_state::{
    rendering::{Mesh, MeshBuilder, NeighborContext},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        chunk::{Chunk, ChunkCoord, ChunkDimensions},
    },
};

/// Represents the resident part of a voxel world.
pub struct World {
    /// Shape shared by every chunk.
    dimensions: ChunkDimensions,
    /// A mapping from chunk coordinates to resident chunks.
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - Shape of every chunk that will be inserted
    pub fn new(dimensions: ChunkDimensions) -> Self {
        World {
            dimensions,
            chunks: HashMap::new(),
        }
    }

    /// Shape of every chunk.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.dimensions
    }

    /// Number of resident chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether a chunk is resident.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Coordinates of every resident chunk, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Retrieves the chunk at the specified chunk coordinates for mutation.
    pub fn get_chunk_at_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Adds a chunk if none is resident at its position.
    ///
    /// # Returns
    ///
    /// `true` if the chunk was inserted, `false` if the coordinate was taken.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> bool {
        if self.chunks.contains_key(&chunk.position) {
            warn!(
                "Refusing duplicate chunk at ({}, {})",
                chunk.position.x, chunk.position.z
            );
            return false;
        }
        self.chunks.insert(chunk.position, chunk);
        true
    }

    /// Drops a resident chunk.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// Splits a world block position into its chunk and local cell.
    ///
    /// # Returns
    ///
    /// `None` when `y` is outside the chunk height.
    pub fn world_to_local(&self, position: Point3<i32>) -> Option<(ChunkCoord, Point3<usize>)> {
        self.dimensions.world_to_local(position)
    }

    /// Block type at a world position, `None` when its chunk is not resident
    /// or `y` is out of range.
    pub fn get_block_type_at(&self, position: Point3<i32>) -> Option<BlockType> {
        let (coord, local) = self.world_to_local(position)?;
        let chunk = self.chunks.get(&coord)?;
        Some(chunk.volume.get(local.x, local.y, local.z))
    }

    /// Overwrites one block without re-meshing.
    ///
    /// # Returns
    ///
    /// The chunk and local cell written, or `None` if the position is not
    /// resolvable.
    pub fn set_block_at(&mut self, position: Point3<i32>, block_type: BlockType) -> Option<(ChunkCoord, Point3<usize>)> {
        let (coord, local) = self.world_to_local(position)?;
        let chunk = self.chunks.get_mut(&coord)?;
        chunk.volume.set(local.x, local.y, local.z, block_type);
        Some((coord, local))
    }

    /// Boundary context of a chunk from whichever lateral neighbors are resident.
    pub fn neighbor_context(&self, coord: ChunkCoord) -> NeighborContext {
        let sides = [
            (BlockSide::Left, coord.offset(-1, 0)),
            (BlockSide::Right, coord.offset(1, 0)),
            (BlockSide::Back, coord.offset(0, -1)),
            (BlockSide::Front, coord.offset(0, 1)),
        ];
        sides
            .into_iter()
            .fold(NeighborContext::none(), |context, (side, neighbor)| {
                match self.chunks.get(&neighbor) {
                    Some(chunk) => context.with_neighbor(side, &chunk.volume),
                    None => context,
                }
            })
    }

    /// Rebuilds the mesh of a resident chunk from its volume and neighbors.
    ///
    /// # Returns
    ///
    /// `false` if the chunk is not resident.
    pub fn rebuild_mesh(&mut self, coord: ChunkCoord, builder: &MeshBuilder) -> bool {
        let context = self.neighbor_context(coord);
        let Some(chunk) = self.chunks.get(&coord) else {
            return false;
        };
        let mesh = builder.build(&chunk.volume, &context);
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                chunk.replace_mesh(mesh);
                true
            }
            None => false,
        }
    }

    /// Current mesh of a resident chunk.
    pub fn chunk_mesh(&self, coord: ChunkCoord) -> Option<&Mesh> {
        self.chunks.get(&coord).map(|chunk| &chunk.mesh)
    }

    /// Highest non-air block of the chunk's centre column.
    pub fn top_block_type_at(&self, coord: ChunkCoord) -> Option<BlockType> {
        let chunk = self.chunks.get(&coord)?;
        Some(
            chunk
                .volume
                .top_block(self.dimensions.size_x / 2, self.dimensions.size_z / 2),
        )
    }

    /// Highest non-air block of every column, indexed `[x][z]`.
    pub fn top_blocks_in_chunk(&self, coord: ChunkCoord) -> Option<Vec<Vec<BlockType>>> {
        let chunk = self.chunks.get(&coord)?;
        Some(
            (0..self.dimensions.size_x)
                .map(|x| {
                    (0..self.dimensions.size_z)
                        .map(|z| chunk.volume.top_block(x, z))
                        .collect()
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::Volume;

    fn dims() -> ChunkDimensions {
        ChunkDimensions {
            size_x: 4,
            size_y: 8,
            size_z: 4,
        }
    }

    fn world_with(coords: &[(i32, i32)]) -> World {
        let mut world = World::new(dims());
        for &(x, z) in coords {
            let mut volume = Volume::new(dims());
            for cx in 0..4 {
                for cz in 0..4 {
                    for y in 0..3 {
                        volume.set(cx, y, cz, BlockType::Stone);
                    }
                    volume.set(cx, 3, cz, BlockType::Grass);
                }
            }
            assert!(world.insert_chunk(Chunk::new(ChunkCoord::new(x, z), volume)));
        }
        world
    }

    #[test]
    fn duplicate_chunks_are_refused() {
        let mut world = world_with(&[(0, 0)]);
        assert!(!world.insert_chunk(Chunk::new(ChunkCoord::new(0, 0), Volume::new(dims()))));
        assert_eq!(world.get_block_type_at(Point3::new(1, 3, 1)), Some(BlockType::Grass));
    }

    #[test]
    fn block_queries_resolve_negative_positions() {
        let mut world = world_with(&[(-1, -1)]);
        assert_eq!(world.get_block_type_at(Point3::new(-1, 0, -4)), Some(BlockType::Stone));
        assert_eq!(world.get_block_type_at(Point3::new(0, 0, 0)), None);
        assert_eq!(world.get_block_type_at(Point3::new(-1, 8, -1)), None);

        let written = world.set_block_at(Point3::new(-4, 5, -1), BlockType::Wood);
        assert_eq!(written, Some((ChunkCoord::new(-1, -1), Point3::new(0, 5, 3))));
        assert_eq!(world.get_block_type_at(Point3::new(-4, 5, -1)), Some(BlockType::Wood));
    }

    #[test]
    fn rebuild_uses_resident_neighbors() {
        let mut world = world_with(&[(0, 0)]);
        let builder = MeshBuilder::default();
        assert!(world.rebuild_mesh(ChunkCoord::new(0, 0), &builder));
        let alone = world.chunk_mesh(ChunkCoord::new(0, 0)).unwrap().quad_count();

        let mut world = world_with(&[(0, 0), (1, 0)]);
        assert!(world.rebuild_mesh(ChunkCoord::new(0, 0), &builder));
        let joined = world.chunk_mesh(ChunkCoord::new(0, 0)).unwrap().quad_count();
        // The 4×4 face toward +X is hidden by the neighbor.
        assert_eq!(alone - joined, 16);
        assert_eq!(world.get_chunk_at(ChunkCoord::new(0, 0)).unwrap().mesh_revision, 1);
        assert!(!world.rebuild_mesh(ChunkCoord::new(5, 5), &builder));
    }

    #[test]
    fn top_block_queries() {
        let mut world = world_with(&[(0, 0)]);
        assert_eq!(world.top_block_type_at(ChunkCoord::new(0, 0)), Some(BlockType::Grass));
        assert_eq!(world.top_block_type_at(ChunkCoord::new(1, 0)), None);

        world.set_block_at(Point3::new(2, 6, 2), BlockType::LeavesRed);
        assert_eq!(world.top_block_type_at(ChunkCoord::new(0, 0)), Some(BlockType::LeavesRed));

        let tops = world.top_blocks_in_chunk(ChunkCoord::new(0, 0)).unwrap();
        assert_eq!(tops.len(), 4);
        assert!(tops.iter().all(|row| row.len() == 4));
        assert_eq!(tops[2][2], BlockType::LeavesRed);
        assert_eq!(tops[0][3], BlockType::Grass);
        assert!(world.top_blocks_in_chunk(ChunkCoord::new(9, 9)).is_none());
    }
}
