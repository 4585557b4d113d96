//! # Block Editing
//!
//! Single-block edits on resident chunks. An edit writes one cell and rebuilds
//! the edited chunk's mesh before returning. When the cell lies on a lateral
//! edge, the chunk across that edge is rebuilt too, because its boundary faces
//! depend on the edited cell.
//!
//! Edits never load chunks: positions in non-resident chunks or outside the
//! vertical range are rejected.

use cgmath::Point3;

use crate::engine_state::{
    rendering::MeshBuilder,
    voxels::{
        block::block_type::BlockType,
        chunk::ChunkCoord,
        world::World,
    },
};

/// Axis-aligned box occupied by the observer, used to refuse placing a block
/// inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverBounds {
    /// Lowest corner.
    pub min: Point3<f32>,
    /// Highest corner.
    pub max: Point3<f32>,
}

impl ObserverBounds {
    /// Box from two corners, in any order.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        ObserverBounds {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Upright box standing on `feet`, `width` wide and `height` tall.
    pub fn standing(feet: Point3<f32>, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        ObserverBounds::new(
            Point3::new(feet.x - half, feet.y, feet.z - half),
            Point3::new(feet.x + half, feet.y + height, feet.z + half),
        )
    }

    /// Whether the unit cube of a block intersects the box. Both boxes are
    /// closed, so touching faces count.
    pub fn intersects_block(&self, block: Point3<i32>) -> bool {
        let lo = Point3::new(block.x as f32, block.y as f32, block.z as f32);
        let hi = Point3::new(lo.x + 1.0, lo.y + 1.0, lo.z + 1.0);
        self.min.x <= hi.x
            && lo.x <= self.max.x
            && self.min.y <= hi.y
            && lo.y <= self.max.y
            && self.min.z <= hi.z
            && lo.z <= self.max.z
    }
}

/// Result of a successful edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Chunk holding the edited cell.
    pub chunk: ChunkCoord,
    /// Every chunk rebuilt, the edited one first.
    pub remeshed: Vec<ChunkCoord>,
}

/// Writes one block and rebuilds the affected meshes.
///
/// # Arguments
///
/// * `world` - Resident chunks
/// * `builder` - Mesh builder used for the rebuilds
/// * `position` - World block position
/// * `block_type` - New content of the cell
///
/// # Returns
///
/// `None` when `y` is out of range or the chunk is not resident.
pub fn apply_edit(
    world: &mut World,
    builder: &MeshBuilder,
    position: Point3<i32>,
    block_type: BlockType,
) -> Option<EditOutcome> {
    let (chunk, local) = world.set_block_at(position, block_type)?;
    let dims = world.dimensions();

    let mut affected = vec![chunk];
    if local.x == 0 {
        affected.push(chunk.offset(-1, 0));
    }
    if local.x + 1 == dims.size_x {
        affected.push(chunk.offset(1, 0));
    }
    if local.z == 0 {
        affected.push(chunk.offset(0, -1));
    }
    if local.z + 1 == dims.size_z {
        affected.push(chunk.offset(0, 1));
    }

    let remeshed = affected
        .into_iter()
        .filter(|&coord| world.rebuild_mesh(coord, builder))
        .collect();
    Some(EditOutcome { chunk, remeshed })
}

/// Clears a block to air.
pub fn break_block(world: &mut World, builder: &MeshBuilder, position: Point3<i32>) -> Option<EditOutcome> {
    apply_edit(world, builder, position, BlockType::Air)
}

/// Places a block unless it is air or would overlap the observer.
pub fn place_block(
    world: &mut World,
    builder: &MeshBuilder,
    position: Point3<i32>,
    block_type: BlockType,
    observer: &ObserverBounds,
) -> Option<EditOutcome> {
    if block_type.is_air() || observer.intersects_block(position) {
        return None;
    }
    apply_edit(world, builder, position, block_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{Chunk, ChunkDimensions, Volume};

    fn world(coords: &[(i32, i32)]) -> World {
        let dims = ChunkDimensions {
            size_x: 4,
            size_y: 6,
            size_z: 4,
        };
        let mut world = World::new(dims);
        let builder = MeshBuilder::default();
        for &(x, z) in coords {
            let coord = ChunkCoord::new(x, z);
            world.insert_chunk(Chunk::new(coord, Volume::filled(dims, BlockType::Dirt)));
        }
        for &(x, z) in coords {
            world.rebuild_mesh(ChunkCoord::new(x, z), &builder);
        }
        world
    }

    fn far_away() -> ObserverBounds {
        ObserverBounds::standing(Point3::new(100.0, 100.0, 100.0), 0.6, 1.8)
    }

    #[test]
    fn interior_edit_remeshes_only_its_chunk() {
        let mut world = world(&[(0, 0), (1, 0)]);
        let outcome = break_block(&mut world, &MeshBuilder::default(), Point3::new(1, 5, 2)).unwrap();
        assert_eq!(outcome.chunk, ChunkCoord::new(0, 0));
        assert_eq!(outcome.remeshed, vec![ChunkCoord::new(0, 0)]);
        assert_eq!(world.get_block_type_at(Point3::new(1, 5, 2)), Some(BlockType::Air));
    }

    #[test]
    fn edge_edit_remeshes_the_neighbor() {
        let mut world = world(&[(0, 0), (1, 0), (0, 1)]);
        let builder = MeshBuilder::default();
        let before = world.chunk_mesh(ChunkCoord::new(1, 0)).unwrap().quad_count();

        // Local (3, 2, 3): touches +X and +Z.
        let outcome = break_block(&mut world, &builder, Point3::new(3, 2, 3)).unwrap();
        assert_eq!(
            outcome.remeshed,
            vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0), ChunkCoord::new(0, 1)]
        );
        // The hole exposes one face of the +X neighbor.
        assert_eq!(world.chunk_mesh(ChunkCoord::new(1, 0)).unwrap().quad_count(), before + 1);
    }

    #[test]
    fn negative_positions_resolve_to_the_negative_chunk() {
        let mut world = world(&[(-1, 0), (0, 0)]);
        let outcome = break_block(&mut world, &MeshBuilder::default(), Point3::new(-1, 0, 0)).unwrap();
        assert_eq!(outcome.chunk, ChunkCoord::new(-1, 0));
        assert_eq!(outcome.remeshed, vec![ChunkCoord::new(-1, 0), ChunkCoord::new(0, 0)]);
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut world = world(&[(0, 0)]);
        let builder = MeshBuilder::default();
        assert!(break_block(&mut world, &builder, Point3::new(0, 6, 0)).is_none());
        assert!(break_block(&mut world, &builder, Point3::new(0, -1, 0)).is_none());
        assert!(break_block(&mut world, &builder, Point3::new(9, 1, 0)).is_none());
        assert!(place_block(&mut world, &builder, Point3::new(1, 1, 1), BlockType::Air, &far_away()).is_none());
        assert_eq!(world.get_chunk_at(ChunkCoord::new(0, 0)).unwrap().mesh_revision, 1);
    }

    #[test]
    fn placement_respects_the_observer() {
        let mut world = world(&[(0, 0)]);
        let builder = MeshBuilder::default();
        break_block(&mut world, &builder, Point3::new(1, 5, 1)).unwrap();

        let coord = ChunkCoord::new(0, 0);
        let revision = world.get_chunk_at(coord).unwrap().mesh_revision;
        let observer = ObserverBounds::standing(Point3::new(1.5, 5.0, 1.5), 0.6, 1.8);
        assert!(place_block(&mut world, &builder, Point3::new(1, 5, 1), BlockType::Stone, &observer).is_none());
        // The block under the feet touches the box, which counts.
        assert!(place_block(&mut world, &builder, Point3::new(1, 4, 1), BlockType::Stone, &observer).is_none());
        assert_eq!(world.get_block_type_at(Point3::new(1, 5, 1)), Some(BlockType::Air));
        assert_eq!(world.get_chunk_at(coord).unwrap().mesh_revision, revision);

        assert!(place_block(&mut world, &builder, Point3::new(3, 4, 1), BlockType::Stone, &observer).is_some());
        assert!(place_block(&mut world, &builder, Point3::new(1, 5, 1), BlockType::Stone, &far_away()).is_some());
        assert_eq!(world.get_block_type_at(Point3::new(1, 5, 1)), Some(BlockType::Stone));
        assert_eq!(world.get_chunk_at(coord).unwrap().mesh_revision, revision + 2);
    }

    #[test]
    fn touching_counts_as_overlap() {
        let bounds = ObserverBounds::new(Point3::new(1.0, 1.0, 1.0), Point3::new(0.0, 0.0, 0.0));
        assert!(bounds.intersects_block(Point3::new(0, 0, 0)));
        assert!(bounds.intersects_block(Point3::new(1, 0, 0)));
        assert!(bounds.intersects_block(Point3::new(-1, 0, 0)));
        assert!(bounds.intersects_block(Point3::new(0, 1, 0)));
        assert!(!bounds.intersects_block(Point3::new(2, 0, 0)));
        assert!(!bounds.intersects_block(Point3::new(0, -2, 0)));

        let inset = ObserverBounds::new(Point3::new(0.2, 0.0, 0.2), Point3::new(0.8, 1.8, 0.8));
        assert!(!inset.intersects_block(Point3::new(1, 0, 0)));
        assert!(inset.intersects_block(Point3::new(0, 1, 0)));
    }
}
