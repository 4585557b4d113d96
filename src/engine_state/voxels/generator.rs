//! # Terrain Generator
//!
//! Turns a chunk coordinate into its block volume. Generation depends only on
//! the noise field and the immutable world configuration, so one generator is
//! shared by every scheduler worker.
//!
//! ## Column Layering
//!
//! For each column the surface height `h` is the floored terrain noise. Cells
//! are then filled bottom to top:
//!
//! * above `h`: water below sea level, air otherwise
//! * at `h` above sea level: grass
//! * the `dirt_depth - 1` cells under the surface, above sea level: dirt
//! * everything else: stone, carved into caves or replaced by ore
//!
//! Trees are planted after the column is filled, on grass surfaces only.

use cgmath::Point3;
use log::trace;

use crate::config::WorldConfig;

use super::{
    biome::BiomeType,
    block::block_type::BlockType,
    chunk::{ChunkCoord, ChunkDimensions, Volume},
    noise::{hash_coordinates, NoiseField},
};
use crate::engine_state::task_management::task::VolumeSource;

/// Height of a tree trunk, counting the root cell.
pub const TREE_TRUNK_HEIGHT: usize = 5;
/// Trees rooted closer than this to a lateral chunk edge are skipped.
pub const TREE_EDGE_MARGIN: usize = 2;

/// Offsets a decoration roll away from the terrain noise stream.
const TREE_ROLL_SALT: u32 = 0x7EE5_0001;
const LEAF_ROLL_SALT: u32 = 0x1EAF_0002;

/// Deterministic chunk synthesizer.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: WorldConfig,
    noise: NoiseField,
}

impl TerrainGenerator {
    /// Creates a generator for a world configuration.
    pub fn new(config: &WorldConfig) -> Self {
        TerrainGenerator {
            config: config.clone(),
            noise: NoiseField::new(config),
        }
    }

    /// Noise samplers used by this generator.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Shape of the volumes this generator produces.
    pub fn dimensions(&self) -> ChunkDimensions {
        self.config.chunk
    }

    /// Floored surface height of a world column.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        self.noise.height(world_x as f64, world_z as f64).floor() as i32
    }

    /// Biome of a chunk.
    pub fn biome(&self, coord: ChunkCoord) -> BiomeType {
        BiomeType::classify(self.noise.biome(coord.x, coord.z), &self.config.biome)
    }

    /// Synthesizes the full volume of one chunk.
    pub fn generate(&self, coord: ChunkCoord) -> Volume {
        let dims = self.config.chunk;
        let mut volume = Volume::new(dims);
        let origin = dims.chunk_origin(coord);
        let leaf_color = self.biome(coord).leaf_color();

        for x in 0..dims.size_x {
            for z in 0..dims.size_z {
                let world_x = origin.x.saturating_add(x as i32);
                let world_z = origin.z.saturating_add(z as i32);
                let height = self.surface_height(world_x, world_z);
                self.fill_column(&mut volume, x, z, world_x, world_z, height);

                if height >= 0
                    && (height as usize) < dims.size_y
                    && volume.get(x, height as usize, z) == BlockType::Grass
                    && self.roll(world_x, world_z, TREE_ROLL_SALT) < self.config.trees.chance
                {
                    let transparent = self.roll(world_x, world_z, LEAF_ROLL_SALT)
                        < self.config.trees.transparent_leaf_chance;
                    let root = Point3::new(x, height as usize + 1, z);
                    if plant_tree(&mut volume, root, BlockType::leaves(leaf_color, transparent)) {
                        trace!("Planted tree at ({world_x}, {}, {world_z})", root.y);
                    }
                }
            }
        }
        volume
    }

    fn fill_column(&self, volume: &mut Volume, x: usize, z: usize, world_x: i32, world_z: i32, height: i32) {
        let terrain = &self.config.terrain;
        let sea_level = terrain.sea_level();
        for y in 0..volume.dimensions().size_y {
            let yi = y as i32;
            let above_sea = f64::from(yi) > sea_level;
            let block = if yi > height {
                if f64::from(yi) < sea_level {
                    BlockType::Water
                } else {
                    BlockType::Air
                }
            } else if yi == height && above_sea {
                BlockType::Grass
            } else if yi > height - terrain.dirt_depth && above_sea {
                BlockType::Dirt
            } else {
                self.underground(world_x, yi, world_z)
            };
            volume.set(x, y, z, block);
        }
    }

    /// Stone with cave and ore overrides. Caves win over ore.
    fn underground(&self, x: i32, y: i32, z: i32) -> BlockType {
        let (fx, fy, fz) = (x as f64, y as f64, z as f64);
        let caves = &self.config.caves;
        if caves.enabled && self.noise.cave(fx, fy, fz) > caves.threshold {
            return BlockType::Air;
        }

        let ores = &self.config.ores;
        let base = self.config.terrain.base_height;
        let ore = self.noise.ore(fx, fy, fz);
        if ore > ores.gold_threshold && fy < base * ores.gold_depth_fraction {
            BlockType::Gold
        } else if ore > ores.iron_threshold && fy < base * ores.iron_depth_fraction {
            BlockType::Iron
        } else if ore > ores.coal_threshold && fy < base * ores.coal_depth_fraction {
            BlockType::Coal
        } else {
            BlockType::Stone
        }
    }

    /// Uniform roll in `[0, 1)` seeded by world position, seed and salt.
    fn roll(&self, world_x: i32, world_z: i32, salt: u32) -> f64 {
        let seed = hash_coordinates(world_x as i64, world_z as i64, self.noise.seed() ^ salt);
        fastrand::Rng::with_seed(seed).f64()
    }
}

impl VolumeSource for TerrainGenerator {
    fn synthesize(&self, coord: ChunkCoord) -> Volume {
        self.generate(coord)
    }
}

/// Places a tree rooted at `root` (the cell above the grass).
///
/// The trunk is `TREE_TRUNK_HEIGHT` wood cells. Leaves form a 5×5 layer at
/// `root + 3`, a 3×3 layer at `root + 4` and a single cap at `root + 5`. Leaves
/// overwrite whatever is there, including the top two trunk cells. Trees
/// within `TREE_EDGE_MARGIN` of a lateral edge, or whose trunk would leave the
/// volume, are skipped. Leaf layers above the volume are dropped.
///
/// Returns whether the tree was planted.
pub fn plant_tree(volume: &mut Volume, root: Point3<usize>, leaves: BlockType) -> bool {
    let dims = volume.dimensions();
    if root.x < TREE_EDGE_MARGIN
        || root.x + TREE_EDGE_MARGIN >= dims.size_x
        || root.z < TREE_EDGE_MARGIN
        || root.z + TREE_EDGE_MARGIN >= dims.size_z
        || root.y + TREE_TRUNK_HEIGHT > dims.size_y
    {
        return false;
    }

    for dy in 0..TREE_TRUNK_HEIGHT {
        volume.set(root.x, root.y + dy, root.z, BlockType::Wood);
    }

    for (dy, radius) in [(3usize, 2i32), (4, 1), (5, 0)] {
        let y = root.y + dy;
        if y >= dims.size_y {
            continue;
        }
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let x = (root.x as i32 + dx) as usize;
                let z = (root.z as i32 + dz) as usize;
                volume.set(x, y, z, leaves);
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CaveConfig, TerrainConfig};

    fn small_config() -> WorldConfig {
        WorldConfig {
            chunk: ChunkDimensions {
                size_x: 16,
                size_y: 48,
                size_z: 16,
            },
            terrain: TerrainConfig {
                base_height: 24.0,
                height_multiplier: 8.0,
                ..TerrainConfig::default()
            },
            ..WorldConfig::default()
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let config = small_config();
        let a = TerrainGenerator::new(&config);
        let b = TerrainGenerator::new(&config);
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 5)] {
            assert_eq!(a.generate(coord), b.generate(coord));
        }
    }

    #[test]
    fn different_seeds_change_the_world() {
        let mut config = small_config();
        let a = TerrainGenerator::new(&config).generate(ChunkCoord::new(1, 1));
        config.seed = 99;
        let b = TerrainGenerator::new(&config).generate(ChunkCoord::new(1, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn origin_column_layers_match_the_default_height() {
        let mut config = WorldConfig {
            caves: CaveConfig {
                enabled: false,
                ..CaveConfig::default()
            },
            ..WorldConfig::default()
        };
        config.trees.chance = 0.0;
        let generator = TerrainGenerator::new(&config);
        assert_eq!(generator.surface_height(0, 0), 168);

        let volume = generator.generate(ChunkCoord::new(0, 0));
        assert_eq!(volume.get(0, 168, 0), BlockType::Grass);
        for y in 165..168 {
            assert_eq!(volume.get(0, y, 0), BlockType::Dirt);
        }
        // Too shallow for any ore.
        assert_eq!(volume.get(0, 164, 0), BlockType::Stone);
        for y in 169..384 {
            assert_eq!(volume.get(0, y, 0), BlockType::Air);
        }
    }

    #[test]
    fn columns_follow_the_layering_rules() {
        let mut config = small_config();
        config.trees.chance = 0.0;
        let generator = TerrainGenerator::new(&config);
        let coord = ChunkCoord::new(2, -1);
        let volume = generator.generate(coord);
        let origin = config.chunk.chunk_origin(coord);
        let sea_level = config.terrain.sea_level();

        for x in 0..16 {
            for z in 0..16 {
                let h = generator.surface_height(origin.x + x as i32, origin.z + z as i32);
                for y in 0..48usize {
                    let block = volume.get(x, y, z);
                    let yi = y as i32;
                    if yi > h {
                        let expected = if (y as f64) < sea_level { BlockType::Water } else { BlockType::Air };
                        assert_eq!(block, expected);
                    } else if yi == h && y as f64 > sea_level {
                        assert_eq!(block, BlockType::Grass);
                    } else if yi > h - 4 && y as f64 > sea_level {
                        assert_eq!(block, BlockType::Dirt);
                    } else {
                        assert!(matches!(
                            block,
                            BlockType::Stone | BlockType::Air | BlockType::Coal | BlockType::Iron | BlockType::Gold
                        ));
                    }
                }
            }
        }
    }

    #[test]
    fn ores_respect_depth_gates() {
        let mut config = small_config();
        config.caves.enabled = false;
        config.ores.coal_threshold = 0.0;
        config.ores.iron_threshold = 0.0;
        config.ores.gold_threshold = 0.0;
        let generator = TerrainGenerator::new(&config);
        let volume = generator.generate(ChunkCoord::new(0, 0));
        let base = config.terrain.base_height;
        // With every threshold at zero the deepest eligible ore always wins.
        for y in 0..20usize {
            let expected = if (y as f64) < base * 0.2 {
                BlockType::Gold
            } else if (y as f64) < base * 0.4 {
                BlockType::Iron
            } else if (y as f64) < base * 0.6 {
                BlockType::Coal
            } else {
                BlockType::Stone
            };
            assert_eq!(volume.get(8, y, 8), expected, "y = {y}");
        }
    }

    #[test]
    fn trees_have_trunk_and_three_leaf_layers() {
        let dims = ChunkDimensions {
            size_x: 16,
            size_y: 32,
            size_z: 16,
        };
        let mut volume = Volume::new(dims);
        let root = Point3::new(8, 10, 8);
        assert!(plant_tree(&mut volume, root, BlockType::LeavesRed));

        for dy in 0..3 {
            assert_eq!(volume.get(8, 10 + dy, 8), BlockType::Wood);
        }
        let leaves_at = |y: usize| {
            (0..16)
                .flat_map(|x| (0..16).map(move |z| (x, z)))
                .filter(|&(x, z)| volume.get(x, y, z) == BlockType::LeavesRed)
                .count()
        };
        // Leaf layers replace the top two trunk cells.
        assert_eq!(leaves_at(13), 25);
        assert_eq!(leaves_at(14), 9);
        assert_eq!(leaves_at(15), 1);
        assert_eq!(volume.get(8, 12, 8), BlockType::Wood);
        assert_eq!(volume.get(8, 13, 8), BlockType::LeavesRed);
        assert_eq!(volume.get(8, 14, 8), BlockType::LeavesRed);
        assert_eq!(volume.get(6, 13, 6), BlockType::LeavesRed);
        assert_eq!(volume.get(5, 13, 8), BlockType::Air);
        assert_eq!(volume.get(8, 16, 8), BlockType::Air);
    }

    #[test]
    fn trees_near_edges_or_ceiling_are_skipped() {
        let dims = ChunkDimensions {
            size_x: 16,
            size_y: 20,
            size_z: 16,
        };
        let mut volume = Volume::new(dims);
        for root in [
            Point3::new(1, 5, 8),
            Point3::new(14, 5, 8),
            Point3::new(8, 5, 1),
            Point3::new(8, 5, 14),
            Point3::new(8, 16, 8),
        ] {
            assert!(!plant_tree(&mut volume, root, BlockType::LeavesGreen));
        }
        assert_eq!(volume.solid_blocks().count(), 0);

        // Trunk fits exactly; the cap layer above the volume is dropped.
        assert!(plant_tree(&mut volume, Point3::new(2, 15, 13), BlockType::LeavesGreen));
        assert_eq!(volume.get(2, 17, 13), BlockType::Wood);
        assert_eq!(volume.get(2, 18, 13), BlockType::LeavesGreen);
        assert_eq!(volume.get(2, 19, 13), BlockType::LeavesGreen);
    }

    #[test]
    fn generated_trees_use_the_chunk_biome_color() {
        let mut config = small_config();
        config.trees.chance = 1.0;
        config.trees.transparent_leaf_chance = 0.0;
        config.terrain.sea_level_fraction = 0.0;
        let generator = TerrainGenerator::new(&config);
        let coord = ChunkCoord::new(3, 4);
        let expected = generator.biome(coord).leaf_color();
        let volume = generator.generate(coord);

        let leaves: Vec<_> = volume
            .solid_blocks()
            .filter_map(|(_, block)| block.leaf_variant())
            .collect();
        assert!(!leaves.is_empty());
        assert!(leaves.iter().all(|&(color, transparent)| color == expected && !transparent));
    }
}
