//! # Engine State Module
//!
//! The core engine module that owns a streamed voxel world and everything that
//! keeps it up to date.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `streaming` - Keeps the resident chunks centred on the observer
//! * `editing` - Block break and place with incremental re-meshing
//! * `rendering` - Mesh building and the atlas layout
//! * `task_management` - Background generation workers
//! * `voxels` - Blocks, chunks, noise, terrain generation and the world
//! * `change_notification` / `minimap_cache` - Consumers of edit events
//!
//! ## Architecture
//!
//! `EngineState` holds explicit references to each subsystem and drives them
//! from a single control thread. Only the generation scheduler runs work on
//! other threads; resident chunks, meshes and edits never leave the control
//! thread.
//!
//! ## Example
//!
//! ```ignore
//! let mut engine = EngineState::new(&WorldConfig::default())?;
//! loop {
//!     let report = engine.tick(observer_position);
//!     for coord in &report.remeshed {
//!         upload(engine.chunk_mesh(*coord));
//!     }
//! }
//! ```

use std::sync::Arc;

use cgmath::Point3;
use log::info;

use crate::config::{ConfigError, WorldConfig};
use change_notification::ChunkChangeListener;
use editing::{EditOutcome, ObserverBounds};
use rendering::{Mesh, MeshBuilder, TextureAtlas};
use streaming::{ChunkStreamer, TickReport};
use task_management::{task::VolumeSource, TaskManager};
use voxels::{
    block::block_type::BlockType,
    chunk::ChunkCoord,
    generator::TerrainGenerator,
    world::World,
};

pub mod change_notification;
pub mod editing;
pub mod minimap_cache;
pub mod rendering;
pub mod streaming;
pub mod task_management;
pub mod voxels;

/// The main state container for the voxel engine
///
/// Owns the resident world, the generation pool, the streamer and the mesh
/// builder, plus the listeners told about edits and evictions.
pub struct EngineState {
    /// The voxel world containing all resident chunks
    world: World,
    /// Background generation pool
    task_manager: TaskManager,
    /// Observer-centred streaming
    streamer: ChunkStreamer,
    /// Builder used for every mesh
    mesh_builder: MeshBuilder,
    /// Terrain synthesizer shared with the workers
    generator: Arc<TerrainGenerator>,
    /// Notified after every successful edit and every eviction
    listeners: Vec<Box<dyn ChunkChangeListener>>,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// # Arguments
    ///
    /// * `config` - World configuration; validated before anything starts
    ///
    /// # Returns
    ///
    /// The engine with its worker pool running and no resident chunks, or the
    /// validation error.
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let generator = Arc::new(TerrainGenerator::new(config));
        let source: Arc<dyn VolumeSource> = generator.clone();
        let task_manager = TaskManager::new(&config.scheduler, source);

        info!(
            "Engine ready: seed {}, chunks {}x{}x{}, radius {} ({:?})",
            config.seed,
            config.chunk.size_x,
            config.chunk.size_y,
            config.chunk.size_z,
            config.streaming.radius,
            config.streaming.shape
        );

        Ok(Self {
            world: World::new(config.chunk),
            task_manager,
            streamer: ChunkStreamer::new(&config.streaming),
            mesh_builder: MeshBuilder::new(TextureAtlas::from(&config.atlas)),
            generator,
            listeners: Vec::new(),
        })
    }

    /// Advances streaming for an observer at `position`.
    ///
    /// Never waits for generation; volumes that are not finished yet show up
    /// on a later tick.
    pub fn tick(&mut self, position: Point3<f32>) -> TickReport {
        let report = self
            .streamer
            .tick(position, &mut self.world, &self.task_manager, &self.mesh_builder);
        for &coord in &report.evicted {
            for listener in &mut self.listeners {
                listener.chunk_unloaded(coord);
            }
        }
        report
    }

    /// Resident chunks.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The terrain synthesizer.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// The generation pool.
    pub fn task_manager(&self) -> &TaskManager {
        &self.task_manager
    }

    /// Chunk of the observer at the last tick.
    pub fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.streamer.center()
    }

    /// Block at a world position; air when the position is unresolved.
    pub fn get_block_type_at(&self, position: Point3<i32>) -> BlockType {
        self.world.get_block_type_at(position).unwrap_or(BlockType::Air)
    }

    /// Whether a chunk is resident.
    pub fn is_chunk_generated(&self, coord: ChunkCoord) -> bool {
        self.world.contains(coord)
    }

    /// Top block of the chunk's centre column; air when the chunk is not resident.
    pub fn get_top_block_type_at(&self, coord: ChunkCoord) -> BlockType {
        self.world.top_block_type_at(coord).unwrap_or(BlockType::Air)
    }

    /// Top block of every column of a resident chunk, indexed `[x][z]`.
    pub fn get_top_blocks_in_chunk(&self, coord: ChunkCoord) -> Option<Vec<Vec<BlockType>>> {
        self.world.top_blocks_in_chunk(coord)
    }

    /// Current mesh of a resident chunk.
    pub fn chunk_mesh(&self, coord: ChunkCoord) -> Option<&Mesh> {
        self.world.chunk_mesh(coord)
    }

    /// How many times a resident chunk's mesh has been built.
    pub fn mesh_revision(&self, coord: ChunkCoord) -> Option<u64> {
        self.world.get_chunk_at(coord).map(|chunk| chunk.mesh_revision)
    }

    /// World-space origin at which a resident chunk's mesh is placed.
    pub fn chunk_origin(&self, coord: ChunkCoord) -> Option<Point3<i32>> {
        self.world.get_chunk_at(coord).map(|chunk| chunk.origin)
    }

    /// Registers a listener for edited and evicted chunks.
    pub fn add_listener(&mut self, listener: Box<dyn ChunkChangeListener>) {
        self.listeners.push(listener);
    }

    /// Sets one block and rebuilds affected meshes before returning.
    ///
    /// # Returns
    ///
    /// `false` when `y` is out of range or the chunk is not resident.
    pub fn apply_edit(&mut self, position: Point3<i32>, block_type: BlockType) -> bool {
        let outcome = editing::apply_edit(&mut self.world, &self.mesh_builder, position, block_type);
        self.finish_edit(outcome)
    }

    /// Clears a block to air.
    pub fn break_block(&mut self, position: Point3<i32>) -> bool {
        let outcome = editing::break_block(&mut self.world, &self.mesh_builder, position);
        self.finish_edit(outcome)
    }

    /// Places a block.
    ///
    /// # Returns
    ///
    /// `false` additionally when `block_type` is air or the block would
    /// overlap `observer`, so callers know whether to consume inventory.
    pub fn place_block(&mut self, position: Point3<i32>, block_type: BlockType, observer: &ObserverBounds) -> bool {
        let outcome = editing::place_block(&mut self.world, &self.mesh_builder, position, block_type, observer);
        self.finish_edit(outcome)
    }

    fn finish_edit(&mut self, outcome: Option<EditOutcome>) -> bool {
        let Some(outcome) = outcome else {
            return false;
        };
        for listener in &mut self.listeners {
            listener.chunk_changed(outcome.chunk);
        }
        true
    }

    /// Stops the generation pool. Resident chunks stay queryable.
    pub fn shutdown(&mut self) {
        self.task_manager.shutdown();
    }
}
