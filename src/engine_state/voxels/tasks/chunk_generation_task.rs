//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, the unit of work a scheduler
//! worker pulls from the request queue. It is created when the streaming
//! manager asks for a chunk that is neither resident nor pending.

use log::trace;
use web_time::Instant;

use crate::engine_state::{
    task_management::task::VolumeSource,
    voxels::chunk::{ChunkCoord, Volume},
};

/// A request to synthesize one chunk volume.
#[derive(Clone, Debug)]
pub struct ChunkGenerationTask {
    /// The position of the chunk to generate (in chunk coordinates)
    position: ChunkCoord,
    /// When the request entered the queue
    requested_at: Instant,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk should be generated
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(position: ChunkCoord) -> Self {
        ChunkGenerationTask {
            position,
            requested_at: Instant::now(),
        }
    }

    /// Coordinate this task generates.
    pub fn position(&self) -> ChunkCoord {
        self.position
    }

    /// Executes the task on the calling worker thread.
    ///
    /// # Arguments
    /// * `source` - The volume source shared by all workers
    ///
    /// # Returns
    /// The synthesized volume
    pub fn process(&self, source: &dyn VolumeSource) -> Volume {
        let started = Instant::now();
        let volume = source.synthesize(self.position);
        trace!(
            "Generated chunk ({}, {}) in {:?} after {:?} queued",
            self.position.x,
            self.position.z,
            started.elapsed(),
            started.duration_since(self.requested_at)
        );
        volume
    }
}
