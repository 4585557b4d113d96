//! # Task System Core Traits
//!
//! This module defines the building blocks shared by the generation scheduler
//! and the work it runs.
//!
//! ## Core Components
//! - `VolumeSource`: anything that can turn a chunk coordinate into a volume
//! - `ChunkState`: the observable pending state of a requested coordinate
//!
//! ## Task Lifecycle
//! 1. A coordinate is requested via `TaskManager::request()` and becomes `Queued`
//! 2. A worker pulls the task and marks it `Generating`
//! 3. The worker calls `VolumeSource::synthesize()` and marks it `Ready`
//! 4. The control thread drains ready volumes, clearing their pending state
//!
//! ## Thread Safety
//! - `VolumeSource` must be `Send + Sync`: one instance is shared by every worker
//! - Volumes are handed over by move and never shared

use crate::engine_state::voxels::chunk::{ChunkCoord, Volume};

/// Produces the block volume of a chunk.
///
/// Implementations must be pure functions of the coordinate and their own
/// immutable configuration, so any number of workers can call them at once.
pub trait VolumeSource: Send + Sync {
    /// Synthesizes the full volume of one chunk.
    fn synthesize(&self, coord: ChunkCoord) -> Volume;
}

/// Pending state of a requested coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Waiting in the request queue.
    Queued,
    /// Being synthesized by a worker.
    Generating,
    /// Finished and waiting to be drained.
    Ready,
}
