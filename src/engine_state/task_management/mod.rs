//! # Task Management System
//!
//! This module provides the generation scheduler: a fixed pool of worker
//! threads that turn chunk-coordinate requests into block volumes while the
//! control thread keeps running.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: owns the request queue, the worker pool, the ready-set and
//!   the per-coordinate pending state
//! - `ChunkGenerationTask`: one request, pulled by whichever worker is free
//! - `VolumeSource`: the synthesizer the workers call
//!
//! Only three structures cross threads: the request queue (a crossbeam MPMC
//! channel), the ready-set and the pending-state map (both `DashMap`s). The
//! control thread never blocks on generation; workers block only on an empty
//! queue, with a bounded back-off so they notice shutdown promptly.
//!
//! ## Task Lifecycle
//! 1. `request()` marks a coordinate `Queued` and sends a task
//! 2. A worker receives it, marks it `Generating`, synthesizes the volume
//! 3. The worker marks it `Ready` and publishes the volume to the ready-set
//! 4. `drain_ready()` on the control thread takes every ready volume and
//!    clears its pending state
//!
//! There is no ordering guarantee between generations, and queued requests
//! that are no longer needed are not retracted.
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new(&config.scheduler, Arc::new(generator));
//! task_manager.request(ChunkCoord::new(0, 0));
//!
//! // In the control loop:
//! for (coord, volume) in task_manager.drain_ready() {
//!     // promote into a resident chunk
//! }
//! ```

pub mod task;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info, warn};
use web_time::Instant;

use crate::config::SchedulerConfig;
use crate::engine_state::voxels::{
    chunk::{ChunkCoord, Volume},
    tasks::chunk_generation_task::ChunkGenerationTask,
};
use task::{ChunkState, VolumeSource};

/// Interval at which shutdown polls a worker that has not finished yet.
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Manages a pool of worker threads and the hand-over of generated volumes.
///
/// # Implementation Notes
/// - Requests are deduplicated against the pending-state map
/// - A worker publishes `Ready` before inserting the volume, so a drained
///   coordinate never has stale pending state
/// - Drop-safe: dropping the manager shuts the pool down
pub struct TaskManager {
    task_sender: Option<Sender<ChunkGenerationTask>>,
    workers: Vec<JoinHandle<()>>,
    states: Arc<DashMap<ChunkCoord, ChunkState>>,
    ready: Arc<DashMap<ChunkCoord, Volume>>,
    shutdown: Arc<AtomicBool>,
    join_timeout: Duration,
}

impl TaskManager {
    /// Creates a new `TaskManager` and starts its worker threads.
    ///
    /// # Arguments
    /// * `config` - Worker count, idle back-off and join timeout
    /// * `source` - The synthesizer shared by every worker
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(config: &SchedulerConfig, source: Arc<dyn VolumeSource>) -> Self {
        let (task_sender, task_receiver) = unbounded::<ChunkGenerationTask>();
        let states = Arc::new(DashMap::new());
        let ready = Arc::new(DashMap::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let backoff = Duration::from_millis(config.idle_backoff_ms.max(1));

        info!(
            "Starting {} generation workers (available parallelism: {:?})",
            config.worker_count,
            thread::available_parallelism()
        );

        let workers = (0..config.worker_count)
            .map(|_| {
                let worker = Worker {
                    receiver: task_receiver.clone(),
                    source: Arc::clone(&source),
                    states: Arc::clone(&states),
                    ready: Arc::clone(&ready),
                    shutdown: Arc::clone(&shutdown),
                    backoff,
                };
                thread::spawn(move || worker.run())
            })
            .collect();

        TaskManager {
            task_sender: Some(task_sender),
            workers,
            states,
            ready,
            shutdown,
            join_timeout: Duration::from_millis(config.join_timeout_ms),
        }
    }

    /// Queues a coordinate for generation.
    ///
    /// # Returns
    /// - `true` if the coordinate was queued
    /// - `false` if it is already queued, generating or ready, or the pool
    ///   has been shut down
    pub fn request(&self, coord: ChunkCoord) -> bool {
        let Some(sender) = &self.task_sender else {
            return false;
        };
        match self.states.entry(coord) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(entry) => {
                entry.insert(ChunkState::Queued);
            }
        }
        if sender.send(ChunkGenerationTask::new(coord)).is_err() {
            self.states.remove(&coord);
            return false;
        }
        true
    }

    /// Pending state of a coordinate, `None` when it is not pending.
    pub fn state(&self, coord: ChunkCoord) -> Option<ChunkState> {
        self.states.get(&coord).map(|state| *state)
    }

    /// Whether a coordinate is queued, generating or ready.
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.states.contains_key(&coord)
    }

    /// Number of coordinates currently pending.
    pub fn pending_count(&self) -> usize {
        self.states.len()
    }

    /// Number of volumes waiting to be drained.
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Takes every ready volume and clears its pending state.
    pub fn drain_ready(&self) -> Vec<(ChunkCoord, Volume)> {
        // Collect keys first; removing while iterating would deadlock the shard.
        let coords: Vec<ChunkCoord> = self.ready.iter().map(|entry| *entry.key()).collect();
        let mut drained = Vec::with_capacity(coords.len());
        for coord in coords {
            if let Some((coord, volume)) = self.ready.remove(&coord) {
                self.states.remove(&coord);
                drained.push((coord, volume));
            }
        }
        if !drained.is_empty() {
            debug!("Drained {} ready volumes", drained.len());
        }
        drained
    }

    /// Stops the pool: flips the shutdown flag, closes the queue and joins each
    /// worker with a bounded wait. Workers that overrun are abandoned.
    ///
    /// Calling this more than once is a no-op.
    pub fn shutdown(&mut self) {
        if self.task_sender.is_none() && self.workers.is_empty() {
            return;
        }
        self.shutdown.store(true, Ordering::Release);
        self.task_sender.take();

        let worker_count = self.workers.len();
        let mut abandoned = 0;
        for (index, handle) in self.workers.drain(..).enumerate() {
            let deadline = Instant::now() + self.join_timeout;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(JOIN_POLL_INTERVAL);
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("Generation worker panicked before shutdown");
                }
            } else {
                warn!(
                    "Generation worker {index} did not stop within {:?}; abandoning it",
                    self.join_timeout
                );
                abandoned += 1;
            }
        }
        info!(
            "Generation pool stopped ({} of {} workers joined)",
            worker_count - abandoned,
            worker_count
        );
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State owned by one worker thread.
struct Worker {
    receiver: Receiver<ChunkGenerationTask>,
    source: Arc<dyn VolumeSource>,
    states: Arc<DashMap<ChunkCoord, ChunkState>>,
    ready: Arc<DashMap<ChunkCoord, Volume>>,
    shutdown: Arc<AtomicBool>,
    backoff: Duration,
}

impl Worker {
    fn run(self) {
        while !self.shutdown.load(Ordering::Acquire) {
            let task = match self.receiver.recv_timeout(self.backoff) {
                Ok(task) => task,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }
            let coord = task.position();
            self.states.insert(coord, ChunkState::Generating);
            let volume = task.process(self.source.as_ref());
            self.states.insert(coord, ChunkState::Ready);
            self.ready.insert(coord, volume);
        }
    }
}
