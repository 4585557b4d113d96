//! Listener seam for edited chunks.
//!
//! The engine calls every registered listener with the coordinate of a chunk
//! after an edit to it has been applied and re-meshed, and again when a chunk
//! is evicted. Listeners run on the control thread, synchronously, in
//! registration order.

use crossbeam_channel::Sender;
use log::trace;

use crate::engine_state::voxels::chunk::ChunkCoord;

/// Receives the coordinate of every edited chunk.
pub trait ChunkChangeListener: Send {
    /// Called once per successful edit.
    fn chunk_changed(&mut self, coord: ChunkCoord);

    /// Called when a chunk stops being resident. Does nothing by default.
    fn chunk_unloaded(&mut self, _coord: ChunkCoord) {}
}

/// Forwards changes to another thread. A disconnected receiver is ignored.
impl ChunkChangeListener for Sender<ChunkCoord> {
    fn chunk_changed(&mut self, coord: ChunkCoord) {
        if self.send(coord).is_err() {
            trace!("Change receiver for ({}, {}) is gone", coord.x, coord.z);
        }
    }
}
