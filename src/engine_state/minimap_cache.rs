//! # Top Block Cache
//!
//! Minimap-side cache of each chunk's top-block map. Entries are computed on
//! demand from the resident world and kept in a bounded LRU; an edited chunk's
//! entry is dropped through the change listener so the next lookup recomputes
//! it. Entries of evicted chunks are dropped on unload and never served.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::engine_state::{
    change_notification::ChunkChangeListener,
    voxels::{block::block_type::BlockType, chunk::ChunkCoord, world::World},
};

/// Top block of every column of one chunk, indexed `[x][z]`.
pub type TopBlockMap = Vec<Vec<BlockType>>;

/// Bounded cache of per-chunk top-block maps.
///
/// Clones share the same storage, so one clone can be registered as a change
/// listener while another serves lookups.
#[derive(Clone)]
pub struct TopBlockCache {
    entries: Arc<Mutex<LruCache<ChunkCoord, TopBlockMap>>>,
}

impl TopBlockCache {
    /// Creates a cache holding at most `capacity` chunks.
    pub fn new(capacity: NonZeroUsize) -> Self {
        TopBlockCache {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Top-block map of a chunk, computed from `world` on a miss.
    ///
    /// # Returns
    ///
    /// `None` when the chunk is not resident; any entry left over from before
    /// its eviction is dropped.
    pub fn get_or_compute(&self, world: &World, coord: ChunkCoord) -> Option<TopBlockMap> {
        let mut entries = self.entries.lock().ok()?;
        if !world.contains(coord) {
            entries.pop(&coord);
            return None;
        }
        if let Some(map) = entries.get(&coord) {
            return Some(map.clone());
        }
        let map = world.top_blocks_in_chunk(coord)?;
        entries.put(coord, map.clone());
        Some(map)
    }

    /// Whether a chunk's map is cached.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains(&coord))
            .unwrap_or(false)
    }

    /// Number of cached chunks.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops a chunk's map.
    pub fn invalidate(&self, coord: ChunkCoord) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.pop(&coord);
        }
    }
}

impl ChunkChangeListener for TopBlockCache {
    fn chunk_changed(&mut self, coord: ChunkCoord) {
        self.invalidate(coord);
    }

    fn chunk_unloaded(&mut self, coord: ChunkCoord) {
        self.invalidate(coord);
    }
}
