//! # Chunk Iteration Module
//!
//! This module provides an iterator for traversing all non-air blocks of a
//! volume in storage order.
//!
//! ## Storage-Order Iteration
//!
//! The `VolumeBlockIterator` walks the flat block vector front to back and
//! tracks the local `(x, y, z)` position alongside the offset, so positions are
//! produced without dividing the offset on every step. Air cells are skipped.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{ChunkDimensions, Volume};

/// An iterator over all non-air blocks in a volume.
///
/// Yields `(local position, block type)` pairs ordered by y, then z, then x.
pub struct VolumeBlockIterator<'a> {
    /// Volume being iterated over
    volume: &'a Volume,
    /// Cached shape of the volume
    dimensions: ChunkDimensions,
    /// Current X position within the volume
    local_x: usize,
    /// Current Y position within the volume
    local_y: usize,
    /// Current Z position within the volume
    local_z: usize,
}

impl<'a> VolumeBlockIterator<'a> {
    /// Creates a new `VolumeBlockIterator` for the given volume.
    ///
    /// # Arguments
    /// * `volume` - A reference to the volume to iterate over
    ///
    /// # Returns
    /// A new iterator positioned before the first cell
    pub fn new(volume: &'a Volume) -> Self {
        VolumeBlockIterator {
            volume,
            dimensions: volume.dimensions(),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    fn advance(&mut self) {
        self.local_x += 1;
        if self.local_x == self.dimensions.size_x {
            self.local_x = 0;
            self.local_z += 1;
            if self.local_z == self.dimensions.size_z {
                self.local_z = 0;
                self.local_y += 1;
            }
        }
    }
}

impl Iterator for VolumeBlockIterator<'_> {
    type Item = (Point3<usize>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        if self.dimensions.size_x == 0 || self.dimensions.size_z == 0 {
            return None;
        }
        while self.local_y < self.dimensions.size_y {
            let position = Point3::new(self.local_x, self.local_y, self.local_z);
            let block_type = self.volume.get(position.x, position.y, position.z);
            self.advance();
            if !block_type.is_air() {
                return Some((position, block_type));
            }
        }
        None
    }
}

impl Volume {
    /// Iterates every non-air cell of the volume.
    pub fn solid_blocks(&self) -> VolumeBlockIterator<'_> {
        VolumeBlockIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_only_solid_cells_in_storage_order() {
        let dims = ChunkDimensions {
            size_x: 3,
            size_y: 2,
            size_z: 2,
        };
        let mut volume = Volume::new(dims);
        volume.set(2, 1, 0, BlockType::Wood);
        volume.set(0, 0, 1, BlockType::Stone);
        volume.set(1, 1, 1, BlockType::Water);

        let visited: Vec<_> = volume.solid_blocks().collect();
        assert_eq!(
            visited,
            vec![
                (Point3::new(0, 0, 1), BlockType::Stone),
                (Point3::new(2, 1, 0), BlockType::Wood),
                (Point3::new(1, 1, 1), BlockType::Water),
            ]
        );
    }

    #[test]
    fn empty_volume_yields_nothing() {
        let volume = Volume::new(ChunkDimensions::default());
        assert_eq!(volume.solid_blocks().count(), 0);
    }
}
