//! # Voxel Engine Core
//!
//! This module contains the data side of the voxel engine: what a block is,
//! how blocks are grouped into chunks, and how chunks are generated.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, faces, and their static per-type tables
//! * **Chunk**: Dense fixed-size column volumes and their coordinates
//! * **Noise**: Seeded gradient noise and the derived terrain fields
//! * **Biome**: Per-chunk classification that picks leaf colors
//! * **Generator**: Column layering, caves, ores and trees
//! * **World**: The resident chunks and every query against them
//! * **Tasks**: The unit of work the generation workers run
//!
//! ## Data Flow
//!
//! 1. The streamer requests a chunk coordinate
//! 2. A worker runs the generator and hands the volume back by move
//! 3. The world takes ownership and the chunk is meshed
//! 4. Edits mutate the resident volume and trigger a rebuild
//!
//! ## Thread Safety
//!
//! Generation is a pure function of the coordinate and the configuration.
//! Resident chunks live only on the control thread.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod generator;
pub mod noise;
pub mod tasks;
pub mod world;
