//! Mesh generation primitives for voxel rendering.
//!
//! This module provides the data structures the mesh builder emits into.
//!
//! # Architecture
//! - [`Mesh`]: a complete indexed triangle mesh with vertices and indices
//! - [`Face`]: a single visible face of a voxel, expanded into one quad
//!
//! # Usage
//! ```ignore
//! let mut mesh = Mesh::new();
//! mesh.push_face(&Face::new(0, 0, 0, BlockType::Stone, BlockSide::Top), &atlas);
//! assert_eq!(mesh.quad_count(), 1);
//! ```

mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::Face;
pub use mesh::*;
