//! Rendering data for the voxel engine.
//!
//! This module turns chunk volumes into renderable geometry. It owns no GPU
//! state: meshes are plain vertex and index lists positioned relative to their
//! chunk origin, ready to be uploaded by whichever renderer embeds the engine.

pub mod atlas;
pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use atlas::TextureAtlas;
pub use meshing::{Mesh, MeshBuilder, NeighborContext};
pub use vertex::Vertex;
