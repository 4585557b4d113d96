//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. These tasks
//! run on scheduler workers so generation never stalls the control thread.

pub mod chunk_generation_task;
