#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streamed, procedurally generated voxel world with visible-face meshing.
//!
//! The world is split into fixed-size columns ("chunks"). Background workers
//! synthesize chunk volumes from layered noise while the control thread keeps
//! a neighborhood of chunks resident around a moving observer, builds their
//! meshes and applies block edits.
//!
//! ## Key Modules
//!
//! * `config` - JSON world configuration with validation
//! * `engine_state` - The engine: streaming, generation, meshing and editing
//!
//! ## Usage
//!
//! ```ignore
//! let config = WorldConfig::load("world.json")?;
//! let mut engine = EngineState::new(&config)?;
//! let report = engine.tick(Point3::new(0.0, 170.0, 0.0));
//! ```
//!
//! The crate owns no GPU state. Meshes are plain vertex and index lists local
//! to their chunk origin, ready for any renderer to upload.

use std::thread;
use std::time::Duration;

use cgmath::Point3;
use log::{error, info};
use web_time::Instant;

pub mod config;
pub mod engine_state;

pub use config::{ConfigError, WorldConfig};
pub use engine_state::{
    change_notification::ChunkChangeListener,
    editing::ObserverBounds,
    minimap_cache::TopBlockCache,
    rendering::{Mesh, Vertex},
    streaming::{NeighborhoodShape, TickReport},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        chunk::{ChunkCoord, ChunkDimensions},
    },
    EngineState,
};

/// Chunks the headless observer walks along +X.
const WALK_CHUNKS: i32 = 4;
/// How long the driver waits for one position to finish streaming.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);
/// Pause between ticks while waiting on generation.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Headless driver: initialises logging, loads the configuration named by the
/// first command-line argument (or uses defaults), then walks an observer
/// through the world and logs streaming statistics.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(path)?,
        None => {
            info!("No config file given, using defaults");
            WorldConfig::default()
        }
    };

    let mut engine = EngineState::new(&config)?;
    let footprint = config.chunk.size_x as f32;
    let started = Instant::now();

    for step in 0..=WALK_CHUNKS {
        let x = step as f32 * footprint + footprint / 2.0;
        let z = config.chunk.size_z as f32 / 2.0;
        let surface = engine.generator().surface_height(x as i32, z as i32);
        let observer = Point3::new(x, surface as f32 + 2.0, z);

        let step_started = Instant::now();
        let mut totals = TickReport::default();
        loop {
            let report = engine.tick(observer);
            totals.center = report.center;
            totals.requested.extend(report.requested);
            totals.evicted.extend(report.evicted);
            totals.promoted.extend(report.promoted);
            totals.remeshed.extend(report.remeshed);
            if engine.task_manager().pending_count() == 0 {
                break;
            }
            if step_started.elapsed() > SETTLE_TIMEOUT {
                error!("Streaming did not settle within {:?}", SETTLE_TIMEOUT);
                break;
            }
            thread::sleep(TICK_INTERVAL);
        }

        let quads: usize = engine
            .world()
            .coords()
            .filter_map(|coord| engine.chunk_mesh(coord))
            .map(Mesh::quad_count)
            .sum();
        info!(
            "Observer at chunk ({}, {}): requested {}, evicted {}, promoted {}, remeshed {}, resident {}, quads {}, took {:?}",
            totals.center.x,
            totals.center.z,
            totals.requested.len(),
            totals.evicted.len(),
            totals.promoted.len(),
            totals.remeshed.len(),
            engine.world().chunk_count(),
            quads,
            step_started.elapsed()
        );

        let below = Point3::new(x.floor() as i32, surface, z.floor() as i32);
        let top = engine.get_block_type_at(below);
        if engine.break_block(below) {
            info!("Broke {top} at ({}, {}, {})", below.x, below.y, below.z);
        }
    }

    engine.shutdown();
    info!("Walk finished in {:?}", started.elapsed());
    Ok(())
}
