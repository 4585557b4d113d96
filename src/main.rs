//! # Voxel World Headless Driver
//!
//! Walks an observer through a generated world and logs what streaming does.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
