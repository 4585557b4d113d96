//! # Chunk Streaming
//!
//! Keeps the resident set of chunks matched to a neighborhood around a moving
//! observer. Each tick the streamer:
//!
//! 1. Re-centres on the observer's chunk and, when the centre moved (or on the
//!    first tick), requests every missing neighborhood chunk
//! 2. Evicts resident chunks that fell outside the neighborhood
//! 3. Promotes every volume the workers finished into a resident chunk
//! 4. Rebuilds the mesh of promoted chunks and of every resident chunk whose
//!    lateral neighbor appeared or disappeared
//!
//! Requests that are no longer needed are not retracted. A volume that lands
//! outside the neighborhood is promoted and then evicted on the next tick.

use std::collections::BTreeSet;

use cgmath::Point3;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::StreamingConfig;
use crate::engine_state::{
    rendering::MeshBuilder,
    task_management::TaskManager,
    voxels::{
        chunk::{Chunk, ChunkCoord},
        world::World,
    },
};

/// Shape of the resident neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborhoodShape {
    /// Every chunk within Chebyshev distance `radius`.
    #[default]
    Square,
    /// Every chunk within Euclidean distance `radius`.
    Circle,
}

impl NeighborhoodShape {
    /// Whether an offset from the centre lies inside a neighborhood of `radius`.
    ///
    /// Offsets are `i64` so the difference of any two chunk coordinates fits.
    pub fn contains(self, dx: i64, dz: i64, radius: i32) -> bool {
        let r = i64::from(radius);
        match self {
            NeighborhoodShape::Square => dx.abs() <= r && dz.abs() <= r,
            NeighborhoodShape::Circle => dx
                .checked_mul(dx)
                .zip(dz.checked_mul(dz))
                .and_then(|(x2, z2)| x2.checked_add(z2))
                .is_some_and(|d2| d2 <= r * r),
        }
    }
}

/// What one streaming tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunk the observer stood in.
    pub center: ChunkCoord,
    /// Coordinates newly handed to the scheduler.
    pub requested: Vec<ChunkCoord>,
    /// Resident chunks dropped.
    pub evicted: Vec<ChunkCoord>,
    /// Finished volumes that became resident.
    pub promoted: Vec<ChunkCoord>,
    /// Chunks whose mesh was rebuilt.
    pub remeshed: Vec<ChunkCoord>,
}

impl TickReport {
    /// Whether the tick changed nothing.
    pub fn is_idle(&self) -> bool {
        self.requested.is_empty() && self.evicted.is_empty() && self.promoted.is_empty() && self.remeshed.is_empty()
    }
}

/// Offset of `coord` from `center`, widened so it cannot overflow.
fn delta(center: ChunkCoord, coord: ChunkCoord) -> (i64, i64) {
    (
        i64::from(coord.x) - i64::from(center.x),
        i64::from(coord.z) - i64::from(center.z),
    )
}

/// Observer-centred chunk streaming.
#[derive(Debug, Clone)]
pub struct ChunkStreamer {
    radius: i32,
    shape: NeighborhoodShape,
    center: Option<ChunkCoord>,
}

impl ChunkStreamer {
    /// Creates a streamer that has not seen the observer yet.
    pub fn new(config: &StreamingConfig) -> Self {
        ChunkStreamer {
            radius: config.radius,
            shape: config.shape,
            center: None,
        }
    }

    /// Chunk of the observer at the last tick.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Neighborhood radius in chunks.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Whether `coord` belongs to the neighborhood around `center`.
    pub fn in_neighborhood(&self, center: ChunkCoord, coord: ChunkCoord) -> bool {
        let (dx, dz) = delta(center, coord);
        self.shape.contains(dx, dz, self.radius)
    }

    /// Every coordinate of the neighborhood around `center`, nearest first.
    pub fn neighborhood(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.radius;
        let mut coords: Vec<ChunkCoord> = (-r..=r)
            .flat_map(|dx| (-r..=r).map(move |dz| (dx, dz)))
            .filter(|&(dx, dz)| self.shape.contains(i64::from(dx), i64::from(dz), r))
            .map(|(dx, dz)| center.offset(dx, dz))
            .collect();
        coords.sort_by_key(|&c| {
            let (dx, dz) = delta(center, c);
            (dx * dx + dz * dz, c)
        });
        // Offsets saturate at the edge of the coordinate range.
        coords.dedup();
        coords
    }

    /// Runs one streaming step for an observer at `position`.
    ///
    /// # Arguments
    ///
    /// * `position` - World-space observer position
    /// * `world` - Resident chunks, mutated in place
    /// * `tasks` - Generation scheduler to request from and drain
    /// * `builder` - Mesh builder for promoted and affected chunks
    pub fn tick(
        &mut self,
        position: Point3<f32>,
        world: &mut World,
        tasks: &TaskManager,
        builder: &MeshBuilder,
    ) -> TickReport {
        let center = world.dimensions().chunk_of_position(position);
        let mut report = TickReport {
            center,
            ..TickReport::default()
        };
        let mut dirty = BTreeSet::new();

        if self.center != Some(center) {
            self.center = Some(center);
            for coord in self.neighborhood(center) {
                if !world.contains(coord) && tasks.request(coord) {
                    report.requested.push(coord);
                }
            }
        }

        let mut outside: Vec<ChunkCoord> = world
            .coords()
            .filter(|&coord| !self.in_neighborhood(center, coord))
            .collect();
        outside.sort();
        for coord in outside {
            if world.remove_chunk(coord).is_some() {
                dirty.remove(&coord);
                dirty.extend(coord.lateral_neighbors());
                report.evicted.push(coord);
            }
        }

        for (coord, volume) in tasks.drain_ready() {
            if world.contains(coord) {
                warn!("Discarding volume for already resident chunk ({}, {})", coord.x, coord.z);
                continue;
            }
            if world.insert_chunk(Chunk::new(coord, volume)) {
                dirty.insert(coord);
                dirty.extend(coord.lateral_neighbors());
                report.promoted.push(coord);
            }
        }
        report.promoted.sort();

        for coord in dirty {
            if world.rebuild_mesh(coord, builder) {
                report.remeshed.push(coord);
            }
        }

        if !report.is_idle() {
            debug!(
                "Tick at ({}, {}): requested {}, evicted {}, promoted {}, remeshed {}, resident {}",
                center.x,
                center.z,
                report.requested.len(),
                report.evicted.len(),
                report.promoted.len(),
                report.remeshed.len(),
                world.chunk_count()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::config::SchedulerConfig;
    use crate::engine_state::task_management::task::VolumeSource;
    use crate::engine_state::voxels::{
        block::block_type::BlockType,
        chunk::{ChunkDimensions, Volume},
    };

    fn dims() -> ChunkDimensions {
        ChunkDimensions {
            size_x: 4,
            size_y: 4,
            size_z: 4,
        }
    }

    struct Slab;

    impl VolumeSource for Slab {
        fn synthesize(&self, _coord: ChunkCoord) -> Volume {
            let mut volume = Volume::new(dims());
            for x in 0..4 {
                for z in 0..4 {
                    volume.set(x, 0, z, BlockType::Stone);
                }
            }
            volume
        }
    }

    fn streamer(radius: i32, shape: NeighborhoodShape) -> ChunkStreamer {
        ChunkStreamer::new(&StreamingConfig { radius, shape })
    }

    fn tasks() -> TaskManager {
        let config = SchedulerConfig {
            worker_count: 2,
            idle_backoff_ms: 1,
            join_timeout_ms: 1000,
        };
        TaskManager::new(&config, Arc::new(Slab))
    }

    /// Ticks until nothing is pending, collecting every report.
    fn settle(
        streamer: &mut ChunkStreamer,
        position: Point3<f32>,
        world: &mut World,
        tasks: &TaskManager,
    ) -> Vec<TickReport> {
        let builder = MeshBuilder::default();
        let mut reports = vec![streamer.tick(position, world, tasks, &builder)];
        for _ in 0..500 {
            if tasks.pending_count() == 0 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
            reports.push(streamer.tick(position, world, tasks, &builder));
        }
        reports.push(streamer.tick(position, world, tasks, &builder));
        reports
    }

    #[test]
    fn shapes_bound_the_neighborhood() {
        let square = streamer(2, NeighborhoodShape::Square);
        assert_eq!(square.neighborhood(ChunkCoord::new(0, 0)).len(), 25);
        let circle = streamer(2, NeighborhoodShape::Circle);
        assert_eq!(circle.neighborhood(ChunkCoord::new(0, 0)).len(), 13);
        assert!(!circle.in_neighborhood(ChunkCoord::new(0, 0), ChunkCoord::new(2, 1)));
        assert!(square.in_neighborhood(ChunkCoord::new(0, 0), ChunkCoord::new(2, -2)));
        assert_eq!(streamer(0, NeighborhoodShape::Square).neighborhood(ChunkCoord::new(3, 3)), vec![ChunkCoord::new(3, 3)]);
    }

    #[test]
    fn distant_coordinates_do_not_overflow() {
        let west = ChunkCoord::new(i32::MIN, 0);
        let east = ChunkCoord::new(i32::MAX, 0);
        for shape in [NeighborhoodShape::Square, NeighborhoodShape::Circle] {
            let streamer = streamer(2, shape);
            assert!(!streamer.in_neighborhood(west, east));
            assert!(!streamer.in_neighborhood(east, west));
            assert!(streamer.in_neighborhood(east, east.offset(-1, 0)));
        }
    }

    #[test]
    fn observer_at_the_edge_of_the_range_streams_the_outermost_chunks() {
        let mut streamer = streamer(1, NeighborhoodShape::Square);
        let mut world = World::new(dims());
        let tasks = tasks();

        let reports = settle(&mut streamer, Point3::new(f32::MAX, 0.0, -f32::MAX), &mut world, &tasks);
        let corner = ChunkCoord::new(i32::MAX, i32::MIN);
        assert_eq!(reports[0].center, corner);
        // Offsets past the edge collapse onto the edge chunks.
        assert_eq!(reports[0].requested.len(), 4);
        assert_eq!(world.chunk_count(), 4);
        assert_eq!(world.get_chunk_at(corner).unwrap().origin, Point3::new(i32::MAX, 0, i32::MIN));

        let reports = settle(&mut streamer, Point3::new(0.0, 0.0, 0.0), &mut world, &tasks);
        assert_eq!(reports[0].evicted.len(), 4);
        assert!(!world.contains(corner));
    }

    #[test]
    fn neighborhood_is_nearest_first() {
        let coords = streamer(3, NeighborhoodShape::Square).neighborhood(ChunkCoord::new(5, -5));
        assert_eq!(coords[0], ChunkCoord::new(5, -5));
        assert_eq!(coords.iter().collect::<HashSet<_>>().len(), 49);
    }

    #[test]
    fn streams_the_neighborhood_and_follows_the_observer() {
        let mut streamer = streamer(1, NeighborhoodShape::Square);
        let mut world = World::new(dims());
        let tasks = tasks();

        let reports = settle(&mut streamer, Point3::new(1.0, 2.0, 1.0), &mut world, &tasks);
        assert_eq!(reports[0].requested.len(), 9);
        assert_eq!(world.chunk_count(), 9);
        let promoted: usize = reports.iter().map(|r| r.promoted.len()).sum();
        assert_eq!(promoted, 9);
        for coord in world.coords().collect::<Vec<_>>() {
            assert!(world.get_chunk_at(coord).unwrap().mesh_revision >= 1);
        }

        // Step one chunk toward +X.
        let reports = settle(&mut streamer, Point3::new(5.0, 2.0, 1.0), &mut world, &tasks);
        assert_eq!(reports[0].center, ChunkCoord::new(1, 0));
        assert_eq!(reports[0].requested.len(), 3);
        assert_eq!(reports[0].evicted, vec![ChunkCoord::new(-1, -1), ChunkCoord::new(-1, 0), ChunkCoord::new(-1, 1)]);
        assert_eq!(world.chunk_count(), 9);
        assert!(world.contains(ChunkCoord::new(2, 1)));
        assert!(!world.contains(ChunkCoord::new(-1, 0)));
    }

    #[test]
    fn unchanged_center_requests_nothing() {
        let mut streamer = streamer(1, NeighborhoodShape::Square);
        let mut world = World::new(dims());
        let tasks = tasks();
        settle(&mut streamer, Point3::new(0.5, 0.0, 0.5), &mut world, &tasks);
        let report = streamer.tick(Point3::new(3.5, 0.0, 3.5), &mut world, &tasks, &MeshBuilder::default());
        assert!(report.is_idle());
    }

    #[test]
    fn late_arrivals_outside_the_neighborhood_are_evicted() {
        let mut streamer = streamer(0, NeighborhoodShape::Square);
        let mut world = World::new(dims());
        let tasks = tasks();
        // Resident outside the neighborhood as if promoted after the observer left.
        world.insert_chunk(Chunk::new(ChunkCoord::new(7, 7), Slab.synthesize(ChunkCoord::new(7, 7))));
        let reports = settle(&mut streamer, Point3::new(0.0, 0.0, 0.0), &mut world, &tasks);
        assert_eq!(reports[0].evicted, vec![ChunkCoord::new(7, 7)]);
        assert_eq!(world.coords().collect::<Vec<_>>(), vec![ChunkCoord::new(0, 0)]);
    }

    #[test]
    fn promotion_remeshes_resident_neighbors() {
        let mut streamer = streamer(1, NeighborhoodShape::Square);
        let mut world = World::new(dims());
        let tasks = tasks();
        let center = ChunkCoord::new(0, 0);
        world.insert_chunk(Chunk::new(center, Slab.synthesize(center)));
        world.rebuild_mesh(center, &MeshBuilder::default());
        let alone = world.chunk_mesh(center).unwrap().quad_count();

        settle(&mut streamer, Point3::new(0.0, 0.0, 0.0), &mut world, &tasks);
        let chunk = world.get_chunk_at(center).unwrap();
        assert!(chunk.mesh_revision > 1);
        // The slab's four outer edges are now covered by neighbors.
        assert_eq!(alone - chunk.mesh.quad_count(), 16);
    }
}
