//! # Noise Module
//!
//! Deterministic seeded noise used by terrain generation.
//!
//! ## Primitives
//!
//! * `GradientNoise`: 2D lattice gradient noise in `[0, 1]`. Each integer
//!   lattice point owns a unit gradient chosen by hashing its coordinates with
//!   the seed; samples blend the four corner contributions with smoothstep
//!   weights. Every lattice point evaluates to exactly `0.5`.
//! * Pseudo-3D noise: the mean of six 2D samples over every ordered axis pair.
//!   It is cheaper than true 3D noise but visibly biased along the primary
//!   axes, which is acceptable for caves and ore veins.
//!
//! `NoiseField` composes these into the four feature samplers (height, cave,
//! ore, biome). Everything here is immutable after construction and safe to
//! share between generation workers.

use std::f64::consts::{SQRT_2, TAU};

use noise::{NoiseFn, Seedable};

use crate::config::{BiomeConfig, CaveConfig, OreConfig, TerrainConfig, WorldConfig};

/// Mixes lattice coordinates and a seed into a well-distributed 64-bit value.
///
/// Also used to seed per-position decoration rolls.
pub fn hash_coordinates(x: i64, z: i64, seed: u32) -> u64 {
    let mut h = (seed as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= (x as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h = h.rotate_left(31);
    h ^= (z as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    // splitmix64 finalizer
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

/// Seeded 2D lattice gradient noise with output in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct GradientNoise {
    seed: u32,
}

impl GradientNoise {
    /// Creates a noise function for a seed.
    pub const fn new(seed: u32) -> Self {
        GradientNoise { seed }
    }

    fn gradient(&self, ix: i64, iz: i64) -> (f64, f64) {
        // Top 53 bits give a uniform fraction of a full turn.
        let turn = (hash_coordinates(ix, iz, self.seed) >> 11) as f64 / (1u64 << 53) as f64;
        let angle = turn * TAU;
        (angle.cos(), angle.sin())
    }

    fn corner(&self, ix: i64, iz: i64, dx: f64, dz: f64) -> f64 {
        let (gx, gz) = self.gradient(ix, iz);
        gx * dx + gz * dz
    }

    /// Averages six 2D samples over the ordered axis pairs of a 3D point.
    pub fn pseudo_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let samples = [
            self.get([x, y]),
            self.get([y, z]),
            self.get([x, z]),
            self.get([y, x]),
            self.get([z, y]),
            self.get([z, x]),
        ];
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        let [x, z] = point;
        let x0 = x.floor();
        let z0 = z.floor();
        let fx = x - x0;
        let fz = z - z0;
        let ix = x0 as i64;
        let iz = z0 as i64;

        let n00 = self.corner(ix, iz, fx, fz);
        let n10 = self.corner(ix + 1, iz, fx - 1.0, fz);
        let n01 = self.corner(ix, iz + 1, fx, fz - 1.0);
        let n11 = self.corner(ix + 1, iz + 1, fx - 1.0, fz - 1.0);

        let u = smoothstep(fx);
        let v = smoothstep(fz);
        let value = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v);

        // Unit gradients bound the raw value by sqrt(2)/2.
        ((value * SQRT_2 + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl Seedable for GradientNoise {
    fn set_seed(self, seed: u32) -> Self {
        GradientNoise { seed }
    }

    fn seed(&self) -> u32 {
        self.seed
    }
}

/// The feature samplers of a world, built from one seed.
#[derive(Clone, Debug)]
pub struct NoiseField {
    noise: GradientNoise,
    terrain: TerrainConfig,
    caves: CaveConfig,
    ores: OreConfig,
    biome: BiomeConfig,
}

impl NoiseField {
    /// Builds the samplers for a world configuration.
    pub fn new(config: &WorldConfig) -> Self {
        NoiseField {
            noise: GradientNoise::new(config.seed),
            terrain: config.terrain,
            caves: config.caves,
            ores: config.ores,
            biome: config.biome,
        }
    }

    /// World seed.
    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    /// Terrain surface height at a world column.
    ///
    /// Three octaves (base, double frequency at half amplitude, half frequency
    /// at one and a half amplitude) are averaged and added to the base height.
    pub fn height(&self, x: f64, z: f64) -> f64 {
        let s = self.terrain.scale;
        let m = self.terrain.height_multiplier;
        let n = &self.noise;
        let base = n.get([x * s, z * s]) * m;
        let detail = n.get([x * s * 2.0 + 100.0, z * s * 2.0 + 100.0]) * m * 0.5;
        let large = n.get([x * s * 0.5 + 200.0, z * s * 0.5 + 200.0]) * m * 1.5;
        (base + detail + large) / 3.0 + self.terrain.base_height
    }

    /// Cave density at a world cell.
    pub fn cave(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = self.caves.scale;
        let o = self.caves.offset;
        self.noise.pseudo_3d(x * s + o, y * s + o, z * s + o)
    }

    /// Ore density at a world cell.
    pub fn ore(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = self.ores.scale;
        let o = self.ores.offset;
        self.noise.pseudo_3d(x * s + o, y * s + o, z * s + o)
    }

    /// Low-frequency biome value of a chunk.
    pub fn biome(&self, cx: i32, cz: i32) -> f64 {
        let s = self.biome.scale;
        let o = self.biome.offset;
        self.noise.get([cx as f64 * s + o, cz as f64 * s + o])
    }
}
