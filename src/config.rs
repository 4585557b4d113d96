//! # World Configuration
//!
//! All tunables of a world, set once at startup: seed, chunk shape, streaming
//! radius, worker pool, and the noise constants of every generation feature.
//!
//! Configuration is plain JSON. Every section carries `#[serde(default)]`, so a
//! file only needs to name the values it overrides:
//!
//! ```json
//! { "seed": 42, "streaming": { "radius": 5 }, "scheduler": { "worker_count": 8 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::streaming::NeighborhoodShape;
use crate::engine_state::voxels::chunk::ChunkDimensions;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON or does not match the schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside its accepted range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration of a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed shared by every noise function and decoration roll.
    pub seed: u32,
    /// Shape of every chunk.
    pub chunk: ChunkDimensions,
    /// Neighborhood kept resident around the observer.
    pub streaming: StreamingConfig,
    /// Background generation pool.
    pub scheduler: SchedulerConfig,
    /// Terrain height field.
    pub terrain: TerrainConfig,
    /// Cave carving.
    pub caves: CaveConfig,
    /// Ore veins.
    pub ores: OreConfig,
    /// Per-chunk biome classification.
    pub biome: BiomeConfig,
    /// Tree decoration.
    pub trees: TreeConfig,
    /// Texture atlas layout used for UVs.
    pub atlas: AtlasConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 0,
            chunk: ChunkDimensions::default(),
            streaming: StreamingConfig::default(),
            scheduler: SchedulerConfig::default(),
            terrain: TerrainConfig::default(),
            caves: CaveConfig::default(),
            ores: OreConfig::default(),
            biome: BiomeConfig::default(),
            trees: TreeConfig::default(),
            atlas: AtlasConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Neighborhood kept resident around the observer.
pub struct StreamingConfig {
    /// Radius in chunks. Zero keeps only the observer's own chunk.
    pub radius: i32,
    /// Distance metric of the neighborhood.
    pub shape: NeighborhoodShape,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            radius: 3,
            shape: NeighborhoodShape::Square,
        }
    }
}

/// Background generation pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// How long an idle worker waits on the queue before re-checking shutdown.
    pub idle_backoff_ms: u64,
    /// Upper bound on waiting for each worker at shutdown.
    pub join_timeout_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            worker_count: 4,
            idle_backoff_ms: 10,
            join_timeout_ms: 1000,
        }
    }
}

/// Terrain height field: three octaves averaged over a base elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Frequency of the base octave.
    pub scale: f64,
    /// Amplitude of the base octave.
    pub height_multiplier: f64,
    /// Elevation added to the averaged octaves.
    pub base_height: f64,
    /// Sea level as a fraction of `base_height`.
    pub sea_level_fraction: f64,
    /// Thickness of the dirt band under grass, counting the grass cell.
    pub dirt_depth: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            scale: 0.05,
            height_multiplier: 80.0,
            base_height: 128.0,
            sea_level_fraction: 0.4,
            dirt_depth: 4,
        }
    }
}

impl TerrainConfig {
    /// Cells strictly below this height are filled with water when above terrain.
    pub fn sea_level(&self) -> f64 {
        self.base_height * self.sea_level_fraction
    }
}

/// Cave carving through pseudo-3D noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Disables carving entirely when false.
    pub enabled: bool,
    /// Sampling frequency.
    pub scale: f64,
    /// Stone becomes air when the noise exceeds this.
    pub threshold: f64,
    /// Offset added to scaled coordinates to decorrelate from other features.
    pub offset: f64,
}

impl Default for CaveConfig {
    fn default() -> Self {
        CaveConfig {
            enabled: true,
            scale: 0.1,
            threshold: 0.4,
            offset: 300.0,
        }
    }
}

/// Ore veins. Thresholds ascend from coal to gold; depth gates are fractions
/// of the terrain base height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreConfig {
    /// Sampling frequency.
    pub scale: f64,
    /// Coordinate offset.
    pub offset: f64,
    /// Noise threshold for coal.
    pub coal_threshold: f64,
    /// Noise threshold for iron.
    pub iron_threshold: f64,
    /// Noise threshold for gold.
    pub gold_threshold: f64,
    /// Coal only below `base_height * coal_depth_fraction`.
    pub coal_depth_fraction: f64,
    /// Iron only below `base_height * iron_depth_fraction`.
    pub iron_depth_fraction: f64,
    /// Gold only below `base_height * gold_depth_fraction`.
    pub gold_depth_fraction: f64,
}

impl Default for OreConfig {
    fn default() -> Self {
        OreConfig {
            scale: 0.2,
            offset: 400.0,
            coal_threshold: 0.7,
            iron_threshold: 0.8,
            gold_threshold: 0.9,
            coal_depth_fraction: 0.6,
            iron_depth_fraction: 0.4,
            gold_depth_fraction: 0.2,
        }
    }
}

/// Per-chunk biome classification from low-frequency noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    /// Frequency applied to chunk coordinates.
    pub scale: f64,
    /// Coordinate offset.
    pub offset: f64,
    /// Noise below this is forest.
    pub forest_below: f64,
    /// Noise below this (and not forest) is autumn; anything above is savanna.
    pub autumn_below: f64,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        BiomeConfig {
            scale: 0.1,
            offset: 500.0,
            forest_below: 0.45,
            autumn_below: 0.55,
        }
    }
}

/// Tree decoration on grass columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Probability of a tree on each grass column.
    pub chance: f64,
    /// Probability that a tree uses the transparent leaf material.
    pub transparent_leaf_chance: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            chance: 0.01,
            transparent_leaf_chance: 0.3,
        }
    }
}

/// Texture atlas layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Tiles per atlas row and column.
    pub tiles_per_side: u32,
    /// Inward UV padding, as a fraction of one tile.
    pub padding: f32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            tiles_per_side: 16,
            padding: 0.001,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every value against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit(name: &str, value: f64) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {value}")))
            }
        }

        let chunk = &self.chunk;
        if chunk.size_x == 0 || chunk.size_y == 0 || chunk.size_z == 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk dimensions must be positive, got {}x{}x{}",
                chunk.size_x, chunk.size_y, chunk.size_z
            )));
        }
        if chunk.size_x > i32::MAX as usize || chunk.size_y > i32::MAX as usize || chunk.size_z > i32::MAX as usize {
            return Err(ConfigError::Invalid("chunk dimensions overflow i32".to_string()));
        }
        if self.streaming.radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "streaming radius must not be negative, got {}",
                self.streaming.radius
            )));
        }
        if self.scheduler.worker_count == 0 {
            return Err(ConfigError::Invalid("scheduler needs at least one worker".to_string()));
        }
        if self.terrain.dirt_depth < 0 {
            return Err(ConfigError::Invalid("terrain dirt depth must not be negative".to_string()));
        }
        unit("terrain.sea_level_fraction", self.terrain.sea_level_fraction)?;
        unit("caves.threshold", self.caves.threshold)?;
        unit("ores.coal_threshold", self.ores.coal_threshold)?;
        unit("ores.iron_threshold", self.ores.iron_threshold)?;
        unit("ores.gold_threshold", self.ores.gold_threshold)?;
        let ores = &self.ores;
        if ores.coal_threshold > ores.iron_threshold || ores.iron_threshold > ores.gold_threshold {
            return Err(ConfigError::Invalid(format!(
                "ore thresholds must ascend coal <= iron <= gold, got {} / {} / {}",
                ores.coal_threshold, ores.iron_threshold, ores.gold_threshold
            )));
        }
        unit("ores.coal_depth_fraction", self.ores.coal_depth_fraction)?;
        unit("ores.iron_depth_fraction", self.ores.iron_depth_fraction)?;
        unit("ores.gold_depth_fraction", self.ores.gold_depth_fraction)?;
        unit("biome.forest_below", self.biome.forest_below)?;
        unit("biome.autumn_below", self.biome.autumn_below)?;
        if self.biome.forest_below > self.biome.autumn_below {
            return Err(ConfigError::Invalid(
                "biome.forest_below must not exceed biome.autumn_below".to_string(),
            ));
        }
        unit("trees.chance", self.trees.chance)?;
        unit("trees.transparent_leaf_chance", self.trees.transparent_leaf_chance)?;
        if self.atlas.tiles_per_side == 0 {
            return Err(ConfigError::Invalid("atlas must have at least one tile per side".to_string()));
        }
        if !(0.0..0.5).contains(&self.atlas.padding) {
            return Err(ConfigError::Invalid(format!(
                "atlas padding must be within [0, 0.5), got {}",
                self.atlas.padding
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk.size_y, 384);
        assert_eq!(config.terrain.sea_level(), 128.0 * 0.4);
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config =
            WorldConfig::from_json_str(r#"{ "seed": 7, "streaming": { "radius": 1, "shape": "circle" } }"#)
                .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.streaming.radius, 1);
        assert_eq!(config.streaming.shape, NeighborhoodShape::Circle);
        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert_eq!(config.ores.gold_threshold, 0.9);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = WorldConfig::from_json_str(r#"{ "scheduler": { "worker_count": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = WorldConfig::from_json_str(r#"{ "atlas": { "padding": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = WorldConfig::from_json_str(r#"{ "streaming": { "radius": -1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = WorldConfig::from_json_str(r#"{ "ores": { "coal_threshold": 0.95 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = WorldConfig::from_json_str(r#"{ "ores": { "iron_threshold": 0.6 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let equal = r#"{ "ores": { "coal_threshold": 0.8, "iron_threshold": 0.8, "gold_threshold": 0.8 } }"#;
        assert!(WorldConfig::from_json_str(equal).is_ok());

        let err = WorldConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 99, "chunk": {{ "size_x": 8, "size_y": 32, "size_z": 8 }} }}"#).unwrap();
        let config = WorldConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.chunk.size_y, 32);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorldConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn serialized_config_round_trips() {
        let mut config = WorldConfig::default();
        config.seed = 1234;
        config.trees.chance = 0.5;
        let json = config.to_json_string().unwrap();
        assert_eq!(WorldConfig::from_json_str(&json).unwrap(), config);
    }
}
