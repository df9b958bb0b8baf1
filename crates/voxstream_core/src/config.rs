//! # World Settings
//!
//! Caller-owned configuration, read once at startup and passed by reference
//! into every component that needs it.
//!
//! Settings can be built in code (`WorldSettings::default()`) or loaded from
//! TOML:
//!
//! ```toml
//! chunk_size = 16
//! render_distance = 8
//! seed = 12345
//!
//! [terrain]
//! sea_level = 62
//! default_biome = "plains"
//!
//! [terrain.biomes.plains]
//! scale = 0.01
//! octaves = 3
//! lo = 64
//! hi = 112
//! ```
//!
//! Validation failures are fatal: a world must not start with a chunk size
//! of zero or a biome whose height range is inverted.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VoxelError, VoxelResult};

/// Largest accepted chunk edge (keeps a chunk under 16M blocks).
pub const MAX_CHUNK_SIZE: u32 = 256;

/// Noise-shaping parameters for one biome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Biome {
    /// Starting frequency of the first octave.
    pub scale: f64,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Lowest terrain height produced.
    pub lo: u32,
    /// Highest terrain height produced.
    pub hi: u32,
}

impl Biome {
    /// Creates a biome parameter set.
    #[must_use]
    pub const fn new(scale: f64, octaves: u32, lo: u32, hi: u32) -> Self {
        Self {
            scale,
            octaves,
            lo,
            hi,
        }
    }

    /// Checks that the parameters describe a usable height field.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::InvalidArgument`] for a non-positive scale,
    /// zero octaves or `lo > hi`.
    pub fn validate(&self, name: &str) -> VoxelResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(VoxelError::InvalidArgument(format!(
                "biome '{name}': scale must be positive, got {}",
                self.scale
            )));
        }
        if self.octaves == 0 {
            return Err(VoxelError::InvalidArgument(format!(
                "biome '{name}': octaves must be at least 1"
            )));
        }
        if self.lo > self.hi {
            return Err(VoxelError::InvalidArgument(format!(
                "biome '{name}': lo ({}) above hi ({})",
                self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// Block assignment rules and biome selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainSettings {
    /// World Z of the sea surface; air below it over low terrain becomes water.
    pub sea_level: i32,
    /// Dirt layers under the surface block before stone begins.
    pub topsoil_depth: u32,
    /// Surface blocks within this many layers of the sea level become sand.
    pub beach_band: u32,
    /// Name of the biome used everywhere.
    pub default_biome: String,
    /// Overrides (or additions) to the built-in biome table.
    pub biomes: BTreeMap<String, Biome>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            sea_level: 62,
            topsoil_depth: 3,
            beach_band: 1,
            default_biome: "plains".to_string(),
            biomes: BTreeMap::new(),
        }
    }
}

/// Process-wide world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldSettings {
    /// Chunk edge length in blocks. Fixed for the session.
    pub chunk_size: u32,
    /// View distance in chunks.
    pub render_distance: u32,
    /// Seed of the noise permutation table.
    pub seed: u64,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    /// How far (in chunks) the visibility triangle's apex sits behind the eye.
    pub near_margin: f32,
    /// Terrain shaping.
    pub terrain: TerrainSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            render_distance: 8,
            seed: 12345,
            fov_degrees: 70.0,
            near_margin: 1.5,
            terrain: TerrainSettings::default(),
        }
    }
}

impl WorldSettings {
    /// Parses and validates settings from a TOML document.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::ConfigParse`] for malformed TOML and
    /// [`VoxelError::InvalidArgument`] if validation fails.
    pub fn from_toml_str(text: &str) -> VoxelResult<Self> {
        let settings: Self =
            toml::from_str(text).map_err(|e| VoxelError::ConfigParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::ConfigRead`] if the file cannot be read, plus
    /// everything [`WorldSettings::from_toml_str`] can return.
    pub fn load(path: impl AsRef<Path>) -> VoxelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| VoxelError::ConfigRead(format!("{}: {e}", path.display())))?;
        let settings = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded settings from {}: chunk_size={}, render_distance={}, seed={}",
            path.display(),
            settings.chunk_size,
            settings.render_distance,
            settings.seed
        );
        Ok(settings)
    }

    /// Checks every value against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::InvalidArgument`] naming the first bad value.
    pub fn validate(&self) -> VoxelResult<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(VoxelError::InvalidArgument(format!(
                "chunk_size must be in 1..={MAX_CHUNK_SIZE}, got {}",
                self.chunk_size
            )));
        }
        if self.render_distance == 0 {
            return Err(VoxelError::InvalidArgument(
                "render_distance must be at least 1".to_string(),
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(VoxelError::InvalidArgument(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !self.near_margin.is_finite() || self.near_margin < 0.0 {
            return Err(VoxelError::InvalidArgument(format!(
                "near_margin must be non-negative, got {}",
                self.near_margin
            )));
        }
        if self.terrain.default_biome.is_empty() {
            return Err(VoxelError::InvalidArgument(
                "terrain.default_biome must name a biome".to_string(),
            ));
        }
        for (name, biome) in &self.terrain.biomes {
            biome.validate(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let settings = WorldSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.chunk_size, 16);
    }

    #[test]
    fn test_parse_partial_document() {
        let settings = WorldSettings::from_toml_str(
            r#"
            seed = 99
            render_distance = 4

            [terrain]
            sea_level = 40

            [terrain.biomes.plains]
            scale = 0.01
            octaves = 3
            lo = 64
            hi = 112
            "#,
        )
        .unwrap();

        assert_eq!(settings.seed, 99);
        assert_eq!(settings.render_distance, 4);
        assert_eq!(settings.chunk_size, 16);
        assert_eq!(settings.terrain.sea_level, 40);
        assert_eq!(settings.terrain.topsoil_depth, 3);
        assert_eq!(
            settings.terrain.biomes.get("plains"),
            Some(&Biome::new(0.01, 3, 64, 112))
        );
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = WorldSettings::from_toml_str("chunk_size = 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_bad_fov_rejected() {
        let settings = WorldSettings {
            fov_degrees: 180.0,
            ..WorldSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_inverted_biome_rejected() {
        let err = WorldSettings::from_toml_str(
            r#"
            [terrain.biomes.plains]
            scale = 0.01
            octaves = 3
            lo = 120
            hi = 64
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, VoxelError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = WorldSettings::from_toml_str("chunk_sise = 16").unwrap_err();
        assert!(matches!(err, VoxelError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = WorldSettings::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, VoxelError::ConfigRead(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
