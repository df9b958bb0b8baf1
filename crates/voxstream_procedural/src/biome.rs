//! # Biome Table
//!
//! Named noise-shaping parameter sets that bias terrain character.
//!
//! Biome selection is currently a fixed default biome: every point of the
//! world samples the biome named by `terrain.default_biome`. A spatial
//! biome map is not implemented.

use std::collections::BTreeMap;

use voxstream_core::{Biome, TerrainSettings, VoxelError, VoxelResult};

use crate::noise::PerlinNoise;

/// Built-in biomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BiomeKind {
    /// Gentle rolling grassland.
    Plains,
    /// Rough, high terrain.
    Mountains,
    /// Low floor that sits under the sea level.
    Ocean,
}

impl BiomeKind {
    /// All built-in biomes.
    pub const ALL: [Self; 3] = [Self::Plains, Self::Mountains, Self::Ocean];

    /// Table key of this biome.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Mountains => "mountains",
            Self::Ocean => "ocean",
        }
    }

    /// Built-in parameters.
    #[must_use]
    pub const fn params(self) -> Biome {
        match self {
            Self::Plains => Biome::new(0.01, 3, 64, 112),
            Self::Mountains => Biome::new(0.015, 5, 64, 192),
            Self::Ocean => Biome::new(0.005, 2, 24, 60),
        }
    }
}

/// Mapping from biome name to parameters, plus the biome in use.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeTable {
    entries: BTreeMap<String, Biome>,
    default: Biome,
    default_name: String,
}

impl Default for BiomeTable {
    fn default() -> Self {
        let entries = Self::builtin();
        let default = BiomeKind::Plains.params();
        Self {
            entries,
            default,
            default_name: BiomeKind::Plains.name().to_string(),
        }
    }
}

impl BiomeTable {
    /// Builds the table from the built-ins plus the overrides in `terrain`.
    ///
    /// # Errors
    ///
    /// Returns [`VoxelError::UnknownBiome`] if `terrain.default_biome` is not
    /// in the merged table, or [`VoxelError::InvalidArgument`] for an
    /// override with bad parameters.
    pub fn from_settings(terrain: &TerrainSettings) -> VoxelResult<Self> {
        let mut entries = Self::builtin();
        for (name, biome) in &terrain.biomes {
            biome.validate(name)?;
            entries.insert(name.clone(), *biome);
        }

        let default = *entries
            .get(&terrain.default_biome)
            .ok_or_else(|| VoxelError::UnknownBiome(terrain.default_biome.clone()))?;

        Ok(Self {
            entries,
            default,
            default_name: terrain.default_biome.clone(),
        })
    }

    fn builtin() -> BTreeMap<String, Biome> {
        BiomeKind::ALL
            .into_iter()
            .map(|kind| (kind.name().to_string(), kind.params()))
            .collect()
    }

    /// Looks a biome up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Biome> {
        self.entries.get(name)
    }

    /// Name of the biome used for every sample.
    #[must_use]
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Selects the biome for a world column.
    ///
    /// Always the default biome.
    #[must_use]
    pub fn select(&self, _x: f64, _y: f64) -> &Biome {
        &self.default
    }

    /// Terrain height at world column `(x, y)`, in `[lo, hi]` of the selected biome.
    #[must_use]
    pub fn sample_biome_height(&self, noise: &PerlinNoise, x: f64, y: f64) -> f64 {
        let biome = self.select(x, y);
        noise.octave_perlin(
            x,
            y,
            0.0,
            biome.scale,
            biome.octaves,
            f64::from(biome.lo),
            f64::from(biome.hi),
        )
    }
}
