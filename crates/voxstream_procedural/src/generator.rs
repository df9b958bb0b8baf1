//! # Chunk Factory
//!
//! Turns chunk coordinates into populated, face-culled chunks.
//!
//! ## Determinism
//!
//! Same settings + same coordinate = same chunk. The factory holds no
//! mutable state; every chunk is a pure function of the seed, the terrain
//! rules and the biome table.

use tracing::{debug, trace};
use voxstream_core::{
    BlockType, ChunkCoord, ColumnCoord, TerrainSettings, VoxelResult, WorldSettings,
};

use crate::biome::BiomeTable;
use crate::chunk::Chunk;
use crate::noise::{PerlinNoise, WorldSeed};

/// Block assignment thresholds, relative to the sampled surface height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainRules {
    /// Air below this world z is water.
    pub sea_level: i32,
    /// Dirt layers under the surface block.
    pub topsoil_depth: u32,
    /// Surface blocks up to this many layers above sea level are sand.
    pub beach_band: u32,
}

impl TerrainRules {
    /// Extracts the thresholds from terrain settings.
    #[must_use]
    pub fn from_settings(terrain: &TerrainSettings) -> Self {
        Self {
            sea_level: terrain.sea_level,
            topsoil_depth: terrain.topsoil_depth,
            beach_band: terrain.beach_band,
        }
    }

    /// Block type at world height `z` in a column whose surface height is `height`.
    ///
    /// `height` is the first air layer: the top solid block sits at `height - 1`.
    #[must_use]
    pub fn block_at(&self, z: i32, height: i32) -> BlockType {
        let surface = height - 1;
        if z > surface {
            if z < self.sea_level {
                BlockType::Water
            } else {
                BlockType::Air
            }
        } else if z == surface {
            if surface <= self.sea_level.saturating_add(self.beach_band as i32) {
                BlockType::Sand
            } else {
                BlockType::Grass
            }
        } else if z >= surface.saturating_sub(self.topsoil_depth as i32) {
            BlockType::Dirt
        } else {
            BlockType::Stone
        }
    }
}

/// The chunks of one `(x, y)` column, ascending in `z`.
#[derive(Clone, Debug)]
pub struct ChunkColumn {
    /// Column position.
    pub coord: ColumnCoord,
    /// Chunks, bottom first.
    pub chunks: Vec<Chunk>,
}

impl ChunkColumn {
    /// Vertical chunk range `[lo, hi]` covered by this column.
    #[must_use]
    pub fn z_span(&self) -> Option<(i32, i32)> {
        let lo = self.chunks.first()?.location().z;
        let hi = self.chunks.last()?.location().z;
        Some((lo, hi))
    }
}

/// Builds chunks from noise.
#[derive(Clone, Debug)]
pub struct ChunkFactory {
    noise: PerlinNoise,
    biomes: BiomeTable,
    rules: TerrainRules,
    chunk_size: u32,
}

impl ChunkFactory {
    /// Creates a factory for the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation or name an unknown
    /// default biome.
    pub fn new(settings: &WorldSettings) -> VoxelResult<Self> {
        settings.validate()?;
        let biomes = BiomeTable::from_settings(&settings.terrain)?;
        debug!(
            "ChunkFactory ready: seed={}, chunk_size={}, biome={}",
            settings.seed,
            settings.chunk_size,
            biomes.default_name()
        );

        Ok(Self {
            noise: PerlinNoise::new(WorldSeed::new(settings.seed)),
            biomes,
            rules: TerrainRules::from_settings(&settings.terrain),
            chunk_size: settings.chunk_size,
        })
    }

    /// Chunk edge length in blocks.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// The noise source.
    #[must_use]
    pub const fn noise(&self) -> &PerlinNoise {
        &self.noise
    }

    /// The biome table.
    #[must_use]
    pub const fn biomes(&self) -> &BiomeTable {
        &self.biomes
    }

    /// Block assignment thresholds.
    #[must_use]
    pub const fn rules(&self) -> TerrainRules {
        self.rules
    }

    /// Surface height at a world column (first air layer above ground).
    #[must_use]
    pub fn surface_height(&self, world_x: i32, world_y: i32) -> i32 {
        self.biomes
            .sample_biome_height(&self.noise, f64::from(world_x), f64::from(world_y))
            .floor() as i32
    }

    /// Surface heights for a column's footprint, indexed `y * size + x`.
    #[must_use]
    pub fn column_heights(&self, column: ColumnCoord) -> Vec<i32> {
        let size = self.chunk_size as i32;
        let [ox, oy, _] = column.chunk(0).world_origin(self.chunk_size);

        let mut heights = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                heights.push(self.surface_height(ox + x, oy + y));
            }
        }
        heights
    }

    /// Generates a single chunk.
    #[must_use]
    pub fn make_chunk(&self, coord: ChunkCoord) -> Chunk {
        let heights = self.column_heights(coord.column());
        self.fill_chunk(coord, &heights)
    }

    /// Generates every chunk of a column that holds terrain or water.
    ///
    /// The span is `[floor((min - 1) / size), floor(max / size)]` over the
    /// sampled heights, raised to include the water surface. A height is the
    /// first air layer, so the lowest surface block sits at `min - 1`.
    #[must_use]
    pub fn make_chunk_column(&self, column: ColumnCoord) -> ChunkColumn {
        let heights = self.column_heights(column);
        let (lo, hi) = self.z_span(&heights);

        let chunks = (lo..=hi)
            .map(|z| self.fill_chunk(column.chunk(z), &heights))
            .collect::<Vec<_>>();

        trace!("Generated column {column}: z {lo}..={hi}");
        ChunkColumn { coord: column, chunks }
    }

    /// Chunk z range implied by a heightmap.
    #[must_use]
    pub fn z_span(&self, heights: &[i32]) -> (i32, i32) {
        let size = self.chunk_size as i32;
        let min = heights.iter().copied().min().unwrap_or(0);
        let max = heights.iter().copied().max().unwrap_or(0);

        // Top solid block of the lowest column is one below its height
        let lo = (min - 1).div_euclid(size);
        let water_top = (self.rules.sea_level - 1).div_euclid(size);
        let hi = max.div_euclid(size).max(water_top).max(lo);
        (lo, hi)
    }

    fn fill_chunk(&self, coord: ChunkCoord, heights: &[i32]) -> Chunk {
        let size = self.chunk_size as usize;
        let [_, _, oz] = coord.world_origin(self.chunk_size);
        let mut chunk = Chunk::new(coord, self.chunk_size);

        for z in 0..size {
            let world_z = oz + z as i32;
            for y in 0..size {
                for x in 0..size {
                    let kind = self.rules.block_at(world_z, heights[y * size + x]);
                    if kind != BlockType::Air {
                        chunk.set_kind(x, y, z, kind);
                    }
                }
            }
        }

        chunk.cull_faces();
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxstream_core::{Biome, Face, LocalCoord};

    fn rules() -> TerrainRules {
        TerrainRules::from_settings(&TerrainSettings::default())
    }

    #[test]
    fn test_rules_layers() {
        let rules = rules();
        // Surface at 79 (height 80)
        assert_eq!(rules.block_at(80, 80), BlockType::Air);
        assert_eq!(rules.block_at(79, 80), BlockType::Grass);
        assert_eq!(rules.block_at(78, 80), BlockType::Dirt);
        assert_eq!(rules.block_at(76, 80), BlockType::Dirt);
        assert_eq!(rules.block_at(75, 80), BlockType::Stone);
    }

    #[test]
    fn test_rules_water_and_beach() {
        let rules = rules();
        // Floor at 49, sea level 62
        assert_eq!(rules.block_at(61, 50), BlockType::Water);
        assert_eq!(rules.block_at(62, 50), BlockType::Air);
        assert_eq!(rules.block_at(49, 50), BlockType::Sand);
        // Surface right at the beach band edge
        assert_eq!(rules.block_at(63, 64), BlockType::Sand);
        assert_eq!(rules.block_at(64, 65), BlockType::Grass);
    }

    #[test]
    fn test_factory_rejects_bad_settings() {
        let settings = WorldSettings {
            chunk_size: 0,
            ..WorldSettings::default()
        };
        assert!(ChunkFactory::new(&settings).is_err());
    }

    #[test]
    fn test_make_chunk_deterministic() {
        let settings = WorldSettings::default();
        let a = ChunkFactory::new(&settings).unwrap();
        let b = ChunkFactory::new(&settings).unwrap();

        let coord = ChunkCoord::new(3, -2, 4);
        assert_eq!(a.make_chunk(coord).blocks(), b.make_chunk(coord).blocks());
    }

    #[test]
    fn test_column_covers_surface() {
        let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
        let column = factory.make_chunk_column(ColumnCoord::new(0, 0));
        let (lo, hi) = column.z_span().unwrap();
        assert!(lo <= hi);

        let size = factory.chunk_size() as i32;
        let h = factory.surface_height(0, 0);
        let chunk = column
            .chunks
            .iter()
            .find(|c| c.location().z == (h - 1).div_euclid(size))
            .expect("surface chunk generated");
        let local = LocalCoord::new(0, 0, (h - 1).rem_euclid(size));
        let top = chunk.block(local).unwrap();
        assert!(top.kind == BlockType::Grass || top.kind == BlockType::Sand);
        assert!(top.faces.contains(Face::Top) || local.z == size - 1);
    }

    #[test]
    fn test_flat_surface_on_chunk_border() {
        let mut settings = WorldSettings::default();
        settings
            .terrain
            .biomes
            .insert("plains".to_string(), Biome::new(0.01, 1, 64, 64));
        let factory = ChunkFactory::new(&settings).unwrap();
        assert_eq!(factory.surface_height(0, 0), 64);

        let column = factory.make_chunk_column(ColumnCoord::new(0, 0));
        let (lo, hi) = column.z_span().unwrap();
        assert_eq!((lo, hi), (3, 4));

        // Surface row at z = 63 is the top layer of chunk 3
        let surface = &column.chunks[0];
        assert_eq!(surface.location().z, 3);
        for y in 0..16 {
            for x in 0..16 {
                let top = surface.block(LocalCoord::new(x, y, 15)).unwrap();
                // One layer above sea level falls in the beach band
                assert_eq!(top.kind, BlockType::Sand);
                assert!(top.faces.contains(Face::Top));
            }
        }
        assert!(surface.solid_count() > 0);
        assert_eq!(column.chunks[1].solid_count(), 0);
    }

    #[test]
    fn test_z_span_includes_block_below_height() {
        let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
        assert_eq!(factory.z_span(&[80, 96]).0, 4);
        assert_eq!(factory.z_span(&[81, 96]).0, 5);
        assert_eq!(factory.z_span(&[0]).0, -1);
    }

    #[test]
    fn test_column_chunks_ascend() {
        let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
        let column = factory.make_chunk_column(ColumnCoord::new(-5, 9));
        for pair in column.chunks.windows(2) {
            assert_eq!(pair[0].location().z + 1, pair[1].location().z);
        }
        assert!(column.chunks.iter().all(Chunk::is_dirty));
    }
}
