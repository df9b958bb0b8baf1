//! # VOXSTREAM Procedural Generation
//!
//! Deterministic world generation, meshing and streaming for a voxel world
//! seen through a moving camera.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in fixed-size cubic chunks
//! 3. **Streamable**: Columns are generated and discarded as the camera moves
//! 4. **Amortized**: At most one column is generated per frame tick
//!
//! ## Core Components
//!
//! - `PerlinNoise`: seeded 3D gradient noise with octave composition
//! - `BiomeTable`: named noise-shaping parameter sets
//! - `ChunkFactory`: produces face-culled chunks from noise
//! - `MeshBuilder` / `TerrainMesh`: vertex buffers per chunk and merged
//! - `ChunkStore` / `EditCache` / `World`: who owns which chunk
//! - `StreamingScheduler`: frustum-driven load/unload
//! - `BlockEditor`: block add/remove that survives eviction
//!
//! ## Example
//!
//! ```rust
//! use voxstream_core::{Camera, WorldSettings};
//! use voxstream_procedural::{ChunkFactory, StreamingScheduler, World};
//!
//! let settings = WorldSettings { render_distance: 2, ..WorldSettings::default() };
//! let factory = ChunkFactory::new(&settings).unwrap();
//! let mut world = World::new(settings.chunk_size);
//! let mut scheduler = StreamingScheduler::new(&settings);
//!
//! let camera = Camera::new(&settings, [8.0, 8.0, 100.0], [1.0, 0.0, 0.0]);
//! scheduler.recompute(&camera, &mut world);
//! scheduler.flush(&factory, &mut world);
//! assert!(!world.store().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod biome;
pub mod chunk;
pub mod edit_cache;
pub mod editor;
pub mod frustum;
pub mod generator;
pub mod mesh;
pub mod noise;
pub mod store;
pub mod streaming;
pub mod world;

pub use biome::{BiomeKind, BiomeTable};
pub use chunk::Chunk;
pub use edit_cache::EditCache;
pub use editor::BlockEditor;
pub use frustum::Frustum2D;
pub use generator::{ChunkColumn, ChunkFactory, TerrainRules};
pub use mesh::{BlockTiles, MeshBuilder, TerrainMesh, TextureAtlas, Vertex};
pub use noise::{PerlinNoise, WorldSeed};
pub use store::ChunkStore;
pub use streaming::{
    RecomputeReport, SchedulerState, StreamingScheduler, StreamingStats, TickOutcome,
};
pub use world::{Eviction, World};
