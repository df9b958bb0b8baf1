//! # VOXSTREAM Core
//!
//! The shared data model of the streaming voxel world.
//!
//! ## Contents
//!
//! - `ChunkCoord` / `ColumnCoord` / `LocalCoord`: integer world addressing
//! - `BlockType` / `Face` / `FaceMask` / `Block`: what a chunk is made of
//! - `Camera` / `FrameInput`: per-frame state handed in from outside
//! - `WorldSettings`: caller-owned configuration, no global singletons
//! - `VoxelError`: the closed result taxonomy
//!
//! ## Example
//!
//! ```rust
//! use voxstream_core::{WorldSettings, LocalCoord};
//!
//! let settings = WorldSettings::default();
//! assert!(settings.validate().is_ok());
//! assert!(!LocalCoord::new(-1, 0, 0).in_bounds(settings.chunk_size));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod block;
pub mod camera;
pub mod config;
pub mod coord;
pub mod error;
pub mod input;

pub use block::{Block, BlockType, Face, FaceMask};
pub use camera::Camera;
pub use config::{Biome, TerrainSettings, WorldSettings, MAX_CHUNK_SIZE};
pub use coord::{ChunkCoord, ColumnCoord, LocalCoord, MAX_CHUNK_COORD};
pub use error::{ErrorKind, VoxelError, VoxelResult};
pub use input::{BlockEdit, EditAction, FrameInput};
