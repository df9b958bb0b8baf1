//! # Error Types
//!
//! All errors a world operation can report.
//!
//! Every variant falls into one of three outcomes (see [`ErrorKind`]):
//! the call was refused because a precondition did not hold, a local
//! coordinate was outside its chunk, or the configuration was malformed.
//! A successful call is simply `Ok`.

use thiserror::Error;

use crate::block::BlockType;
use crate::coord::ChunkCoord;

/// Errors that can occur while configuring or editing the world.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoxelError {
    /// Local coordinate outside `[0, chunk_size)` on some axis.
    #[error("local coordinate ({x}, {y}, {z}) outside chunk of size {chunk_size}")]
    OutOfBounds {
        /// Requested local X.
        x: i32,
        /// Requested local Y.
        y: i32,
        /// Requested local Z.
        z: i32,
        /// Chunk edge length.
        chunk_size: u32,
    },

    /// Target cell already holds a block and overwriting was not allowed.
    #[error("cell already holds {block:?}")]
    Occupied {
        /// The block currently in the cell.
        block: BlockType,
    },

    /// Nothing to remove: the cell is already air.
    #[error("cell is already air")]
    Vacant,

    /// The chunk is neither resident nor held in the edit cache.
    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkCoord),

    /// Malformed configuration value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings file could not be read.
    #[error("failed to read settings: {0}")]
    ConfigRead(String),

    /// Settings file is not valid TOML for [`crate::WorldSettings`].
    #[error("failed to parse settings: {0}")]
    ConfigParse(String),

    /// Biome name not present in the biome table.
    #[error("unknown biome: {0}")]
    UnknownBiome(String),
}

/// The closed set of non-success outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A precondition was not met (occupied cell, nothing to remove, chunk not loaded).
    Failure,
    /// A coordinate was outside the valid local range.
    OutOfBounds,
    /// Configuration was malformed.
    InvalidArgument,
}

impl VoxelError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::Occupied { .. } | Self::Vacant | Self::ChunkNotLoaded(_) => ErrorKind::Failure,
            Self::InvalidArgument(_)
            | Self::ConfigRead(_)
            | Self::ConfigParse(_)
            | Self::UnknownBiome(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Result type for world operations.
pub type VoxelResult<T> = Result<T, VoxelError>;
