//! # VOXSTREAM
//!
//! Frame driver for the streaming voxel world.
//!
//! ## Frame order
//!
//! ```text
//! Frame N:
//!  1. APPLY EDITS     FrameInput edits -> BlockEditor
//!  2. STREAM          StreamingScheduler::tick (recompute OR one column)
//!  3. MESH            dirty chunks -> vertex buffers, re-merge on change
//!  4. UPLOAD          merged terrain -> Renderer (only when rebuilt)
//!  5. DRAW            resident chunk list -> Renderer
//! ```
//!
//! ## Crates
//!
//! - `voxstream_core`: coordinates, blocks, settings, errors
//! - `voxstream_procedural`: noise, chunks, meshing, streaming, editing

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod game_loop;
pub mod render;

pub use game_loop::{Engine, FrameStats, FrameStatsAccumulator, MAX_FRAME_TIME, TARGET_FRAME_TIME};
pub use render::{NullRenderer, Renderer};

/// Re-export the core crate.
pub mod core {
    pub use voxstream_core::*;
}

/// Re-export the procedural crate.
pub mod procedural {
    pub use voxstream_procedural::*;
}
