//! # Frame Input
//!
//! Per-frame input state produced by the input collaborator and passed
//! explicitly into the frame loop. Nothing here is global: the frame
//! counter and pending edits travel with the value.

use crate::block::BlockType;
use crate::coord::{ChunkCoord, LocalCoord};

/// What a block edit does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Place a block.
    Place {
        /// Block to place.
        block: BlockType,
        /// Replace a non-air block instead of failing.
        overwrite: bool,
    },
    /// Turn the block into air.
    Remove,
}

/// A block edit with its target already resolved (e.g. by a ray cast).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEdit {
    /// Chunk holding the target block.
    pub chunk: ChunkCoord,
    /// Target block inside that chunk.
    pub local: LocalCoord,
    /// The edit.
    pub action: EditAction,
}

impl BlockEdit {
    /// Place `block` at `local` in `chunk`.
    #[must_use]
    pub const fn place(chunk: ChunkCoord, local: LocalCoord, block: BlockType, overwrite: bool) -> Self {
        Self {
            chunk,
            local,
            action: EditAction::Place { block, overwrite },
        }
    }

    /// Remove the block at `local` in `chunk`.
    #[must_use]
    pub const fn remove(chunk: ChunkCoord, local: LocalCoord) -> Self {
        Self {
            chunk,
            local,
            action: EditAction::Remove,
        }
    }
}

/// Everything the outer loop hands in for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Monotonic frame number.
    pub frame: u64,
    /// Seconds since the previous frame.
    pub delta_seconds: f32,
    /// Block edits requested this frame, applied in order.
    pub edits: Vec<BlockEdit>,
}

impl FrameInput {
    /// Input for frame `frame` with no edits.
    #[must_use]
    pub fn new(frame: u64, delta_seconds: f32) -> Self {
        Self {
            frame,
            delta_seconds,
            edits: Vec::new(),
        }
    }

    /// Adds an edit.
    #[must_use]
    pub fn with_edit(mut self, edit: BlockEdit) -> Self {
        self.edits.push(edit);
        self
    }
}
