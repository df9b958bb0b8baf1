//! # Block Editor
//!
//! Bounds-checked block placement and removal.
//!
//! An edit rewrites the target block, then fixes the face masks on both
//! sides of each of its six faces. Neighbors across a chunk boundary are
//! reached through [`World::neighbor_of`] with the local coordinate
//! wrapped into the adjoining chunk. Every successful edit marks the chunk
//! dirty and records it in the edit cache.

use tracing::trace;
use voxstream_core::{
    Block, BlockEdit, BlockType, ChunkCoord, EditAction, Face, LocalCoord, VoxelError,
    VoxelResult,
};

use crate::world::World;

/// Where the neighbor across one face lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NeighborSite {
    face: Face,
    chunk: ChunkCoord,
    local: LocalCoord,
    kind: BlockType,
}

/// Applies block edits to a [`World`].
#[derive(Clone, Copy, Debug)]
pub struct BlockEditor {
    chunk_size: u32,
}

impl BlockEditor {
    /// Creates an editor for chunks of `chunk_size` blocks.
    #[must_use]
    pub const fn new(chunk_size: u32) -> Self {
        Self { chunk_size }
    }

    /// Places `kind` at `local` inside chunk `coord`.
    ///
    /// # Errors
    ///
    /// - [`VoxelError::OutOfBounds`] if any axis of `local` is outside the chunk
    /// - [`VoxelError::InvalidArgument`] when placing air (use [`BlockEditor::remove_block`])
    /// - [`VoxelError::ChunkNotLoaded`] if no chunk exists at `coord`
    /// - [`VoxelError::Occupied`] if the target is not air and `overwrite` is false
    ///
    /// Nothing is modified on error.
    pub fn add_block(
        &self,
        world: &mut World,
        coord: ChunkCoord,
        kind: BlockType,
        local: LocalCoord,
        overwrite: bool,
    ) -> VoxelResult<()> {
        self.check_bounds(local)?;
        if kind == BlockType::Air {
            return Err(VoxelError::InvalidArgument(
                "cannot place air, remove the block instead".to_string(),
            ));
        }
        let current = self.target(world, coord, local)?;
        if !current.is_air() && !overwrite {
            return Err(VoxelError::Occupied {
                block: current.kind,
            });
        }

        let neighbors = self.neighbors(world, coord, local);

        let mut block = Block::new(kind);
        for site in &neighbors {
            if site.kind.occludes() {
                block.faces.remove(site.face);
            }
        }
        self.write_target(world, coord, local, block);

        // The new block hides or re-exposes each neighbor's facing side
        for site in &neighbors {
            self.set_neighbor_face(world, site, !kind.occludes());
        }

        world.record_edit(coord);
        trace!("Placed {kind:?} at {coord} {local:?}");
        Ok(())
    }

    /// Turns the block at `local` inside chunk `coord` into air.
    ///
    /// Faces of the six neighbors that the block hid are exposed again.
    ///
    /// # Errors
    ///
    /// - [`VoxelError::OutOfBounds`] if any axis of `local` is outside the chunk
    /// - [`VoxelError::ChunkNotLoaded`] if no chunk exists at `coord`
    /// - [`VoxelError::Vacant`] if the target is already air
    pub fn remove_block(&self, world: &mut World, coord: ChunkCoord, local: LocalCoord) -> VoxelResult<()> {
        self.check_bounds(local)?;
        let current = self.target(world, coord, local)?;
        if current.is_air() {
            return Err(VoxelError::Vacant);
        }

        let neighbors = self.neighbors(world, coord, local);
        self.write_target(world, coord, local, Block::AIR);
        for site in &neighbors {
            self.set_neighbor_face(world, site, true);
        }

        world.record_edit(coord);
        trace!("Removed {:?} at {coord} {local:?}", current.kind);
        Ok(())
    }

    /// Applies one resolved edit from the frame input.
    ///
    /// # Errors
    ///
    /// Same as [`BlockEditor::add_block`] and [`BlockEditor::remove_block`].
    pub fn apply(&self, world: &mut World, edit: &BlockEdit) -> VoxelResult<()> {
        match edit.action {
            EditAction::Place { block, overwrite } => {
                self.add_block(world, edit.chunk, block, edit.local, overwrite)
            }
            EditAction::Remove => self.remove_block(world, edit.chunk, edit.local),
        }
    }

    fn check_bounds(&self, local: LocalCoord) -> VoxelResult<()> {
        if local.in_bounds(self.chunk_size) {
            Ok(())
        } else {
            Err(VoxelError::OutOfBounds {
                x: local.x,
                y: local.y,
                z: local.z,
                chunk_size: self.chunk_size,
            })
        }
    }

    fn target(&self, world: &World, coord: ChunkCoord, local: LocalCoord) -> VoxelResult<Block> {
        world
            .chunk(coord)
            .and_then(|chunk| chunk.block(local))
            .ok_or(VoxelError::ChunkNotLoaded(coord))
    }

    /// Non-air neighbors of `local`, resolving chunk boundaries.
    fn neighbors(&self, world: &World, coord: ChunkCoord, local: LocalCoord) -> Vec<NeighborSite> {
        let mut sites = Vec::with_capacity(Face::ALL.len());
        for face in Face::ALL {
            let step = local.step(face);
            let (chunk, site_local, found) = if step.in_bounds(self.chunk_size) {
                (coord, step, world.chunk(coord))
            } else {
                let wrapped = step.wrapped(self.chunk_size);
                (coord.offset(face), wrapped, world.neighbor_of(coord, face))
            };

            let Some(block) = found.and_then(|c| c.block(site_local)) else {
                continue;
            };
            if !block.is_air() {
                sites.push(NeighborSite {
                    face,
                    chunk,
                    local: site_local,
                    kind: block.kind,
                });
            }
        }
        sites
    }

    fn write_target(&self, world: &mut World, coord: ChunkCoord, local: LocalCoord, block: Block) {
        if let Some(chunk) = world.chunk_mut(coord) {
            if let Some(slot) = chunk.block_mut(local) {
                *slot = block;
            }
            chunk.mark_dirty();
        }
    }

    /// Sets the neighbor's face that points back at the edited block.
    fn set_neighbor_face(&self, world: &mut World, site: &NeighborSite, exposed: bool) {
        let Some(chunk) = world.chunk_mut(site.chunk) else {
            return;
        };
        let facing = site.face.opposite();
        let changed = chunk.block_mut(site.local).is_some_and(|block| {
            let before = block.faces;
            block.faces.set(facing, exposed);
            block.faces != before
        });
        if changed {
            chunk.mark_dirty();
        }
    }
}
