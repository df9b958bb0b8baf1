//! # Chunk System
//!
//! World data is organized into fixed-size cubic chunks for:
//! - Memory efficiency (only chunks in view are resident)
//! - Fast streaming (generate/discard on demand)
//! - Cheap meshing (each chunk owns its own vertex buffer)
//!
//! ## Chunk Format
//!
//! A chunk is `size x size x size` blocks, `size` being the session's
//! `chunk_size`. Blocks are stored flat in `(z, y, x)` order, so iterating
//! the slice front to back walks `x` fastest.
//!
//! ## Face masks
//!
//! Every block carries the set of faces that must be meshed. Inside a chunk
//! a face is hidden exactly when the neighbor across it is solid and not
//! leaves. Faces on the chunk boundary stay exposed: there is no culling
//! against adjoining chunks at generation time.

use voxstream_core::{Block, BlockType, ChunkCoord, Face, FaceMask, LocalCoord};

use crate::mesh::Vertex;

/// A chunk of world data.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Chunk position in the world.
    location: ChunkCoord,
    /// Edge length in blocks.
    size: u32,
    /// Block data (indexed as `(z * size + y) * size + x`).
    blocks: Box<[Block]>,
    /// Whether the vertex buffer is stale.
    dirty: bool,
    /// Whether the player has modified this chunk.
    edited: bool,
    /// Mesh of the exposed faces, in world space.
    vertices: Vec<Vertex>,
}

impl Chunk {
    /// Creates a new all-air chunk at the given coordinates.
    #[must_use]
    pub fn new(location: ChunkCoord, size: u32) -> Self {
        let volume = (size as usize).pow(3);
        Self {
            location,
            size,
            blocks: vec![Block::AIR; volume].into_boxed_slice(),
            dirty: true,
            edited: false,
            vertices: Vec::new(),
        }
    }

    /// Chunk position in the world.
    #[inline]
    #[must_use]
    pub const fn location(&self) -> ChunkCoord {
        self.location
    }

    /// Edge length in blocks.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Flat index of an in-bounds block.
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let size = self.size as usize;
        (z * size + y) * size + x
    }

    /// Gets a block at local coordinates, or `None` outside the chunk.
    #[inline]
    #[must_use]
    pub fn block(&self, local: LocalCoord) -> Option<Block> {
        local
            .in_bounds(self.size)
            .then(|| self.blocks[self.index(local.x as usize, local.y as usize, local.z as usize)])
    }

    /// Mutable access to a block at local coordinates.
    ///
    /// Does not mark the chunk dirty; callers that change a block do that.
    #[inline]
    pub fn block_mut(&mut self, local: LocalCoord) -> Option<&mut Block> {
        if local.in_bounds(self.size) {
            let idx = self.index(local.x as usize, local.y as usize, local.z as usize);
            Some(&mut self.blocks[idx])
        } else {
            None
        }
    }

    /// Gets a block by unsigned local position. Out-of-range reads return air.
    #[inline]
    #[must_use]
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> Block {
        let size = self.size as usize;
        if x < size && y < size && z < size {
            self.blocks[self.index(x, y, z)]
        } else {
            Block::AIR
        }
    }

    /// Sets a block type during generation (faces are fixed up by [`Chunk::cull_faces`]).
    #[inline]
    pub(crate) fn set_kind(&mut self, x: usize, y: usize, z: usize, kind: BlockType) {
        let idx = self.index(x, y, z);
        self.blocks[idx] = Block::new(kind);
    }

    /// All blocks in storage order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns true if the vertex buffer must be rebuilt.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the vertex buffer stale.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns true if the player has modified this chunk.
    #[inline]
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    /// Flags the chunk as player-modified.
    #[inline]
    pub fn mark_edited(&mut self) {
        self.edited = true;
    }

    /// Current vertex buffer (stale while dirty).
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Installs a freshly built vertex buffer and clears the dirty flag.
    pub(crate) fn install_mesh(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
        self.dirty = false;
    }

    /// Number of non-air blocks.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    /// Number of exposed faces over all blocks.
    #[must_use]
    pub fn exposed_faces(&self) -> usize {
        self.blocks.iter().map(|b| b.faces.count() as usize).sum()
    }

    /// Flat index of the in-chunk neighbor across `face`, if it exists.
    #[inline]
    fn neighbor_index(&self, x: usize, y: usize, z: usize, face: Face) -> Option<usize> {
        let size = self.size as i64;
        let [dx, dy, dz] = face.normal();
        let (nx, ny, nz) = (
            x as i64 + i64::from(dx),
            y as i64 + i64::from(dy),
            z as i64 + i64::from(dz),
        );
        if (0..size).contains(&nx) && (0..size).contains(&ny) && (0..size).contains(&nz) {
            Some(self.index(nx as usize, ny as usize, nz as usize))
        } else {
            None
        }
    }

    /// Recomputes every block's face mask from its in-chunk neighbors.
    ///
    /// A face is hidden iff the neighbor across it lies inside this chunk
    /// and occludes (solid, not leaves). Two occluding blocks therefore hide
    /// their shared face on both sides. Air gets an empty mask.
    pub fn cull_faces(&mut self) {
        let size = self.size as usize;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let idx = self.index(x, y, z);
                    if self.blocks[idx].is_air() {
                        self.blocks[idx].faces = FaceMask::EMPTY;
                        continue;
                    }

                    let mut faces = FaceMask::ALL;
                    for face in Face::ALL {
                        if let Some(n) = self.neighbor_index(x, y, z, face) {
                            if self.blocks[n].kind.occludes() {
                                faces.remove(face);
                            }
                        }
                    }
                    self.blocks[idx].faces = faces;
                }
            }
        }
        self.dirty = true;
    }
}
