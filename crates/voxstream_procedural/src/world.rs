//! Voxel world management.
//!
//! Composes the resident [`ChunkStore`] and the [`EditCache`] so callers
//! can address a chunk without knowing which container holds it.

use tracing::debug;
use voxstream_core::{ChunkCoord, ColumnCoord, Face};

use crate::chunk::Chunk;
use crate::edit_cache::EditCache;
use crate::store::ChunkStore;

/// Chunks removed from view by one eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eviction {
    /// Unedited chunks dropped.
    pub dropped: usize,
    /// Edited chunks moved into the edit cache.
    pub parked: usize,
}

/// Resident chunks plus the parked edits.
#[derive(Debug)]
pub struct World {
    chunk_size: u32,
    store: ChunkStore,
    edits: EditCache,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunk_size,
            store: ChunkStore::new(),
            edits: EditCache::new(),
        }
    }

    /// Chunk edge length in blocks.
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Resident chunks.
    #[must_use]
    pub const fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Resident chunks, mutably.
    pub fn store_mut(&mut self) -> &mut ChunkStore {
        &mut self.store
    }

    /// The edit cache.
    #[must_use]
    pub const fn edits(&self) -> &EditCache {
        &self.edits
    }

    /// Gets a chunk from either container.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.get(coord).or_else(|| self.edits.parked(coord))
    }

    /// Gets a chunk from either container, mutably.
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        match self.store.get_mut(coord) {
            Some(chunk) => Some(chunk),
            None => self.edits.parked_mut(coord),
        }
    }

    /// Returns true if either container holds `coord`.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.store.contains(coord) || self.edits.is_parked(coord)
    }

    /// The chunk adjoining `coord` across `face`, resident or parked.
    #[must_use]
    pub fn neighbor_of(&self, coord: ChunkCoord, face: Face) -> Option<&Chunk> {
        self.store
            .neighbor_of(coord, face)
            .or_else(|| self.edits.parked(coord.offset(face)))
    }

    /// Mutable access to the chunk adjoining `coord` across `face`.
    pub fn neighbor_of_mut(&mut self, coord: ChunkCoord, face: Face) -> Option<&mut Chunk> {
        self.chunk_mut(coord.offset(face))
    }

    /// Returns true if any chunk of `column` is resident.
    #[must_use]
    pub fn is_column_resident(&self, column: ColumnCoord) -> bool {
        self.store.is_column_resident(column)
    }

    /// Resident coordinates in storage order (the draw list).
    #[must_use]
    pub fn resident_coords(&self) -> Vec<ChunkCoord> {
        self.store.coords().collect()
    }

    /// Flags the chunk at `coord` as edited and records it.
    ///
    /// Returns false if no chunk is loaded there.
    pub fn record_edit(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunk_mut(coord) else {
            return false;
        };
        chunk.mark_edited();
        self.edits.record(coord);
        true
    }

    /// Makes a chunk resident unless that coordinate is already loaded.
    ///
    /// Returns false if the chunk was discarded.
    pub fn insert(&mut self, chunk: Chunk) -> bool {
        if self.contains(chunk.location()) {
            return false;
        }
        self.store.insert(chunk);
        true
    }

    /// Moves a column's parked chunks back into the store.
    ///
    /// Returns how many chunks were restored.
    pub fn restore_column(&mut self, column: ColumnCoord) -> usize {
        if !self.edits.has_column(column) {
            return 0;
        }
        let chunks = self.edits.take_column(column);
        let restored = chunks.len();
        for chunk in chunks {
            self.store.insert(chunk);
        }
        if restored > 0 {
            debug!("Restored {restored} edited chunks of column {column}");
        }
        restored
    }

    /// Removes a column from view. Edited chunks are parked, the rest dropped.
    pub fn evict_column(&mut self, column: ColumnCoord) -> Eviction {
        let mut eviction = Eviction::default();
        for chunk in self.store.remove_column(column) {
            if chunk.is_edited() {
                debug!("Parking edited chunk {}", chunk.location());
                self.edits.park(chunk);
                eviction.parked += 1;
            } else {
                eviction.dropped += 1;
            }
        }
        eviction
    }
}
