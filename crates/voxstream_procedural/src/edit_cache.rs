//! # Edit Cache
//!
//! Session memory of player-modified chunks.
//!
//! An edited chunk stays in the [`ChunkStore`](crate::store::ChunkStore)
//! while it is visible; the cache only records its coordinate. When its
//! column leaves view the chunk is parked here instead of being dropped,
//! and handed back verbatim when the column is streamed in again. A parked
//! chunk is never in the store at the same time.

use std::collections::{BTreeMap, HashSet};

use voxstream_core::{ChunkCoord, ColumnCoord};

use crate::chunk::Chunk;

/// Edited coordinates plus the edited chunks currently out of view.
#[derive(Debug, Default)]
pub struct EditCache {
    edited: HashSet<ChunkCoord>,
    /// Ordered so a column's chunks are one contiguous range.
    parked: BTreeMap<ChunkCoord, Chunk>,
}

impl EditCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `coord` as edited. Returns true if it was not recorded before.
    pub fn record(&mut self, coord: ChunkCoord) -> bool {
        self.edited.insert(coord)
    }

    /// Returns true if `coord` has been edited this session.
    #[must_use]
    pub fn is_edited(&self, coord: ChunkCoord) -> bool {
        self.edited.contains(&coord)
    }

    /// Edited coordinates, in no particular order.
    pub fn edited(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.edited.iter().copied()
    }

    /// Number of edited coordinates.
    #[must_use]
    pub fn edited_len(&self) -> usize {
        self.edited.len()
    }

    /// Keeps an evicted edited chunk until its column returns.
    pub fn park(&mut self, chunk: Chunk) {
        let coord = chunk.location();
        self.edited.insert(coord);
        self.parked.insert(coord, chunk);
    }

    /// Returns true if a chunk is parked at `coord`.
    #[must_use]
    pub fn is_parked(&self, coord: ChunkCoord) -> bool {
        self.parked.contains_key(&coord)
    }

    /// Gets a parked chunk.
    #[must_use]
    pub fn parked(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.parked.get(&coord)
    }

    /// Gets a parked chunk mutably.
    pub fn parked_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.parked.get_mut(&coord)
    }

    /// Number of parked chunks.
    #[must_use]
    pub fn parked_len(&self) -> usize {
        self.parked.len()
    }

    /// Returns true if any chunk of `column` is parked.
    #[must_use]
    pub fn has_column(&self, column: ColumnCoord) -> bool {
        self.parked.range(Self::column_range(column)).next().is_some()
    }

    /// Removes a parked chunk.
    pub fn take(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.parked.remove(&coord)
    }

    /// Removes every parked chunk of `column`, bottom first.
    pub fn take_column(&mut self, column: ColumnCoord) -> Vec<Chunk> {
        let coords: Vec<ChunkCoord> = self
            .parked
            .range(Self::column_range(column))
            .map(|(coord, _)| *coord)
            .collect();
        coords
            .into_iter()
            .filter_map(|coord| self.parked.remove(&coord))
            .collect()
    }

    fn column_range(column: ColumnCoord) -> std::ops::RangeInclusive<ChunkCoord> {
        column.chunk(i32::MIN)..=column.chunk(i32::MAX)
    }
}
