//! # Chunk Store
//!
//! Resident chunks, kept in a dense arena indexed through a coordinate map.
//! Freed slots are recycled, so storage order is slot order rather than
//! insertion order.
//!
//! Every insert and removal bumps a revision counter that lets the terrain
//! merge detect changes to the resident set.

use std::collections::{BTreeSet, HashMap};

use voxstream_core::{ChunkCoord, ColumnCoord, Face};

use crate::chunk::Chunk;

/// Initial arena capacity.
const INITIAL_CAPACITY: usize = 1024;

/// Coordinate-keyed container of resident chunks.
#[derive(Debug, Default)]
pub struct ChunkStore {
    slots: Vec<Option<Chunk>>,
    index: HashMap<ChunkCoord, usize>,
    free: Vec<usize>,
    /// Resident z levels per column.
    columns: HashMap<ColumnCoord, BTreeSet<i32>>,
    revision: u64,
}

impl ChunkStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INITIAL_CAPACITY),
            index: HashMap::with_capacity(INITIAL_CAPACITY),
            free: Vec::new(),
            columns: HashMap::new(),
            revision: 0,
        }
    }

    /// Inserts a chunk keyed by its location.
    ///
    /// A chunk already stored at that coordinate is replaced in place and
    /// returned, so a coordinate never maps to two chunks.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        let coord = chunk.location();
        self.revision += 1;

        if let Some(&slot) = self.index.get(&coord) {
            return self.slots[slot].replace(chunk);
        }

        let slot = if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(chunk);
            slot
        } else {
            self.slots.push(Some(chunk));
            self.slots.len() - 1
        };
        self.index.insert(coord, slot);
        self.columns.entry(coord.column()).or_default().insert(coord.z);
        None
    }

    /// Removes and returns the chunk at `coord`.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let slot = self.index.remove(&coord)?;
        let chunk = self.slots[slot].take();
        self.free.push(slot);
        self.revision += 1;

        let column = coord.column();
        if let Some(levels) = self.columns.get_mut(&column) {
            levels.remove(&coord.z);
            if levels.is_empty() {
                self.columns.remove(&column);
            }
        }
        chunk
    }

    /// Removes every chunk of a column, bottom first.
    pub fn remove_column(&mut self, column: ColumnCoord) -> Vec<Chunk> {
        self.column_chunks(column)
            .into_iter()
            .filter_map(|coord| self.remove(coord))
            .collect()
    }

    /// Gets the chunk at `coord`.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        let slot = *self.index.get(&coord)?;
        self.slots[slot].as_ref()
    }

    /// Gets the chunk at `coord` mutably.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        let slot = *self.index.get(&coord)?;
        self.slots[slot].as_mut()
    }

    /// Returns true if a chunk is stored at `coord`.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// The chunk adjoining `coord` across `face`, if resident.
    #[must_use]
    pub fn neighbor_of(&self, coord: ChunkCoord, face: Face) -> Option<&Chunk> {
        self.get(coord.offset(face))
    }

    /// Mutable access to the chunk adjoining `coord` across `face`.
    pub fn neighbor_of_mut(&mut self, coord: ChunkCoord, face: Face) -> Option<&mut Chunk> {
        self.get_mut(coord.offset(face))
    }

    /// Returns true if any chunk of `column` is resident.
    #[must_use]
    pub fn is_column_resident(&self, column: ColumnCoord) -> bool {
        self.columns.contains_key(&column)
    }

    /// Coordinates of a column's resident chunks, bottom first.
    #[must_use]
    pub fn column_chunks(&self, column: ColumnCoord) -> Vec<ChunkCoord> {
        self.columns
            .get(&column)
            .map(|levels| levels.iter().map(|&z| column.chunk(z)).collect())
            .unwrap_or_default()
    }

    /// Columns with at least one resident chunk.
    pub fn columns(&self) -> impl Iterator<Item = ColumnCoord> + '_ {
        self.columns.keys().copied()
    }

    /// Chunks in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Chunks in storage order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Coordinates in storage order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.iter().map(Chunk::location)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if nothing is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of resident columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Counter bumped by every insert and removal.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(x: i32, y: i32, z: i32) -> Chunk {
        Chunk::new(ChunkCoord::new(x, y, z), 4)
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = ChunkStore::new();
        assert!(store.insert(chunk(1, 2, 3)).is_none());
        assert!(store.contains(ChunkCoord::new(1, 2, 3)));
        assert_eq!(store.len(), 1);
        assert!(store.get(ChunkCoord::new(0, 0, 0)).is_none());
    }

    #[test]
    fn test_insert_replaces_same_coord() {
        let mut store = ChunkStore::new();
        store.insert(chunk(0, 0, 0));
        let mut marked = chunk(0, 0, 0);
        marked.mark_edited();

        let previous = store.insert(marked).expect("replaced");
        assert!(!previous.is_edited());
        assert_eq!(store.len(), 1);
        assert!(store.get(ChunkCoord::default()).unwrap().is_edited());
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_remove_recycles_slot() {
        let mut store = ChunkStore::new();
        store.insert(chunk(0, 0, 0));
        store.insert(chunk(1, 0, 0));
        store.remove(ChunkCoord::new(0, 0, 0));
        store.insert(chunk(2, 0, 0));

        // New chunk took the freed first slot
        let order: Vec<_> = store.coords().collect();
        assert_eq!(order, vec![ChunkCoord::new(2, 0, 0), ChunkCoord::new(1, 0, 0)]);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut store = ChunkStore::new();
        let r0 = store.revision();
        store.insert(chunk(0, 0, 0));
        let r1 = store.revision();
        assert!(r1 > r0);
        assert!(store.remove(ChunkCoord::new(5, 5, 5)).is_none());
        assert_eq!(store.revision(), r1);
        store.remove(ChunkCoord::new(0, 0, 0));
        assert!(store.revision() > r1);
    }

    #[test]
    fn test_columns() {
        let mut store = ChunkStore::new();
        store.insert(chunk(0, 0, 5));
        store.insert(chunk(0, 0, 4));
        store.insert(chunk(1, 0, 4));

        let column = ColumnCoord::new(0, 0);
        assert!(store.is_column_resident(column));
        assert_eq!(
            store.column_chunks(column),
            vec![ChunkCoord::new(0, 0, 4), ChunkCoord::new(0, 0, 5)]
        );
        assert_eq!(store.column_count(), 2);

        let removed = store.remove_column(column);
        assert_eq!(removed.len(), 2);
        assert!(!store.is_column_resident(column));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_neighbor_of() {
        let mut store = ChunkStore::new();
        store.insert(chunk(0, 0, 0));
        store.insert(chunk(0, 0, 1));

        let above = store.neighbor_of(ChunkCoord::default(), Face::Top).unwrap();
        assert_eq!(above.location(), ChunkCoord::new(0, 0, 1));
        assert!(store.neighbor_of(ChunkCoord::default(), Face::Left).is_none());
    }
}
