//! # Coordinates
//!
//! Integer addressing for the world grid.
//!
//! - [`ChunkCoord`]: a chunk's position in chunk-size units `(x, y, z)`, `z` up
//! - [`ColumnCoord`]: the horizontal `(x, y)` shared by a vertical stack of chunks
//! - [`LocalCoord`]: a block inside one chunk, each axis in `[0, chunk_size)`
//!
//! Chunk identity is always integral. Nothing in the crate keys chunks by
//! floating-point positions.
//!
//! Horizontal chunk coordinates are supported within
//! `±`[`MAX_CHUNK_COORD`], where every block position of the largest
//! accepted chunk still fits in an `i32`.

use crate::block::Face;
use crate::config::MAX_CHUNK_SIZE;

/// Largest horizontal chunk coordinate magnitude the world addresses.
pub const MAX_CHUNK_COORD: i32 = i32::MAX / MAX_CHUNK_SIZE as i32;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, not blocks).
    pub y: i32,
    /// Z coordinate (vertical, in chunks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts world block coordinates to the containing chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_y: i32, block_z: i32, chunk_size: u32) -> Self {
        let size = chunk_size as i32;
        Self {
            x: block_x.div_euclid(size),
            y: block_y.div_euclid(size),
            z: block_z.div_euclid(size),
        }
    }

    /// Returns the world block position of the chunk's origin corner.
    ///
    /// Defined for `x` and `y` within `±`[`MAX_CHUNK_COORD`].
    #[inline]
    #[must_use]
    pub const fn world_origin(self, chunk_size: u32) -> [i32; 3] {
        let size = chunk_size as i32;
        [self.x * size, self.y * size, self.z * size]
    }

    /// Returns the column this chunk belongs to.
    #[inline]
    #[must_use]
    pub const fn column(self) -> ColumnCoord {
        ColumnCoord::new(self.x, self.y)
    }

    /// Returns the coordinate of the chunk adjoining this one across `face`.
    #[inline]
    #[must_use]
    pub const fn offset(self, face: Face) -> Self {
        let [dx, dy, dz] = face.normal();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{},{}]", self.x, self.y, self.z)
    }
}

/// Horizontal position of a chunk column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnCoord {
    /// X coordinate (in chunks).
    pub x: i32,
    /// Y coordinate (in chunks).
    pub y: i32,
}

impl ColumnCoord {
    /// Creates a new column coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the chunk at vertical slot `z` of this column.
    #[inline]
    #[must_use]
    pub const fn chunk(self, z: i32) -> ChunkCoord {
        ChunkCoord::new(self.x, self.y, z)
    }

    /// Column center in chunk units.
    #[inline]
    #[must_use]
    pub fn center(self) -> [f32; 2] {
        [self.x as f32 + 0.5, self.y as f32 + 0.5]
    }
}

impl std::fmt::Display for ColumnCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// Block position inside a chunk.
///
/// Axes are signed so callers can express (and be rejected for) positions
/// outside the chunk; see [`LocalCoord::in_bounds`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalCoord {
    /// Local X.
    pub x: i32,
    /// Local Y.
    pub y: i32,
    /// Local Z (vertical).
    pub z: i32,
}

impl LocalCoord {
    /// Creates a new local coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns true if every axis lies in `[0, chunk_size)`.
    #[inline]
    #[must_use]
    pub const fn in_bounds(self, chunk_size: u32) -> bool {
        let size = chunk_size as i32;
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size && self.z >= 0 && self.z < size
    }

    /// Steps one block across `face` without any bounds handling.
    #[inline]
    #[must_use]
    pub const fn step(self, face: Face) -> Self {
        let [dx, dy, dz] = face.normal();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Wraps each axis back into `[0, chunk_size)`.
    ///
    /// Used after [`LocalCoord::step`] leaves the chunk, to address the same
    /// block inside the adjoining chunk.
    #[inline]
    #[must_use]
    pub const fn wrapped(self, chunk_size: u32) -> Self {
        let size = chunk_size as i32;
        Self {
            x: (self.x + size) % size,
            y: (self.y + size) % size,
            z: (self.z + size) % size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0, 0, 16), ChunkCoord::new(0, 0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15, 15, 16), ChunkCoord::new(0, 0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16, 70, 16), ChunkCoord::new(1, 1, 4));
        assert_eq!(ChunkCoord::from_block_pos(-1, -16, -17, 16), ChunkCoord::new(-1, -1, -2));

        let edge = ChunkCoord::new(MAX_CHUNK_COORD, -MAX_CHUNK_COORD, 0);
        let [x, y, _] = edge.world_origin(MAX_CHUNK_SIZE);
        assert!(x.checked_add(MAX_CHUNK_SIZE as i32 - 1).is_some());
        assert!(y < 0);
    }

    #[test]
    fn test_offset_and_column() {
        let coord = ChunkCoord::new(3, -2, 5);
        assert_eq!(coord.offset(Face::Top), ChunkCoord::new(3, -2, 6));
        assert_eq!(coord.offset(Face::Left), ChunkCoord::new(2, -2, 5));
        assert_eq!(coord.offset(Face::Back), ChunkCoord::new(3, -3, 5));
        assert_eq!(coord.column(), ColumnCoord::new(3, -2));
        assert_eq!(coord.world_origin(16), [48, -32, 80]);
    }

    #[test]
    fn test_local_bounds_and_wrap() {
        assert!(LocalCoord::new(0, 0, 0).in_bounds(16));
        assert!(LocalCoord::new(15, 15, 15).in_bounds(16));
        assert!(!LocalCoord::new(-1, 0, 0).in_bounds(16));
        assert!(!LocalCoord::new(0, 16, 0).in_bounds(16));

        let stepped = LocalCoord::new(15, 4, 0).step(Face::Right);
        assert_eq!(stepped, LocalCoord::new(16, 4, 0));
        assert_eq!(stepped.wrapped(16), LocalCoord::new(0, 4, 0));

        let below = LocalCoord::new(3, 4, 0).step(Face::Bottom);
        assert_eq!(below.wrapped(16), LocalCoord::new(3, 4, 15));
    }
}
