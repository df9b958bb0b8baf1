//! # Mesh Builder
//!
//! Converts a chunk's block grid and face masks into a flat vertex buffer.
//!
//! ## Vertex Format
//!
//! Interleaved `[x, y, z, u, v]` per vertex, triangle list, six vertices per
//! visible face (two triangles, no index buffer). Positions are already in
//! world space, so the renderer needs no per-chunk transform.
//!
//! ## Terrain merge
//!
//! [`TerrainMesh`] concatenates every resident chunk's buffer in storage
//! order for a single batched draw. It is rebuilt only when a chunk was
//! re-meshed or the resident set changed.

use bytemuck::{Pod, Zeroable};
use tracing::debug;
use voxstream_core::{BlockType, Face};

use crate::chunk::Chunk;
use crate::store::ChunkStore;

/// Vertices emitted per visible face.
pub const VERTICES_PER_FACE: usize = 6;

/// Floats per interleaved vertex.
pub const FLOATS_PER_VERTEX: usize = 5;

const BLOCK_KINDS: usize = BlockType::ALL.len();

/// Terrain vertex, packed for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in world space [x, y, z]
    pub position: [f32; 3],
    /// Texture atlas coordinates [u, v]
    pub uv: [f32; 2],
}

// Corner offsets of each face, two counter-clockwise triangles seen from outside.
// Indexed by `Face as usize`.
#[rustfmt::skip]
const FACE_TEMPLATES: [[[f32; 3]; VERTICES_PER_FACE]; 6] = [
    // Top (+z)
    [
        [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0],
        [0.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
    ],
    // Bottom (-z)
    [
        [0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0],
    ],
    // Left (-x)
    [
        [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0],
        [0.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0],
    ],
    // Right (+x)
    [
        [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0],
        [1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0],
    ],
    // Front (+y)
    [
        [0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0],
        [0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0],
    ],
    // Back (-y)
    [
        [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0],
        [0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0],
    ],
];

/// Position of a template corner inside the face's texture tile.
#[inline]
fn corner_uv(face: Face, corner: [f32; 3]) -> [f32; 2] {
    let [x, y, z] = corner;
    // v grows downwards in the atlas
    match face {
        Face::Top | Face::Bottom => [x, 1.0 - y],
        Face::Left | Face::Right => [y, 1.0 - z],
        Face::Front | Face::Back => [x, 1.0 - z],
    }
}

/// Tile indices of one block type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockTiles {
    /// Tile on the +z face.
    pub top: u16,
    /// Tile on the four side faces.
    pub side: u16,
    /// Tile on the -z face.
    pub bottom: u16,
}

impl BlockTiles {
    /// Same tile on every face.
    #[must_use]
    pub const fn uniform(tile: u16) -> Self {
        Self {
            top: tile,
            side: tile,
            bottom: tile,
        }
    }
}

/// Square grid of block textures.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAtlas {
    tiles_per_row: u32,
    tiles: [BlockTiles; BLOCK_KINDS],
}

impl Default for TextureAtlas {
    fn default() -> Self {
        let mut atlas = Self {
            tiles_per_row: 16,
            tiles: [BlockTiles::uniform(0); BLOCK_KINDS],
        };
        atlas.set_tiles(BlockType::Dirt, BlockTiles::uniform(2));
        atlas.set_tiles(BlockType::Grass, BlockTiles { top: 0, side: 3, bottom: 2 });
        atlas.set_tiles(BlockType::Stone, BlockTiles::uniform(1));
        atlas.set_tiles(BlockType::Sand, BlockTiles::uniform(18));
        atlas.set_tiles(BlockType::Water, BlockTiles::uniform(14));
        atlas.set_tiles(BlockType::Wood, BlockTiles { top: 21, side: 20, bottom: 21 });
        atlas.set_tiles(BlockType::Leaves, BlockTiles::uniform(52));
        atlas
    }
}

impl TextureAtlas {
    /// Empty atlas with `tiles_per_row` tiles along each edge.
    #[must_use]
    pub fn new(tiles_per_row: u32) -> Self {
        Self {
            tiles_per_row: tiles_per_row.max(1),
            tiles: [BlockTiles::uniform(0); BLOCK_KINDS],
        }
    }

    /// Tiles along each edge of the atlas.
    #[must_use]
    pub const fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    /// Assigns the tiles of a block type.
    pub fn set_tiles(&mut self, kind: BlockType, tiles: BlockTiles) {
        self.tiles[kind as usize] = tiles;
    }

    /// Tiles of a block type.
    #[must_use]
    pub fn tiles(&self, kind: BlockType) -> BlockTiles {
        self.tiles[kind as usize]
    }

    /// Tile index used for one face of a block type.
    #[must_use]
    pub fn tile(&self, kind: BlockType, face: Face) -> u16 {
        let tiles = self.tiles(kind);
        match face {
            Face::Top => tiles.top,
            Face::Bottom => tiles.bottom,
            Face::Left | Face::Right | Face::Front | Face::Back => tiles.side,
        }
    }

    /// UV rectangle `[u0, v0, u1, v1]` of one face.
    #[must_use]
    pub fn uv_rect(&self, kind: BlockType, face: Face) -> [f32; 4] {
        let tile = u32::from(self.tile(kind, face));
        let step = 1.0 / self.tiles_per_row as f32;
        let u0 = (tile % self.tiles_per_row) as f32 * step;
        let v0 = (tile / self.tiles_per_row) as f32 * step;
        [u0, v0, u0 + step, v0 + step]
    }
}

/// Emits face geometry for chunks.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    atlas: TextureAtlas,
}

impl MeshBuilder {
    /// Creates a builder using the given atlas.
    #[must_use]
    pub fn new(atlas: TextureAtlas) -> Self {
        Self { atlas }
    }

    /// The texture atlas.
    #[must_use]
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// Builds the vertex buffer of a chunk.
    ///
    /// Blocks are visited in `(z, y, x)` order and faces in mask-bit order,
    /// so equal chunks always produce equal buffers.
    #[must_use]
    pub fn build(&self, chunk: &Chunk) -> Vec<Vertex> {
        let face_count = chunk.exposed_faces();
        let mut vertices = Vec::with_capacity(face_count * VERTICES_PER_FACE);

        let size = chunk.size() as usize;
        let [ox, oy, oz] = chunk.location().world_origin(chunk.size());

        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let block = chunk.block_at(x, y, z);
                    if block.is_air() || block.faces.is_empty() {
                        continue;
                    }

                    let base = [
                        (ox + x as i32) as f32,
                        (oy + y as i32) as f32,
                        (oz + z as i32) as f32,
                    ];
                    for face in block.faces.iter() {
                        self.emit_face(&mut vertices, block.kind, face, base);
                    }
                }
            }
        }

        vertices
    }

    fn emit_face(&self, out: &mut Vec<Vertex>, kind: BlockType, face: Face, base: [f32; 3]) {
        let [u0, v0, u1, v1] = self.atlas.uv_rect(kind, face);
        for corner in FACE_TEMPLATES[face as usize] {
            let [cu, cv] = corner_uv(face, corner);
            out.push(Vertex {
                position: [base[0] + corner[0], base[1] + corner[1], base[2] + corner[2]],
                uv: [u0 + (u1 - u0) * cu, v0 + (v1 - v0) * cv],
            });
        }
    }

    /// Rebuilds a chunk's buffer if it is dirty. Returns true if it was rebuilt.
    pub fn mesh_chunk(&self, chunk: &mut Chunk) -> bool {
        if !chunk.is_dirty() {
            return false;
        }
        let vertices = self.build(chunk);
        chunk.install_mesh(vertices);
        true
    }

    /// Meshes every dirty chunk in the store. Returns how many were rebuilt.
    pub fn mesh_dirty(&self, store: &mut ChunkStore) -> usize {
        store
            .iter_mut()
            .map(|chunk| usize::from(self.mesh_chunk(chunk)))
            .sum()
    }
}

/// All resident chunk buffers merged for one draw call.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    vertices: Vec<Vertex>,
    built_from: Option<u64>,
    rebuilds: u64,
}

impl TerrainMesh {
    /// Creates an empty terrain mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes dirty chunks and re-merges if anything changed.
    ///
    /// Returns true if the merged buffer was rebuilt.
    pub fn refresh(&mut self, mesher: &MeshBuilder, store: &mut ChunkStore) -> bool {
        let meshed = mesher.mesh_dirty(store);
        if meshed == 0 && self.built_from == Some(store.revision()) {
            return false;
        }

        self.vertices.clear();
        for chunk in store.iter() {
            self.vertices.extend_from_slice(chunk.vertices());
        }
        self.built_from = Some(store.revision());
        self.rebuilds += 1;

        debug!(
            "Terrain merged: {} chunks re-meshed, {} vertices",
            meshed,
            self.vertices.len()
        );
        true
    }

    /// Merged vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Merged vertices as interleaved `[x, y, z, u, v]` floats.
    #[must_use]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Merged vertices as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of merged vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// How many times the buffer was merged.
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
