//! # Terrain Integration Tests
//!
//! Generated chunks must obey the face-culling invariant, mesh to the
//! expected vertex counts and come out the same for the same seed.

use voxstream_core::{Biome, BlockType, ChunkCoord, ColumnCoord, Face, LocalCoord, WorldSettings};
use voxstream_procedural::mesh::VERTICES_PER_FACE;
use voxstream_procedural::{Chunk, ChunkFactory, MeshBuilder};

fn neighbor(chunk: &Chunk, local: LocalCoord, face: Face) -> Option<BlockType> {
    chunk.block(local.step(face)).map(|b| b.kind)
}

fn assert_culling_invariant(chunk: &Chunk) {
    let size = chunk.size() as i32;
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let local = LocalCoord::new(x, y, z);
                let block = chunk.block(local).unwrap();
                if block.is_air() {
                    assert!(block.faces.is_empty());
                    continue;
                }
                for face in Face::ALL {
                    let hidden = neighbor(chunk, local, face).is_some_and(BlockType::occludes);
                    assert_eq!(
                        block.faces.contains(face),
                        !hidden,
                        "{:?} at {local:?} face {face:?} in {}",
                        block.kind,
                        chunk.location()
                    );
                }
            }
        }
    }
}

/// Test: every generated chunk satisfies the culling invariant.
#[test]
fn test_generated_chunks_culled() {
    let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
    for (x, y) in [(0, 0), (-3, 7), (12, -12)] {
        for chunk in factory.make_chunk_column(ColumnCoord::new(x, y)).chunks {
            assert_culling_invariant(&chunk);
        }
    }
}

/// Test: adjacent occluding blocks hide their shared face on both sides.
#[test]
fn test_mutual_culling_pairs() {
    let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
    let column = factory.make_chunk_column(ColumnCoord::new(1, 1));
    let size = factory.chunk_size() as i32;

    for chunk in &column.chunks {
        for z in 0..size {
            for y in 0..size {
                for x in 0..size - 1 {
                    let a = chunk.block(LocalCoord::new(x, y, z)).unwrap();
                    let b = chunk.block(LocalCoord::new(x + 1, y, z)).unwrap();
                    if a.kind.occludes() && b.kind.occludes() {
                        assert!(!a.faces.contains(Face::Right));
                        assert!(!b.faces.contains(Face::Left));
                    }
                }
            }
        }
    }
}

/// Test: boundary faces stay exposed after generation.
#[test]
fn test_boundary_faces_exposed() {
    let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
    let column = factory.make_chunk_column(ColumnCoord::new(0, 0));
    let size = factory.chunk_size() as i32;

    for chunk in &column.chunks {
        for z in 0..size {
            for y in 0..size {
                let block = chunk.block(LocalCoord::new(0, y, z)).unwrap();
                if !block.is_air() {
                    assert!(block.faces.contains(Face::Left));
                }
            }
        }
    }
}

/// Test: seed 12345 with the plains biome samples a height in [64, 112] at the origin.
#[test]
fn test_seed_12345_origin() {
    let mut settings = WorldSettings {
        seed: 12345,
        chunk_size: 16,
        ..WorldSettings::default()
    };
    settings.terrain.default_biome = "custom".to_string();
    settings
        .terrain
        .biomes
        .insert("custom".to_string(), Biome::new(0.01, 3, 64, 112));

    let a = ChunkFactory::new(&settings).unwrap();
    let b = ChunkFactory::new(&settings).unwrap();
    let ha = a.biomes().sample_biome_height(a.noise(), 0.0, 0.0);
    let hb = b.biomes().sample_biome_height(b.noise(), 0.0, 0.0);

    assert!((64.0..=112.0).contains(&ha), "height {ha}");
    assert_eq!(ha.to_bits(), hb.to_bits());
    assert_eq!(
        a.make_chunk_column(ColumnCoord::new(0, 0)).chunks.len(),
        b.make_chunk_column(ColumnCoord::new(0, 0)).chunks.len()
    );
}

/// Test: six vertices per exposed face, all inside the chunk's world box.
#[test]
fn test_mesh_matches_face_masks() {
    let factory = ChunkFactory::new(&WorldSettings::default()).unwrap();
    let mesher = MeshBuilder::default();
    let coord = ChunkCoord::new(2, 3, 4);
    let chunk = factory.make_chunk(coord);

    let vertices = mesher.build(&chunk);
    assert_eq!(vertices.len(), chunk.exposed_faces() * VERTICES_PER_FACE);

    let size = factory.chunk_size() as f32;
    let [ox, oy, oz] = coord.world_origin(factory.chunk_size()).map(|v| v as f32);
    for v in &vertices {
        assert!((ox..=ox + size).contains(&v.position[0]));
        assert!((oy..=oy + size).contains(&v.position[1]));
        assert!((oz..=oz + size).contains(&v.position[2]));
        assert!((0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]));
    }
}

/// Test: ocean columns fill with water up to sea level.
#[test]
fn test_ocean_has_water() {
    let mut settings = WorldSettings::default();
    settings.terrain.default_biome = "ocean".to_string();
    let factory = ChunkFactory::new(&settings).unwrap();
    let sea = settings.terrain.sea_level;
    let size = settings.chunk_size as i32;

    let column = factory.make_chunk_column(ColumnCoord::new(0, 0));
    let top_water = sea - 1;
    let chunk = column
        .chunks
        .iter()
        .find(|c| c.location().z == top_water.div_euclid(size))
        .expect("water surface chunk");
    let block = chunk
        .block(LocalCoord::new(3, 3, top_water.rem_euclid(size)))
        .unwrap();
    assert_eq!(block.kind, BlockType::Water);
}
