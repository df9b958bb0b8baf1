//! Benchmark for noise sampling performance.
//!
//! Run with: cargo bench --package voxstream_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxstream_procedural::biome::BiomeTable;
use voxstream_procedural::noise::{PerlinNoise, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = PerlinNoise::new(WorldSeed::new(42));

    c.bench_function("single_perlin_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.perlin(black_box(x), black_box(x * 0.7), black_box(0.5)))
        });
    });
}

fn benchmark_column_footprint(c: &mut Criterion) {
    let noise = PerlinNoise::new(WorldSeed::new(42));

    // One 16x16 column footprint, three octaves like the plains biome
    let mut group = c.benchmark_group("column_footprint");
    group.throughput(Throughput::Elements(16 * 16));

    group.bench_function("octave_perlin_3_octaves_16x16", |b| {
        b.iter(|| {
            for y in 0..16 {
                for x in 0..16 {
                    black_box(noise.octave_perlin(
                        f64::from(x),
                        f64::from(y),
                        0.0,
                        0.01,
                        3,
                        64.0,
                        112.0,
                    ));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_biome_height(c: &mut Criterion) {
    let noise = PerlinNoise::new(WorldSeed::new(42));
    let table = BiomeTable::default();

    c.bench_function("sample_biome_height", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 1.0;
            black_box(table.sample_biome_height(&noise, black_box(x), black_box(x * 0.7)))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_column_footprint,
    benchmark_biome_height
);
criterion_main!(benches);
