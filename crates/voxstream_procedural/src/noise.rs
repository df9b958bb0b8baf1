//! # Perlin Noise Implementation
//!
//! Deterministic 3D gradient noise with fractal (octave) composition.
//!
//! ## Algorithm
//!
//! 1. Locate the unit lattice cell holding the sample point
//! 2. Fade the fractional offsets with `6t^5 - 15t^4 + 10t^3`
//! 3. Hash the 8 cell corners through the permutation table to pick
//!    one of 12 gradient directions each
//! 4. Dot each gradient with the corner-to-point offset
//! 5. Trilinearly blend the 8 values with the faded offsets
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation produces bit-identical
//! values on every call. The permutation table is the only state and it is
//! never mutated after construction, so a `PerlinNoise` can be shared by
//! reference across threads.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(12345)
    }
}

/// The 12 cube-edge gradient directions.
const GRADIENTS: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
#[derive(Clone, Debug)]
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled so lookups never wrap).
    perm: [u8; 512],
}

impl PermutationTable {
    /// Creates a new permutation table from a seed.
    fn new(seed: WorldSeed) -> Self {
        let mut base: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        base.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&base);
        perm[256..].copy_from_slice(&base);

        Self { perm }
    }

    /// Gets a permutation value.
    ///
    /// Callers keep `index < 512` by construction (cell index <= 255, plus
    /// at most one more table value <= 255, plus 1).
    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index])
    }
}

/// 3D Perlin noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
///
/// # Example
///
/// ```rust
/// use voxstream_procedural::noise::{PerlinNoise, WorldSeed};
///
/// let noise = PerlinNoise::new(WorldSeed::new(42));
/// let value = noise.perlin(100.5, 200.3, 0.25);
/// assert!((-1.0..=1.0).contains(&value));
///
/// let height = noise.octave_perlin(100.0, 200.0, 0.0, 0.01, 3, 64.0, 112.0);
/// assert!((64.0..=112.0).contains(&height));
/// ```
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    /// The permutation table.
    perm_table: PermutationTable,
}

impl PerlinNoise {
    /// Creates a new noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 3D gradient noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1]. Integer lattice points always yield 0.
    #[must_use]
    pub fn perlin(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let xi = lattice_index(xf);
        let yi = lattice_index(yf);
        let zi = lattice_index(zf);

        // Offsets inside the cell
        let (x, y, z) = (x - xf, y - yf, z - zf);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let p = &self.perm_table;
        let a = p.get(xi) + yi;
        let aa = p.get(a) + zi;
        let ab = p.get(a + 1) + zi;
        let b = p.get(xi + 1) + yi;
        let ba = p.get(b) + zi;
        let bb = p.get(b + 1) + zi;

        let near = lerp(
            v,
            lerp(u, grad(p.get(aa), x, y, z), grad(p.get(ba), x - 1.0, y, z)),
            lerp(u, grad(p.get(ab), x, y - 1.0, z), grad(p.get(bb), x - 1.0, y - 1.0, z)),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad(p.get(aa + 1), x, y, z - 1.0),
                grad(p.get(ba + 1), x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(p.get(ab + 1), x, y - 1.0, z - 1.0),
                grad(p.get(bb + 1), x - 1.0, y - 1.0, z - 1.0),
            ),
        );

        lerp(w, near, far).clamp(-1.0, 1.0)
    }

    /// Generates octaved (fractal) noise remapped to `[lo, hi]`.
    ///
    /// Sums `octaves` layers of [`PerlinNoise::perlin`], starting at
    /// frequency `scale` and doubling it each octave while halving the
    /// amplitude, then normalizes by the total amplitude and maps [-1, 1]
    /// linearly onto `[lo, hi]`.
    ///
    /// `octaves == 0` is treated as a single octave.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn octave_perlin(
        &self,
        x: f64,
        y: f64,
        z: f64,
        scale: f64,
        octaves: u32,
        lo: f64,
        hi: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = scale;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.perlin(x * frequency, y * frequency, z * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        // Normalize to [-1, 1], then remap
        let normalized = (total / max_amplitude).clamp(-1.0, 1.0);
        let t = (normalized + 1.0) * 0.5;
        (lo + t * (hi - lo)).clamp(lo.min(hi), lo.max(hi))
    }
}

/// Lattice cell index wrapped into the 256-entry table.
#[inline]
fn lattice_index(floored: f64) -> usize {
    ((floored as i64) & 255) as usize
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the hashed gradient with the corner offset.
#[inline]
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let g = GRADIENTS[hash % 12];
    g[0] * x + g[1] * y + g[2] * z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let noise1 = PerlinNoise::new(seed);
        let noise2 = PerlinNoise::new(seed);

        // Same seed should produce bit-identical results
        for i in 0..1000 {
            let x = f64::from(i) * 0.173 - 40.0;
            let y = f64::from(i) * 0.071 + 3.0;
            let z = f64::from(i) * 0.031;
            assert_eq!(
                noise1.perlin(x, y, z).to_bits(),
                noise2.perlin(x, y, z).to_bits(),
                "Noise should be deterministic at ({x}, {y}, {z})"
            );
        }
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let table = PermutationTable::new(WorldSeed::new(7));
        let mut seen = [false; 256];
        for &v in &table.perm[..256] {
            assert!(!seen[usize::from(v)], "duplicate entry {v}");
            seen[usize::from(v)] = true;
        }
        assert_eq!(&table.perm[..256], &table.perm[256..]);
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = PerlinNoise::new(WorldSeed::new(1));
        let noise2 = PerlinNoise::new(WorldSeed::new(2));

        let differs = (0..50).any(|i| {
            let x = f64::from(i) * 0.37 + 0.5;
            noise1.perlin(x, x * 0.5, 0.25) != noise2.perlin(x, x * 0.5, 0.25)
        });
        assert!(differs, "Different seeds should produce different results");
    }

    #[test]
    fn test_range() {
        let noise = PerlinNoise::new(WorldSeed::new(42));

        for i in 0..20_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let z = f64::from(i) * 0.07;
            let value = noise.perlin(x, y, z);

            assert!(
                (-1.0..=1.0).contains(&value),
                "Value {value} out of range at ({x}, {y}, {z})"
            );
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = PerlinNoise::new(WorldSeed::new(42));
        for i in -5..5 {
            let v = f64::from(i);
            assert_eq!(noise.perlin(v, v * 2.0, -v), 0.0);
        }
    }

    #[test]
    fn test_continuity_across_lattice_boundary() {
        let noise = PerlinNoise::new(WorldSeed::new(42));

        // Straddle the x = 3 cell boundary with shrinking steps
        let mut last_diff = f64::MAX;
        for eps in [1e-2, 1e-3, 1e-4, 1e-5] {
            let left = noise.perlin(3.0 - eps, 1.3, 0.7);
            let right = noise.perlin(3.0 + eps, 1.3, 0.7);
            let diff = (left - right).abs();
            assert!(diff < 20.0 * eps, "Jump of {diff} at eps {eps}");
            assert!(diff <= last_diff + 1e-12, "Difference should shrink with eps");
            last_diff = diff;
        }

        // And between arbitrary neighbours
        let v1 = noise.perlin(100.2, 100.7, 5.5);
        let v2 = noise.perlin(100.2 + 0.001, 100.7, 5.5);
        assert!((v1 - v2).abs() < 0.01, "Noise should be continuous");
    }

    #[test]
    fn test_octave_perlin_stays_in_range() {
        let noise = PerlinNoise::new(WorldSeed::new(9));

        let params = [
            (0.01, 1, 0.0, 1.0),
            (0.01, 3, 64.0, 112.0),
            (0.05, 6, -20.0, 20.0),
            (1.7, 8, 10.0, 10.0),
            (0.3, 0, 5.0, 6.0),
        ];

        for (scale, octaves, lo, hi) in params {
            for i in 0..2000 {
                let x = f64::from(i) * 3.7 - 3000.0;
                let y = f64::from(i) * -1.3 + 77.0;
                let z = f64::from(i % 17) * 0.5;
                let value = noise.octave_perlin(x, y, z, scale, octaves, lo, hi);
                assert!(
                    (lo..=hi).contains(&value),
                    "{value} outside [{lo}, {hi}] for scale {scale}, octaves {octaves}"
                );
            }
        }
    }

    #[test]
    fn test_octave_perlin_midpoint_at_origin() {
        // Every octave samples the lattice point at the origin
        let noise = PerlinNoise::new(WorldSeed::new(12345));
        let value = noise.octave_perlin(0.0, 0.0, 0.0, 0.01, 3, 64.0, 112.0);
        assert!((value - 88.0).abs() < 1e-9);
    }
}
