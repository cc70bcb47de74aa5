use rand::prelude::*;
use rustc_hash::FxHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// Multiply-shift permutation parameters, generated once per run from an
/// explicit seed so signatures are identical across runs and across the
/// parallel/sequential boundary.
pub fn permutations(num_perm: usize, seed: u64) -> Vec<(u64, u64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_perm).map(|_| (rng.gen(), rng.gen())).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinHash {
    pub hash_values: Vec<u32>,
    num_perm: usize,
}

impl MinHash {
    /// Builds a signature over a shingle set: row `i` is the minimum of
    /// permutation `i` applied to each shingle hash. An empty set leaves
    /// every row at the sentinel value `u32::MAX`.
    pub fn new(shingles: &HashSet<String>, permutations: &[(u64, u64)]) -> Self {
        let num_perm = permutations.len();
        let mut hash_values = vec![u32::MAX; num_perm];
        for shingle in shingles {
            let shingle_hash = calculate_hash(&shingle.as_str());
            for (i, &(a, b)) in permutations.iter().enumerate() {
                let hash = permute_hash(shingle_hash, a, b);
                hash_values[i] = hash_values[i].min(hash);
            }
        }
        MinHash {
            hash_values,
            num_perm,
        }
    }

    /// True when every row still holds the sentinel, i.e. the signature was
    /// built from an empty shingle set.
    pub fn is_sentinel(&self) -> bool {
        self.hash_values.iter().all(|&value| value == u32::MAX)
    }

    /// Fraction of equal rows, an unbiased estimate of the jaccard
    /// similarity of the source shingle sets.
    pub fn jaccard_similarity(&self, other: &MinHash) -> f64 {
        let equal_count = self
            .hash_values
            .iter()
            .zip(&other.hash_values)
            .filter(|&(&a, &b)| a == b)
            .count();
        equal_count as f64 / self.num_perm as f64
    }
}

/// Banded LSH index over MinHash signatures.
///
/// Each signature is split into `num_bands` slices of `band_size` rows and
/// bucketed by slice hash; ids sharing a bucket in any band are similarity
/// candidates. A copy of every inserted signature is kept so `remove` can
/// find exactly the buckets holding an id without scanning the tables.
pub struct MinHashLsh {
    num_bands: usize,
    band_size: usize,
    /// Banded hash tables used to find candidates for similarity
    hash_tables: Vec<HashMap<u64, Vec<u32>>>,
    /// Inserted signatures, for bucket lookup on removal
    signatures: HashMap<u32, MinHash>,
}

impl MinHashLsh {
    /// Creates an index tuned for `threshold`, deriving the band split from
    /// `num_perm` (see [`band_params`]).
    pub fn with_threshold(num_perm: usize, threshold: f64) -> Self {
        let (num_bands, band_size) = band_params(num_perm, threshold);
        MinHashLsh {
            num_bands,
            band_size,
            hash_tables: vec![HashMap::new(); num_bands],
            signatures: HashMap::new(),
        }
    }

    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    pub fn band_size(&self) -> usize {
        self.band_size
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Adds `id` to the bucket keyed by each of its band hashes.
    ///
    /// Panics on a duplicate id or a sentinel signature; both are contract
    /// violations by the caller, not recoverable conditions.
    pub fn insert(&mut self, id: u32, minhash: &MinHash) {
        assert!(
            !minhash.is_sentinel(),
            "record {id} has an empty signature and must not be indexed"
        );
        assert!(
            !self.signatures.contains_key(&id),
            "record {id} inserted twice"
        );
        for (i, table) in self.hash_tables.iter_mut().enumerate() {
            let start = i * self.band_size;
            let end = start + self.band_size;
            let band_hash = calculate_band_hash(&minhash.hash_values[start..end]);
            table.entry(band_hash).or_insert_with(Vec::new).push(id);
        }
        self.signatures.insert(id, minhash.clone());
    }

    /// Union of bucket contents across all bands, ascending. Includes the
    /// querying id itself when it has been inserted.
    pub fn query(&self, minhash: &MinHash) -> Vec<u32> {
        let mut candidates: HashSet<u32> = HashSet::new();
        for (i, table) in self.hash_tables.iter().enumerate() {
            let start = i * self.band_size;
            let end = start + self.band_size;
            let band_hash = calculate_band_hash(&minhash.hash_values[start..end]);
            if let Some(ids) = table.get(&band_hash) {
                candidates.extend(ids);
            }
        }
        let mut result: Vec<u32> = candidates.into_iter().collect();
        result.sort_unstable();
        result
    }

    /// Deletes `id` from the one bucket per band that holds it, using the
    /// stored signature to recompute the band hashes.
    ///
    /// Panics when `id` is not present; that means the caller's consumed-set
    /// bookkeeping is broken.
    pub fn remove(&mut self, id: u32) {
        let minhash = self
            .signatures
            .remove(&id)
            .unwrap_or_else(|| panic!("record {id} is not in the index"));
        for (i, table) in self.hash_tables.iter_mut().enumerate() {
            let start = i * self.band_size;
            let end = start + self.band_size;
            let band_hash = calculate_band_hash(&minhash.hash_values[start..end]);
            let bucket = table
                .get_mut(&band_hash)
                .unwrap_or_else(|| panic!("record {id} has no bucket in band {i}"));
            let position = bucket
                .iter()
                .position(|&candidate| candidate == id)
                .unwrap_or_else(|| panic!("record {id} missing from its bucket in band {i}"));
            bucket.swap_remove(position);
            if bucket.is_empty() {
                table.remove(&band_hash);
            }
        }
    }
}

/// Chooses `(num_bands, band_size)` with `num_bands * band_size == num_perm`
/// so that the collision curve midpoint `(1/b)^(1/r)` lands as close as
/// possible to `threshold`.
pub fn band_params(num_perm: usize, threshold: f64) -> (usize, usize) {
    let mut best = (1, num_perm);
    let mut best_diff = f64::MAX;
    for num_bands in 1..=num_perm {
        if num_perm % num_bands != 0 {
            continue;
        }
        let band_size = num_perm / num_bands;
        let midpoint = (1.0 / num_bands as f64).powf(1.0 / band_size as f64);
        let diff = (midpoint - threshold).abs();
        if diff < best_diff {
            best = (num_bands, band_size);
            best_diff = diff;
        }
    }
    best
}

#[inline]
fn calculate_hash<T: Hash>(t: &T) -> u64 {
    let mut s = FxHasher::default();
    t.hash(&mut s);
    s.finish()
}

#[inline]
fn permute_hash(hash: u64, a: u64, b: u64) -> u32 {
    ((a.wrapping_mul(hash).wrapping_add(b)) >> 32) as u32
}

#[inline]
fn calculate_band_hash(band: &[u32]) -> u64 {
    let mut hasher = FxHasher::default();
    for &value in band {
        hasher.write_u32(value);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shingle::shingles;

    fn signature(text: &str, permutations: &[(u64, u64)]) -> MinHash {
        MinHash::new(&shingles(text, 2), permutations)
    }

    #[test]
    fn permutations_are_seed_deterministic() {
        assert_eq!(permutations(64, 42), permutations(64, 42));
        assert_ne!(permutations(64, 42), permutations(64, 43));
    }

    #[test]
    fn identical_texts_share_a_signature() {
        let perms = permutations(128, 42);
        let a = signature("the quick brown fox jumps", &perms);
        let b = signature("The Quick Brown Fox Jumps", &perms);
        assert_eq!(a, b);
        assert!((a.jaccard_similarity(&b) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_shingle_set_yields_the_sentinel_signature() {
        let perms = permutations(128, 42);
        let sig = MinHash::new(&HashSet::new(), &perms);
        assert!(sig.is_sentinel());
        assert_eq!(sig.hash_values.len(), 128);
    }

    #[test]
    fn estimator_tracks_exact_jaccard() {
        // 40 shared shingles of 60 total, so the exact jaccard is 2/3.
        let perms = permutations(256, 42);
        let a: HashSet<String> = (0..50).map(|i| format!("shingle {i}")).collect();
        let b: HashSet<String> = (10..60).map(|i| format!("shingle {i}")).collect();
        let exact = 40.0 / 60.0;
        let estimate = MinHash::new(&a, &perms).jaccard_similarity(&MinHash::new(&b, &perms));
        assert!(
            (estimate - exact).abs() < 0.15,
            "estimate {estimate} too far from exact {exact}"
        );
    }

    #[test]
    fn estimator_mean_converges_over_seeds() {
        let a: HashSet<String> = (0..50).map(|i| format!("shingle {i}")).collect();
        let b: HashSet<String> = (10..60).map(|i| format!("shingle {i}")).collect();
        let exact = 40.0 / 60.0;
        let mean: f64 = (1..=16)
            .map(|seed| {
                let perms = permutations(256, seed);
                MinHash::new(&a, &perms).jaccard_similarity(&MinHash::new(&b, &perms))
            })
            .sum::<f64>()
            / 16.0;
        assert!(
            (mean - exact).abs() < 0.05,
            "mean estimate {mean} too far from exact {exact}"
        );
    }

    #[test]
    fn band_params_cover_the_signature() {
        for &threshold in &[0.5, 0.7, 0.9, 0.95] {
            let (num_bands, band_size) = band_params(128, threshold);
            assert_eq!(num_bands * band_size, 128);
        }
    }

    #[test]
    fn band_params_track_the_threshold() {
        // Among the divisors of 128, 8 bands of 16 rows sit nearest 0.9 and
        // 16 bands of 8 rows nearest 0.7.
        assert_eq!(band_params(128, 0.9), (8, 16));
        assert_eq!(band_params(128, 0.7), (16, 8));
    }

    #[test]
    fn query_returns_the_inserted_id() {
        let perms = permutations(128, 42);
        let mut lsh = MinHashLsh::with_threshold(128, 0.5);
        let sig = signature("the cat sat on the mat", &perms);
        lsh.insert(0, &sig);
        assert_eq!(lsh.query(&sig), vec![0]);
        assert_eq!(lsh.len(), 1);
    }

    #[test]
    fn near_duplicates_collide_in_some_band() {
        let perms = permutations(128, 42);
        let mut lsh = MinHashLsh::with_threshold(128, 0.5);
        let a = signature("the quick brown fox jumps over the lazy dog", &perms);
        let b = signature("the quick brown fox jumps over the lazy cat", &perms);
        lsh.insert(0, &a);
        lsh.insert(1, &b);
        assert_eq!(lsh.query(&a), vec![0, 1]);
    }

    #[test]
    fn remove_deletes_across_all_bands() {
        let perms = permutations(128, 42);
        let mut lsh = MinHashLsh::with_threshold(128, 0.5);
        let sig = signature("the cat sat on the mat", &perms);
        lsh.insert(7, &sig);
        lsh.remove(7);
        assert!(lsh.query(&sig).is_empty());
        assert!(lsh.is_empty());
    }

    #[test]
    #[should_panic(expected = "inserted twice")]
    fn duplicate_insert_panics() {
        let perms = permutations(128, 42);
        let mut lsh = MinHashLsh::with_threshold(128, 0.5);
        let sig = signature("the cat sat on the mat", &perms);
        lsh.insert(0, &sig);
        lsh.insert(0, &sig);
    }

    #[test]
    #[should_panic(expected = "empty signature")]
    fn sentinel_insert_panics() {
        let perms = permutations(128, 42);
        let mut lsh = MinHashLsh::with_threshold(128, 0.5);
        lsh.insert(0, &MinHash::new(&HashSet::new(), &perms));
    }

    #[test]
    #[should_panic(expected = "not in the index")]
    fn removing_an_absent_id_panics() {
        let mut lsh = MinHashLsh::with_threshold(128, 0.5);
        lsh.remove(3);
    }
}
