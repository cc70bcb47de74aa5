use crate::lsh::{MinHash, MinHashLsh};
use crate::shingle::shingles;
use rayon::prelude::*;
use sentence_dedup::dto::Record;
use std::collections::HashSet;
use tracing::debug;

/// MinHash signatures for every usable record, in ascending id order.
///
/// Built once per run and shared by every threshold pass, so a threshold
/// sweep never recomputes shingles or signatures. Records whose shingle set
/// is empty (fewer tokens than the shingle size) are excluded here and never
/// reach an index or a group.
pub struct SignatureSet {
    num_perm: usize,
    signatures: Vec<(u32, MinHash)>,
    excluded: usize,
}

impl SignatureSet {
    pub fn build(records: &[Record], shingle_size: usize, permutations: &[(u64, u64)]) -> Self {
        // No shared state across records; the collect puts results back into
        // input (ascending id) order regardless of completion order.
        let signatures: Vec<(u32, MinHash)> = records
            .par_iter()
            .filter_map(|record| {
                let shingle_set = shingles(&record.text, shingle_size);
                if shingle_set.is_empty() {
                    return None;
                }
                Some((record.id, MinHash::new(&shingle_set, permutations)))
            })
            .collect();
        SignatureSet {
            num_perm: permutations.len(),
            excluded: records.len() - signatures.len(),
            signatures,
        }
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Records dropped for having fewer tokens than the shingle size.
    pub fn excluded(&self) -> usize {
        self.excluded
    }
}

/// Greedily partitions the signature set into duplicate groups at one
/// threshold.
///
/// Ids are visited in ascending order; each unconsumed id seeds a query, and
/// the whole candidate set is removed from the index and marked consumed, so
/// no id is ever reconsidered. A candidate set is emitted only when it is
/// strictly larger than `group_size`; smaller sets are discarded but stay
/// consumed, so the first seed to sweep an id wins.
pub fn group(signature_set: &SignatureSet, threshold: f64, group_size: usize) -> Vec<Vec<u32>> {
    let mut lsh = MinHashLsh::with_threshold(signature_set.num_perm, threshold);
    for (id, minhash) in &signature_set.signatures {
        lsh.insert(*id, minhash);
    }
    debug!(
        threshold,
        num_bands = lsh.num_bands(),
        band_size = lsh.band_size(),
        records = lsh.len(),
        "built lsh index"
    );
    let mut consumed: HashSet<u32> = HashSet::new();
    let mut groups = Vec::new();
    for (id, minhash) in &signature_set.signatures {
        if consumed.contains(id) {
            continue;
        }
        let candidates = lsh.query(minhash);
        for &candidate in &candidates {
            lsh.remove(candidate);
            consumed.insert(candidate);
        }
        if candidates.len() > group_size {
            groups.push(candidates);
        }
    }
    groups
}
