use std::{collections::HashSet, hash::Hasher};

use twox_hash::XxHash64;

use crate::normalize::dedup_key;

/// 64-bit content fingerprint of a normalized sentence.
pub fn sentence_hash(normalized: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(dedup_key(normalized).as_bytes());
    hasher.finish()
}

/// Remembers every sentence fingerprint seen during one indexing run.
///
/// The set only grows. Two distinct sentences colliding on the 64-bit
/// fingerprint are treated as duplicates.
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    seen: HashSet<u64>,
}

impl DuplicateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Return `true` if this normalized sentence was already seen, and
    /// record it otherwise.
    pub fn is_duplicate(&mut self, normalized: &str) -> bool {
        !self.seen.insert(sentence_hash(normalized))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
