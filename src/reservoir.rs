//! Bounded per-phrase sampling of line ids.
//!
//! Each phrase keeps an exact occurrence count and at most `max_samples`
//! line ids chosen by reservoir sampling (algorithm R). With the default
//! fixed seed, the same input produces the same samples on every run.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Seed used for reproducible index builds.
pub const DEFAULT_SEED: u64 = 19_780_211;

/// Count and sample for one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservoirRecord {
    pub count: u64,
    pub samples: Vec<u64>,
}

impl ReservoirRecord {
    fn new(line_id: u64) -> Self {
        Self {
            count: 1,
            samples: vec![line_id],
        }
    }
}

pub struct ReservoirIndex<R = ChaCha20Rng> {
    max_samples: usize,
    records: HashMap<String, ReservoirRecord>,
    rng: R,
}

impl ReservoirIndex<ChaCha20Rng> {
    /// Create an index seeded with [`DEFAULT_SEED`].
    pub fn new(max_samples: usize) -> Self {
        Self::with_seed(max_samples, DEFAULT_SEED)
    }

    pub fn with_seed(max_samples: usize, seed: u64) -> Self {
        Self::with_rng(max_samples, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReservoirIndex<R> {
    pub fn with_rng(max_samples: usize, rng: R) -> Self {
        Self {
            max_samples,
            records: HashMap::new(),
            rng,
        }
    }

    /// Record one occurrence of `phrase` on line `line_id`.
    ///
    /// While the sample has room the id is appended. After that, the id
    /// replaces slot `r - 1` for a uniform `r` in `1..=count` when
    /// `r <= max_samples`, and is dropped otherwise.
    pub fn update(&mut self, phrase: &str, line_id: u64) {
        let Some(record) = self.records.get_mut(phrase) else {
            self.records
                .insert(phrase.to_string(), ReservoirRecord::new(line_id));
            return;
        };

        record.count += 1;
        if record.samples.len() < self.max_samples {
            record.samples.push(line_id);
            return;
        }

        let r = self.rng.gen_range(1..=record.count);
        if r <= self.max_samples as u64 {
            record.samples[(r - 1) as usize] = line_id;
        }
    }

    pub fn get(&self, phrase: &str) -> Option<&ReservoirRecord> {
        self.records.get(phrase)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the index, yielding each phrase with its samples sorted
    /// ascending. Counts are dropped.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Vec<u64>)> {
        self.records.into_iter().map(|(phrase, record)| {
            let mut samples = record.samples;
            samples.sort_unstable();
            (phrase, samples)
        })
    }
}

impl<R> std::fmt::Debug for ReservoirIndex<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservoirIndex")
            .field("max_samples", &self.max_samples)
            .field("phrases", &self.records.len())
            .finish_non_exhaustive()
    }
}
