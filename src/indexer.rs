//! Single-pass indexing of parallel-sentence records.
//!
//! Each record flows through normalization, deduplication, phrase
//! extraction, optional probability pruning and reservoir sampling. Line
//! records are written as they are accepted; phrase records are written
//! once the input ends.

use std::{io::BufRead, time::Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{
    dedup::DuplicateFilter,
    error::{Error, Result},
    extract::PhraseExtractor,
    normalize::{first_field, normalize},
    persist::Persister,
    phrase_prob::{PhraseProbabilityModel, select_candidates},
    reservoir::{DEFAULT_SEED, ReservoirIndex},
    store::RecordStore,
    tokenizer::SimpleTokenizer,
    vocabulary::Vocabulary,
};

pub const DEFAULT_MAX_WORDS: usize = 50;
pub const DEFAULT_MAX_NGRAM: usize = 3;
pub const DEFAULT_MAX_SAMPLES: usize = 100;
pub const DEFAULT_NUM_BUCKETS: usize = 1_000_000;

/// Upper bound on the capacity reserved from `num_buckets`.
const MAX_RESERVED_BUCKETS: usize = 1 << 22;

const PROGRESS_INTERVAL: u64 = 10_000;

/// Tunables of one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Candidates kept per sentence after pruning.
    pub max_words: usize,
    /// Longest phrase, in tokens.
    pub max_ngram: usize,
    /// Sampled line ids kept per phrase.
    pub max_samples: usize,
    /// Expected number of distinct sentences.
    pub num_buckets: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            max_ngram: DEFAULT_MAX_NGRAM,
            max_samples: DEFAULT_MAX_SAMPLES,
            num_buckets: DEFAULT_NUM_BUCKETS,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(Error::Config("max_words must be positive".into()));
        }
        if self.max_ngram == 0 {
            return Err(Error::Config("max_ngram must be positive".into()));
        }
        if self.max_samples == 0 {
            return Err(Error::Config("max_samples must be positive".into()));
        }
        Ok(())
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Input lines consumed, including skipped ones.
    pub lines_read: u64,
    /// Lines stored and indexed.
    pub lines_indexed: u64,
    /// Lines dropped as repeats of an earlier sentence.
    pub duplicates: u64,
    /// Blank, sentence-less or undecodable lines.
    pub skipped: u64,
    /// Core tokens examined by the extractor.
    pub words: u64,
    /// Distinct phrases written to the index.
    pub phrases: u64,
}

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Indexed { line_id: u64, phrases: usize },
    Duplicate,
    Skipped,
}

/// Mutable state that lives for exactly one run.
#[derive(Debug)]
pub struct IndexerState<R = ChaCha20Rng> {
    pub duplicates: DuplicateFilter,
    pub reservoir: ReservoirIndex<R>,
    pub next_line_id: u64,
}

pub struct Indexer<R = ChaCha20Rng> {
    config: IndexConfig,
    extractor: PhraseExtractor,
    phrase_model: Option<PhraseProbabilityModel>,
    persister: Persister,
    state: IndexerState<R>,
    stats: IndexStats,
}

impl Indexer<ChaCha20Rng> {
    /// Create an indexer writing to `store`, sampling with the fixed
    /// default seed.
    pub fn new(config: IndexConfig, store: RecordStore) -> Result<Self> {
        Self::with_rng(config, store, ChaCha20Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl<R: Rng> Indexer<R> {
    pub fn with_rng(
        config: IndexConfig,
        store: RecordStore,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;

        let state = IndexerState {
            duplicates: DuplicateFilter::with_capacity(
                config.num_buckets.min(MAX_RESERVED_BUCKETS),
            ),
            reservoir: ReservoirIndex::with_rng(config.max_samples, rng),
            next_line_id: 0,
        };
        let extractor = PhraseExtractor::new(
            config.max_ngram,
            Vocabulary::new(),
            Box::new(SimpleTokenizer),
        );

        Ok(Self {
            config,
            extractor,
            phrase_model: None,
            persister: Persister::new(store),
            state,
            stats: IndexStats::default(),
        })
    }

    /// Restrict indexed phrases to `vocabulary`.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.extractor = self.extractor.with_vocabulary(vocabulary);
        self
    }

    /// Prune oversized candidate sets by estimated phrase probability.
    pub fn with_phrase_model(mut self, model: PhraseProbabilityModel) -> Self {
        self.phrase_model = Some(model);
        self
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn state(&self) -> &IndexerState<R> {
        &self.state
    }

    /// Index one input record.
    ///
    /// The line is stored without its terminator. Only storage failures
    /// are errors: lines without a sentence are skipped and repeated
    /// sentences are dropped.
    pub fn process_line(&mut self, line: &str) -> Result<LineOutcome> {
        self.stats.lines_read += 1;

        let line = line.trim_end_matches(['\r', '\n']);
        let sentence = first_field(line);
        if sentence.is_empty() {
            self.stats.skipped += 1;
            return Ok(LineOutcome::Skipped);
        }

        let normalized = normalize(sentence);
        if self.state.duplicates.is_duplicate(&normalized) {
            self.stats.duplicates += 1;
            return Ok(LineOutcome::Duplicate);
        }

        let extraction = self.extractor.extract(&normalized);
        self.stats.words += extraction.words as u64;
        let phrases = select_candidates(
            extraction.phrases,
            self.config.max_words,
            self.phrase_model.as_ref(),
        )?;

        let line_id = self.state.next_line_id;
        self.persister.write_line(line_id, line)?;
        for phrase in &phrases {
            self.state.reservoir.update(phrase, line_id);
        }
        self.state.next_line_id += 1;
        self.stats.lines_indexed += 1;

        if self.stats.lines_indexed % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                lines = self.stats.lines_indexed,
                "processing records"
            );
        }

        Ok(LineOutcome::Indexed {
            line_id,
            phrases: phrases.len(),
        })
    }

    /// Index every newline-delimited record from `reader`.
    ///
    /// Lines that are not valid UTF-8 are skipped.
    pub fn process_records(&mut self, mut reader: impl BufRead) -> Result<()> {
        let start = Instant::now();
        tracing::info!("processing records");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            match std::str::from_utf8(&buf) {
                Ok(line) => {
                    self.process_line(line)?;
                }
                Err(e) => {
                    self.stats.lines_read += 1;
                    self.stats.skipped += 1;
                    tracing::debug!(
                        line = self.stats.lines_read,
                        "skipping undecodable line: {e}"
                    );
                }
            }
        }

        tracing::info!(
            lines = self.stats.lines_indexed,
            words = self.stats.words,
            duplicates = self.stats.duplicates,
            skipped = self.stats.skipped,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "processing records done"
        );
        Ok(())
    }

    /// Write the phrase index and return the final stats with the store.
    pub fn finish(self) -> Result<(IndexStats, RecordStore)> {
        let Self {
            mut persister,
            state,
            mut stats,
            ..
        } = self;

        stats.phrases = persister.write_index(state.reservoir.into_entries())?
            as u64;
        let store = persister.finish()?;
        Ok((stats, store))
    }

    /// Process all of `reader` and write the index.
    pub fn run(mut self, reader: impl BufRead) -> Result<IndexStats> {
        let start = Instant::now();
        self.process_records(reader)?;
        let (stats, _store) = self.finish()?;
        tracing::info!(
            lines = stats.lines_indexed,
            phrases = stats.phrases,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "indexing done"
        );
        Ok(stats)
    }
}

impl<R> std::fmt::Debug for Indexer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
