//! Output layout of an index store.
//!
//! Line records are keyed `[<id>]` and hold the raw input line. Phrase
//! records are keyed by the phrase and hold its sampled line ids,
//! ascending and comma-joined. Phrases always start with a word
//! character, so the two key families never collide.

use std::time::Instant;

use crate::{error::Result, store::RecordStore};

/// Records buffered before a write transaction is committed.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

const PROGRESS_INTERVAL: usize = 10_000;

/// Store key of line `id`.
///
/// # Examples
///
/// ```
/// use paraindex::persist::{line_key, parse_line_key};
///
/// assert_eq!(line_key(42), "[42]");
/// assert_eq!(parse_line_key("[42]"), Some(42));
/// assert_eq!(parse_line_key("cat"), None);
/// ```
pub fn line_key(id: u64) -> String {
    format!("[{id}]")
}

pub fn parse_line_key(key: &str) -> Option<u64> {
    key.strip_prefix('[')?.strip_suffix(']')?.parse().ok()
}

pub fn format_samples(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined id list. Returns `None` on any malformed id.
pub fn parse_samples(value: &str) -> Option<Vec<u64>> {
    if value.is_empty() {
        return Some(Vec::new());
    }
    value.split(',').map(|id| id.trim().parse().ok()).collect()
}

/// Buffered writer of line and phrase records.
pub struct Persister {
    store: RecordStore,
    pending: Vec<(String, String)>,
    batch_size: usize,
}

impl Persister {
    pub fn new(store: RecordStore) -> Self {
        Self::with_batch_size(store, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(store: RecordStore, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            pending: Vec::with_capacity(batch_size),
            batch_size,
        }
    }

    /// Queue the raw line for `id`.
    pub fn write_line(&mut self, id: u64, raw: &str) -> Result<()> {
        self.push(line_key(id), raw.to_string())
    }

    /// Write every phrase entry and commit. Returns the number of phrase
    /// records written.
    pub fn write_index(
        &mut self,
        entries: impl IntoIterator<Item = (String, Vec<u64>)>,
    ) -> Result<usize> {
        let start = Instant::now();
        tracing::info!("outputting index");

        let mut num_records = 0usize;
        for (phrase, ids) in entries {
            let value = format_samples(&ids);
            self.push(phrase, value)?;
            num_records += 1;
            if num_records % PROGRESS_INTERVAL == 0 {
                tracing::info!(records = num_records, "outputting index");
            }
        }
        self.flush()?;

        tracing::info!(
            records = num_records,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "outputting index done"
        );
        Ok(num_records)
    }

    /// Commit everything queued so far.
    pub fn flush(&mut self) -> Result<()> {
        self.store.set_batch(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Flush and hand back the underlying store.
    pub fn finish(mut self) -> Result<RecordStore> {
        self.flush()?;
        Ok(self.store)
    }

    fn push(&mut self, key: String, value: String) -> Result<()> {
        self.pending.push((key, value));
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Persister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persister")
            .field("pending", &self.pending.len())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
