use std::path::Path;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    persist::{line_key, parse_samples},
    store::RecordStore,
};

/// One example sentence for a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub id: u64,
    pub line: String,
}

/// Read access to a built index.
#[derive(Debug)]
pub struct SampleIndex {
    store: RecordStore,
}

impl SampleIndex {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(RecordStore::open_existing(path)?))
    }

    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Sampled line ids for `phrase`, ascending.
    pub fn samples(&self, phrase: &str) -> Result<Option<Vec<u64>>> {
        let key = normalize_query(phrase);
        let Some(value) = self.store.get(&key)? else {
            return Ok(None);
        };
        parse_samples(&value).map(Some).ok_or_else(|| {
            Error::Corrupt(format!("malformed sample list for '{key}'"))
        })
    }

    /// The stored raw line for `id`.
    pub fn line(&self, id: u64) -> Result<Option<String>> {
        self.store.get(&line_key(id))
    }

    /// Up to `limit` example lines for `phrase`, in id order.
    ///
    /// Sampled ids whose line record is missing are skipped.
    pub fn examples(&self, phrase: &str, limit: usize) -> Result<Vec<Example>> {
        let ids = self.samples(phrase)?.ok_or_else(|| Error::NotFound {
            kind: "phrase",
            name: phrase.to_string(),
        })?;

        let mut examples = Vec::with_capacity(ids.len().min(limit));
        for id in ids {
            if examples.len() >= limit {
                break;
            }
            if let Some(line) = self.line(id)? {
                examples.push(Example { id, line });
            }
        }
        Ok(examples)
    }
}

/// Case-fold a query and collapse its whitespace to single spaces.
pub fn normalize_query(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
