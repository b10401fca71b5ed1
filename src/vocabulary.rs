use std::{
    collections::HashSet,
    io::BufRead,
    path::Path,
    time::Instant,
};

use crate::{error::Result, tokenizer::Tokenizer};

/// Tokenizer settings applied to both keyword entries and candidate
/// phrases before they are compared.
pub const MATCH_LANGUAGE: &str = "en";
pub const MATCH_LOWERCASE: bool = true;
pub const MATCH_STEM: bool = false;

const PROGRESS_INTERVAL: usize = 10_000;

/// Allow-list of keyword phrases.
///
/// Each entry is kept both case-folded and in its tokenizer-normalized
/// form. An empty vocabulary accepts every phrase.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    keywords: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a keyword file with one phrase per line. Blank lines are
    /// skipped.
    pub fn load(path: &Path, tokenizer: &dyn Tokenizer) -> Result<Self> {
        let start = Instant::now();
        tracing::info!(path = %path.display(), "reading keywords");

        let file = std::fs::File::open(path)?;
        let vocabulary =
            Self::from_reader(std::io::BufReader::new(file), tokenizer)?;

        tracing::info!(
            keywords = vocabulary.len(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "reading keywords done"
        );
        Ok(vocabulary)
    }

    pub fn from_reader(
        reader: impl BufRead,
        tokenizer: &dyn Tokenizer,
    ) -> Result<Self> {
        let mut vocabulary = Self::new();
        let mut num_lines = 0usize;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            vocabulary.insert(&line, tokenizer);
            num_lines += 1;
            if num_lines % PROGRESS_INTERVAL == 0 {
                tracing::info!(lines = num_lines, "reading keywords");
            }
        }
        Ok(vocabulary)
    }

    /// Add a keyword in its case-folded and tokenizer-normalized forms.
    pub fn insert(&mut self, keyword: &str, tokenizer: &dyn Tokenizer) {
        let folded = keyword.trim().to_lowercase();
        if folded.is_empty() {
            return;
        }
        let normalized = tokenizer.normalize_phrase(
            MATCH_LANGUAGE,
            &folded,
            MATCH_LOWERCASE,
            MATCH_STEM,
        );
        self.keywords.insert(folded);
        if !normalized.is_empty() {
            self.keywords.insert(normalized);
        }
    }

    /// Whether `phrase` passes the allow-list, either verbatim or after
    /// tokenizer normalization.
    pub fn accepts(&self, phrase: &str, tokenizer: &dyn Tokenizer) -> bool {
        if self.keywords.is_empty() || self.keywords.contains(phrase) {
            return true;
        }
        let normalized = tokenizer.normalize_phrase(
            MATCH_LANGUAGE,
            phrase,
            MATCH_LOWERCASE,
            MATCH_STEM,
        );
        self.keywords.contains(&normalized)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
