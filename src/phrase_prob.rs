//! Phrase probability estimation by interpolated n-gram backoff.
//!
//! Used only to choose which candidates survive when a sentence yields
//! more than `max_words` of them. Rarer phrases are kept first.

use std::collections::HashMap;

use crate::error::Result;

/// Floor for every estimate.
pub const BASE_PROB: f64 = 1e-9;

/// Penalty multiplied in each time an n-gram order misses.
const FALLBACK_DECAY: f64 = 0.1;

/// Per-token decay applied when a phrase is scored from shorter n-grams.
const LENGTH_DECAY: f64 = 0.3;

/// Highest n-gram order consulted.
const MAX_ORDER: usize = 3;

/// Read-only n-gram frequency table.
pub trait PhraseFrequency {
    /// Look up the relative frequency of a space-joined n-gram.
    fn lookup(&self, ngram: &str) -> Result<Option<f64>>;
}

impl PhraseFrequency for HashMap<String, f64> {
    fn lookup(&self, ngram: &str) -> Result<Option<f64>> {
        Ok(self.get(ngram).copied())
    }
}

pub struct PhraseProbabilityModel {
    table: Box<dyn PhraseFrequency>,
}

impl PhraseProbabilityModel {
    pub fn new(table: Box<dyn PhraseFrequency>) -> Self {
        Self { table }
    }

    /// Estimated corpus probability of `phrase`, never below
    /// [`BASE_PROB`].
    ///
    /// Orders are tried from `min(3, len)` down to 1. A phrase no longer
    /// than the order is looked up whole. A longer phrase is covered by
    /// sliding windows of the order; if all windows are known their
    /// harmonic mean is scaled by `0.3^(len - order)` and by the penalty
    /// accumulated from the orders that missed.
    pub fn estimate(&self, phrase: &str) -> Result<f64> {
        let tokens: Vec<&str> = phrase.split(' ').collect();
        let max_order = MAX_ORDER.min(tokens.len());
        let mut fallback_penalty = 1.0;

        for order in (1..=max_order).rev() {
            if tokens.len() <= order {
                if let Some(prob) = self.probability(phrase)? {
                    return Ok(prob.max(BASE_PROB));
                }
            } else if let Some(probs) = self.window_probabilities(&tokens, order)?
            {
                let inv_sum: f64 = probs.iter().map(|p| 1.0 / p).sum();
                let harmonic_mean = probs.len() as f64 / inv_sum;
                let gap = (tokens.len() - order) as i32;
                let prob =
                    harmonic_mean * LENGTH_DECAY.powi(gap) * fallback_penalty;
                return Ok(prob.max(BASE_PROB));
            }
            fallback_penalty *= FALLBACK_DECAY;
        }

        Ok(BASE_PROB)
    }

    /// Order `phrases` rarest first and keep at most `max_words`.
    ///
    /// The sort is stable, so equally probable phrases keep extraction
    /// order.
    pub fn prune(
        &self,
        phrases: Vec<String>,
        max_words: usize,
    ) -> Result<Vec<String>> {
        let mut scored = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let prob = self.estimate(&phrase)?;
            scored.push((phrase, prob));
        }
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(scored
            .into_iter()
            .take(max_words)
            .map(|(phrase, _)| phrase)
            .collect())
    }

    /// Zero, negative and non-finite entries count as misses.
    fn probability(&self, ngram: &str) -> Result<Option<f64>> {
        Ok(self
            .table
            .lookup(ngram)?
            .filter(|p| p.is_finite() && *p > 0.0))
    }

    /// Probabilities of every window of `order` tokens, or `None` if any
    /// window is missing.
    fn window_probabilities(
        &self,
        tokens: &[&str],
        order: usize,
    ) -> Result<Option<Vec<f64>>> {
        let mut probs = Vec::with_capacity(tokens.len() + 1 - order);
        for window in tokens.windows(order) {
            match self.probability(&window.join(" "))? {
                Some(prob) => probs.push(prob),
                None => return Ok(None),
            }
        }
        Ok(Some(probs))
    }
}

impl std::fmt::Debug for PhraseProbabilityModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseProbabilityModel").finish_non_exhaustive()
    }
}

/// Reduce a sentence's candidates to at most `max_words`.
///
/// Pruning by probability happens only when there are more candidates
/// than the cap and a model is available. Otherwise candidates keep
/// extraction order.
pub fn select_candidates(
    phrases: Vec<String>,
    max_words: usize,
    model: Option<&PhraseProbabilityModel>,
) -> Result<Vec<String>> {
    match model {
        Some(model) if phrases.len() > max_words => {
            model.prune(phrases, max_words)
        }
        _ => Ok(phrases.into_iter().take(max_words).collect()),
    }
}
