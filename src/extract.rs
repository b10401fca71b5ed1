//! Candidate phrase extraction.
//!
//! A sentence is split on single spaces. From every start position a
//! window grows up to `max_ngram` tokens. Each token is reduced to its core
//! by stripping leading and trailing symbol runs, and the symbols decide
//! where a window must stop:
//!
//! - a token with no alphanumeric character ends the window before it;
//! - a token with a leading symbol ends the window before it, unless it is
//!   the first token of the window;
//! - a token with a trailing symbol ends the window after it.
//!
//! Every prefix of a window is a candidate, subject to the vocabulary.

use std::collections::HashSet;

use crate::{
    normalize::{is_alnum, is_word_char},
    tokenizer::Tokenizer,
    vocabulary::Vocabulary,
};

/// A word with its symbol runs stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreToken<'a> {
    pub core: &'a str,
    pub head_symbol: bool,
    pub tail_symbol: bool,
}

impl<'a> CoreToken<'a> {
    pub fn parse(word: &'a str) -> Self {
        let body = word.trim_start_matches(|c: char| !is_word_char(c));
        let core = body.trim_end_matches(|c: char| !is_word_char(c));
        Self {
            core,
            head_symbol: body.len() != word.len(),
            tail_symbol: core.len() != body.len(),
        }
    }

    fn has_alnum(&self) -> bool {
        self.core.chars().any(is_alnum)
    }
}

/// Candidates found in one sentence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Unique phrases in first-seen order.
    pub phrases: Vec<String>,
    /// Core tokens examined across all windows.
    pub words: usize,
}

pub struct PhraseExtractor {
    max_ngram: usize,
    vocabulary: Vocabulary,
    tokenizer: Box<dyn Tokenizer>,
}

impl PhraseExtractor {
    pub fn new(
        max_ngram: usize,
        vocabulary: Vocabulary,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Self {
        Self {
            max_ngram,
            vocabulary,
            tokenizer,
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Extract the candidate phrases of a normalized sentence.
    pub fn extract(&self, normalized: &str) -> Extraction {
        let words: Vec<&str> = normalized.split(' ').collect();
        let mut extraction = Extraction::default();
        let mut seen = HashSet::new();

        for start in 0..words.len() {
            let end = start.saturating_add(self.max_ngram).min(words.len());
            let mut window: Vec<&str> = Vec::with_capacity(end - start);

            for (index, word) in words.iter().enumerate().take(end).skip(start) {
                let token = CoreToken::parse(word);
                if !token.has_alnum() {
                    break;
                }
                extraction.words += 1;
                if token.head_symbol && index > start {
                    break;
                }

                window.push(token.core);
                let phrase = window.join(" ");
                if !seen.contains(&phrase)
                    && self.vocabulary.accepts(&phrase, self.tokenizer.as_ref())
                {
                    seen.insert(phrase.clone());
                    extraction.phrases.push(phrase);
                }

                if token.tail_symbol {
                    break;
                }
            }
        }

        extraction
    }
}

impl std::fmt::Debug for PhraseExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhraseExtractor")
            .field("max_ngram", &self.max_ngram)
            .field("vocabulary", &self.vocabulary.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::SimpleTokenizer;

    fn extractor(max_ngram: usize) -> PhraseExtractor {
        PhraseExtractor::new(
            max_ngram,
            Vocabulary::new(),
            Box::new(SimpleTokenizer),
        )
    }

    fn phrases(extractor: &PhraseExtractor, text: &str) -> Vec<String> {
        extractor.extract(text).phrases
    }

    #[test]
    fn core_token_strips_symbols() {
        let token = CoreToken::parse("(hello)");
        assert_eq!(token.core, "hello");
        assert!(token.head_symbol);
        assert!(token.tail_symbol);

        let token = CoreToken::parse("well-known");
        assert_eq!(token.core, "well-known");
        assert!(!token.head_symbol);
        assert!(!token.tail_symbol);

        let token = CoreToken::parse("\"quoted");
        assert_eq!(token.core, "quoted");
        assert!(token.head_symbol);
        assert!(!token.tail_symbol);
    }

    #[test]
    fn all_prefixes_up_to_max_ngram() {
        let e = extractor(2);
        assert_eq!(
            phrases(&e, "the cat sat"),
            vec!["the", "the cat", "cat", "cat sat", "sat"]
        );

        let e = extractor(3);
        assert_eq!(
            phrases(&e, "the cat sat"),
            vec!["the", "the cat", "the cat sat", "cat", "cat sat", "sat"]
        );
    }

    #[test]
    fn window_is_bounded_by_sentence_length() {
        let e = extractor(usize::MAX);
        assert_eq!(
            phrases(&e, "the cat sat"),
            vec!["the", "the cat", "the cat sat", "cat", "cat sat", "sat"]
        );
    }

    #[test]
    fn tail_symbol_closes_window() {
        let e = extractor(3);
        assert_eq!(phrases(&e, "(hello) world"), vec!["hello", "world"]);
        assert_eq!(
            phrases(&e, "yes, we can"),
            vec!["yes", "we", "we can", "can"]
        );
    }

    #[test]
    fn head_symbol_splits_window() {
        let e = extractor(3);
        assert_eq!(
            phrases(&e, "he said \"hi there\""),
            vec![
                "he",
                "he said",
                "said",
                "hi",
                "hi there",
                "there",
            ]
        );
    }

    #[test]
    fn symbol_only_token_is_a_boundary() {
        let e = extractor(3);
        assert_eq!(phrases(&e, "a - b"), vec!["a", "b"]);
        assert_eq!(phrases(&e, "x -- y"), vec!["x", "y"]);
    }

    #[test]
    fn double_space_is_a_boundary() {
        let e = extractor(3);
        assert_eq!(phrases(&e, "big  dog"), vec!["big", "dog"]);
    }

    #[test]
    fn duplicates_within_sentence_count_once() {
        let e = extractor(2);
        assert_eq!(
            phrases(&e, "the cat and the cat"),
            vec!["the", "the cat", "cat", "cat and", "and", "and the"]
        );
    }

    #[test]
    fn empty_and_symbolic_sentences_yield_nothing() {
        let e = extractor(3);
        assert!(phrases(&e, "").is_empty());
        assert!(phrases(&e, "... !!! ???").is_empty());
    }

    #[test]
    fn vocabulary_restricts_candidates() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.insert("cat sat", &SimpleTokenizer);
        let e = PhraseExtractor::new(3, vocabulary, Box::new(SimpleTokenizer));
        assert_eq!(phrases(&e, "the cat sat"), vec!["cat sat"]);
    }

    #[test]
    fn counts_examined_words() {
        let e = extractor(2);
        // Windows: [the, cat], [cat, sat], [sat].
        assert_eq!(e.extract("the cat sat").words, 5);
    }
}
