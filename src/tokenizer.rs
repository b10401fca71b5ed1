//! Tokenizer capability used to normalize vocabulary entries.
//!
//! The indexer treats tokenization as a black box behind [`Tokenizer`].
//! [`SimpleTokenizer`] is the built-in implementation: whitespace and
//! punctuation splitting plus a light English suffix stemmer.

use crate::normalize::is_word_char;

pub trait Tokenizer {
    /// Split `text` into tokens for `language`.
    fn tokenize(
        &self,
        language: &str,
        text: &str,
        lowercase: bool,
        stem: bool,
    ) -> Vec<String>;

    /// Tokenize and rejoin with single spaces.
    fn normalize_phrase(
        &self,
        language: &str,
        text: &str,
        lowercase: bool,
        stem: bool,
    ) -> String {
        self.tokenize(language, text, lowercase, stem).join(" ")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(
        &self,
        language: &str,
        text: &str,
        lowercase: bool,
        stem: bool,
    ) -> Vec<String> {
        let mut raw = Vec::new();
        for word in text.split_whitespace() {
            let mut current = String::new();
            for c in word.chars() {
                if is_word_char(c) {
                    current.push(c);
                } else {
                    if !current.is_empty() {
                        raw.push(std::mem::take(&mut current));
                    }
                    raw.push(c.to_string());
                }
            }
            if !current.is_empty() {
                raw.push(current);
            }
        }

        raw.into_iter()
            .map(|token| {
                let token = if lowercase {
                    token.to_lowercase()
                } else {
                    token
                };
                if stem && language == "en" {
                    stem_en(&token)
                } else {
                    token
                }
            })
            .collect()
    }
}

/// Strip common English inflections. Words of three letters or fewer and
/// anything not purely alphabetic pass through.
fn stem_en(word: &str) -> String {
    if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
        return word.to_string();
    }

    if let Some(base) = word.strip_suffix("ies") {
        return format!("{base}y");
    }
    if let Some(base) = word.strip_suffix("sses") {
        return format!("{base}ss");
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(base) = word.strip_suffix("es")
        && ["s", "x", "z", "ch", "sh"].iter().any(|s| base.ends_with(s))
    {
        return base.to_string();
    }
    if let Some(base) = word.strip_suffix('s') {
        return base.to_string();
    }
    for suffix in ["ing", "ed"] {
        if let Some(base) = word.strip_suffix(suffix)
            && base.chars().count() >= 3
        {
            return base.to_string();
        }
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_punctuation_out() {
        let tokens = SimpleTokenizer.tokenize("en", "Hello, world!", false, false);
        assert_eq!(tokens, vec!["Hello", ",", "world", "!"]);
    }

    #[test]
    fn keeps_hyphenated_words_whole() {
        let tokens =
            SimpleTokenizer.tokenize("en", "state-of-the-art tools", true, false);
        assert_eq!(tokens, vec!["state-of-the-art", "tools"]);
    }

    #[test]
    fn lowercases_on_request() {
        let tokens = SimpleTokenizer.tokenize("en", "The CAT", true, false);
        assert_eq!(tokens, vec!["the", "cat"]);
    }

    #[test]
    fn stems_english_only() {
        let tokens =
            SimpleTokenizer.tokenize("en", "cats boxes stories walked", true, true);
        assert_eq!(tokens, vec!["cat", "box", "story", "walk"]);

        let tokens = SimpleTokenizer.tokenize("ja", "cats", true, true);
        assert_eq!(tokens, vec!["cats"]);
    }

    #[test]
    fn stemmer_leaves_short_and_irregular_words() {
        assert_eq!(stem_en("is"), "is");
        assert_eq!(stem_en("glass"), "glass");
        assert_eq!(stem_en("status"), "status");
        assert_eq!(stem_en("sing"), "sing");
        assert_eq!(stem_en("x-ray"), "x-ray");
    }

    #[test]
    fn normalize_phrase_rejoins() {
        assert_eq!(
            SimpleTokenizer.normalize_phrase("en", "Cat  Sat", true, false),
            "cat sat"
        );
    }
}
