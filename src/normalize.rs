//! Sentence canonicalization shared by deduplication and phrase extraction.
//!
//! Only the first tab-separated field of a record is ever normalized. The
//! raw line is stored untouched; the normalized text exists only for
//! hashing and tokenizing.

/// Typographic quotation marks folded into a plain `"`.
const TYPOGRAPHIC_QUOTES: [char; 4] =
    ['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// Sentence-final punctuation ignored by the dedup fingerprint.
const SENTENCE_TERMINALS: &[char] =
    &['.', '!', '?', '\u{3002}', '\u{FF01}', '\u{FF1F}', '\u{2026}'];

/// Whether `c` can carry a phrase on its own.
pub fn is_alnum(c: char) -> bool {
    c.is_alphanumeric()
}

/// Whether `c` belongs to a word body. Hyphens and underscores join words.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_quote_neighbor(c: char) -> bool {
    c.is_alphanumeric() || c == '-'
}

/// Return the sentence field of a record: the first tab-separated field,
/// trimmed.
pub fn first_field(line: &str) -> &str {
    line.split('\t').next().unwrap_or_default().trim()
}

/// Lowercase the sentence, fold curly quotes into `"`, and split quotes
/// that would otherwise fuse two words.
///
/// # Examples
///
/// ```
/// use paraindex::normalize::normalize;
///
/// assert_eq!(normalize("He said \u{201C}Hi\u{201D}"), "he said \"hi\"");
/// assert_eq!(normalize("rock\"n\"roll"), "rock\" n\" roll");
/// ```
pub fn normalize(sentence: &str) -> String {
    let folded: Vec<char> = sentence
        .to_lowercase()
        .chars()
        .map(|c| if TYPOGRAPHIC_QUOTES.contains(&c) { '"' } else { c })
        .collect();

    let mut out = String::with_capacity(folded.len() + 4);
    for (i, &c) in folded.iter().enumerate() {
        out.push(c);
        if c == '"'
            && i > 0
            && i + 1 < folded.len()
            && is_quote_neighbor(folded[i - 1])
            && is_quote_neighbor(folded[i + 1])
        {
            out.push(' ');
        }
    }
    out
}

/// The slice of normalized text that identifies a sentence for dedup.
///
/// Trailing sentence-final punctuation is dropped so that `the cat sat.`
/// and `the cat sat` are the same sentence. A sentence made only of
/// terminals keeps them.
pub fn dedup_key(normalized: &str) -> &str {
    let trimmed = normalized.trim();
    let key = trimmed.trim_end_matches(SENTENCE_TERMINALS).trim_end();
    if key.is_empty() { trimmed } else { key }
}
