//! Job-description tokenizer.
//!
//! Tokens are maximal runs of word characters (Unicode alphanumerics and `_`),
//! taken from the lowercased input. No stop words, no stemming, no dedup:
//! a keyword repeated in the JD carries proportionally more weight.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

/// Splits `text` into lowercase word tokens, preserving order and duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
