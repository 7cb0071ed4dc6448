//! Component D: the tokeniser. Lower-cases, strips non-alphanumerics, and
//! splits on whitespace runs, preserving order and duplicates.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Tokenises `s` into an ordered sequence of lower-case alphanumeric runs.
pub fn tokenize(s: &str) -> Vec<String> {
    NON_ALNUM
        .replace_all(s, " ")
        .split_whitespace()
        .map(|w| w.to_ascii_lowercase())
        .collect()
}
