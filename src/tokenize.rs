//! Phrase to word tokens: maximal runs of word characters, punctuation dropped.
//!
//! A word character is any letter, any numeric character (including `½`, `²`)
//! or `_`. The regex crate's `\w` leaves out the non-decimal numerics, so the
//! class is spelled out.

use std::sync::OnceLock;

use regex::Regex;

/// Letters, numerics and underscore.
pub const WORD_CLASS: &str = r"[\p{L}\p{N}_]";
/// Anything that is not a word character.
pub const NON_WORD_CLASS: &str = r"[^\p{L}\p{N}_]";

fn re_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("{WORD_CLASS}+")).unwrap())
}

fn re_word_char() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{WORD_CLASS}$")).unwrap())
}

/// Split text into word tokens, keeping order and original case.
pub fn words(text: &str) -> Vec<&str> {
    re_word().find_iter(text).map(|m| m.as_str()).collect()
}

pub fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    re_word_char().is_match(c.encode_utf8(&mut buf))
}
