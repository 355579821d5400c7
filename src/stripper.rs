//! Fuzzy phrase removal plus whitespace normalization.
//!
//! A phrase is reduced to its word tokens and matched as that token sequence,
//! allowing any run of whitespace or punctuation between adjacent tokens.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::tokenize::{self, is_word_char, NON_WORD_CLASS};

#[derive(Error, Debug)]
pub enum StripError {
    #[error("failed to compile phrase pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Lines made only of punctuation, underscores or whitespace.
fn re_husk_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[^\p{L}\p{N}]+$").unwrap())
}

/// Three or more newlines in a row.
fn re_blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Compiled matcher for one phrase. `None` when the phrase has no word tokens.
///
/// Word boundaries at both ends are checked against [`is_word_char`] in
/// [`PhraseStripper::strip`]; the regex crate's `\b` disagrees on numerics like `½`.
#[derive(Debug, Clone)]
pub struct PhraseStripper {
    pattern: Option<Regex>,
}

impl PhraseStripper {
    /// Compile the fuzzy matcher for `phrase`.
    pub fn new(phrase: &str) -> Result<Self, StripError> {
        let escaped: Vec<String> = tokenize::words(phrase)
            .into_iter()
            .map(regex::escape)
            .collect();
        if escaped.is_empty() {
            return Ok(Self { pattern: None });
        }
        let separator = format!("{NON_WORD_CLASS}+?");
        let pattern = format!("(?i){}", escaped.join(&separator));
        tracing::trace!(tokens = escaped.len(), "compiled phrase pattern");
        Ok(Self {
            pattern: Some(Regex::new(&pattern)?),
        })
    }

    /// True when the phrase produced no tokens and `strip` is a no-op.
    pub fn is_noop(&self) -> bool {
        self.pattern.is_none()
    }

    /// Remove every occurrence of the phrase, then normalize what is left.
    pub fn strip(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        normalize(&remove_bounded(pattern, text))
    }
}

/// True when neither neighbour of `text[start..end]` is a word character.
fn on_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Delete every match that sits on word boundaries, scanning left to right.
/// A rejected candidate resumes the scan one character past its start.
fn remove_bounded(pattern: &Regex, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut kept_from = 0;
    let mut pos = 0;
    while let Some(m) = pattern.find_at(text, pos) {
        if on_word_boundaries(text, m.start(), m.end()) {
            out.push_str(&text[kept_from..m.start()]);
            kept_from = m.end();
            pos = m.end();
        } else {
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }
    out.push_str(&text[kept_from..]);
    out
}

/// Python-style whitespace: Unicode whitespace plus the \x1c..\x1f separators.
fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Blank out husk lines, collapse runs of blank lines to one, and trim.
pub fn normalize(text: &str) -> String {
    let dehusked = re_husk_line().replace_all(text, "");
    let collapsed = re_blank_run().replace_all(&dehusked, "\n\n");
    collapsed.trim_matches(is_trimmable).to_string()
}

/// Remove all fuzzy occurrences of `phrase` from `text`.
pub fn strip(text: &str, phrase: &str) -> Result<String, StripError> {
    Ok(PhraseStripper::new(phrase)?.strip(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disclaimer::DISCLAIMER;

    fn run(text: &str, phrase: &str) -> String {
        strip(text, phrase).unwrap()
    }

    #[test]
    fn removes_with_punctuation_separators() {
        assert_eq!(run("AI---assistant", "AI assistant"), "");
        assert_eq!(
            run(r#"You are a **helpful**  "AI" assistant."#, "You are a helpful AI assistant."),
            ""
        );
    }

    #[test]
    fn removes_across_line_break() {
        assert_eq!(run("protected\nassessment", "protected assessment"), "");
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(run("ai ASSISTANT", "AI assistant"), "");
    }

    #[test]
    fn requires_word_boundaries() {
        assert_eq!(run("AIassistant", "AI assistant"), "AIassistant");
        assert_eq!(run("AI_assistant", "AI assistant"), "AI_assistant");
        assert_eq!(run("xAI assistant", "AI assistant"), "xAI assistant");
        assert_eq!(run("AI assistants", "AI assistant"), "AI assistants");
    }

    #[test]
    fn incomplete_sequence_is_kept() {
        assert_eq!(
            run("The AI assistant is here.", "AI assistant is disabled"),
            "The AI assistant is here."
        );
    }

    #[test]
    fn removes_every_occurrence() {
        assert_eq!(
            run("AI assistant, AI assistant. Hello", "AI assistant"),
            ", . Hello"
        );
    }

    #[test]
    fn empty_phrase_returns_text_unchanged() {
        let text = "  keep \n\n\n\n me  ";
        assert_eq!(run(text, ""), text);
        assert_eq!(run(text, " -- ** ... "), text);
        assert!(PhraseStripper::new("").unwrap().is_noop());
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(run("", DISCLAIMER), "");
    }

    #[test]
    fn strips_full_disclaimer_before_question() {
        let text = format!("{DISCLAIMER}\n\nWhat is 2+2?");
        assert_eq!(run(&text, DISCLAIMER), "What is 2+2?");
    }

    #[test]
    fn strips_disclaimer_with_mangled_spacing() {
        let mangled = DISCLAIMER.replace(". ", ".   \n").replace(", ", " ,  ");
        let text = format!("Question 1\n\n{mangled}\n\nWhat is 2+2?");
        assert_eq!(run(&text, DISCLAIMER), "Question 1\n\nWhat is 2+2?");
    }

    #[test]
    fn text_without_phrase_is_only_normalized() {
        let text = "Intro\n\n\n\n\nBody\n---\nEnd  ";
        assert_eq!(normalize(text), "Intro\n\nBody\n\nEnd");
        assert_eq!(run(text, DISCLAIMER), normalize(text));
    }

    #[test]
    fn blank_and_whitespace_lines_collapse() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n \n\t\n \nb"), "a\n\nb");
        assert_eq!(normalize("\n\n  hello  \n\n"), "hello");
    }

    #[test]
    fn output_is_stable_under_reapplication() {
        let samples = [
            format!("{DISCLAIMER}\n\nWhat is 2+2?"),
            "Intro\n\n\n\n\nBody\n---\nEnd  ".to_string(),
            "AI assistant, AI assistant. Hello".to_string(),
            String::new(),
        ];
        for text in &samples {
            let once = run(text, DISCLAIMER);
            assert_eq!(run(&once, DISCLAIMER), once);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn numeric_only_lines_are_kept() {
        let text = "Which fraction is larger?\n½\n¾";
        assert_eq!(normalize(text), text);
        assert_eq!(run(text, DISCLAIMER), text);
        assert_eq!(normalize("x\n²"), "x\n²");
    }

    #[test]
    fn numeric_tokens_are_matched_on_boundaries() {
        assert_eq!(run("½ cup", "½"), "cup");
        assert_eq!(run("x½ cup", "½"), "x½ cup");
        assert_eq!(run("AI²assistant", "AI assistant"), "AI²assistant");
    }

    #[test]
    fn rejected_candidate_does_not_hide_later_match() {
        assert_eq!(
            run("AI assistantship, AI assistant.", "AI assistant"),
            "AI assistantship, ."
        );
    }

    #[test]
    fn trims_information_separators() {
        assert_eq!(normalize("\u{1c}2\u{1f}"), "2");
        assert_eq!(normalize(" \u{1d}What is 2+2?\n\u{1e}"), "What is 2+2?");
    }

    #[test]
    fn phrase_punctuation_never_reaches_pattern() {
        // Only the tokens `a` and `b` survive.
        assert_eq!(run("a.b", "(a)+[b]"), "");
        assert_eq!(run("aab", "(a)+[b]"), "aab");
    }
}
