//! Disclaimer stripping for pasted assessment text, plus the Gemini glue around it.

pub mod config;
pub mod disclaimer;
pub mod gemini;
pub mod server;
pub mod stripper;
pub mod tokenize;

pub use stripper::{normalize, strip, PhraseStripper, StripError};
