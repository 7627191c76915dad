//! Language packs and heuristic language detection.
//!
//! A [`LanguagePack`] bundles one language's system prompt and its
//! localized message templates (with `{placeholder}` substitution);
//! [`Packs`] is the read-only registry of supported languages. The
//! [`detect`] function is a pure keyword heuristic that either names a
//! language with confidence or reports no match; it never guesses.

mod detect;
mod pack;

pub use detect::{detect, MIN_TEXT_LEN, SCORE_FLOOR};
pub use pack::{LanguagePack, Packs, DEFAULT_LANGUAGE};
