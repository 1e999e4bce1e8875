//! Top-level module for the language identification system.
//!
//! This module provides an n-gram overlap identifier, including:
//! - Text normalization (`Tokenizer`, `WordTokenizer`)
//! - N-gram extraction (`NGram`, `extract`)
//! - Per-order occurrence counts (`NGramMultiset`)
//! - Per-language profiles built once from reference corpora (`LanguageProfile`)
//! - Overlap scoring (`score`, `ScoreBoard`)
//! - A high-level identification interface (`Identifier`)

/// High-level interface identifying the language of a text.
///
/// Owns the memoized profiles and dispatches concurrent scoring.
pub mod identifier;

/// Identifier settings (worker pool size, on-disk caching).
pub mod config;

/// Corpus sources: a folder of `.dat` files or in-memory text.
pub mod corpus;

/// Tokenizer contract and the default Unicode word tokenizer.
pub mod tokenizer;

/// N-gram type and extraction.
pub mod ngram;

/// Occurrence counts of the n-grams of one order.
pub mod multiset;

/// Bigram/trigram profile of one language.
///
/// Supports parallel construction and `postcard` persistence.
pub mod profile;

/// Overlap score and per-request score board.
pub mod scorer;

/// Build-once profile storage.
/// This module is not exposed publicly.
mod store;

/// Bounded worker pool with a single join barrier.
mod pool;
