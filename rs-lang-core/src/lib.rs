//! N-gram-based language identification library.
//!
//! This crate provides a word n-gram overlap scorer including:
//! - Unicode word tokenization with digit stripping
//! - Per-language bigram/trigram frequency profiles, built once and shared
//! - Concurrent per-language scoring on a bounded worker pool
//! - Internal utilities for I/O and path handling
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Closed set of supported languages.
pub mod language;

/// Error types for corpus loading and identification.
pub mod error;

/// Core n-gram models and identification logic.
///
/// This module exposes the identifier interface along with the
/// tokenizer, extractor and scorer building blocks.
pub mod model;

/// I/O utilities (file loading, path helpers).
pub mod io;

pub use error::{CorpusError, IdentifyError};
pub use language::Language;
pub use model::config::IdentifierConfig;
pub use model::identifier::Identifier;
