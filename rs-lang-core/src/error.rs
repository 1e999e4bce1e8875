//! Error types for corpus loading and identification.

use thiserror::Error;

use crate::language::Language;

/// A language profile could not be built.
///
/// Stored once per language and handed back on every later lookup, so the
/// payloads are plain strings rather than the original I/O errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
	/// The reference corpus could not be read.
	#[error("corpus for {language} unavailable: {reason}")]
	Unavailable { language: Language, reason: String },

	/// Tokenizing or counting the corpus failed.
	#[error("failed to build {language} profile: {reason}")]
	Build { language: Language, reason: String },
}

impl CorpusError {
	/// Language the error belongs to.
	pub fn language(&self) -> Language {
		match self {
			CorpusError::Unavailable { language, .. } | CorpusError::Build { language, .. } => *language,
		}
	}
}

/// Identification request failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifyError {
	/// Every corpus failed to build, nothing can be scored.
	#[error("language undetermined: no language profile available")]
	NoLanguagesAvailable,
}
