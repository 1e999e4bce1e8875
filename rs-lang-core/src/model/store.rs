use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use log::{info, warn};

use super::config::IdentifierConfig;
use super::corpus::CorpusSource;
use super::pool;
use super::profile::LanguageProfile;
use super::tokenizer::Tokenizer;
use crate::error::CorpusError;
use crate::language::Language;

type Slot = OnceLock<Result<Arc<LanguageProfile>, CorpusError>>;

/// Build-once storage of the language profiles.
///
/// # Responsibilities
/// - Build each language's profile at most once per process, on first use
/// - Hand out shared immutable references (`Arc`) to built profiles
/// - Remember failed builds so an unavailable corpus is read (and reported)
///   only once
///
/// # Invariants
/// - A slot, once set, never changes
/// - Concurrent first lookups of the same language wait for a single build
pub(crate) struct ProfileStore {
	source: Arc<dyn CorpusSource>,
	tokenizer: Arc<dyn Tokenizer>,
	config: IdentifierConfig,
	slots: [Slot; Language::COUNT],
}

impl ProfileStore {
	pub(crate) fn new(source: Arc<dyn CorpusSource>, tokenizer: Arc<dyn Tokenizer>, config: IdentifierConfig) -> Self {
		Self { source, tokenizer, config, slots: std::array::from_fn(|_| OnceLock::new()) }
	}

	pub(crate) fn config(&self) -> &IdentifierConfig {
		&self.config
	}

	pub(crate) fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
		&self.tokenizer
	}

	/// Returns the profile of `language`, building it on first call.
	///
	/// A panic while loading (from the corpus source, for instance) fills
	/// the slot with a `CorpusError::Build` instead of unwinding to the caller.
	pub(crate) fn get(&self, language: Language) -> Result<Arc<LanguageProfile>, CorpusError> {
		self.slots[language.index()]
			.get_or_init(|| {
				panic::catch_unwind(AssertUnwindSafe(|| self.load(language))).unwrap_or_else(|_| {
					let error = CorpusError::Build { language, reason: "corpus loading panicked".to_owned() };
					warn!("{error}, excluding {language}");
					Err(error)
				})
			})
			.clone()
	}

	/// Returns the profiles of every language, in declaration order.
	///
	/// Languages not built yet are built concurrently, one pool job each.
	pub(crate) fn get_all(self: &Arc<Self>) -> Vec<Result<Arc<LanguageProfile>, CorpusError>> {
		let pending: Vec<Language> = Language::ALL
			.into_iter()
			.filter(|language| self.slots[language.index()].get().is_none())
			.collect();

		if !pending.is_empty() {
			let store = Arc::clone(self);
			pool::execute(pending, self.config.pool_size(), move |language: Language| {
				// Only the side effect of filling the slot matters here
				let _ = store.get(language);
			});
		}

		Language::ALL.into_iter().map(|language| self.get(language)).collect()
	}

	/// Loads the cached profile if there is a usable one, builds it otherwise.
	fn load(&self, language: Language) -> Result<Arc<LanguageProfile>, CorpusError> {
		let cache_path = if self.config.cache_indexes { self.source.cache_path(language) } else { None };

		if let Some(path) = cache_path.as_ref().filter(|path| path.exists()) {
			match LanguageProfile::load(path) {
				Ok(profile) if profile.language() == language => {
					info!("Loaded {} profile from {}", language, path.display());
					return Ok(Arc::new(profile));
				}
				Ok(profile) => warn!(
					"Cache {} holds a {} profile, rebuilding {}",
					path.display(),
					profile.language(),
					language
				),
				Err(e) => warn!("Unreadable cache {}: {e}, rebuilding", path.display()),
			}
		}

		let lines = self.source.read(language).map_err(|e| {
			let error = CorpusError::Unavailable { language, reason: e.to_string() };
			warn!("{error}, excluding {language}");
			error
		})?;

		let profile = LanguageProfile::build(language, lines, Arc::clone(&self.tokenizer), self.config.pool_size())
			.inspect_err(|error| warn!("{error}, excluding {language}"))?;

		if let Some(path) = cache_path {
			if let Err(e) = profile.save(&path) {
				warn!("Failed to cache {} profile to {}: {e}", language, path.display());
			}
		}

		Ok(Arc::new(profile))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::corpus::MemorySource;
	use crate::model::tokenizer::WordTokenizer;
	use std::io;

	fn store(source: MemorySource) -> Arc<ProfileStore> {
		Arc::new(ProfileStore::new(
			Arc::new(source),
			Arc::new(WordTokenizer),
			IdentifierConfig::default().with_workers(2),
		))
	}

	#[test]
	fn profile_is_built_once_and_shared() {
		let store = store(MemorySource::new().with(Language::English, "the cat sat"));
		let first = store.get(Language::English).unwrap();
		let second = store.get(Language::English).unwrap();
		assert!(Arc::ptr_eq(&first, &second));
	}

	#[test]
	fn missing_corpus_is_remembered() {
		let store = store(MemorySource::new().with(Language::English, "the cat sat"));
		let error = store.get(Language::Dutch).unwrap_err();
		assert_eq!(error.language(), Language::Dutch);
		assert!(matches!(error, CorpusError::Unavailable { .. }));
		assert_eq!(store.get(Language::Dutch).unwrap_err(), error);
	}

	#[test]
	fn get_all_keeps_declaration_order() {
		let store = store(
			MemorySource::new()
				.with(Language::Italian, "la pasta")
				.with(Language::Dutch, "de fiets"),
		);
		let results = store.get_all();
		assert_eq!(results.len(), Language::ALL.len());
		for (language, result) in Language::ALL.into_iter().zip(&results) {
			match result {
				Ok(profile) => assert_eq!(profile.language(), language),
				Err(error) => assert_eq!(error.language(), language),
			}
		}
		assert!(results[Language::Dutch.index()].is_ok());
		assert!(results[Language::Italian.index()].is_ok());
		assert!(results[Language::English.index()].is_err());
	}

	struct PanickingSource;

	impl CorpusSource for PanickingSource {
		fn read(&self, language: Language) -> io::Result<Vec<String>> {
			if language == Language::German {
				panic!("corpus reader crashed");
			}
			Ok(vec!["de fiets staat hier".to_owned()])
		}
	}

	#[test]
	fn panicking_source_is_recorded_as_build_error() {
		let store = Arc::new(ProfileStore::new(
			Arc::new(PanickingSource),
			Arc::new(WordTokenizer),
			IdentifierConfig::default().with_workers(2),
		));

		let error = store.get(Language::German).unwrap_err();
		assert!(matches!(error, CorpusError::Build { language: Language::German, .. }));
		// Remembered, not retried
		assert_eq!(store.get(Language::German).unwrap_err(), error);

		let results = store.get_all();
		assert!(results[Language::German.index()].is_err());
		assert!(results[Language::Dutch.index()].is_ok());
	}
}
