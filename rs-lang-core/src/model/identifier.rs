use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use super::config::IdentifierConfig;
use super::corpus::{CorpusSource, DirectorySource};
use super::ngram::{NGram, ORDERS, extract};
use super::pool::WorkerPool;
use super::profile::LanguageProfile;
use super::scorer::{ScoreBoard, score};
use super::store::ProfileStore;
use super::tokenizer::{Tokenizer, WordTokenizer};
use crate::error::{CorpusError, IdentifyError};
use crate::language::Language;

/// High-level identifier scoring text against every language profile.
///
/// # Responsibilities
/// - Own the memoized language profiles (built once, shared read-only)
/// - Extract the bigrams and trigrams of the input once per request
/// - Score every (language, n) pair concurrently on a bounded worker pool
/// - Pick the highest total, ties going to the first declared language
///
/// `Identifier` is `Send + Sync`: one instance can serve concurrent
/// requests, each request owning its own [`ScoreBoard`]. All requests share
/// one pool of `config.workers` scoring threads.
pub struct Identifier {
	store: Arc<ProfileStore>,
	pool: WorkerPool,
}

impl Identifier {
	/// Creates an identifier over a folder of `<language>.dat` corpora.
	///
	/// # Parameters
	/// - `folder`: Path to a directory containing corpus files.
	///   Both `"folder"` and `"folder/"` are accepted.
	///
	/// # Errors
	/// Returns an error if the path does not exist or is not a directory.
	///
	/// # Notes
	/// - Profiles are built lazily on the first request; call
	///   [`Identifier::preload`] to build them up front.
	/// - Missing corpus files are not an error here, the language is
	///   simply excluded once its build fails.
	pub fn new<P: AsRef<Path>>(folder: P) -> Result<Self, Box<dyn std::error::Error>> {
		let source = DirectorySource::new(folder)?;
		Ok(Self::with_source(source, IdentifierConfig::default()))
	}

	/// Creates an identifier over any corpus source, using [`WordTokenizer`].
	pub fn with_source<S: CorpusSource + 'static>(source: S, config: IdentifierConfig) -> Self {
		Self::assemble(Arc::new(source), Arc::new(WordTokenizer), config)
	}

	/// Creates an identifier with a custom tokenizer.
	///
	/// The tokenizer is used both for corpora and for requests.
	///
	/// # Notes
	/// On-disk profile caching is always disabled here: a `.bin` cache does
	/// not record which tokenizer built it, so it could hold tokens this
	/// tokenizer never produces.
	pub fn with_tokenizer<S, T>(source: S, tokenizer: T, config: IdentifierConfig) -> Self
	where
		S: CorpusSource + 'static,
		T: Tokenizer + 'static,
	{
		if config.cache_indexes {
			info!("Custom tokenizer, profile cache disabled");
		}
		Self::assemble(Arc::new(source), Arc::new(tokenizer), config.with_cache_indexes(false))
	}

	fn assemble(source: Arc<dyn CorpusSource>, tokenizer: Arc<dyn Tokenizer>, config: IdentifierConfig) -> Self {
		let pool = WorkerPool::new(config.pool_size());
		Self { store: Arc::new(ProfileStore::new(source, tokenizer, config)), pool }
	}

	pub fn config(&self) -> &IdentifierConfig {
		self.store.config()
	}

	/// Builds every language profile now, concurrently.
	///
	/// # Returns
	/// The build failures, one per excluded language (empty when every
	/// corpus loaded). Already-built languages are not rebuilt.
	pub fn preload(&self) -> Vec<CorpusError> {
		self.store.get_all().into_iter().filter_map(Result::err).collect()
	}

	/// Languages whose profile is available, in tie-break order.
	pub fn available_languages(&self) -> Vec<Language> {
		self.profiles().iter().map(|profile| profile.language()).collect()
	}

	/// Scores `text` against every available language.
	///
	/// # Behavior
	/// - Tokenizes `text` and extracts its bigrams and trigrams once.
	/// - Runs one job per (language, n) on the shared pool; each job reads a shared
	///   profile and the shared input n-grams, nothing is locked.
	/// - A job that fails contributes 0 for its (language, n).
	///
	/// # Errors
	/// `IdentifyError::NoLanguagesAvailable` if no profile could be built.
	pub fn scores(&self, text: &str) -> Result<ScoreBoard, IdentifyError> {
		let profiles = self.profiles();
		if profiles.is_empty() {
			return Err(IdentifyError::NoLanguagesAvailable);
		}

		let tokens = self.store.tokenizer().tokenize(text);
		let inputs: Vec<(usize, Arc<Vec<NGram>>)> =
			ORDERS.into_iter().map(|n| (n, Arc::new(extract(&tokens, n)))).collect();

		let mut jobs = Vec::with_capacity(profiles.len() * inputs.len());
		for profile in &profiles {
			for (n, ngrams) in &inputs {
				jobs.push((Arc::clone(profile), *n, Arc::clone(ngrams)));
			}
		}
		let nb_jobs = jobs.len();

		let results = self.pool.execute(
			jobs,
			|(profile, n, ngrams): (Arc<LanguageProfile>, usize, Arc<Vec<NGram>>)| {
				let points = profile.index(n).map_or(0, |index| score(&ngrams, index));
				(profile.language(), n, points)
			},
		);
		if results.len() != nb_jobs {
			warn!("{} of {} scoring jobs failed, counted as 0", nb_jobs - results.len(), nb_jobs);
		}

		let mut board = ScoreBoard::new(profiles.iter().map(|profile| profile.language()));
		for (_, (language, n, points)) in results {
			debug!("{language} {n}-gram score: {points}");
			board.add(language, points);
		}
		Ok(board)
	}

	/// Returns the most likely language of `text`.
	///
	/// Empty or blank text scores 0 everywhere and therefore resolves to
	/// the first available language in [`Language::ALL`] order.
	///
	/// # Errors
	/// `IdentifyError::NoLanguagesAvailable` if no profile could be built.
	pub fn identify(&self, text: &str) -> Result<Language, IdentifyError> {
		self.scores(text)?.winner().ok_or(IdentifyError::NoLanguagesAvailable)
	}

	/// Built profiles, building missing ones concurrently on first use.
	fn profiles(&self) -> Vec<Arc<LanguageProfile>> {
		self.store.get_all().into_iter().filter_map(Result::ok).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::corpus::MemorySource;

	fn identifier(source: MemorySource) -> Identifier {
		Identifier::with_source(source, IdentifierConfig::default().with_workers(3))
	}

	#[test]
	fn empty_source_has_no_languages() {
		let identifier = identifier(MemorySource::new());
		assert_eq!(identifier.preload().len(), Language::COUNT);
		assert!(identifier.available_languages().is_empty());
		assert_eq!(identifier.identify("hello"), Err(IdentifyError::NoLanguagesAvailable));
	}

	#[test]
	fn bigram_and_trigram_scores_are_summed() {
		let identifier = identifier(MemorySource::new().with(Language::English, "the cat sat on the mat"));
		let board = identifier.scores("the cat sat").unwrap();
		// bigrams (the, cat) + (cat, sat), trigram (the, cat, sat)
		assert_eq!(board.get(Language::English), Some(3));
		assert_eq!(board.get(Language::Dutch), None);
	}

	#[test]
	fn blank_text_falls_back_to_first_available_language() {
		let identifier = identifier(
			MemorySource::new()
				.with(Language::Spanish, "el perro")
				.with(Language::German, "der hund"),
		);
		assert_eq!(identifier.identify(""), Ok(Language::German));
		assert_eq!(identifier.identify("   \t"), Ok(Language::German));
	}

	#[test]
	fn identifier_is_shareable_between_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Identifier>();
	}

	#[test]
	fn concurrent_requests_share_one_bounded_pool() {
		let source = MemorySource::new()
			.with(Language::English, "the cat sat on the mat")
			.with(Language::French, "le chat est sur le tapis");
		let identifier = Arc::new(Identifier::with_source(source, IdentifierConfig::default().with_workers(2)));
		assert_eq!(identifier.pool.size(), 2);

		let callers: Vec<_> = (0..8)
			.map(|i| {
				let identifier = Arc::clone(&identifier);
				std::thread::spawn(move || {
					let (text, expected) =
						if i % 2 == 0 { ("the cat sat", Language::English) } else { ("le chat est", Language::French) };
					assert_eq!(identifier.identify(text), Ok(expected));
				})
			})
			.collect();
		for caller in callers {
			caller.join().unwrap();
		}

		// Requests never spawn scorers of their own
		assert_eq!(identifier.pool.size(), 2);
	}

	struct UpperTokenizer;

	impl Tokenizer for UpperTokenizer {
		fn tokenize(&self, text: &str) -> Vec<String> {
			WordTokenizer.tokenize(text).into_iter().map(|token| token.to_uppercase()).collect()
		}
	}

	#[test]
	fn custom_tokenizer_disables_the_profile_cache() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("english.dat"), "the cat sat on the mat\n").unwrap();

		let source = DirectorySource::new(dir.path()).unwrap();
		let identifier = Identifier::with_tokenizer(source, UpperTokenizer, IdentifierConfig::default());
		assert!(!identifier.config().cache_indexes);
		assert_eq!(identifier.identify("THE CAT"), Ok(Language::English));
		assert!(!dir.path().join("english.bin").exists());
	}
}
