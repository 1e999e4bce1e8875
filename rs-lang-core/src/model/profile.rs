use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use super::multiset::NGramMultiset;
use super::ngram::ORDERS;
use super::pool;
use super::tokenizer::Tokenizer;
use crate::error::CorpusError;
use crate::language::Language;

/// Number of chunks per worker when splitting a corpus.
/// More chunks than workers keeps threads busy when chunk costs differ.
const CHUNK_FACTOR: usize = 8;

/// The bigram and trigram counts of one language's reference corpus.
///
/// This struct holds:
/// - `language`: the language the corpus is written in.
/// - `ngrams`: a map from n-gram order to its `NGramMultiset`, one entry per
///   order in [`ORDERS`].
///
/// A profile is built once and never mutated afterwards; it is shared
/// read-only between every scoring task through an `Arc`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LanguageProfile {
	language: Language,
	ngrams: BTreeMap<usize, NGramMultiset>,
}

impl LanguageProfile {
	/// Builds a profile from a corpus given as one text blob.
	///
	/// See [`LanguageProfile::build`].
	pub fn from_text(
		language: Language,
		corpus: &str,
		tokenizer: Arc<dyn Tokenizer>,
		workers: usize,
	) -> Result<Self, CorpusError> {
		let lines = corpus.lines().map(str::to_owned).collect();
		Self::build(language, lines, tokenizer, workers)
	}

	/// Builds a profile from the sentences (lines) of a corpus.
	///
	/// # Behavior
	/// - Splits the lines into chunks (based on `workers` * factor) and
	///   tokenizes the chunks in parallel.
	/// - Concatenates the chunk tokens in corpus order into one stream, so
	///   n-grams spanning two sentences are counted like any other window.
	/// - Splits the window start positions of each order into ranges,
	///   counts the ranges in parallel and merges the partial multisets.
	///
	/// The result is identical to a sequential count of the whole stream.
	///
	/// # Errors
	/// Returns `CorpusError::Build` if any chunk fails: a profile is either
	/// complete or absent, never partial.
	pub fn build(
		language: Language,
		lines: Vec<String>,
		tokenizer: Arc<dyn Tokenizer>,
		workers: usize,
	) -> Result<Self, CorpusError> {
		let workers = workers.max(1);
		let build_error = |reason: String| CorpusError::Build { language, reason };

		// Tokenize
		let chunks = split_lines(lines, workers * CHUNK_FACTOR);
		let nb_chunks = chunks.len();
		let tokenized = pool::execute(chunks, workers, move |chunk: Vec<String>| {
			tokenizer.tokenize(&chunk.join(" "))
		});
		if tokenized.len() != nb_chunks {
			return Err(build_error(format!(
				"{} of {} tokenizer chunks failed",
				nb_chunks - tokenized.len(),
				nb_chunks
			)));
		}
		let tokens: Arc<Vec<String>> = Arc::new(tokenized.into_iter().flat_map(|(_, tokens)| tokens).collect());

		// Count
		let mut jobs = Vec::new();
		for n in ORDERS {
			let nb_windows = tokens.len().saturating_sub(n - 1);
			for range in split_range(nb_windows, workers) {
				jobs.push((n, range));
			}
		}
		let nb_jobs = jobs.len();
		let stream = Arc::clone(&tokens);
		let partials = pool::execute(jobs, workers, move |(n, range): (usize, Range<usize>)| {
			let mut partial = NGramMultiset::new(n)?;
			partial.add_windows(&stream, range);
			Ok::<_, String>(partial)
		});
		if partials.len() != nb_jobs {
			return Err(build_error(format!("{} of {} counting jobs failed", nb_jobs - partials.len(), nb_jobs)));
		}

		let mut ngrams = BTreeMap::new();
		for n in ORDERS {
			ngrams.insert(n, NGramMultiset::new(n).map_err(build_error)?);
		}
		for (_, partial) in partials {
			let partial = partial.map_err(build_error)?;
			if let Some(existing) = ngrams.get_mut(&partial.n()) {
				existing.merge(partial).map_err(build_error)?;
			}
		}

		let profile = Self { language, ngrams };
		info!(
			"Built {} profile: {} tokens, {} distinct bigrams, {} distinct trigrams",
			language,
			tokens.len(),
			profile.index(2).map_or(0, NGramMultiset::distinct),
			profile.index(3).map_or(0, NGramMultiset::distinct),
		);
		Ok(profile)
	}

	/// Loads a profile previously written by [`LanguageProfile::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	/// Serializes the profile with `postcard` for fast loading on later runs.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	pub fn language(&self) -> Language {
		self.language
	}

	/// Multiset of order `n`, `None` for orders outside [`ORDERS`].
	pub fn index(&self, n: usize) -> Option<&NGramMultiset> {
		self.ngrams.get(&n)
	}
}

/// Splits `lines` into at most `chunks` consecutive, non-empty chunks.
fn split_lines(lines: Vec<String>, chunks: usize) -> Vec<Vec<String>> {
	let chunk_size = lines.len().div_ceil(chunks.max(1)).max(1);
	let mut result = Vec::new();
	let mut lines = lines.into_iter();
	loop {
		let chunk: Vec<String> = lines.by_ref().take(chunk_size).collect();
		if chunk.is_empty() {
			break;
		}
		result.push(chunk);
	}
	result
}

/// Splits `0..len` into at most `parts` consecutive, non-empty ranges.
fn split_range(len: usize, parts: usize) -> Vec<Range<usize>> {
	let size = len.div_ceil(parts.max(1)).max(1);
	(0..len).step_by(size).map(|start| start..(start + size).min(len)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::tokenizer::WordTokenizer;
	use rand::Rng;

	fn tokenizer() -> Arc<dyn Tokenizer> {
		Arc::new(WordTokenizer)
	}

	fn words(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn windows_span_sentence_boundaries() {
		let profile = LanguageProfile::from_text(Language::Dutch, "ik ging\nnaar huis", tokenizer(), 2).unwrap();
		let bigrams = profile.index(2).unwrap();
		assert_eq!(bigrams.count(&words("ging naar")), 1);
		assert_eq!(profile.index(3).unwrap().count(&words("ik ging naar")), 1);
		assert!(profile.index(4).is_none());
	}

	#[test]
	fn parallel_build_matches_sequential_count() {
		let mut rng = rand::rng();
		let vocabulary = ["de", "het", "een", "fiets", "winkel", "naar", "op"];
		let lines: Vec<String> = (0..300)
			.map(|_| {
				let len = rng.random_range(0..6);
				(0..len)
					.map(|_| vocabulary[rng.random_range(0..vocabulary.len())])
					.collect::<Vec<_>>()
					.join(" ")
			})
			.collect();

		let stream = WordTokenizer.tokenize(&lines.join(" "));
		let profile = LanguageProfile::build(Language::Dutch, lines, tokenizer(), 4).unwrap();
		for n in ORDERS {
			let sequential = NGramMultiset::from_tokens(&stream, n).unwrap();
			assert_eq!(profile.index(n), Some(&sequential));
		}
	}

	#[test]
	fn empty_corpus_builds_empty_profile() {
		let profile = LanguageProfile::from_text(Language::Italian, "", tokenizer(), 3).unwrap();
		for n in ORDERS {
			assert_eq!(profile.index(n).unwrap().total(), 0);
		}
	}

	#[test]
	fn failing_tokenizer_fails_the_build() {
		struct Broken;
		impl Tokenizer for Broken {
			fn tokenize(&self, _text: &str) -> Vec<String> {
				panic!("tokenizer fault");
			}
		}

		let result = LanguageProfile::from_text(Language::German, "ein satz", Arc::new(Broken), 1);
		assert!(matches!(result, Err(CorpusError::Build { language: Language::German, .. })));
	}

	#[test]
	fn save_and_load_restore_the_profile() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("french.bin");
		let profile = LanguageProfile::from_text(Language::French, "je ne sais pas", tokenizer(), 1).unwrap();

		profile.save(&path).unwrap();
		assert_eq!(LanguageProfile::load(&path).unwrap(), profile);
	}

	#[test]
	fn ranges_cover_everything_once() {
		assert_eq!(split_range(10, 3), vec![0..4, 4..8, 8..10]);
		assert_eq!(split_range(2, 8), vec![0..1, 1..2]);
		assert!(split_range(0, 4).is_empty());

		let chunks = split_lines(words("a b c d e"), 2);
		assert_eq!(chunks, vec![words("a b c"), words("d e")]);
	}
}
