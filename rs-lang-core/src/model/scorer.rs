use serde::Serialize;

use super::multiset::NGramMultiset;
use super::ngram::NGram;
use crate::language::Language;

/// Overlap score of `input` against `index`.
///
/// Sum, over every input n-gram, of its number of occurrences in the
/// reference corpus. Repeated input n-grams count once per occurrence.
///
/// The score is not normalized by corpus or input size: languages with
/// larger reference corpora are favoured.
pub fn score(input: &[NGram], index: &NGramMultiset) -> u64 {
	input.iter().map(|ngram| index.count(ngram.tokens())).sum()
}

/// One language's total on a [`ScoreBoard`].
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageScore {
	pub language: Language,
	pub score: u64,
}

/// Per-request totals of the scored languages.
///
/// Entries are kept in [`Language::ALL`] order, which is also the
/// tie-break order: among equal totals the first declared language wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreBoard {
	entries: Vec<LanguageScore>,
}

impl ScoreBoard {
	/// Creates a board with a zero total for each of `languages`.
	pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
		let mut entries: Vec<LanguageScore> = languages
			.into_iter()
			.map(|language| LanguageScore { language, score: 0 })
			.collect();
		entries.sort_by_key(|entry| entry.language);
		entries.dedup_by_key(|entry| entry.language);
		Self { entries }
	}

	/// Adds `points` to `language`'s total. Languages not on the board are ignored.
	pub fn add(&mut self, language: Language, points: u64) {
		if let Some(entry) = self.entries.iter_mut().find(|entry| entry.language == language) {
			entry.score = entry.score.saturating_add(points);
		}
	}

	/// Total of `language`, `None` if it was not scored.
	pub fn get(&self, language: Language) -> Option<u64> {
		self.entries.iter().find(|entry| entry.language == language).map(|entry| entry.score)
	}

	/// Languages on the board, in tie-break order.
	pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
		self.entries.iter().map(|entry| entry.language)
	}

	/// Highest-scoring language; the first declared one on ties.
	///
	/// Returns `None` for an empty board.
	pub fn winner(&self) -> Option<Language> {
		let mut best: Option<&LanguageScore> = None;
		for entry in &self.entries {
			if best.is_none_or(|b| entry.score > b.score) {
				best = Some(entry);
			}
		}
		best.map(|entry| entry.language)
	}

	/// All entries, highest total first, ties in declaration order.
	pub fn ranking(&self) -> Vec<LanguageScore> {
		let mut ranking = self.entries.clone();
		// Stable sort keeps declaration order among equal totals
		ranking.sort_by(|a, b| b.score.cmp(&a.score));
		ranking
	}
}
