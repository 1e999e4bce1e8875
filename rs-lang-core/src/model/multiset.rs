use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ngram::NGram;

/// Occurrence counts of every n-gram of one order in one corpus.
///
/// # Responsibilities
/// - Count the n-grams of a token stream
/// - Answer count-of-occurrence queries
/// - Merge with a partial multiset of the same order `n` (parallel builds)
///
/// # Invariants
/// - `n` is always >= 1
/// - Every key has exactly `n` tokens
/// - The count of a key equals the number of times that exact ordered
///   window appears in the counted token stream (always >= 1)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramMultiset {
	/// Number of tokens per n-gram
	n: usize,

	/// N-gram → number of occurrences
	counts: HashMap<NGram, u64>,
}

impl NGramMultiset {
	/// Creates an empty multiset of order `n`.
	///
	/// # Errors
	/// Returns an error if `n == 0`.
	pub fn new(n: usize) -> Result<Self, String> {
		if n == 0 {
			return Err("n must be >= 1".to_owned());
		}
		Ok(Self { n, counts: HashMap::new() })
	}

	/// Counts every n-gram of `tokens`.
	///
	/// # Errors
	/// Returns an error if `n == 0`.
	pub fn from_tokens(tokens: &[String], n: usize) -> Result<Self, String> {
		let mut multiset = Self::new(n)?;
		multiset.add_windows(tokens, 0..tokens.len().saturating_sub(n - 1));
		Ok(multiset)
	}

	/// Counts the windows of `tokens` starting at the positions in `starts`.
	///
	/// Lets several workers count disjoint ranges of start positions over
	/// the same shared token stream. Starts whose window would run past the
	/// end of `tokens` are ignored.
	pub(crate) fn add_windows(&mut self, tokens: &[String], starts: std::ops::Range<usize>) {
		for start in starts {
			let Some(window) = tokens.get(start..start + self.n) else {
				break;
			};
			// Only allocate an owned key for n-grams seen for the first time
			if let Some(count) = self.counts.get_mut(window) {
				*count += 1;
			} else {
				self.counts.insert(NGram::from(window), 1);
			}
		}
	}

	/// Order of the multiset.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Number of occurrences of `ngram`, 0 if never seen.
	pub fn count(&self, ngram: &[String]) -> u64 {
		self.counts.get(ngram).copied().unwrap_or(0)
	}

	/// Number of distinct n-grams.
	pub fn distinct(&self) -> usize {
		self.counts.len()
	}

	/// Total number of counted windows.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Merges another multiset into this one.
	///
	/// # Notes
	/// - Both multisets must have the same order `n`.
	/// - Counts of matching n-grams are summed.
	///
	/// # Errors
	/// Returns an error if the orders do not match.
	pub fn merge(&mut self, other: Self) -> Result<(), String> {
		if self.n != other.n {
			return Err(format!("N mismatch: {} vs {}", self.n, other.n));
		}

		if self.counts.is_empty() {
			self.counts = other.counts;
			return Ok(());
		}
		for (ngram, count) in other.counts {
			*self.counts.entry(ngram).or_insert(0) += count;
		}

		Ok(())
	}
}
