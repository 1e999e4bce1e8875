use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// N-gram orders used for identification (bigrams and trigrams).
pub const ORDERS: [usize; 2] = [2, 3];

/// An ordered tuple of consecutive tokens.
///
/// Equality and hashing are structural and order-sensitive:
/// `("de", "fiets")` and `("fiets", "de")` are different n-grams.
///
/// `NGram` borrows as `[String]`, so a multiset keyed by `NGram`
/// can be queried with a plain token window without allocating.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NGram(Vec<String>);

impl NGram {
	/// Number of tokens in the n-gram.
	pub fn order(&self) -> usize {
		self.0.len()
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}
}

impl From<&[String]> for NGram {
	fn from(window: &[String]) -> Self {
		NGram(window.to_vec())
	}
}

impl Borrow<[String]> for NGram {
	fn borrow(&self) -> &[String] {
		&self.0
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({})", self.0.join(", "))
	}
}

/// Returns every contiguous window of `n` tokens, in order, stride 1.
///
/// `[a, b, c, d]` with `n = 2` gives `[(a, b), (b, c), (c, d)]`.
/// Fewer than `n` tokens (or `n == 0`) gives an empty sequence.
pub fn extract(tokens: &[String], n: usize) -> Vec<NGram> {
	if n == 0 {
		return Vec::new();
	}
	tokens.windows(n).map(NGram::from).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	fn tokens(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| (*w).to_owned()).collect()
	}

	#[test]
	fn bigrams_overlap_by_one() {
		let grams = extract(&tokens(&["a", "b", "c", "d"]), 2);
		let grams: Vec<&[String]> = grams.iter().map(NGram::tokens).collect();
		assert_eq!(grams, vec![&tokens(&["a", "b"])[..], &tokens(&["b", "c"])[..], &tokens(&["c", "d"])[..]]);
	}

	#[test]
	fn short_input_gives_nothing() {
		assert!(extract(&tokens(&["a", "b"]), 3).is_empty());
		assert!(extract(&[], 2).is_empty());
		assert!(extract(&tokens(&["a"]), 0).is_empty());
	}

	#[test]
	fn window_count_and_overlap_hold_for_random_sequences() {
		let mut rng = rand::rng();
		for _ in 0..200 {
			let len = rng.random_range(0..12);
			let words: Vec<String> = (0..len).map(|_| rng.random_range(0..4).to_string()).collect();
			for n in ORDERS {
				let grams = extract(&words, n);
				if len < n {
					assert!(grams.is_empty());
					continue;
				}
				assert_eq!(grams.len(), len - n + 1);
				for (i, gram) in grams.iter().enumerate() {
					assert_eq!(gram.order(), n);
					assert_eq!(gram.tokens(), &words[i..i + n]);
				}
				for pair in grams.windows(2) {
					assert_eq!(pair[0].tokens()[1..], pair[1].tokens()[..n - 1]);
				}
			}
		}
	}

	#[test]
	fn order_matters_for_equality() {
		let forward = NGram::from(&tokens(&["de", "fiets"])[..]);
		let backward = NGram::from(&tokens(&["fiets", "de"])[..]);
		assert_ne!(forward, backward);
		assert_eq!(forward.to_string(), "(de, fiets)");
	}
}
