use unicode_segmentation::UnicodeSegmentation;

/// Turns raw text into an ordered sequence of normalized word tokens.
///
/// Implementations must be deterministic and free of I/O: the same text
/// always yields the same tokens, on any thread.
pub trait Tokenizer: Send + Sync {
	fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Default tokenizer based on Unicode word boundaries (UAX #29).
///
/// # Normalization
/// - Every numeric character is dropped before segmentation
///   (`"2015er"` becomes `"er"`, `"42"` disappears).
/// - Text is lowercased.
/// - Punctuation, commas, tabs and newlines never form tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
	fn tokenize(&self, text: &str) -> Vec<String> {
		let cleaned: String = text
			.chars()
			.filter(|c| !c.is_numeric())
			.collect::<String>()
			.to_lowercase();

		cleaned.unicode_words().map(str::to_owned).collect()
	}
}
