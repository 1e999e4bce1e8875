use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language the identifier can recognise.
///
/// The declaration order is significant: it is the order in which
/// languages are scored and the tie-break order used when several
/// languages reach the same total (first declared wins).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	Dutch,
	English,
	German,
	French,
	Spanish,
	Italian,
}

impl Language {
	/// Number of supported languages.
	pub const COUNT: usize = 6;

	/// Every supported language, in tie-break order.
	pub const ALL: [Language; Language::COUNT] = [
		Language::Dutch,
		Language::English,
		Language::German,
		Language::French,
		Language::Spanish,
		Language::Italian,
	];

	/// Lowercase English name, also used as the corpus file stem.
	pub fn name(self) -> &'static str {
		match self {
			Language::Dutch => "dutch",
			Language::English => "english",
			Language::German => "german",
			Language::French => "french",
			Language::Spanish => "spanish",
			Language::Italian => "italian",
		}
	}

	/// ISO 639-1 code.
	pub fn code(self) -> &'static str {
		match self {
			Language::Dutch => "nl",
			Language::English => "en",
			Language::German => "de",
			Language::French => "fr",
			Language::Spanish => "es",
			Language::Italian => "it",
		}
	}

	/// Position in [`Language::ALL`].
	pub(crate) fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Language {
	type Err = String;

	/// Accepts the English name or the ISO code, case-insensitively.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let key = s.trim().to_lowercase();
		Language::ALL
			.into_iter()
			.find(|language| language.name() == key || language.code() == key)
			.ok_or_else(|| format!("Unsupported language: {s}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn index_matches_declaration_order() {
		for (i, language) in Language::ALL.iter().enumerate() {
			assert_eq!(language.index(), i);
		}
	}

	#[test]
	fn parses_names_and_codes() {
		assert_eq!("Dutch".parse::<Language>(), Ok(Language::Dutch));
		assert_eq!(" it ".parse::<Language>(), Ok(Language::Italian));
		assert_eq!("ENGLISH".parse::<Language>(), Ok(Language::English));
		assert!("klingon".parse::<Language>().is_err());
	}

	#[test]
	fn display_round_trips_through_from_str() {
		for language in Language::ALL {
			assert_eq!(language.to_string().parse::<Language>(), Ok(language));
		}
	}
}
