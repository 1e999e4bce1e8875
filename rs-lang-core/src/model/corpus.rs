use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::{CACHE_EXTENSION, CORPUS_EXTENSION, build_output_path, normalize_folder, read_lines};
use crate::language::Language;

/// Where the reference corpus of each language comes from.
///
/// A source only hands out sentences; building and memoizing the
/// profiles is the store's job.
pub trait CorpusSource: Send + Sync {
	/// Reads the sentences of `language`'s corpus, one per line.
	fn read(&self, language: Language) -> io::Result<Vec<String>>;

	/// Where a built profile of `language` may be cached, if anywhere.
	fn cache_path(&self, _language: Language) -> Option<PathBuf> {
		None
	}
}

/// A folder holding one `<language>.dat` file per language.
///
/// Example layout:
/// ```text
/// data/
///   dutch.dat
///   english.dat
///   ...
/// ```
/// Built profiles are cached next to their corpus as `<language>.bin`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	folder: PathBuf,
}

impl DirectorySource {
	/// Creates a source over `folder`.
	///
	/// Both `"folder"` and `"folder/"` are accepted, `"."` is the current
	/// working directory.
	///
	/// # Errors
	/// Returns an error if the path is not valid UTF-8 or is not a directory.
	pub fn new<P: AsRef<Path>>(folder: P) -> io::Result<Self> {
		let string_path = folder
			.as_ref()
			.to_str()
			.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid folder path"))?;
		let folder = normalize_folder(string_path);

		if !folder.is_dir() {
			return Err(io::Error::new(
				io::ErrorKind::NotFound,
				format!("Expected a directory, got: {}", folder.display()),
			));
		}
		Ok(Self { folder })
	}

	/// Path of `language`'s corpus file.
	pub fn corpus_path(&self, language: Language) -> PathBuf {
		let mut path = self.folder.join(language.name());
		path.set_extension(CORPUS_EXTENSION);
		path
	}
}

impl CorpusSource for DirectorySource {
	fn read(&self, language: Language) -> io::Result<Vec<String>> {
		read_lines(self.corpus_path(language))
	}

	fn cache_path(&self, language: Language) -> Option<PathBuf> {
		build_output_path(self.corpus_path(language), CACHE_EXTENSION).ok()
	}
}

/// Corpora held in memory, keyed by language.
///
/// Languages without an entry are reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	corpora: HashMap<Language, String>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or replaces) the corpus of `language`.
	pub fn with(mut self, language: Language, corpus: impl Into<String>) -> Self {
		self.corpora.insert(language, corpus.into());
		self
	}
}

impl CorpusSource for MemorySource {
	fn read(&self, language: Language) -> io::Result<Vec<String>> {
		self.corpora
			.get(&language)
			.map(|corpus| corpus.lines().map(str::to_owned).collect())
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("No corpus registered for {language}")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directory_source_reads_language_files() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("spanish.dat"), "hola amigo\nbuenos días\n").unwrap();
		let source = DirectorySource::new(dir.path()).unwrap();

		assert_eq!(source.read(Language::Spanish).unwrap(), vec!["hola amigo", "buenos días"]);
		assert_eq!(source.read(Language::Italian).unwrap_err().kind(), io::ErrorKind::NotFound);
		assert_eq!(source.cache_path(Language::Spanish), Some(dir.path().join("spanish.bin")));
	}

	#[test]
	fn directory_source_rejects_files() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join("dutch.dat");
		std::fs::write(&file, "hallo").unwrap();
		assert!(DirectorySource::new(&file).is_err());
	}

	#[test]
	fn memory_source_has_no_cache() {
		let source = MemorySource::new().with(Language::English, "hello world");
		assert_eq!(source.read(Language::English).unwrap(), vec!["hello world"]);
		assert!(source.read(Language::German).is_err());
		assert!(source.cache_path(Language::English).is_none());
	}
}
