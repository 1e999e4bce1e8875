/// Settings of an [`Identifier`](super::identifier::Identifier).
///
/// # Fields
/// - `workers`: size of the worker pool used for profile builds and
///   scoring. Defaults to the number of logical CPUs; 0 behaves as 1.
/// - `cache_indexes`: when the corpus source supports it, write built
///   profiles to disk and reload them on later runs instead of rebuilding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierConfig {
	pub workers: usize,
	pub cache_indexes: bool,
}

impl Default for IdentifierConfig {
	fn default() -> Self {
		Self { workers: num_cpus::get(), cache_indexes: true }
	}
}

impl IdentifierConfig {
	/// Sets the worker pool size.
	pub fn with_workers(mut self, workers: usize) -> Self {
		self.workers = workers;
		self
	}

	/// Enables or disables on-disk profile caching.
	pub fn with_cache_indexes(mut self, cache_indexes: bool) -> Self {
		self.cache_indexes = cache_indexes;
		self
	}

	/// Pool size actually used (never 0).
	pub(crate) fn pool_size(&self) -> usize {
		self.workers.max(1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_uses_every_cpu() {
		let config = IdentifierConfig::default();
		assert_eq!(config.workers, num_cpus::get());
		assert!(config.cache_indexes);
	}

	#[test]
	fn zero_workers_means_one() {
		assert_eq!(IdentifierConfig::default().with_workers(0).pool_size(), 1);
		assert_eq!(IdentifierConfig::default().with_workers(3).pool_size(), 3);
	}
}
