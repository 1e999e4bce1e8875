use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use log::warn;

/// Unit of work queued on a [`WorkerPool`].
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs `task(job)` and sends its result, or logs the panic and sends nothing.
///
/// Returns `false` when the receiver is gone.
fn run_job<J, R, F>(index: usize, job: J, task: &F, tx: &mpsc::Sender<(usize, R)>) -> bool
where
	F: Fn(J) -> R,
{
	match panic::catch_unwind(AssertUnwindSafe(|| task(job))) {
		Ok(result) => tx.send((index, result)).is_ok(),
		Err(_) => {
			warn!("Job {index} panicked, result dropped");
			true
		}
	}
}

/// Runs `jobs` on at most `workers` short-lived threads and waits for all of them.
///
/// Used for one-off work such as profile builds. Jobs are dealt round-robin
/// to the workers. Results come back over an MPSC channel; the channel
/// closing once every worker has dropped its sender is the only join barrier.
///
/// # Returns
/// `(job index, result)` pairs sorted by job index. A job that panics, or
/// whose worker thread could not be spawned, has no entry: callers decide
/// what a missing result means.
///
/// # Notes
/// - Never blocks on a failed job, a panic only loses that job's result.
/// - `workers == 0` is treated as 1.
pub(crate) fn execute<J, R, F>(jobs: Vec<J>, workers: usize, task: F) -> Vec<(usize, R)>
where
	J: Send + 'static,
	R: Send + 'static,
	F: Fn(J) -> R + Send + Sync + 'static,
{
	if jobs.is_empty() {
		return Vec::new();
	}

	let workers = workers.clamp(1, jobs.len());
	let mut buckets: Vec<Vec<(usize, J)>> = (0..workers).map(|_| Vec::new()).collect();
	for (index, job) in jobs.into_iter().enumerate() {
		buckets[index % workers].push((index, job));
	}

	let task = Arc::new(task);
	let (tx, rx) = mpsc::channel();
	for (worker, bucket) in buckets.into_iter().enumerate() {
		let tx = tx.clone();
		let task = Arc::clone(&task);

		let spawned = thread::Builder::new()
			.name(format!("rs-lang-worker-{worker}"))
			.spawn(move || {
				for (index, job) in bucket {
					if !run_job(index, job, task.as_ref(), &tx) {
						return;
					}
				}
			});

		if let Err(e) = spawned {
			warn!("Failed to spawn worker {worker}: {e}");
		}
	}
	drop(tx);

	let mut results: Vec<(usize, R)> = rx.iter().collect();
	results.sort_by_key(|(index, _)| *index);
	results
}

/// Fixed set of long-lived threads shared by every request.
///
/// # Responsibilities
/// - Spawn `size` workers once, all pulling boxed jobs from one shared channel
/// - Run a batch of jobs for a caller and wait for that batch only
///
/// # Invariants
/// - At most `size` jobs run at the same time, however many callers submit
/// - Each batch gets its own result channel: batches never see each other's
///   results, and a batch's join ends once all its jobs ran or were dropped
pub(crate) struct WorkerPool {
	sender: Option<mpsc::Sender<Job>>,
	workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
	/// Spawns `size` workers (`0` behaves as 1).
	///
	/// Workers that fail to spawn are logged and skipped; with no worker at
	/// all, batches run on the calling thread.
	pub(crate) fn new(size: usize) -> Self {
		let (sender, receiver) = mpsc::channel::<Job>();
		let receiver = Arc::new(Mutex::new(receiver));

		let mut workers = Vec::new();
		for worker in 0..size.max(1) {
			let receiver = Arc::clone(&receiver);
			let spawned = thread::Builder::new()
				.name(format!("rs-lang-scorer-{worker}"))
				.spawn(move || {
					loop {
						// The lock is only held while waiting for the next job
						let next = match receiver.lock() {
							Ok(guard) => guard.recv(),
							Err(poisoned) => poisoned.into_inner().recv(),
						};
						match next {
							Ok(job) => job(),
							Err(_) => break,
						}
					}
				});

			match spawned {
				Ok(handle) => workers.push(handle),
				Err(e) => warn!("Failed to spawn scorer {worker}: {e}"),
			}
		}

		let sender = if workers.is_empty() { None } else { Some(sender) };
		Self { sender, workers }
	}

	/// Number of live workers.
	pub(crate) fn size(&self) -> usize {
		self.workers.len()
	}

	/// Runs `jobs` on the pool and waits for this batch.
	///
	/// # Returns
	/// `(job index, result)` pairs sorted by job index. A job that panics
	/// has no entry, exactly like [`execute`].
	pub(crate) fn execute<J, R, F>(&self, jobs: Vec<J>, task: F) -> Vec<(usize, R)>
	where
		J: Send + 'static,
		R: Send + 'static,
		F: Fn(J) -> R + Send + Sync + 'static,
	{
		let task = Arc::new(task);
		let (tx, rx) = mpsc::channel();

		for (index, job) in jobs.into_iter().enumerate() {
			let tx = tx.clone();
			let task = Arc::clone(&task);
			let boxed: Job = Box::new(move || {
				run_job(index, job, task.as_ref(), &tx);
			});

			match &self.sender {
				Some(sender) => {
					// Every worker is gone: run the job here instead of losing it
					if let Err(mpsc::SendError(boxed)) = sender.send(boxed) {
						boxed();
					}
				}
				None => boxed(),
			}
		}
		drop(tx);

		let mut results: Vec<(usize, R)> = rx.iter().collect();
		results.sort_by_key(|(index, _)| *index);
		results
	}
}

impl Drop for WorkerPool {
	fn drop(&mut self) {
		// Closing the channel stops the workers once the queue is empty
		drop(self.sender.take());
		for handle in self.workers.drain(..) {
			let _ = handle.join();
		}
	}
}
