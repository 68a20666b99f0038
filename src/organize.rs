//! Two-pass walk that classifies, moves, and reports every file

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::classify::{classify, Granularity, TargetLocation};
use crate::counters::{BucketKey, SharedCounters};
use crate::error::{MoveError, OrganizeError, OrganizeResult};
use crate::mover::relocate;
use crate::render::{RenderJob, RenderQueue, RenderSnapshot};

/// Walks a source tree and moves every file into its timestamp bucket.
///
/// The producer half of the pipeline: it owns both walk passes and all
/// counter mutation, and it reports each terminal outcome to the display as
/// exactly one render job.
pub struct Organizer {
	root: PathBuf,
	granularity: Granularity,
	follow_links: bool,
}

impl Organizer {
	pub fn new(root: impl Into<PathBuf>, granularity: Granularity) -> Self {
		Self {
			root: root.into(),
			granularity,
			follow_links: false,
		}
	}

	/// Configure whether to follow symbolic links in both passes.
	pub fn follow_links(mut self, follow: bool) -> Self {
		self.follow_links = follow;
		self
	}

	pub fn root(&self) -> &PathBuf {
		&self.root
	}

	pub fn granularity(&self) -> Granularity {
		self.granularity
	}

	fn walker(&self) -> WalkDir {
		let mut walker = WalkDir::new(&self.root);
		if self.follow_links {
			walker = walker.follow_links(true);
		}
		walker
	}

	/// Pass 1: count eligible files.
	///
	/// Best-effort by contract: walk errors only shrink the pending total
	/// shown to the user, they never abort the scan.
	pub fn count_files(&self) -> usize {
		let mut total = 0usize;
		for entry in self.walker() {
			let entry = match entry {
				Ok(e) => e,
				Err(e) => {
					warn!("count walk error: {}", e);
					continue;
				}
			};
			if !entry.file_type().is_dir() {
				total += 1;
			}
		}
		debug!("counted {} files under {}", total, self.root.display());
		total
	}

	/// Pass 2: classify, move, count, and report every file.
	///
	/// Each snapshot is taken inside the counters critical section, so every
	/// job carries an internally consistent view; the filesystem work happens
	/// outside the lock. A walk-level failure aborts the run; a failed rename
	/// is recorded and the walk moves on; a failed directory creation aborts,
	/// since every later file in that bucket would fail the same way.
	pub fn run(&self, counters: &SharedCounters, queue: &RenderQueue) -> OrganizeResult<()> {
		info!(
			"organizing {} ({})",
			self.root.display(),
			self.granularity
		);

		let total = self.count_files();
		counters.with(|state| state.total_files = total);

		// Materialize the walk before mutating the tree, so files moved into
		// freshly created bucket directories are never revisited.
		let entries: Vec<_> = self.walker().into_iter().collect();

		for entry in entries {
			let entry = entry?;
			if entry.file_type().is_dir() {
				continue;
			}

			let path = entry.path();
			let metadata = match entry.metadata() {
				Ok(m) => m,
				Err(e) => {
					warn!("skipping {} (metadata error: {})", path.display(), e);
					continue;
				}
			};
			let modified = match metadata.modified() {
				Ok(ts) => DateTime::<Local>::from(ts),
				Err(e) => {
					warn!("skipping {} (mtime error: {})", path.display(), e);
					continue;
				}
			};

			let target = TargetLocation {
				dir: classify(modified, self.granularity, &self.root),
				file_name: entry.file_name().to_os_string(),
			};

			match relocate(path, &target) {
				Ok(dest) => {
					let key = self.bucket_key(modified, &target);
					let job = counters.with(|state| {
						state.record_moved(key);
						RenderJob::new(
							RenderSnapshot::from_state(state)
								.with_status(format!("moved {}", dest.display())),
						)
					});
					queue.enqueue(job);
				}
				Err(MoveError::CreateDir { path, source }) => {
					return Err(OrganizeError::CreateDir { path, source });
				}
				Err(err @ MoveError::Rename { .. }) => {
					warn!("{}", err);
					let job = counters.with(|state| {
						state.record_failed();
						RenderJob::new(RenderSnapshot::from_state(state).with_status(err.to_string()))
					});
					queue.enqueue(job);
				}
			}
		}

		info!("walk complete under {}", self.root.display());
		Ok(())
	}

	fn bucket_key(&self, modified: DateTime<Local>, target: &TargetLocation) -> BucketKey {
		match self.granularity {
			Granularity::Day => BucketKey::Flat(modified.format("%d").to_string()),
			Granularity::Year => BucketKey::Year(modified.format("%Y").to_string()),
			Granularity::YearMonth => BucketKey::Month {
				year: modified.format("%Y").to_string(),
				month: modified.format("%m - %B").to_string(),
			},
			// The finest split keys by the whole root-relative target
			// directory, one bucket per day dir.
			Granularity::YearMonthDay => BucketKey::Flat(
				target
					.dir
					.strip_prefix(&self.root)
					.unwrap_or(&target.dir)
					.to_string_lossy()
					.into_owned(),
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sync::{CompletionSync, RunState};
	use std::fs;
	use std::path::Path;
	use std::sync::Arc;
	use tempfile::TempDir;

	fn create_test_directory() -> TempDir {
		let temp_dir = TempDir::new().unwrap();
		let base_path = temp_dir.path();

		fs::write(base_path.join("a.jpg"), b"a").unwrap();
		fs::write(base_path.join("b.png"), b"b").unwrap();

		let sub_dir = base_path.join("subdir");
		fs::create_dir(&sub_dir).unwrap();
		fs::write(sub_dir.join("c.txt"), b"c").unwrap();

		temp_dir
	}

	fn expected_dir(root: &Path, file: &Path, granularity: Granularity) -> PathBuf {
		let modified = fs::metadata(file).unwrap().modified().unwrap();
		classify(DateTime::<Local>::from(modified), granularity, root)
	}

	fn run_organizer(
		organizer: &Organizer,
	) -> (Vec<RenderSnapshot>, Arc<CompletionSync>, SharedCounters) {
		let sync = Arc::new(CompletionSync::new());
		let counters = SharedCounters::new();
		let (queue, rx) = RenderQueue::new(sync.clone());

		organizer.run(&counters, &queue).unwrap();
		sync.producer_finished();

		let mut snapshots = Vec::new();
		while let Ok(job) = rx.try_recv() {
			snapshots.push(job.into_snapshot());
			sync.job_completed();
		}
		(snapshots, sync, counters)
	}

	#[test]
	fn test_count_files_skips_directories() {
		let temp_dir = create_test_directory();
		let organizer = Organizer::new(temp_dir.path(), Granularity::YearMonthDay);
		assert_eq!(organizer.count_files(), 3);
	}

	#[test_log::test]
	fn test_run_moves_every_file() {
		let temp_dir = create_test_directory();
		let root = temp_dir.path().to_path_buf();

		// Capture expected destinations before the tree is mutated.
		let expected: Vec<PathBuf> = ["a.jpg", "b.png", "subdir/c.txt"]
			.iter()
			.map(|name| {
				let source = root.join(name);
				let file_name = source.file_name().unwrap().to_os_string();
				expected_dir(&root, &source, Granularity::YearMonthDay).join(file_name)
			})
			.collect();

		let organizer = Organizer::new(&root, Granularity::YearMonthDay);
		let (snapshots, sync, counters) = run_organizer(&organizer);

		assert_eq!(sync.state(), RunState::Stopped);
		assert_eq!(snapshots.len(), 3);
		for dest in expected {
			assert!(dest.exists(), "missing {}", dest.display());
		}
		counters.with(|state| {
			assert_eq!(state.total_files, 3);
			assert_eq!(state.processed_files, 3);
			assert_eq!(state.failed_moves, 0);
			let sum: usize = state.buckets.values().sum();
			assert_eq!(sum, state.processed_files);
		});
	}

	#[test_log::test]
	fn test_jobs_execute_in_walk_order() {
		let temp_dir = create_test_directory();
		let organizer = Organizer::new(temp_dir.path(), Granularity::Day);
		let (snapshots, _, _) = run_organizer(&organizer);

		// One terminal outcome per job, in submission order.
		let outcomes: Vec<usize> = snapshots
			.iter()
			.map(|s| s.processed_files + s.failed_moves)
			.collect();
		assert_eq!(outcomes, vec![1, 2, 3]);
	}

	#[test_log::test]
	fn test_failed_move_does_not_stop_the_walk() {
		let temp_dir = TempDir::new().unwrap();
		let root = temp_dir.path().to_path_buf();
		for name in ["a.jpg", "b.jpg", "c.jpg"] {
			fs::write(root.join(name), name).unwrap();
		}

		// Block b.jpg: a directory squatting on its destination path makes
		// the rename fail while a.jpg and c.jpg go through.
		let blocked = expected_dir(&root, &root.join("b.jpg"), Granularity::Day).join("b.jpg");
		fs::create_dir_all(&blocked).unwrap();

		let organizer = Organizer::new(&root, Granularity::Day);
		let (snapshots, sync, counters) = run_organizer(&organizer);

		assert_eq!(sync.state(), RunState::Stopped);
		counters.with(|state| {
			assert_eq!(state.processed_files, 2);
			assert_eq!(state.failed_moves, 1);
			assert_eq!(state.processed_files + state.failed_moves, state.total_files);
		});
		assert!(root.join("b.jpg").exists());
		assert!(!root.join("a.jpg").exists());
		assert!(!root.join("c.jpg").exists());

		// The failure is visible in the stream, not silently dropped.
		assert!(snapshots.iter().any(|s| s.status.contains("b.jpg")));
		let last = snapshots.last().unwrap();
		assert_eq!(last.processed_files, 2);
		assert_eq!(last.failed_moves, 1);
	}

	#[test_log::test]
	fn test_year_month_buckets_nest() {
		let temp_dir = create_test_directory();
		let organizer = Organizer::new(temp_dir.path(), Granularity::YearMonth);
		let (snapshots, _, _) = run_organizer(&organizer);

		let last = snapshots.last().unwrap();
		// All fixture files share a mtime year: one year row plus its months.
		assert!(last.rows.iter().any(|r| r.label.starts_with("Year: ") && !r.indent));
		assert!(last.rows.iter().any(|r| r.indent));
		let year_total: usize = last
			.rows
			.iter()
			.filter(|r| !r.indent)
			.map(|r| r.count)
			.sum();
		assert_eq!(year_total, last.processed_files);
	}
}
