//! Shared aggregate counters for an organizing run

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Key a processed file is counted under.
///
/// Ordering is derived so a `BTreeMap` of buckets yields rows in a stable
/// display order: years ascending, months within a year ascending. A single
/// run only ever produces keys of one variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BucketKey {
	/// Single-segment bucket: a day number, or the whole root-relative target
	/// directory under the finest split.
	Flat(String),
	/// Year bucket.
	Year(String),
	/// Month within a year.
	Month { year: String, month: String },
}

/// Aggregate state for one run.
///
/// All mutation happens under the lock in [`SharedCounters`]; the display
/// only ever sees snapshots. Invariants: the bucket counts sum to
/// `processed_files`, and once the walk completes
/// `processed_files + failed_moves == total_files`.
#[derive(Debug, Default)]
pub struct AggregateState {
	/// Eligible files found by the counting pass.
	pub total_files: usize,
	/// Files moved into a bucket.
	pub processed_files: usize,
	/// Files whose rename failed; they stay at their source path.
	pub failed_moves: usize,
	/// Per-bucket counts of moved files.
	pub buckets: BTreeMap<BucketKey, usize>,
}

impl AggregateState {
	pub fn record_moved(&mut self, key: BucketKey) {
		*self.buckets.entry(key).or_insert(0) += 1;
		self.processed_files += 1;
	}

	pub fn record_failed(&mut self) {
		self.failed_moves += 1;
	}

	/// Files counted but not yet terminally classified.
	pub fn pending(&self) -> usize {
		self.total_files
			.saturating_sub(self.processed_files + self.failed_moves)
	}
}

/// Handle to the counters shared between the producer and snapshot builders.
#[derive(Debug, Clone, Default)]
pub struct SharedCounters(Arc<Mutex<AggregateState>>);

impl SharedCounters {
	pub fn new() -> Self {
		Self::default()
	}

	/// Run `f` under the lock. Critical sections stay small: counter updates
	/// and snapshot construction only, never I/O.
	pub fn with<R>(&self, f: impl FnOnce(&mut AggregateState) -> R) -> R {
		// A poisoned lock means the producer panicked mid-update; the counts
		// are still the best available view, so keep serving them.
		let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
		f(&mut state)
	}
}
