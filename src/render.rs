//! Render jobs and the FIFO queue feeding the display thread

use std::sync::Arc;

use async_channel as channel;

use crate::counters::{AggregateState, BucketKey};
use crate::sync::CompletionSync;

/// One display row: a bucket label and its count. Month rows sit indented
/// beneath their year-total row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRow {
	pub label: String,
	pub count: usize,
	pub indent: bool,
}

/// Immutable view of the aggregate state, captured under the counters lock.
///
/// Render jobs carry one of these instead of touching the live counters, so
/// the display never needs the lock and never observes a half-applied update.
#[derive(Debug, Clone, Default)]
pub struct RenderSnapshot {
	pub total_files: usize,
	pub processed_files: usize,
	pub failed_moves: usize,
	pub pending_files: usize,
	pub rows: Vec<BucketRow>,
	/// Last action or failure, e.g. `moved /photos/2024/a.jpg`.
	pub status: String,
}

impl RenderSnapshot {
	/// Build a snapshot from the current counters. Callers hold the lock.
	pub fn from_state(state: &AggregateState) -> Self {
		Self {
			total_files: state.total_files,
			processed_files: state.processed_files,
			failed_moves: state.failed_moves,
			pending_files: state.pending(),
			rows: bucket_rows(state),
			status: String::new(),
		}
	}

	pub fn with_status(mut self, status: impl Into<String>) -> Self {
		self.status = status.into();
		self
	}
}

fn bucket_rows(state: &AggregateState) -> Vec<BucketRow> {
	let mut rows = Vec::new();
	let mut iter = state.buckets.iter().peekable();

	while let Some((key, count)) = iter.next() {
		match key {
			BucketKey::Flat(label) => rows.push(BucketRow {
				label: label.clone(),
				count: *count,
				indent: false,
			}),
			BucketKey::Year(year) => rows.push(BucketRow {
				label: format!("Year: {year}"),
				count: *count,
				indent: false,
			}),
			BucketKey::Month { year, month } => {
				// BTreeMap order groups a year's months together; emit the
				// year total first, then its months indented.
				let mut months = vec![BucketRow {
					label: month.clone(),
					count: *count,
					indent: true,
				}];
				let mut total = *count;
				loop {
					let next = match iter.peek() {
						Some((BucketKey::Month { year: y, month: m }, c)) if y == year => {
							Some((m.clone(), **c))
						}
						_ => None,
					};
					match next {
						Some((month, count)) => {
							months.push(BucketRow {
								label: month,
								count,
								indent: true,
							});
							total += count;
							iter.next();
						}
						None => break,
					}
				}
				rows.push(BucketRow {
					label: format!("Year: {year}"),
					count: total,
					indent: false,
				});
				rows.append(&mut months);
			}
		}
	}

	rows
}

/// A snapshot-carrying instruction for the display owner. Executed exactly
/// once by the display thread, in submission order.
#[derive(Debug, Clone)]
pub struct RenderJob {
	snapshot: RenderSnapshot,
}

impl RenderJob {
	pub fn new(snapshot: RenderSnapshot) -> Self {
		Self { snapshot }
	}

	/// Execute the job: hand its snapshot to the display.
	pub fn into_snapshot(self) -> RenderSnapshot {
		self.snapshot
	}
}

/// Producer-side handle of the render queue.
///
/// The channel is unbounded, so submission never blocks the walk. The
/// outstanding count is bumped before the job is handed over: the
/// synchronizer can never observe a submitted-but-uncounted job.
#[derive(Clone)]
pub struct RenderQueue {
	tx: channel::Sender<RenderJob>,
	sync: Arc<CompletionSync>,
}

impl RenderQueue {
	/// Create the queue. The receiver end belongs to the display thread and
	/// must execute jobs strictly in arrival order, one at a time.
	pub fn new(sync: Arc<CompletionSync>) -> (Self, channel::Receiver<RenderJob>) {
		let (tx, rx) = channel::unbounded();
		(Self { tx, sync }, rx)
	}

	pub fn enqueue(&self, job: RenderJob) {
		self.sync.job_submitted();
		if self.tx.try_send(job).is_err() {
			// Receiver gone: the display was torn down early. Balance the
			// counter so the synchronizer can still reach Stopped.
			self.sync.job_completed();
		}
	}
}
