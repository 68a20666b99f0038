//! Completion handshake between the producer and the display loop

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Lifecycle of the run as seen by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
	/// The producer is still walking.
	Running,
	/// The producer is done; render jobs are still outstanding.
	Draining,
	/// The producer is done and every submitted job has executed.
	Stopped,
}

/// Tracks producer completion and outstanding render jobs.
///
/// The display loop keeps running until this reports [`RunState::Stopped`],
/// which is what guarantees the final counter state is on screen before the
/// process exits. Stopping any earlier truncates the visible progress.
///
/// The producer bumps the outstanding count before each submission and sets
/// the finished flag only after its last submission, so `Stopped` can never
/// be observed while a job is still in flight.
#[derive(Debug, Default)]
pub struct CompletionSync {
	outstanding: AtomicUsize,
	finished: AtomicBool,
}

impl CompletionSync {
	pub fn new() -> Self {
		Self::default()
	}

	/// Called by the producer before handing a job to the queue.
	pub fn job_submitted(&self) {
		self.outstanding.fetch_add(1, Ordering::SeqCst);
	}

	/// Called by the display loop after a job has fully executed.
	pub fn job_completed(&self) {
		let prev = self.outstanding.fetch_sub(1, Ordering::SeqCst);
		debug_assert!(prev > 0, "job_completed without a matching job_submitted");
	}

	/// One-shot: the producer's walk is fully traversed, every per-file
	/// outcome already submitted.
	pub fn producer_finished(&self) {
		self.finished.store(true, Ordering::SeqCst);
	}

	pub fn state(&self) -> RunState {
		if !self.finished.load(Ordering::SeqCst) {
			RunState::Running
		} else if self.outstanding.load(Ordering::SeqCst) > 0 {
			RunState::Draining
		} else {
			RunState::Stopped
		}
	}
}
