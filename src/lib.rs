//! # Timestamp File Organizer
//!
//! Organizes files on disk into a date-derived directory hierarchy while
//! streaming live progress to an interactive terminal display. A producer
//! thread walks the tree, moves files, and mutates shared counters; the
//! display thread executes render jobs strictly in submission order and only
//! stops once every outstanding job has run.

pub mod classify;
pub mod counters;
pub mod engine;
pub mod error;
pub mod mover;
pub mod organize;
pub mod paths;
pub mod render;
pub mod sync;

// Re-export main API types
pub use classify::{classify, Granularity, TargetLocation};
pub use counters::{AggregateState, BucketKey, SharedCounters};
pub use engine::{EngineEvent, EngineHandles, OrganizerEngine};
pub use error::{MoveError, OrganizeError, OrganizeResult};
pub use organize::Organizer;
pub use render::{BucketRow, RenderJob, RenderQueue, RenderSnapshot};
pub use sync::{CompletionSync, RunState};
