//! Background engine driving the organizing run on a producer thread

use std::sync::Arc;
use std::thread;

use async_channel as channel;
use tracing::info;

use crate::counters::SharedCounters;
use crate::organize::Organizer;
use crate::render::{RenderJob, RenderQueue};
use crate::sync::CompletionSync;

/// Lifecycle events emitted by the engine. Per-file progress travels on the
/// render-job queue, not here.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Started,
    /// The walk ran to completion; per-file failures, if any, are already in
    /// the counters.
    Completed,
    /// The walk aborted on a structural error.
    Error(String),
}

/// Everything the display thread needs: lifecycle events, the render-job
/// stream, the synchronizer, and a handle on the counters.
pub struct EngineHandles {
    pub events: channel::Receiver<EngineEvent>,
    pub jobs: channel::Receiver<RenderJob>,
    pub sync: Arc<CompletionSync>,
    pub counters: SharedCounters,
}

pub struct OrganizerEngine;

impl OrganizerEngine {
    /// Spawn the producer thread and start organizing immediately.
    ///
    /// The producer owns the walk and the counter mutation; the caller owns
    /// the display. The two only meet through the returned channels and the
    /// synchronizer.
    pub fn start(organizer: Organizer) -> EngineHandles {
        let (evt_tx, evt_rx) = channel::unbounded::<EngineEvent>();
        let sync = Arc::new(CompletionSync::new());
        let counters = SharedCounters::new();
        let (queue, job_rx) = RenderQueue::new(sync.clone());

        let thread_counters = counters.clone();
        let thread_sync = sync.clone();
        thread::Builder::new()
            .name("filecab-organizer".into())
            .spawn(move || {
                info!("engine: producer started");
                let _ = evt_tx.try_send(EngineEvent::Started);

                let result = organizer.run(&thread_counters, &queue);

                // Finished only after the last submission, so the consumer
                // observes Draining -> Stopped once the queue is empty.
                thread_sync.producer_finished();
                match result {
                    Ok(()) => {
                        let _ = evt_tx.try_send(EngineEvent::Completed);
                    }
                    Err(e) => {
                        let _ = evt_tx.try_send(EngineEvent::Error(e.to_string()));
                    }
                }
                info!("engine: producer finished");
            })
            .expect("failed to spawn organizer thread");

        EngineHandles {
            events: evt_rx,
            jobs: job_rx,
            sync,
            counters,
        }
    }
}
