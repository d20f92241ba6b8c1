//--------------------------------------------------------------------------------------------------
// STRUCTS & TRAITS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Key Methods       |
// |-------------------------|---------------------------------------------------|------------------|
// | EventHandler            | Trait for components that react to events        | event_types, handle_event |
// | EventLogger             | In-memory ring buffer of recently seen events     | get_history        |
// | PersistenceEventHandler | Appends each event as one JSON line per file      | handle_event       |
//--------------------------------------------------------------------------------------------------

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, error};

use super::event_types::{EventError, EventResult, MatchingEngineEvent};

/// A component that reacts to a subset of `MatchingEngineEvent` variants.
///
/// `event_types()` declares, by variant name, which events this handler wants
/// to see; `EventDispatcher` only routes matching events to it.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Variant names (matching the `&str` the dispatcher keys handlers by)
    /// this handler wants to receive.
    fn event_types(&self) -> Vec<&'static str>;

    async fn handle_event(&self, event: MatchingEngineEvent) -> EventResult<()>;
}

/// Keeps the most recent `capacity` events in memory. Useful for tests and
/// for a lightweight "what just happened" inspection endpoint.
#[derive(Debug)]
pub struct EventLogger {
    capacity: usize,
    history: RwLock<Vec<MatchingEngineEvent>>,
}

impl EventLogger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    pub async fn get_history(&self) -> Vec<MatchingEngineEvent> {
        self.history.read().await.clone()
    }
}

#[async_trait]
impl EventHandler for EventLogger {
    fn event_types(&self) -> Vec<&'static str> {
        vec![
            "OrderAdded",
            "OrderCancelled",
            "TradeExecuted",
            "ExecutionReportEvent",
            "DepthUpdated",
        ]
    }

    async fn handle_event(&self, event: MatchingEngineEvent) -> EventResult<()> {
        debug!(?event, "EventLogger recorded event");
        let mut history = self.history.write().await;
        if history.len() >= self.capacity {
            history.remove(0);
        }
        history.push(event);
        Ok(())
    }
}

/// Appends every event it sees to `<dir>/events-<n>.jsonl`, one JSON object
/// per line, rolling to a new file every `events_per_file` writes.
#[derive(Debug)]
pub struct PersistenceEventHandler {
    dir: PathBuf,
    events_per_file: u64,
    written: AtomicU64,
    file_index: AtomicU64,
}

impl PersistenceEventHandler {
    pub fn new(dir: impl AsRef<Path>, events_per_file: u64) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            events_per_file: events_per_file.max(1),
            written: AtomicU64::new(0),
            file_index: AtomicU64::new(0),
        })
    }

    fn current_path(&self) -> PathBuf {
        let idx = self.file_index.load(Ordering::Relaxed);
        self.dir.join(format!("events-{idx}.jsonl"))
    }
}

#[async_trait]
impl EventHandler for PersistenceEventHandler {
    fn event_types(&self) -> Vec<&'static str> {
        vec![
            "OrderAdded",
            "OrderCancelled",
            "TradeExecuted",
            "ExecutionReportEvent",
            "DepthUpdated",
        ]
    }

    async fn handle_event(&self, event: MatchingEngineEvent) -> EventResult<()> {
        let line = serde_json::to_string(&event)
            .map_err(|e| EventError::ProcessingError(e.to_string()))?;

        let path = self.current_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| EventError::ProcessingError(e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| EventError::ProcessingError(e.to_string()))?;
        file.write_all(b"\n")
            .await
            .map_err(|e| EventError::ProcessingError(e.to_string()))?;

        let written = self.written.fetch_add(1, Ordering::Relaxed) + 1;
        if written % self.events_per_file == 0 {
            self.file_index.fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }
}

/// Fans an event out to every handler registered for its type. Lighter-weight
/// than `EventDispatcher` for callers that don't need the broadcast-channel
/// buffering, e.g. a synchronous test harness.
pub async fn dispatch_to(handlers: &[Arc<dyn EventHandler>], event: MatchingEngineEvent) {
    let event_type = match &event {
        MatchingEngineEvent::OrderAdded { .. } => "OrderAdded",
        MatchingEngineEvent::OrderCancelled { .. } => "OrderCancelled",
        MatchingEngineEvent::TradeExecuted { .. } => "TradeExecuted",
        MatchingEngineEvent::ExecutionReportEvent { .. } => "ExecutionReportEvent",
        MatchingEngineEvent::DepthUpdated { .. } => "DepthUpdated",
    };
    for handler in handlers {
        if handler.event_types().contains(&event_type) {
            if let Err(err) = handler.handle_event(event.clone()).await {
                error!(%err, "event handler failed");
            }
        }
    }
}
