//! Session events over a broadcast channel.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! A GUI shell wants to react to what the session does (update the
//! title bar on save, repaint on highlight changes) without the session
//! holding callbacks into widget code. `tokio::sync::broadcast` gives
//! that decoupling: events are plain cloneable values, subscribers pull
//! them at their own pace, and emitting never blocks an edit.

use std::path::PathBuf;
use tokio::sync::broadcast;
use webpad_syntax::Language;

/// Everything observable that happens inside a session.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A file was loaded into the session
    DocumentOpened { path: PathBuf, language: Language },
    /// The document was written to disk
    DocumentSaved { path: PathBuf },
    /// The document text changed
    DocumentChanged,
    /// The language selector changed
    LanguageChanged { language: Language },
    /// The style layer was rebuilt
    HighlightsRebuilt { ranges: usize },
    /// A find operation finished
    SearchFinished { found: bool },
    /// A preview page was written and handed to the browser
    PreviewLaunched { path: PathBuf },
}

/// Fan-out sender for session events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emits an event to all subscribers. Nobody listening is fine.
    pub fn emit(&self, event: EditorEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to all events from this point on.
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// One subscriber's view of the bus.
pub struct EventStream {
    receiver: broadcast::Receiver<EditorEvent>,
}

impl EventStream {
    /// Waits for the next event. Returns `None` once every sender is
    /// gone. A reader too slow to keep up skips the missed events with
    /// a warning instead of stalling the session.
    pub async fn next(&mut self) -> Option<EditorEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event subscriber lagged, skipping");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
