//! Published frames and the collaborators that receive them.

use serde::{Deserialize, Serialize};
use sortscope_steps::RunCounters;
use tokio::sync::broadcast;

use crate::playback::PlaybackStatus;

/// Element type shown by the visualizer.
pub type Value = u32;

/// What the renderer shows: the array and the indices to emphasize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub elements: Vec<Value>,
    pub highlighted: Vec<usize>,
}

impl Frame {
    /// A frame with nothing highlighted.
    pub fn plain(elements: Vec<Value>) -> Self {
        Self {
            elements,
            highlighted: Vec::new(),
        }
    }
}

/// Draws bars for a snapshot.
///
/// Called once per published step, on stop, and on redraw. Must be
/// idempotent: drawing the same frame twice looks the same as drawing it once.
pub trait Renderer: Send + Sync {
    fn draw(&self, elements: &[Value], highlighted: &[usize]);
}

/// Shows the comparisons/swaps/writes readout.
pub trait CounterDisplay: Send + Sync {
    fn show(&self, counters: RunCounters);
}

/// Notified whenever the controller changes state or settings.
pub trait StatusListener: Send + Sync {
    fn status_changed(&self, status: &PlaybackStatus);
}

/// Events pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisEvent {
    /// A snapshot to draw
    Frame(Frame),
    /// Updated counters readout
    Counters(RunCounters),
    /// Controller state or settings changed
    Status(PlaybackStatus),
}

/// Fans published frames out to every subscriber of a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastRenderer {
    tx: broadcast::Sender<VisEvent>,
}

impl BroadcastRenderer {
    pub fn new(tx: broadcast::Sender<VisEvent>) -> Self {
        Self { tx }
    }

    fn publish(&self, event: VisEvent) {
        // No subscribers is fine; frames are not replayed.
        let _ = self.tx.send(event);
    }
}

impl Renderer for BroadcastRenderer {
    fn draw(&self, elements: &[Value], highlighted: &[usize]) {
        self.publish(VisEvent::Frame(Frame {
            elements: elements.to_vec(),
            highlighted: highlighted.to_vec(),
        }));
    }
}

impl CounterDisplay for BroadcastRenderer {
    fn show(&self, counters: RunCounters) {
        self.publish(VisEvent::Counters(counters));
    }
}

impl StatusListener for BroadcastRenderer {
    fn status_changed(&self, status: &PlaybackStatus) {
        self.publish(VisEvent::Status(status.clone()));
    }
}
