// ── Event bus ──
//
// Cross-screen messages between the group selector and the controllers
// that react to it. Fire-and-forget: publishing with no subscribers is
// not an error.

use tokio::sync::broadcast;
use tracing::debug;

const BUS_CAPACITY: usize = 64;

/// A message carried on the [`EventBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusMessage {
    /// Show the group selector preset to the given group, or hide it.
    ShowGroupsFilter(Option<String>),
    /// The group selection changed; scoped screens should reload.
    ReloadPage { group: String },
}

/// Broadcast channel of [`BusMessage`]s. Clones share the channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BusMessage>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, message: BusMessage) {
        debug!(?message, "bus publish");
        // No receivers is fine.
        let _ = self.tx.send(message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }
}
