//! Local relay for `sendData` payloads.
//!
//! The running task pushes arbitrary JSON to in-process listeners (the
//! foreground UI). Delivery is best effort: payloads sent with no listener
//! attached are dropped, lagging listeners skip the oldest payloads.

use serde_json::Value;
use tokio::sync::broadcast;

/// Broadcast of task payloads. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Relay {
    tx: broadcast::Sender<Value>,
}

impl Relay {
    /// Creates a relay buffering at most `capacity` payloads (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `payload` to every listener; returns how many received it.
    pub fn send(&self, payload: Value) -> usize {
        self.tx.send(payload).unwrap_or(0)
    }

    /// Attaches a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delivers_to_all_listeners() {
        let relay = Relay::new(4);
        assert_eq!(relay.send(json!("lost")), 0);

        let mut a = relay.subscribe();
        let mut b = relay.subscribe();
        assert_eq!(relay.send(json!({"k": 1})), 2);
        assert_eq!(a.try_recv().unwrap(), json!({"k": 1}));
        assert_eq!(b.try_recv().unwrap(), json!({"k": 1}));
    }
}
