//! Broadcast hub: connection registry, inbound validation and fan-out
//!
//! Each connection gets its own unbounded outbound queue, so a slow or
//! stalled client only backs up its own queue and never blocks delivery to
//! the other connections.

use {
    crate::state::RelayState,
    serde_json::Value,
    std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicU64, Ordering},
            Arc, Mutex,
        },
    },
    tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

/// A decoded reading; either field may be absent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub temp: Option<f64>,
    pub hum: Option<f64>,
}

/// Decode a raw text frame into a reading
///
/// Returns `None` unless the payload parses as a JSON object; non-numeric
/// `temp`/`hum` values are skipped, not errors.
pub fn parse_reading(raw: &str) -> Option<Reading> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;

    Some(Reading {
        temp: object.get("temp").and_then(Value::as_f64),
        hum: object.get("hum").and_then(Value::as_f64),
    })
}

/// Manages the set of live connections and relays valid readings
pub struct BroadcastHub {
    state: Arc<RelayState>,
    connections: Mutex<HashMap<u64, UnboundedSender<String>>>,
    next_id: AtomicU64,
}

impl BroadcastHub {
    pub fn new(state: Arc<RelayState>) -> Self {
        Self {
            state,
            connections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection; the receiver is the connection's outbound
    /// message queue.
    pub fn on_connect(&self) -> (u64, UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.connections.lock().unwrap().insert(id, tx);
        log::info!("Client {} connected ({} total)", id, self.connection_count());

        (id, rx)
    }

    /// Handle one inbound text frame
    ///
    /// Message arrival is a rollover trigger of its own: a long idle period
    /// followed by a message still gets correct day-partitioning before the
    /// next timer tick.
    pub fn on_message(&self, raw: &str) {
        self.state.clock.check_and_advance();

        let reading = match parse_reading(raw) {
            Some(reading) => reading,
            None => {
                log::debug!("Ignoring non-object payload");
                return;
            }
        };

        if let Some(temp) = reading.temp {
            self.state.buffer.add_temperature(temp);
        }
        if let Some(hum) = reading.hum {
            self.state.buffer.add_humidity(hum);
        }

        self.broadcast(raw);
    }

    /// Re-send the raw payload verbatim to every connection, sender included
    fn broadcast(&self, raw: &str) {
        let mut connections = self.connections.lock().unwrap();
        let mut closed = Vec::new();

        for (&id, tx) in connections.iter() {
            // A failed send means the peer task is gone; treat it as an
            // already-completed disconnect.
            if tx.send(raw.to_string()).is_err() {
                closed.push(id);
            }
        }

        for id in closed {
            connections.remove(&id);
            log::debug!("Dropped closed connection {} during broadcast", id);
        }
    }

    /// Remove a connection; a no-op if it is already gone
    pub fn on_disconnect(&self, id: u64) {
        if self.connections.lock().unwrap().remove(&id).is_some() {
            log::info!("Client {} disconnected ({} total)", id, self.connection_count());
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}
