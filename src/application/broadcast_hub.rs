// Broadcast hub - Registry of connected observers and event fan-out
use crate::application::rover_store::RoverStore;
use crate::domain::event::RoverEvent;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::{fmt, sync::Arc};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum DeliveryError {
    #[error("observer {0} is gone")]
    Closed(Uuid),
    #[error("observer {0} is not keeping up")]
    Lagging(Uuid),
}

/// Transport-independent handle to one connected observer.
/// `send` must never block.
pub trait ObserverSink: Send + Sync {
    fn id(&self) -> Uuid;
    fn send(&self, event: RoverEvent) -> Result<(), DeliveryError>;
}

/// Observer backed by a bounded queue drained by the connection's writer task
#[derive(Debug, Clone)]
pub struct ObserverConnection {
    id: Uuid,
    sender: mpsc::Sender<RoverEvent>,
}

impl ObserverConnection {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<RoverEvent>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let connection = Self {
            id: Uuid::new_v4(),
            sender,
        };
        (connection, receiver)
    }
}

impl ObserverSink for ObserverConnection {
    fn id(&self) -> Uuid {
        self.id
    }

    fn send(&self, event: RoverEvent) -> Result<(), DeliveryError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Lagging(self.id),
            TrySendError::Closed(_) => DeliveryError::Closed(self.id),
        })
    }
}

#[derive(Clone)]
pub struct BroadcastHub {
    observers: Arc<DashMap<Uuid, Arc<dyn ObserverSink>>>,
    store: Arc<RoverStore>,
    recent_limit: usize,
    /// Serializes greetings against store changes that carry a broadcast
    gate: Arc<Mutex<()>>,
}

impl fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("observer_count", &self.observers.len())
            .field("recent_limit", &self.recent_limit)
            .finish()
    }
}

impl BroadcastHub {
    pub fn new(store: Arc<RoverStore>, recent_limit: usize) -> Self {
        Self {
            observers: Arc::new(DashMap::new()),
            store,
            recent_limit,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Greet a new observer with the current status and the recent threat
    /// tail, then start including it in broadcasts. No committed change can
    /// fall between the snapshot and the registration.
    pub fn on_connect(&self, observer: Arc<dyn ObserverSink>) {
        let id = observer.id();
        let _gate = self.gate.lock();
        let greeting = [
            RoverEvent::RoverStatus(self.store.get_status()),
            RoverEvent::RecentThreats(self.store.recent_threats(self.recent_limit)),
        ];
        for event in greeting {
            if let Err(e) = observer.send(event) {
                tracing::warn!(observer = %id, error = %e, "Failed to deliver snapshot");
            }
        }

        self.observers.insert(id, observer);
        tracing::info!(observer = %id, total = self.observers.len(), "Observer connected");
    }

    pub fn on_disconnect(&self, id: Uuid) {
        if self.observers.remove(&id).is_some() {
            tracing::info!(observer = %id, total = self.observers.len(), "Observer disconnected");
        }
    }

    /// Apply a store change and broadcast the event it yields as one step
    /// relative to `on_connect`. Keep slow work (dispatch) outside `change`.
    pub fn commit<T>(
        &self,
        change: impl FnOnce(&RoverStore) -> T,
        event: impl FnOnce(&T) -> Option<RoverEvent>,
    ) -> T {
        let _gate = self.gate.lock();
        let outcome = change(&self.store);
        if let Some(event) = event(&outcome) {
            self.publish(event);
        }
        outcome
    }

    /// Deliver to every connected observer. Returns how many accepted the event.
    pub fn publish(&self, event: RoverEvent) -> usize {
        let observers: Vec<Arc<dyn ObserverSink>> =
            self.observers.iter().map(|entry| entry.value().clone()).collect();

        let mut delivered = 0;
        let mut gone = Vec::new();
        for observer in observers {
            match observer.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(DeliveryError::Closed(id)) => gone.push(id),
                Err(e @ DeliveryError::Lagging(_)) => {
                    tracing::warn!(event = event.name(), error = %e, "Dropped event for observer");
                }
            }
        }

        for id in gone {
            self.on_disconnect(id);
        }

        tracing::debug!(event = event.name(), delivered, "Published event");
        delivered
    }

    /// Reply to a single observer without broadcasting
    pub fn send_to(&self, id: Uuid, event: RoverEvent) -> Result<(), DeliveryError> {
        let observer = self
            .observers
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DeliveryError::Closed(id))?;
        observer.send(event)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
