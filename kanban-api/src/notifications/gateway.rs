use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Messages a single connection may have queued before new ones are dropped
pub const DEFAULT_SEND_QUEUE: usize = 64;

/// Change events pushed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    BoardCreated,
    BoardUpdated,
    BoardDeleted,
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    LabelCreated,
    LabelUpdated,
    LabelDeleted,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::BoardCreated => "board:created",
            NotificationEvent::BoardUpdated => "board:updated",
            NotificationEvent::BoardDeleted => "board:deleted",
            NotificationEvent::TaskCreated => "task:created",
            NotificationEvent::TaskUpdated => "task:updated",
            NotificationEvent::TaskDeleted => "task:deleted",
            NotificationEvent::LabelCreated => "label:created",
            NotificationEvent::LabelUpdated => "label:updated",
            NotificationEvent::LabelDeleted => "label:deleted",
        }
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    event: &'a str,
    payload: &'a T,
}

struct Connection {
    id: Uuid,
    tx: mpsc::Sender<String>,
}

/// Registry of open connections keyed by user
pub struct NotificationGateway {
    connections: RwLock<HashMap<Uuid, Vec<Connection>>>,
    send_queue: usize,
}

impl Default for NotificationGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_QUEUE)
    }
}

impl NotificationGateway {
    pub fn new(send_queue: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            send_queue: send_queue.max(1),
        }
    }

    /// Adds a connection for `user_id`; returns its id and outgoing queue
    pub async fn register(&self, user_id: Uuid) -> (Uuid, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.send_queue);
        let id = Uuid::new_v4();

        self.connections
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(Connection { id, tx });

        tracing::debug!(user_id = %user_id, connection_id = %id, "Gateway connection registered");
        (id, rx)
    }

    pub async fn unregister(&self, user_id: Uuid, connection_id: Uuid) {
        let mut connections = self.connections.write().await;

        if let Some(list) = connections.get_mut(&user_id) {
            list.retain(|c| c.id != connection_id);
            if list.is_empty() {
                connections.remove(&user_id);
            }
        }

        tracing::debug!(user_id = %user_id, connection_id = %connection_id, "Gateway connection removed");
    }

    /// Number of open connections for a user
    pub async fn connection_count(&self, user_id: Uuid) -> usize {
        self.connections
            .read()
            .await
            .get(&user_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Sends `{event, payload}` to every connection of `user_ids`
    ///
    /// Returns how many connections accepted the message. Closed connections
    /// are pruned on the way.
    pub async fn broadcast<T: Serialize>(
        &self,
        user_ids: &[Uuid],
        event: NotificationEvent,
        payload: &T,
    ) -> usize {
        let message = match serde_json::to_string(&Envelope {
            event: event.as_str(),
            payload,
        }) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(event = %event, "Failed to serialize notification: {}", e);
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let connections = self.connections.read().await;
            for user_id in user_ids {
                let Some(list) = connections.get(user_id) else {
                    continue;
                };

                for connection in list {
                    match connection.tx.try_send(message.clone()) {
                        Ok(()) => delivered += 1,
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            tracing::warn!(
                                user_id = %user_id,
                                connection_id = %connection.id,
                                "Send queue full, dropping notification"
                            );
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            closed.push((*user_id, connection.id));
                        }
                    }
                }
            }
        }

        for (user_id, connection_id) in closed {
            self.unregister(user_id, connection_id).await;
        }

        tracing::debug!(event = %event, delivered, "Notification broadcast");
        delivered
    }
}
