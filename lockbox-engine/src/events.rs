//! Event hub - fans out ledger notifications
//!
//! The core only emits structured notifications; observers subscribe to a
//! broadcast channel or read the in-memory audit trail. Neither path
//! feeds back into ledger state.

use crate::models::LedgerEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::info;
use uuid::Uuid;

/// Audit-trail entry for one emitted notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub kind: String,
    pub event: LedgerEvent,
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Publishes ledger notifications to subscribers and the audit trail
pub struct EventHub {
    sender: broadcast::Sender<LedgerEvent>,
    trail: RwLock<Vec<AuditRecord>>,
}

impl EventHub {
    /// Create a hub with the given broadcast buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            trail: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to notifications emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    /// Record and broadcast a notification
    pub async fn publish(&self, event: LedgerEvent) {
        let record = AuditRecord {
            id: Uuid::new_v4(),
            kind: event.kind().to_string(),
            detail: serde_json::to_value(&event).unwrap_or(serde_json::Value::Null),
            event: event.clone(),
            created_at: Utc::now(),
        };

        info!(kind = record.kind.as_str(), "ledger event");
        self.trail.write().await.push(record);

        // A send error only means no subscriber is listening right now;
        // the audit trail still has the record.
        let _ = self.sender.send(event);
    }

    /// Snapshot of all notifications emitted so far
    pub async fn trail(&self) -> Vec<AuditRecord> {
        self.trail.read().await.clone()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Amount, Commitment};

    fn redeemed(principal: Amount) -> LedgerEvent {
        LedgerEvent::Redeemed {
            commitment: Commitment::derive("a", "b"),
            sender: AccountId::from("alice"),
            recipient: AccountId::from("carol"),
            principal,
        }
    }

    #[tokio::test]
    async fn publish_reaches_subscriber_and_trail() {
        let hub = EventHub::default();
        let mut rx = hub.subscribe();

        hub.publish(redeemed(99)).await;

        assert_eq!(rx.recv().await.unwrap(), redeemed(99));
        let trail = hub.trail().await;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].kind, "deposit.redeemed");
        assert!(trail[0].detail.is_object());
    }

    #[tokio::test]
    async fn publish_without_subscribers_still_records() {
        let hub = EventHub::default();
        hub.publish(redeemed(1)).await;
        assert_eq!(hub.trail().await.len(), 1);
    }
}
