use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::ItemKind;

/// Handle used by services to publish domain events after a successful
/// commit. Events never participate in the transaction itself.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Domain events emitted by the reconciliation services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Stock ledger events
    StockIncreased {
        article_id: Uuid,
        quantity: Decimal,
        stock_after: Decimal,
        movement_id: Uuid,
    },
    StockDecreased {
        article_id: Uuid,
        quantity: Decimal,
        stock_after: Decimal,
        movement_id: Uuid,
    },

    // Delivery events
    DeliveryCreated {
        delivery_id: Uuid,
        number: String,
        kind: ItemKind,
    },
    RequestFullyDispatched {
        request_id: Uuid,
    },

    // Reception events
    ReceptionCreated {
        reception_id: Uuid,
        number: String,
        kind: ItemKind,
    },
    ReceptionLineAdded {
        reception_id: Uuid,
        line_id: Uuid,
    },
    ReceptionConfirmed {
        reception_id: Uuid,
    },
    ReceptionCancelled {
        reception_id: Uuid,
    },

    // Registry events
    ArticleCreated {
        article_id: Uuid,
    },
    AssetCreated {
        asset_id: Uuid,
    },
}

/// Drains the event channel, logging each event. Production deployments
/// replace this with real subscribers (notifications, projections).
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
    warn!("event channel closed");
}

/// Convenience constructor for an event channel pair.
pub fn event_channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}
