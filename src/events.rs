use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Events emitted by the workflow engine, one per accepted transition.
///
/// Events are a post-commit notification channel: a send failure never
/// rolls back the transition that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    // Procurement lifecycle
    ProcurementSubmitted(Uuid),
    ProcurementApproved { id: Uuid, reviewer: Uuid },
    ProcurementRejected { id: Uuid, reviewer: Uuid },
    ProcurementPaymentConfirmed { id: Uuid, actor: Uuid },
    ProcurementReceived { id: Uuid, receiver: Uuid },
    ProcurementCancelled { id: Uuid, actor: Uuid },

    // Transfer lifecycle
    TransferRequested(Uuid),
    TransferBranchApproved { id: Uuid, reviewer: Uuid },
    TransferWarehouseApproved { id: Uuid, reviewer: Uuid },
    TransferRejected { id: Uuid, reviewer: Uuid },
    TransferShipped { id: Uuid, actor: Uuid },
    TransferReceived { id: Uuid, actor: Uuid },
    TransferCancelled { id: Uuid, actor: Uuid },

    /// A ledger adjustment failed after its transition was committed;
    /// the request is flagged for manual reconciliation.
    ReconciliationRequired { id: Uuid, detail: String },
}

/// Sending half of the workflow event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates the workflow event channel with the given buffer capacity.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (sender, mut rx) = channel(4);
        let id = Uuid::new_v4();
        sender.send(Event::ProcurementSubmitted(id)).await.unwrap();
        assert_eq!(rx.recv().await, Some(Event::ProcurementSubmitted(id)));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (sender, rx) = channel(4);
        drop(rx);
        let result = sender.send(Event::TransferRequested(Uuid::new_v4())).await;
        assert!(result.is_err());
    }
}
