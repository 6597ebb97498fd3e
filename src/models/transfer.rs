use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

use super::LineItem;

/// Primary lifecycle state of a transfer request.
///
/// The dual review gate is sequential: the sending branch signs off first
/// (`BranchPending`), then the receiving warehouse (`WarehousePending`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransferStatus {
    BranchPending,
    WarehousePending,
    Processing,
    Shipped,
    Completed,
    Rejected,
    Cancelled,
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }
}

/// A request to move stock between a branch and a central warehouse.
///
/// Between `Shipped` and `Completed` the goods are in transit and exist in
/// neither ledger; cancelling inside that window reverses the shipment
/// deduction at the origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub id: Uuid,
    pub code: String,
    pub origin_branch_id: Uuid,
    /// Receiving branch or central warehouse.
    pub destination_id: Uuid,
    pub lines: Vec<LineItem>,
    pub status: TransferStatus,
    pub requested_by: Uuid,
    /// Sign-off from the sending branch.
    pub branch_reviewer_id: Option<Uuid>,
    /// Sign-off from the receiving warehouse.
    pub warehouse_reviewer_id: Option<Uuid>,
    /// Set at most once, by `receive`.
    pub received_by: Option<Uuid>,
    pub cancel_reason: Option<String>,
    pub needs_reconciliation: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransferRequest {
    /// Total unit count across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Rejected.is_terminal());
        assert!(TransferStatus::Cancelled.is_terminal());
        assert!(!TransferStatus::BranchPending.is_terminal());
        assert!(!TransferStatus::WarehousePending.is_terminal());
        assert!(!TransferStatus::Processing.is_terminal());
        assert!(!TransferStatus::Shipped.is_terminal());
    }

    #[test]
    fn status_display_is_snake_case() {
        assert_eq!(TransferStatus::BranchPending.to_string(), "branch_pending");
        assert_eq!(
            TransferStatus::WarehousePending.to_string(),
            "warehouse_pending"
        );
    }
}
