//! Request Store boundary.
//!
//! The store is authoritative: it owns the true status field and is the
//! only writer of state transitions. The engine issues typed transition
//! commands with the status it observed, and the store rejects the command
//! with [`WorkflowError::Conflict`] when a concurrent transition raced
//! ahead. Callers always re-read (or use the returned record) rather than
//! trusting a cached copy.

pub mod memory;

pub use memory::InMemoryRequestStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rust_decimal::Decimal;

use crate::errors::WorkflowError;
use crate::models::{ProcurementRequest, ProcurementStatus, TransferRequest, TransferStatus};
use crate::transitions::{ProcurementAction, TransferAction};

/// Transition commands for procurement requests. Each variant names the
/// field effects applied alongside the status write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcurementTransition {
    /// Sets `reviewed_by` and fixes the total from the approved line prices.
    Approve { reviewer: Uuid, approved_total: Decimal },
    Reject { reviewer: Uuid },
    /// Sets `payment_status = paid` alongside the status change.
    ConfirmPayment { actor: Uuid },
    /// Sets `received_by`, at most once.
    ConfirmReceipt { receiver: Uuid },
    Cancel { actor: Uuid },
}

impl ProcurementTransition {
    pub fn action(&self) -> ProcurementAction {
        match self {
            Self::Approve { .. } => ProcurementAction::Approve,
            Self::Reject { .. } => ProcurementAction::Reject,
            Self::ConfirmPayment { .. } => ProcurementAction::ConfirmPayment,
            Self::ConfirmReceipt { .. } => ProcurementAction::ConfirmReceipt,
            Self::Cancel { .. } => ProcurementAction::Cancel,
        }
    }
}

/// Transition commands for transfer requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransferTransition {
    ApproveBranch { reviewer: Uuid },
    RejectBranch { reviewer: Uuid },
    ApproveWarehouse { reviewer: Uuid },
    RejectWarehouse { reviewer: Uuid },
    Ship { actor: Uuid },
    /// Sets `received_by`, at most once.
    Receive { actor: Uuid },
    Cancel { actor: Uuid, reason: Option<String> },
}

impl TransferTransition {
    pub fn action(&self) -> TransferAction {
        match self {
            Self::ApproveBranch { .. } => TransferAction::ApproveBranch,
            Self::RejectBranch { .. } => TransferAction::RejectBranch,
            Self::ApproveWarehouse { .. } => TransferAction::ApproveWarehouse,
            Self::RejectWarehouse { .. } => TransferAction::RejectWarehouse,
            Self::Ship { .. } => TransferAction::Ship,
            Self::Receive { .. } => TransferAction::Receive,
            Self::Cancel { .. } => TransferAction::Cancel,
        }
    }
}

/// Authoritative persistence for movement requests and their lines.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create_procurement(
        &self,
        request: ProcurementRequest,
    ) -> Result<ProcurementRequest, WorkflowError>;

    /// Fresh read of the authoritative record.
    async fn get_procurement(&self, id: Uuid) -> Result<ProcurementRequest, WorkflowError>;

    /// Applies a transition command atomically: re-checks `expected` against
    /// the current status (mismatch -> `Conflict` carrying the fresh
    /// status), resolves the edge through the transition table, applies the
    /// command's field effects, advances `updated_at`, and returns the new
    /// authoritative record.
    async fn transition_procurement(
        &self,
        id: Uuid,
        expected: ProcurementStatus,
        command: ProcurementTransition,
    ) -> Result<ProcurementRequest, WorkflowError>;

    /// All live (non-deleted) procurement requests; board input.
    async fn list_active_procurements(&self) -> Result<Vec<ProcurementRequest>, WorkflowError>;

    /// Marks a request whose post-commit ledger adjustment failed.
    async fn flag_procurement_reconciliation(&self, id: Uuid) -> Result<(), WorkflowError>;

    async fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferRequest, WorkflowError>;

    async fn get_transfer(&self, id: Uuid) -> Result<TransferRequest, WorkflowError>;

    async fn transition_transfer(
        &self,
        id: Uuid,
        expected: TransferStatus,
        command: TransferTransition,
    ) -> Result<TransferRequest, WorkflowError>;

    async fn list_active_transfers(&self) -> Result<Vec<TransferRequest>, WorkflowError>;

    async fn flag_transfer_reconciliation(&self, id: Uuid) -> Result<(), WorkflowError>;
}
