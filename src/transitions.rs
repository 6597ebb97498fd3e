//! Transition authorizer: the per-workflow tables of
//! {current state x action} -> next state, and the role required per edge.
//!
//! Every call site goes through these tables; no screen or service
//! re-implements edge legality on its own. An undocumented edge is an
//! [`WorkflowError::IllegalTransition`] carrying the current status.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::auth::Role;
use crate::errors::WorkflowError;
use crate::models::{ProcurementStatus, TransferStatus};

/// Actions that drive the procurement state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcurementAction {
    Approve,
    Reject,
    ConfirmPayment,
    ConfirmReceipt,
    Cancel,
}

/// Resolves the next procurement status, or fails on an undocumented edge.
pub fn procurement_next(
    current: ProcurementStatus,
    action: ProcurementAction,
) -> Result<ProcurementStatus, WorkflowError> {
    use ProcurementAction as A;
    use ProcurementStatus as S;

    let next = match (current, action) {
        (S::Requested, A::Approve) => S::Approved,
        (S::Requested, A::Reject) => S::Rejected,
        (S::Approved, A::ConfirmPayment) => S::Paid,
        (S::Paid, A::ConfirmReceipt) => S::Completed,
        (S::Requested | S::Approved | S::Paid, A::Cancel) => S::Cancelled,
        (current, action) => {
            return Err(WorkflowError::IllegalTransition {
                action: action.to_string(),
                current: current.to_string(),
            })
        }
    };
    Ok(next)
}

/// Role required to drive a procurement edge.
pub fn procurement_required_role(action: ProcurementAction) -> Role {
    match action {
        ProcurementAction::Approve | ProcurementAction::Reject => Role::ProcurementReviewer,
        ProcurementAction::ConfirmPayment => Role::Treasury,
        ProcurementAction::ConfirmReceipt => Role::BranchReceiver,
        ProcurementAction::Cancel => Role::Requester,
    }
}

/// Actions that drive the transfer state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransferAction {
    ApproveBranch,
    RejectBranch,
    ApproveWarehouse,
    RejectWarehouse,
    Ship,
    Receive,
    Cancel,
}

/// Resolves the next transfer status, or fails on an undocumented edge.
/// Cancellation is legal from any non-terminal state.
pub fn transfer_next(
    current: TransferStatus,
    action: TransferAction,
) -> Result<TransferStatus, WorkflowError> {
    use TransferAction as A;
    use TransferStatus as S;

    let next = match (current, action) {
        (S::BranchPending, A::ApproveBranch) => S::WarehousePending,
        (S::BranchPending, A::RejectBranch) => S::Rejected,
        (S::WarehousePending, A::ApproveWarehouse) => S::Processing,
        (S::WarehousePending, A::RejectWarehouse) => S::Rejected,
        (S::Processing, A::Ship) => S::Shipped,
        (S::Shipped, A::Receive) => S::Completed,
        (current, A::Cancel) if !current.is_terminal() => S::Cancelled,
        (current, action) => {
            return Err(WorkflowError::IllegalTransition {
                action: action.to_string(),
                current: current.to_string(),
            })
        }
    };
    Ok(next)
}

/// Role required to drive a transfer edge. Reviewer roles are scoped by the
/// caller: `BranchReviewer` to the origin branch, `WarehouseReviewer` to the
/// destination.
pub fn transfer_required_role(action: TransferAction) -> Role {
    match action {
        TransferAction::ApproveBranch | TransferAction::RejectBranch => Role::BranchReviewer,
        TransferAction::ApproveWarehouse | TransferAction::RejectWarehouse => {
            Role::WarehouseReviewer
        }
        TransferAction::Ship | TransferAction::Receive => Role::WarehouseOperator,
        TransferAction::Cancel => Role::Requester,
    }
}
