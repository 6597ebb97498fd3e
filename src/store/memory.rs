//! In-memory request store for tests and single-process embedders.
//!
//! A single mutex serializes all transition attempts, which is what gives
//! racing callers the one-success/one-conflict behavior the engine relies
//! on. Reads and creates go straight to the maps.

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use async_trait::async_trait;

use crate::errors::WorkflowError;
use crate::models::{
    PaymentStatus, ProcurementRequest, ProcurementStatus, TransferRequest, TransferStatus,
};
use crate::transitions::{procurement_next, transfer_next};

use super::{ProcurementTransition, RequestStore, TransferTransition};

#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    procurements: DashMap<Uuid, ProcurementRequest>,
    transfers: DashMap<Uuid, TransferRequest>,
    write_lock: Mutex<()>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn create_procurement(
        &self,
        request: ProcurementRequest,
    ) -> Result<ProcurementRequest, WorkflowError> {
        if self.procurements.contains_key(&request.id) {
            return Err(WorkflowError::ValidationError(format!(
                "duplicate request id {}",
                request.id
            )));
        }
        self.procurements.insert(request.id, request.clone());
        Ok(request)
    }

    async fn get_procurement(&self, id: Uuid) -> Result<ProcurementRequest, WorkflowError> {
        self.procurements
            .get(&id)
            .map(|r| r.clone())
            .ok_or(WorkflowError::NotFound(id))
    }

    async fn transition_procurement(
        &self,
        id: Uuid,
        expected: ProcurementStatus,
        command: ProcurementTransition,
    ) -> Result<ProcurementRequest, WorkflowError> {
        let _guard = self.write_lock.lock().await;

        let mut request = self
            .procurements
            .get(&id)
            .map(|r| r.clone())
            .ok_or(WorkflowError::NotFound(id))?;

        if request.status != expected {
            return Err(WorkflowError::Conflict {
                id,
                current: request.status.to_string(),
            });
        }

        let next = procurement_next(request.status, command.action())?;

        match command {
            ProcurementTransition::Approve {
                reviewer,
                approved_total,
            } => {
                request.reviewed_by = Some(reviewer);
                request.approved_total = Some(approved_total);
            }
            ProcurementTransition::Reject { reviewer } => {
                request.reviewed_by = Some(reviewer);
            }
            ProcurementTransition::ConfirmPayment { .. } => {
                request.payment_status = PaymentStatus::Paid;
            }
            ProcurementTransition::ConfirmReceipt { receiver } => {
                request.received_by = Some(receiver);
            }
            ProcurementTransition::Cancel { .. } => {}
        }

        request.status = next;
        request.updated_at = Utc::now();
        self.procurements.insert(id, request.clone());
        Ok(request)
    }

    async fn list_active_procurements(&self) -> Result<Vec<ProcurementRequest>, WorkflowError> {
        let mut requests: Vec<ProcurementRequest> =
            self.procurements.iter().map(|r| r.clone()).collect();
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    async fn flag_procurement_reconciliation(&self, id: Uuid) -> Result<(), WorkflowError> {
        let _guard = self.write_lock.lock().await;
        match self.procurements.get_mut(&id) {
            Some(mut request) => {
                request.needs_reconciliation = true;
                request.updated_at = Utc::now();
                Ok(())
            }
            None => Err(WorkflowError::NotFound(id)),
        }
    }

    async fn create_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferRequest, WorkflowError> {
        if self.transfers.contains_key(&request.id) {
            return Err(WorkflowError::ValidationError(format!(
                "duplicate request id {}",
                request.id
            )));
        }
        self.transfers.insert(request.id, request.clone());
        Ok(request)
    }

    async fn get_transfer(&self, id: Uuid) -> Result<TransferRequest, WorkflowError> {
        self.transfers
            .get(&id)
            .map(|r| r.clone())
            .ok_or(WorkflowError::NotFound(id))
    }

    async fn transition_transfer(
        &self,
        id: Uuid,
        expected: TransferStatus,
        command: TransferTransition,
    ) -> Result<TransferRequest, WorkflowError> {
        let _guard = self.write_lock.lock().await;

        let mut request = self
            .transfers
            .get(&id)
            .map(|r| r.clone())
            .ok_or(WorkflowError::NotFound(id))?;

        if request.status != expected {
            return Err(WorkflowError::Conflict {
                id,
                current: request.status.to_string(),
            });
        }

        let next = transfer_next(request.status, command.action())?;

        match command {
            TransferTransition::ApproveBranch { reviewer }
            | TransferTransition::RejectBranch { reviewer } => {
                request.branch_reviewer_id = Some(reviewer);
            }
            TransferTransition::ApproveWarehouse { reviewer }
            | TransferTransition::RejectWarehouse { reviewer } => {
                request.warehouse_reviewer_id = Some(reviewer);
            }
            TransferTransition::Ship { .. } => {}
            TransferTransition::Receive { actor } => {
                request.received_by = Some(actor);
            }
            TransferTransition::Cancel { reason, .. } => {
                request.cancel_reason = reason;
            }
        }

        request.status = next;
        request.updated_at = Utc::now();
        self.transfers.insert(id, request.clone());
        Ok(request)
    }

    async fn list_active_transfers(&self) -> Result<Vec<TransferRequest>, WorkflowError> {
        let mut requests: Vec<TransferRequest> =
            self.transfers.iter().map(|r| r.clone()).collect();
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    async fn flag_transfer_reconciliation(&self, id: Uuid) -> Result<(), WorkflowError> {
        let _guard = self.write_lock.lock().await;
        match self.transfers.get_mut(&id) {
            Some(mut request) => {
                request.needs_reconciliation = true;
                request.updated_at = Utc::now();
                Ok(())
            }
            None => Err(WorkflowError::NotFound(id)),
        }
    }
}
