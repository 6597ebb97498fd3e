//! Transfer workflow: stock movement between a branch and a central
//! warehouse, gated by two independent sign-offs.
//!
//! `ship` deducts the origin immediately and `receive` credits the
//! destination, so the goods exist in neither ledger while in transit;
//! that window reflects physical reality. Cancelling inside the window is
//! a compensating transaction: the origin is re-credited because the goods
//! never left custody in the business sense.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{Role, RoleProvider},
    config::EngineConfig,
    errors::WorkflowError,
    events::{Event, EventSender},
    ledger::StockLedger,
    models::{validate_lines, LineItem, TransferRequest, TransferStatus},
    store::{RequestStore, TransferTransition},
    transitions::{transfer_next, transfer_required_role, TransferAction},
};

use super::ReviewDecision;

/// Input for requesting a new inter-branch transfer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTransferRequest {
    pub origin_branch_id: Uuid,
    /// Receiving branch or central warehouse.
    pub destination_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub lines: Vec<LineItem>,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Service driving the transfer request lifecycle.
#[derive(Clone)]
pub struct TransferService {
    store: Arc<dyn RequestStore>,
    ledger: Arc<dyn StockLedger>,
    roles: Arc<dyn RoleProvider>,
    event_sender: Arc<EventSender>,
    config: EngineConfig,
}

impl TransferService {
    pub fn new(
        store: Arc<dyn RequestStore>,
        ledger: Arc<dyn StockLedger>,
        roles: Arc<dyn RoleProvider>,
        event_sender: Arc<EventSender>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            roles,
            event_sender,
            config,
        }
    }

    /// Creates a transfer request in `BranchPending`.
    #[instrument(skip(self, input), fields(requester = %requester))]
    pub async fn request_transfer(
        &self,
        requester: Uuid,
        input: NewTransferRequest,
    ) -> Result<TransferRequest, WorkflowError> {
        input
            .validate()
            .map_err(|e| WorkflowError::ValidationError(e.to_string()))?;
        validate_lines(&input.lines)?;
        if input.origin_branch_id == input.destination_id {
            return Err(WorkflowError::validation(
                "origin and destination must differ",
            ));
        }
        self.ensure_role(requester, Role::Requester, None).await?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let request = TransferRequest {
            id,
            code: format!("{}-{}", self.config.transfer_code_prefix, id.simple()),
            origin_branch_id: input.origin_branch_id,
            destination_id: input.destination_id,
            lines: input.lines,
            status: TransferStatus::BranchPending,
            requested_by: requester,
            branch_reviewer_id: None,
            warehouse_reviewer_id: None,
            received_by: None,
            cancel_reason: None,
            needs_reconciliation: false,
            note: input.note,
            created_at: now,
            updated_at: now,
        };

        let saved = self.store.create_transfer(request).await?;
        info!(id = %saved.id, code = %saved.code, "transfer requested");
        self.publish(Event::TransferRequested(saved.id)).await;
        Ok(saved)
    }

    /// Sending-branch sign-off; legal only from `BranchPending`. The actor
    /// must hold the branch-reviewer role scoped to the origin branch.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn review_branch(
        &self,
        id: Uuid,
        actor: Uuid,
        decision: ReviewDecision,
    ) -> Result<TransferRequest, WorkflowError> {
        let request = self.store.get_transfer(id).await?;
        let action = match decision {
            ReviewDecision::Approve => TransferAction::ApproveBranch,
            ReviewDecision::Reject => TransferAction::RejectBranch,
        };
        self.ensure_role(
            actor,
            transfer_required_role(action),
            Some(request.origin_branch_id),
        )
        .await?;
        transfer_next(request.status, action)?;

        let command = match decision {
            ReviewDecision::Approve => TransferTransition::ApproveBranch { reviewer: actor },
            ReviewDecision::Reject => TransferTransition::RejectBranch { reviewer: actor },
        };
        let updated = self.store.transition_transfer(id, request.status, command).await?;

        info!(status = %updated.status, "transfer reviewed by branch");
        let event = match decision {
            ReviewDecision::Approve => Event::TransferBranchApproved { id, reviewer: actor },
            ReviewDecision::Reject => Event::TransferRejected { id, reviewer: actor },
        };
        self.publish(event).await;
        Ok(updated)
    }

    /// Receiving-warehouse sign-off; legal only from `WarehousePending`.
    /// The actor must hold the warehouse-reviewer role scoped to the
    /// destination.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn review_warehouse(
        &self,
        id: Uuid,
        actor: Uuid,
        decision: ReviewDecision,
    ) -> Result<TransferRequest, WorkflowError> {
        let request = self.store.get_transfer(id).await?;
        let action = match decision {
            ReviewDecision::Approve => TransferAction::ApproveWarehouse,
            ReviewDecision::Reject => TransferAction::RejectWarehouse,
        };
        self.ensure_role(
            actor,
            transfer_required_role(action),
            Some(request.destination_id),
        )
        .await?;
        transfer_next(request.status, action)?;

        let command = match decision {
            ReviewDecision::Approve => TransferTransition::ApproveWarehouse { reviewer: actor },
            ReviewDecision::Reject => TransferTransition::RejectWarehouse { reviewer: actor },
        };
        let updated = self.store.transition_transfer(id, request.status, command).await?;

        info!(status = %updated.status, "transfer reviewed by warehouse");
        let event = match decision {
            ReviewDecision::Approve => Event::TransferWarehouseApproved { id, reviewer: actor },
            ReviewDecision::Reject => Event::TransferRejected { id, reviewer: actor },
        };
        self.publish(event).await;
        Ok(updated)
    }

    /// Ships the transfer; legal only from `Processing`. Stock leaves the
    /// origin immediately, before arrival, modeling goods-in-transit.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn ship(&self, id: Uuid, actor: Uuid) -> Result<TransferRequest, WorkflowError> {
        let request = self.store.get_transfer(id).await?;
        self.ensure_role(
            actor,
            Role::WarehouseOperator,
            Some(request.origin_branch_id),
        )
        .await?;
        transfer_next(request.status, TransferAction::Ship)?;

        let updated = self
            .store
            .transition_transfer(id, request.status, TransferTransition::Ship { actor })
            .await?;

        self.apply_ledger(&updated, updated.origin_branch_id, -1).await?;

        info!("transfer shipped, origin stock deducted");
        self.publish(Event::TransferShipped { id, actor }).await;
        Ok(updated)
    }

    /// Receives the transfer at the destination; legal only from `Shipped`.
    /// Completes the request and credits the destination ledger.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn receive(&self, id: Uuid, actor: Uuid) -> Result<TransferRequest, WorkflowError> {
        let request = self.store.get_transfer(id).await?;
        self.ensure_role(actor, Role::WarehouseOperator, Some(request.destination_id))
            .await?;
        transfer_next(request.status, TransferAction::Receive)?;

        let updated = self
            .store
            .transition_transfer(id, request.status, TransferTransition::Receive { actor })
            .await?;

        self.apply_ledger(&updated, updated.destination_id, 1).await?;

        info!("transfer received, destination stock increased");
        self.publish(Event::TransferReceived { id, actor }).await;
        Ok(updated)
    }

    /// Cancels a transfer; legal from any non-terminal state.
    ///
    /// Cancelling after `ship` but before `receive` reverses the shipment
    /// deduction at the origin: the goods never left custody in the
    /// business sense, so cancellation there is a compensating transaction
    /// rather than a pure status change.
    #[instrument(skip(self, reason), fields(request_id = %id, actor = %actor))]
    pub async fn cancel(
        &self,
        id: Uuid,
        actor: Uuid,
        reason: Option<String>,
    ) -> Result<TransferRequest, WorkflowError> {
        let request = self.store.get_transfer(id).await?;
        self.ensure_role(actor, Role::Requester, None).await?;
        transfer_next(request.status, TransferAction::Cancel)?;

        let in_transit = request.status == TransferStatus::Shipped;
        let updated = self
            .store
            .transition_transfer(
                id,
                request.status,
                TransferTransition::Cancel { actor, reason },
            )
            .await?;

        if in_transit {
            self.apply_ledger(&updated, updated.origin_branch_id, 1).await?;
            info!("in-transit transfer cancelled, origin stock restored");
        } else {
            info!("transfer cancelled");
        }

        self.publish(Event::TransferCancelled { id, actor }).await;
        Ok(updated)
    }

    /// Fresh read of a single request.
    pub async fn get(&self, id: Uuid) -> Result<TransferRequest, WorkflowError> {
        self.store.get_transfer(id).await
    }

    /// All live transfer requests.
    pub async fn list_active(&self) -> Result<Vec<TransferRequest>, WorkflowError> {
        self.store.list_active_transfers().await
    }

    /// Applies `sign * quantity` for every line at `location`. A failure
    /// after the committed transition flags the request for manual
    /// reconciliation and surfaces the ledger error.
    async fn apply_ledger(
        &self,
        request: &TransferRequest,
        location: Uuid,
        sign: i64,
    ) -> Result<(), WorkflowError> {
        for line in &request.lines {
            if let Err(err) = self
                .ledger
                .adjust(location, line.variant_id, sign * i64::from(line.quantity))
                .await
            {
                warn!(error = %err, variant = %line.variant_id, "ledger adjustment failed after transition");
                self.store.flag_transfer_reconciliation(request.id).await?;
                self.publish(Event::ReconciliationRequired {
                    id: request.id,
                    detail: err.to_string(),
                })
                .await;
                return Err(err);
            }
        }
        Ok(())
    }

    async fn ensure_role(
        &self,
        actor: Uuid,
        role: Role,
        scope: Option<Uuid>,
    ) -> Result<(), WorkflowError> {
        if self.roles.has_role(actor, role, scope).await {
            Ok(())
        } else {
            Err(WorkflowError::AuthorizationError {
                actor,
                role: role.to_string(),
            })
        }
    }

    async fn publish(&self, event: Event) {
        if let Err(err) = self.event_sender.send(event).await {
            warn!(error = %err, "failed to publish workflow event");
        }
    }
}
