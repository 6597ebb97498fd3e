//! Procurement workflow: supplier-sourced stock intake.
//!
//! States: requested -> approved -> paid -> completed, with rejected and
//! cancelled as the other terminals. Every operation re-reads the
//! authoritative record before acting and hands the store the status it
//! observed, so a stale caller gets a conflict instead of clobbering a
//! concurrent decision.

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
    models::{validate_lines, LineItem, PaymentStatus, ProcurementRequest, ProcurementStatus},
    store::{ProcurementTransition, RequestStore},
    transitions::{procurement_next, procurement_required_role, ProcurementAction},
};

use super::ReviewDecision;

/// Input for submitting a new procurement request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProcurementRequest {
    pub supplier_id: Uuid,
    /// Destination branch for the incoming stock.
    pub branch_id: Uuid,
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub lines: Vec<LineItem>,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Service driving the procurement request lifecycle.
#[derive(Clone)]
pub struct ProcurementService {
    store: Arc<dyn RequestStore>,
    ledger: Arc<dyn StockLedger>,
    roles: Arc<dyn RoleProvider>,
    event_sender: Arc<EventSender>,
    config: EngineConfig,
}

impl ProcurementService {
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

    /// Creates a procurement request in `Requested`.
    ///
    /// Validation runs before any store call: a rejected submission never
    /// reaches persistence.
    #[instrument(skip(self, input), fields(requester = %requester))]
    pub async fn submit(
        &self,
        requester: Uuid,
        input: NewProcurementRequest,
    ) -> Result<ProcurementRequest, WorkflowError> {
        input
            .validate()
            .map_err(|e| WorkflowError::ValidationError(e.to_string()))?;
        validate_lines(&input.lines)?;
        self.ensure_role(requester, Role::Requester, None).await?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let request = ProcurementRequest {
            id,
            code: format!(
                "{}-{}",
                self.config.procurement_code_prefix,
                id.simple()
            ),
            supplier_id: input.supplier_id,
            branch_id: input.branch_id,
            lines: input.lines,
            status: ProcurementStatus::Requested,
            payment_status: PaymentStatus::Unpaid,
            requested_by: requester,
            reviewed_by: None,
            received_by: None,
            approved_total: None,
            needs_reconciliation: false,
            note: input.note,
            created_at: now,
            updated_at: now,
        };

        let saved = self.store.create_procurement(request).await?;
        info!(id = %saved.id, code = %saved.code, "procurement request submitted");
        self.publish(Event::ProcurementSubmitted(saved.id)).await;
        Ok(saved)
    }

    /// Approves or rejects a request; legal only from `Requested`.
    /// Approval fixes the total from the line prices standing at that
    /// moment.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn review(
        &self,
        id: Uuid,
        actor: Uuid,
        decision: ReviewDecision,
    ) -> Result<ProcurementRequest, WorkflowError> {
        let request = self.store.get_procurement(id).await?;
        let action = match decision {
            ReviewDecision::Approve => ProcurementAction::Approve,
            ReviewDecision::Reject => ProcurementAction::Reject,
        };
        self.ensure_role(actor, procurement_required_role(action), None)
            .await?;
        procurement_next(request.status, action)?;

        let command = match decision {
            ReviewDecision::Approve => ProcurementTransition::Approve {
                reviewer: actor,
                approved_total: request.expected_total(),
            },
            ReviewDecision::Reject => ProcurementTransition::Reject { reviewer: actor },
        };
        let updated = self
            .store
            .transition_procurement(id, request.status, command)
            .await?;

        info!(status = %updated.status, "procurement request reviewed");
        let event = match decision {
            ReviewDecision::Approve => Event::ProcurementApproved { id, reviewer: actor },
            ReviewDecision::Reject => Event::ProcurementRejected { id, reviewer: actor },
        };
        self.publish(event).await;
        Ok(updated)
    }

    /// Confirms supplier payment; legal only from `Approved`. Sets the
    /// orthogonal `payment_status` dimension alongside the status change.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn confirm_payment(
        &self,
        id: Uuid,
        actor: Uuid,
    ) -> Result<ProcurementRequest, WorkflowError> {
        let request = self.store.get_procurement(id).await?;
        self.ensure_role(actor, Role::Treasury, None).await?;
        procurement_next(request.status, ProcurementAction::ConfirmPayment)?;

        let updated = self
            .store
            .transition_procurement(
                id,
                request.status,
                ProcurementTransition::ConfirmPayment { actor },
            )
            .await?;

        info!("procurement payment confirmed");
        self.publish(Event::ProcurementPaymentConfirmed { id, actor })
            .await;
        Ok(updated)
    }

    /// Confirms receipt at the destination branch; legal only from `Paid`.
    ///
    /// This is the only procurement transition with an inventory side
    /// effect: on success the stock ledger gains every line's quantity at
    /// the destination. `Completed` is terminal and the precondition cannot
    /// recur, so the effect is at-most-once. A ledger failure after the
    /// committed transition flags the request for manual reconciliation
    /// and surfaces as `LedgerError`; it is never reported as success.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn confirm_receipt(
        &self,
        id: Uuid,
        actor: Uuid,
    ) -> Result<ProcurementRequest, WorkflowError> {
        let request = self.store.get_procurement(id).await?;
        self.ensure_role(actor, Role::BranchReceiver, Some(request.branch_id))
            .await?;
        procurement_next(request.status, ProcurementAction::ConfirmReceipt)?;

        let updated = self
            .store
            .transition_procurement(
                id,
                request.status,
                ProcurementTransition::ConfirmReceipt { receiver: actor },
            )
            .await?;

        for line in &updated.lines {
            if let Err(err) = self
                .ledger
                .adjust(updated.branch_id, line.variant_id, i64::from(line.quantity))
                .await
            {
                warn!(error = %err, variant = %line.variant_id, "ledger adjustment failed after receipt");
                self.store.flag_procurement_reconciliation(id).await?;
                self.publish(Event::ReconciliationRequired {
                    id,
                    detail: err.to_string(),
                })
                .await;
                return Err(err);
            }
        }

        info!("procurement receipt confirmed, destination stock increased");
        self.publish(Event::ProcurementReceived { id, receiver: actor })
            .await;
        Ok(updated)
    }

    /// Cancels a request; legal from `Requested`, `Approved`, or `Paid`.
    /// No inventory effect: nothing was ever received.
    #[instrument(skip(self), fields(request_id = %id, actor = %actor))]
    pub async fn cancel(
        &self,
        id: Uuid,
        actor: Uuid,
    ) -> Result<ProcurementRequest, WorkflowError> {
        let request = self.store.get_procurement(id).await?;
        self.ensure_role(actor, Role::Requester, None).await?;
        procurement_next(request.status, ProcurementAction::Cancel)?;

        let updated = self
            .store
            .transition_procurement(
                id,
                request.status,
                ProcurementTransition::Cancel { actor },
            )
            .await?;

        info!("procurement request cancelled");
        self.publish(Event::ProcurementCancelled { id, actor }).await;
        Ok(updated)
    }

    /// Fresh read of a single request.
    pub async fn get(&self, id: Uuid) -> Result<ProcurementRequest, WorkflowError> {
        self.store.get_procurement(id).await
    }

    /// All live procurement requests.
    pub async fn list_active(&self) -> Result<Vec<ProcurementRequest>, WorkflowError> {
        self.store.list_active_procurements().await
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

    /// Post-commit notification; a closed channel never rolls back a
    /// committed transition.
    async fn publish(&self, event: Event) {
        if let Err(err) = self.event_sender.send(event).await {
            warn!(error = %err, "failed to publish workflow event");
        }
    }
}
