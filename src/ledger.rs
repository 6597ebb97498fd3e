//! Stock Ledger boundary.
//!
//! The ledger is only touched by `confirm_receipt`, `ship`, `receive`, and
//! the compensating transfer `cancel`. Each adjustment is atomic per call;
//! a transition and its ledger effect are NOT a single atomic unit, which is
//! why a post-commit failure flags the request for manual reconciliation
//! instead of rolling anything back.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::WorkflowError;

/// External on-hand quantity ledger, keyed by (location, variant).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Adjusts on-hand quantity by `delta` (negative to deduct), atomically.
    async fn adjust(
        &self,
        location_id: Uuid,
        variant_id: Uuid,
        delta: i64,
    ) -> Result<(), WorkflowError>;
}

/// In-memory ledger with a failure toggle for reconciliation-path tests.
#[derive(Debug, Default)]
pub struct InMemoryStockLedger {
    balances: DashMap<(Uuid, Uuid), i64>,
    fail_next: AtomicBool,
}

impl InMemoryStockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_hand(&self, location_id: Uuid, variant_id: Uuid) -> i64 {
        self.balances
            .get(&(location_id, variant_id))
            .map(|q| *q)
            .unwrap_or(0)
    }

    pub fn set_on_hand(&self, location_id: Uuid, variant_id: Uuid, quantity: i64) {
        self.balances.insert((location_id, variant_id), quantity);
    }

    /// Makes the next `adjust` call fail once, then clear.
    pub fn fail_next_adjustment(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl StockLedger for InMemoryStockLedger {
    async fn adjust(
        &self,
        location_id: Uuid,
        variant_id: Uuid,
        delta: i64,
    ) -> Result<(), WorkflowError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(WorkflowError::LedgerError(format!(
                "adjustment of {} for variant {} at {} failed",
                delta, variant_id, location_id
            )));
        }
        *self.balances.entry((location_id, variant_id)).or_insert(0) += delta;
        Ok(())
    }
}
