//! Board presenter: partitions a snapshot of live requests into display
//! buckets for at-a-glance monitoring.
//!
//! Read-only by construction: the presenter never issues transition
//! commands. Every call re-derives bucket membership from the store; there
//! is no incremental or optimistic client-side update, which keeps the
//! board consistent with whatever the store currently holds.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::instrument;

use crate::classifier::{classify_procurement, classify_transfer, ProcurementBucket, TransferBucket};
use crate::errors::WorkflowError;
use crate::models::{ProcurementRequest, TransferRequest};
use crate::store::RequestStore;

/// One board column: its bucket, a count for monitoring, and the member
/// requests.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary<B, R> {
    pub bucket: B,
    pub count: usize,
    pub requests: Vec<R>,
}

/// Read-only presenter over the request store.
#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn RequestStore>,
}

impl BoardService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }

    /// Procurement board in fixed display order.
    #[instrument(skip(self))]
    pub async fn procurement_board(
        &self,
    ) -> Result<Vec<BucketSummary<ProcurementBucket, ProcurementRequest>>, WorkflowError> {
        let requests = self.store.list_active_procurements().await?;
        Ok(partition(requests, classify_procurement))
    }

    /// Transfer board in fixed display order.
    #[instrument(skip(self))]
    pub async fn transfer_board(
        &self,
    ) -> Result<Vec<BucketSummary<TransferBucket, TransferRequest>>, WorkflowError> {
        let requests = self.store.list_active_transfers().await?;
        Ok(partition(requests, classify_transfer))
    }
}

/// Groups requests by bucket, emitting every bucket in enum declaration
/// order, including empty ones, so the board layout is stable.
fn partition<B, R>(requests: Vec<R>, classify: impl Fn(&R) -> B) -> Vec<BucketSummary<B, R>>
where
    B: IntoEnumIterator + Eq + Hash + Copy,
{
    let mut by_bucket: HashMap<B, Vec<R>> = HashMap::new();
    for request in requests {
        by_bucket.entry(classify(&request)).or_default().push(request);
    }

    B::iter()
        .map(|bucket| {
            let requests = by_bucket.remove(&bucket).unwrap_or_default();
            BucketSummary {
                bucket,
                count: requests.len(),
                requests,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_emits_every_bucket_in_order() {
        let summaries: Vec<BucketSummary<ProcurementBucket, u8>> =
            partition(vec![], |_| ProcurementBucket::Requested);

        let buckets: Vec<ProcurementBucket> = summaries.iter().map(|s| s.bucket).collect();
        assert_eq!(buckets, ProcurementBucket::iter().collect::<Vec<_>>());
        assert!(summaries.iter().all(|s| s.count == 0));
    }

    #[test]
    fn partition_counts_match_membership() {
        let summaries = partition(vec![1u8, 2, 3], |n| {
            if *n == 1 {
                ProcurementBucket::Requested
            } else {
                ProcurementBucket::Paid
            }
        });

        let total: usize = summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, 3);
        for summary in &summaries {
            assert_eq!(summary.count, summary.requests.len());
        }
    }
}
