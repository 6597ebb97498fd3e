//! Status classifier: maps a request's raw field tuple onto exactly one
//! display bucket.
//!
//! `payment_status` and `received_by` are independently-settable fields that
//! can both be set during the window between payment confirmation and
//! receipt confirmation; the precedence order here is what keeps a request
//! from rendering in two buckets or vanishing from all of them. Classifying
//! lives in one place so presentation code cannot grow divergent copies of
//! the rules.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

use crate::models::{
    PaymentStatus, ProcurementRequest, ProcurementStatus, TransferRequest, TransferStatus,
};

/// Procurement display buckets, declared in fixed board order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcurementBucket {
    Requested,
    Approved,
    Paid,
    Completed,
    Rejected,
    Cancelled,
}

/// Transfer display buckets, declared in fixed board order. The five live
/// workflow states map 1:1; no derived overlay is needed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransferBucket {
    BranchPending,
    WarehousePending,
    Processing,
    Shipped,
    Completed,
    Rejected,
    Cancelled,
}

/// Classifies a procurement request's raw field tuple. First match wins:
///
/// 1. received or completed -> `Completed`
/// 2. paid and not yet received -> `Paid`
/// 3. otherwise the primary status, verbatim
pub fn procurement_bucket(
    status: ProcurementStatus,
    payment_status: PaymentStatus,
    received_by: Option<Uuid>,
) -> ProcurementBucket {
    if received_by.is_some() || status == ProcurementStatus::Completed {
        return ProcurementBucket::Completed;
    }
    if payment_status == PaymentStatus::Paid {
        return ProcurementBucket::Paid;
    }
    match status {
        ProcurementStatus::Requested => ProcurementBucket::Requested,
        ProcurementStatus::Approved => ProcurementBucket::Approved,
        ProcurementStatus::Paid => ProcurementBucket::Paid,
        ProcurementStatus::Rejected => ProcurementBucket::Rejected,
        ProcurementStatus::Cancelled => ProcurementBucket::Cancelled,
        // Unreachable: completed was handled by the first rule.
        ProcurementStatus::Completed => ProcurementBucket::Completed,
    }
}

pub fn classify_procurement(request: &ProcurementRequest) -> ProcurementBucket {
    procurement_bucket(request.status, request.payment_status, request.received_by)
}

/// Transfer classification is the status, verbatim.
pub fn transfer_bucket(status: TransferStatus) -> TransferBucket {
    match status {
        TransferStatus::BranchPending => TransferBucket::BranchPending,
        TransferStatus::WarehousePending => TransferBucket::WarehousePending,
        TransferStatus::Processing => TransferBucket::Processing,
        TransferStatus::Shipped => TransferBucket::Shipped,
        TransferStatus::Completed => TransferBucket::Completed,
        TransferStatus::Rejected => TransferBucket::Rejected,
        TransferStatus::Cancelled => TransferBucket::Cancelled,
    }
}

pub fn classify_transfer(request: &TransferRequest) -> TransferBucket {
    transfer_bucket(request.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    #[test]
    fn paid_but_not_received_lands_in_paid_bucket() {
        // Boundary tuple: payment confirmed, receipt still pending.
        let bucket = procurement_bucket(
            ProcurementStatus::Paid,
            PaymentStatus::Paid,
            None,
        );
        assert_eq!(bucket, ProcurementBucket::Paid);
    }

    #[test]
    fn received_wins_over_paid() {
        // Boundary tuple: both dimensions set; precedence rule wins.
        let bucket = procurement_bucket(
            ProcurementStatus::Paid,
            PaymentStatus::Paid,
            Some(Uuid::new_v4()),
        );
        assert_eq!(bucket, ProcurementBucket::Completed);
    }

    #[test]
    fn completed_status_classifies_completed_without_receiver() {
        let bucket = procurement_bucket(
            ProcurementStatus::Completed,
            PaymentStatus::Paid,
            None,
        );
        assert_eq!(bucket, ProcurementBucket::Completed);
    }

    #[test]
    fn unpaid_statuses_map_verbatim() {
        for (status, expected) in [
            (ProcurementStatus::Requested, ProcurementBucket::Requested),
            (ProcurementStatus::Approved, ProcurementBucket::Approved),
            (ProcurementStatus::Rejected, ProcurementBucket::Rejected),
            (ProcurementStatus::Cancelled, ProcurementBucket::Cancelled),
        ] {
            assert_eq!(
                procurement_bucket(status, PaymentStatus::Unpaid, None),
                expected
            );
        }
    }

    #[test]
    fn transfer_statuses_map_one_to_one() {
        let buckets: Vec<TransferBucket> =
            TransferStatus::iter().map(transfer_bucket).collect();
        let expected: Vec<TransferBucket> = TransferBucket::iter().collect();
        assert_eq!(buckets, expected);
    }

    #[test]
    fn bucket_order_is_lifecycle_then_terminals() {
        let order: Vec<ProcurementBucket> = ProcurementBucket::iter().collect();
        assert_eq!(
            order,
            vec![
                ProcurementBucket::Requested,
                ProcurementBucket::Approved,
                ProcurementBucket::Paid,
                ProcurementBucket::Completed,
                ProcurementBucket::Rejected,
                ProcurementBucket::Cancelled,
            ]
        );
    }

    fn any_status() -> impl Strategy<Value = ProcurementStatus> {
        proptest::sample::select(ProcurementStatus::iter().collect::<Vec<_>>())
    }

    fn any_payment() -> impl Strategy<Value = PaymentStatus> {
        proptest::sample::select(vec![PaymentStatus::Unpaid, PaymentStatus::Paid])
    }

    proptest! {
        /// Mutual exclusivity: for every raw field tuple, exactly one of the
        /// three bucket predicates matches, and the returned bucket is the
        /// first matching one.
        #[test]
        fn exactly_one_predicate_matches(
            status in any_status(),
            payment in any_payment(),
            received in any::<bool>(),
        ) {
            let received_by = received.then(Uuid::new_v4);
            let bucket = procurement_bucket(status, payment, received_by);

            let completed_rule =
                received_by.is_some() || status == ProcurementStatus::Completed;
            let paid_rule = !completed_rule && payment == PaymentStatus::Paid;

            if completed_rule {
                prop_assert_eq!(bucket, ProcurementBucket::Completed);
            } else if paid_rule {
                prop_assert_eq!(bucket, ProcurementBucket::Paid);
            } else {
                // Verbatim mapping: bucket name equals status name.
                prop_assert_eq!(bucket.to_string(), status.to_string());
            }
        }
    }
}
