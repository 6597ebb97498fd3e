use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

use super::LineItem;

/// Primary lifecycle state of a procurement request.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcurementStatus {
    Requested,
    Approved,
    Paid,
    Completed,
    Rejected,
    Cancelled,
}

impl ProcurementStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }
}

/// Secondary payment dimension, orthogonal to [`ProcurementStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// A request to bring supplier-sourced stock into a branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcurementRequest {
    pub id: Uuid,
    /// Human-readable business document number, unique, assigned at creation.
    pub code: String,
    pub supplier_id: Uuid,
    /// Destination branch receiving the stock.
    pub branch_id: Uuid,
    /// Non-empty; immutable once the request leaves `Requested`.
    pub lines: Vec<LineItem>,
    pub status: ProcurementStatus,
    pub payment_status: PaymentStatus,
    pub requested_by: Uuid,
    pub reviewed_by: Option<Uuid>,
    /// Set at most once, by `confirm_receipt`.
    pub received_by: Option<Uuid>,
    /// Fixed from the approved line prices at approval time.
    pub approved_total: Option<Decimal>,
    /// Set when a ledger adjustment failed after the transition committed.
    pub needs_reconciliation: bool,
    /// Free text; never interpreted by the engine.
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcurementRequest {
    /// Expected total cost of the request.
    ///
    /// Prices are provisional while `Requested`, so the total is recomputed
    /// from the lines; once approved it is the total fixed at approval.
    pub fn expected_total(&self) -> Decimal {
        match self.approved_total {
            Some(total) => total,
            None => self.lines.iter().map(LineItem::line_total).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request_with_lines(lines: Vec<LineItem>) -> ProcurementRequest {
        let now = Utc::now();
        ProcurementRequest {
            id: Uuid::new_v4(),
            code: "PR-test".to_string(),
            supplier_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            lines,
            status: ProcurementStatus::Requested,
            payment_status: PaymentStatus::Unpaid,
            requested_by: Uuid::new_v4(),
            reviewed_by: None,
            received_by: None,
            approved_total: None,
            needs_reconciliation: false,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(quantity: i32, price: Decimal) -> LineItem {
        LineItem {
            product_id: Uuid::new_v4(),
            variant_id: Uuid::new_v4(),
            quantity,
            unit_price: Some(price),
        }
    }

    #[test]
    fn expected_total_recomputes_while_requested() {
        let mut request = request_with_lines(vec![line(2, dec!(10.00)), line(1, dec!(5.50))]);
        assert_eq!(request.expected_total(), dec!(25.50));

        // Provisional prices: editing a line while requested moves the total.
        request.lines[0].unit_price = Some(dec!(11.00));
        assert_eq!(request.expected_total(), dec!(27.50));
    }

    #[test]
    fn expected_total_is_fixed_once_approved() {
        let mut request = request_with_lines(vec![line(2, dec!(10.00))]);
        request.approved_total = Some(dec!(20.00));
        request.status = ProcurementStatus::Approved;

        request.lines[0].unit_price = Some(dec!(99.00));
        assert_eq!(request.expected_total(), dec!(20.00));
    }

    #[test]
    fn terminal_states() {
        assert!(ProcurementStatus::Completed.is_terminal());
        assert!(ProcurementStatus::Rejected.is_terminal());
        assert!(ProcurementStatus::Cancelled.is_terminal());
        assert!(!ProcurementStatus::Requested.is_terminal());
        assert!(!ProcurementStatus::Approved.is_terminal());
        assert!(!ProcurementStatus::Paid.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ProcurementStatus::Requested).unwrap();
        assert_eq!(json, "\"requested\"");
        assert_eq!(ProcurementStatus::Paid.to_string(), "paid");
    }
}
