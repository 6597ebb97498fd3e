pub mod procurement;
pub mod transfer;

pub use procurement::{PaymentStatus, ProcurementRequest, ProcurementStatus};
pub use transfer::{TransferRequest, TransferStatus};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::WorkflowError;

/// A single product line on a movement request.
///
/// `unit_price` is provisional while the request sits in its initial state;
/// lines are immutable once the request leaves that state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub product_id: Uuid,
    pub variant_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

impl LineItem {
    /// Line total; unpriced lines contribute zero.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.unwrap_or_default() * Decimal::from(self.quantity)
    }
}

/// Shared creation-time validation for both workflows: at least one line,
/// every quantity strictly positive. Runs before any store call so a
/// rejected submission leaves no trace.
pub fn validate_lines(lines: &[LineItem]) -> Result<(), WorkflowError> {
    if lines.is_empty() {
        return Err(WorkflowError::validation(
            "at least one line item is required",
        ));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity <= 0) {
        return Err(WorkflowError::ValidationError(format!(
            "quantity must be positive for variant {} (got {})",
            line.variant_id, line.quantity
        )));
    }
    Ok(())
}
