pub mod board;
pub mod procurement;
pub mod transfers;

use serde::{Deserialize, Serialize};

/// A reviewer's verdict on a pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}
