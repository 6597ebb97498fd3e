//! Actor/role oracle.
//!
//! The engine treats authorization as a yes/no question per transition edge
//! and never caches the answer; the real role store lives with the admin
//! surface, outside this crate.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Roles recognized by the two workflows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// May create requests and cancel their branch's own requests.
    Requester,
    /// Reviews procurement requests (approve/reject).
    ProcurementReviewer,
    /// Confirms supplier payment.
    Treasury,
    /// Confirms receipt of procured stock at the destination branch.
    BranchReceiver,
    /// Reviews transfers on behalf of the sending branch.
    BranchReviewer,
    /// Reviews transfers on behalf of the receiving warehouse.
    WarehouseReviewer,
    /// Ships and receives transfer stock.
    WarehouseOperator,
}

/// Yes/no oracle for role membership.
///
/// `scope` narrows the check to a branch or warehouse (e.g. a
/// `BranchReviewer` scoped to the transfer's origin branch). `None` means
/// the edge is not location-scoped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleProvider: Send + Sync {
    async fn has_role(&self, actor: Uuid, role: Role, scope: Option<Uuid>) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Grant {
    role: Role,
    /// `None` grants the role everywhere.
    scope: Option<Uuid>,
}

/// In-memory role provider for tests and embedders that manage roles
/// elsewhere.
#[derive(Debug, Default)]
pub struct StaticRoleProvider {
    grants: DashMap<Uuid, Vec<Grant>>,
}

impl StaticRoleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` to `actor` everywhere.
    pub fn grant(&self, actor: Uuid, role: Role) {
        self.grants
            .entry(actor)
            .or_default()
            .push(Grant { role, scope: None });
    }

    /// Grants `role` to `actor` only within `scope`.
    pub fn grant_scoped(&self, actor: Uuid, role: Role, scope: Uuid) {
        self.grants.entry(actor).or_default().push(Grant {
            role,
            scope: Some(scope),
        });
    }
}

#[async_trait]
impl RoleProvider for StaticRoleProvider {
    async fn has_role(&self, actor: Uuid, role: Role, scope: Option<Uuid>) -> bool {
        match self.grants.get(&actor) {
            Some(grants) => grants
                .iter()
                .any(|g| g.role == role && (g.scope.is_none() || g.scope == scope)),
            None => false,
        }
    }
}
