//! Shared fixture: a fully wired engine over in-memory collaborators.
#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use uuid::Uuid;

use stockflow::auth::{Role, StaticRoleProvider};
use stockflow::config::EngineConfig;
use stockflow::events::{self, Event};
use stockflow::ledger::InMemoryStockLedger;
use stockflow::models::LineItem;
use stockflow::store::InMemoryRequestStore;
use stockflow::Engine;

pub struct TestApp {
    pub engine: Engine,
    pub store: Arc<InMemoryRequestStore>,
    pub ledger: Arc<InMemoryStockLedger>,
    pub roles: Arc<StaticRoleProvider>,
    pub events: Receiver<Event>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryRequestStore::new());
        let ledger = Arc::new(InMemoryStockLedger::new());
        let roles = Arc::new(StaticRoleProvider::new());
        let (event_sender, events) = events::channel(64);
        let engine = Engine::new(
            store.clone(),
            ledger.clone(),
            roles.clone(),
            event_sender,
            EngineConfig::default(),
        );
        Self {
            engine,
            store,
            ledger,
            roles,
            events,
        }
    }

    /// An actor granted every role everywhere; enough for happy paths that
    /// are not exercising authorization.
    pub fn superuser(&self) -> Uuid {
        let actor = Uuid::new_v4();
        for role in [
            Role::Requester,
            Role::ProcurementReviewer,
            Role::Treasury,
            Role::BranchReceiver,
            Role::BranchReviewer,
            Role::WarehouseReviewer,
            Role::WarehouseOperator,
        ] {
            self.roles.grant(actor, role);
        }
        actor
    }
}

pub fn line(variant_id: Uuid, quantity: i32, unit_price: Option<rust_decimal::Decimal>) -> LineItem {
    LineItem {
        product_id: Uuid::new_v4(),
        variant_id,
        quantity,
        unit_price,
    }
}
