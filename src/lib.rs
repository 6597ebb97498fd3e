//! Stockflow: inventory movement workflow engine.
//!
//! Implements the dual approval state machines that govern procurement
//! requests (supplier stock entering a branch) and inter-branch transfer
//! requests (stock moving between a branch and a central warehouse).
//! Persistence, transport, and authentication live behind trait seams:
//! the engine issues transition commands against an authoritative
//! [`store::RequestStore`] and never mutates state directly.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod transitions;

use std::sync::Arc;

pub use errors::WorkflowError;

use auth::RoleProvider;
use config::EngineConfig;
use events::EventSender;
use ledger::StockLedger;
use services::board::BoardService;
use services::procurement::ProcurementService;
use services::transfers::TransferService;
use store::RequestStore;

/// Wired-up engine: both workflows plus the board presenter, sharing one
/// set of collaborators.
#[derive(Clone)]
pub struct Engine {
    pub procurement: ProcurementService,
    pub transfers: TransferService,
    pub board: BoardService,
}

impl Engine {
    pub fn new(
        store: Arc<dyn RequestStore>,
        ledger: Arc<dyn StockLedger>,
        roles: Arc<dyn RoleProvider>,
        event_sender: EventSender,
        config: EngineConfig,
    ) -> Self {
        let event_sender = Arc::new(event_sender);
        Self {
            procurement: ProcurementService::new(
                store.clone(),
                ledger.clone(),
                roles.clone(),
                event_sender.clone(),
                config.clone(),
            ),
            transfers: TransferService::new(store.clone(), ledger, roles, event_sender, config),
            board: BoardService::new(store),
        }
    }
}
