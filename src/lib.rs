#![doc(test(attr(deny(warnings))))]

//! Daybook Core keeps one person's money and life admin in a single ledger:
//! transactions, categories, accounts, budgets, tasks, plans, and diary
//! entries, with calendar-window reporting and a free-text quick-add
//! interpreter on top.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod interpreter;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes process-wide concerns for embedders. Safe to call repeatedly;
/// only the first call installs the tracing subscriber.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Daybook Core tracing initialized.");
    });
}
