//! Bank Core offers the account ledger, registry, and currency primitives
//! that power multi-account banking front ends.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod registry;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bank Core tracing initialized.");
    });
}
