#![doc(test(attr(deny(warnings))))]

//! Recurring Core decides which occurrences of recurring expenses are due,
//! materializes them exactly once, and advances each pattern's progress
//! marker so repeated runs stay idempotent.

pub mod config;
pub mod engine;
pub mod errors;
pub mod journal;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Recurring Core tracing initialized.");
    });
}
