//! Domain layer - Core business logic.
//!
//! Pure session-orchestration logic: the conversation ledger, the
//! session state machine, and shared foundation types. No I/O lives
//! here; model calls go through `crate::gateway` and the ports.

pub mod foundation;
pub mod ledger;
pub mod session;
