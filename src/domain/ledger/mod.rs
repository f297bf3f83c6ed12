//! Conversation ledger: role-tagged turns and the append-only log.

mod ledger;
mod turn;

pub use ledger::MessageLedger;
pub use turn::{Role, Turn};
