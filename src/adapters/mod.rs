//! Adapters - Concrete implementations of the ports.
//!
//! Connects the core to the outside world: AI providers over HTTP and
//! prompt template storage.

pub mod ai;
pub mod prompts;
