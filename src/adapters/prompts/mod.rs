//! Prompt store adapters.

mod builtin;
mod fs_store;

pub use builtin::StaticPromptStore;
pub use fs_store::FsPromptStore;
