//! Filesystem-backed prompt store.
//!
//! Templates live under one category subdirectory each:
//!
//! ```text
//! prompts/
//!   system/
//!   assistant/
//!   prebuilts/
//!   evidence_based_data/
//! ```
//!
//! A template's name is its file name, no extension handling.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::{PromptCategory, PromptError, PromptStore};

/// Prompt store reading templates from a directory tree.
pub struct FsPromptStore {
    root: PathBuf,
}

impl FsPromptStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PromptStore for FsPromptStore {
    fn get(&self, category: PromptCategory, name: &str) -> Result<String, PromptError> {
        let category_dir = self.root.join(category.as_str());
        if !category_dir.is_dir() {
            return Err(PromptError::UnknownCategory {
                category: category.as_str().to_string(),
            });
        }

        match std::fs::read_to_string(category_dir.join(name)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(PromptError::not_found(category, name))
            }
            Err(e) => Err(PromptError::Io {
                category: category.as_str().to_string(),
                name: name.to_string(),
                source: e,
            }),
        }
    }
}
