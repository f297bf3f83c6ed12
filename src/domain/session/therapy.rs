//! Therapy modality selection.

use serde::{Deserialize, Serialize};

/// Sentinel for a modality that has not been selected yet.
pub const NOT_DEFINED: &str = "not_defined";

/// The selected therapy modality and its reference material.
///
/// Set exactly once per session; re-selection is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyInfo {
    kind: String,
    guidelines: String,
}

impl Default for TherapyInfo {
    fn default() -> Self {
        Self {
            kind: NOT_DEFINED.to_string(),
            guidelines: NOT_DEFINED.to_string(),
        }
    }
}

impl TherapyInfo {
    /// Creates the unselected state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The modality label, or the sentinel when unselected.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Guideline text for the selected modality.
    pub fn guidelines(&self) -> &str {
        &self.guidelines
    }

    /// True once a modality has been committed.
    pub fn is_chosen(&self) -> bool {
        self.kind != NOT_DEFINED
    }

    /// Commits the modality. The first selection wins; later calls are
    /// ignored.
    pub fn choose(&mut self, kind: impl Into<String>, guidelines: impl Into<String>) {
        if self.is_chosen() {
            return;
        }
        self.kind = kind.into();
        self.guidelines = guidelines.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unselected() {
        let info = TherapyInfo::new();
        assert!(!info.is_chosen());
        assert_eq!(info.kind(), NOT_DEFINED);
        assert_eq!(info.guidelines(), NOT_DEFINED);
    }

    #[test]
    fn choose_commits_kind_and_guidelines() {
        let mut info = TherapyInfo::new();
        info.choose("cognitive_behavioral_therapy", "guideline text");
        assert!(info.is_chosen());
        assert_eq!(info.kind(), "cognitive_behavioral_therapy");
        assert_eq!(info.guidelines(), "guideline text");
    }

    #[test]
    fn second_choose_is_ignored() {
        let mut info = TherapyInfo::new();
        info.choose("psychodynamic_therapy", "first");
        info.choose("humanistic_therapy", "second");
        assert_eq!(info.kind(), "psychodynamic_therapy");
        assert_eq!(info.guidelines(), "first");
    }
}
