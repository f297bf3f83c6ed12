//! Prompt Store Port - Interface for prompt template retrieval.
//!
//! Templates are organized by category and addressed by name. The store
//! returns raw template text; placeholder substitution happens at the
//! call site via [`substitute`], so implementations stay dumb.

use std::fmt;

/// Category a prompt template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptCategory {
    /// System instructions that frame the model's persona.
    System,
    /// Assistant-side scripted utterances and inference prompts.
    Assistant,
    /// Prebuilt canned responses sent without a model call.
    Prebuilt,
    /// Therapy-modality guideline documents.
    EvidenceBased,
}

impl PromptCategory {
    /// Directory or namespace segment for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::Prebuilt => "prebuilts",
            Self::EvidenceBased => "evidence_based_data",
        }
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for retrieving prompt templates.
pub trait PromptStore: Send + Sync {
    /// Fetches the raw template text for `name` under `category`.
    fn get(&self, category: PromptCategory, name: &str) -> Result<String, PromptError>;
}

/// Errors raised by prompt stores.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Category has no backing storage.
    #[error("unknown prompt category: {category}")]
    UnknownCategory {
        /// Category that failed to resolve.
        category: String,
    },

    /// Template name not found within the category.
    #[error("prompt not found: {category}/{name}")]
    NotFound {
        /// Category searched.
        category: String,
        /// Requested template name.
        name: String,
    },

    /// Template exists but could not be read.
    #[error("failed to read prompt {category}/{name}: {source}")]
    Io {
        /// Category searched.
        category: String,
        /// Requested template name.
        name: String,
        /// Underlying read failure.
        #[source]
        source: std::io::Error,
    },
}

impl PromptError {
    /// Creates a not-found error.
    pub fn not_found(category: PromptCategory, name: impl Into<String>) -> Self {
        Self::NotFound {
            category: category.as_str().to_string(),
            name: name.into(),
        }
    }
}

/// Replaces placeholder occurrences in a template, in pair order.
///
/// Each `(placeholder, value)` pair is applied as a literal
/// find-and-replace over the whole text before the next pair runs.
/// Missing placeholders are not an error; the pair is simply a no-op.
pub fn substitute(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (placeholder, value) in pairs {
        text = text.replace(placeholder, value);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_match_storage_layout() {
        assert_eq!(PromptCategory::System.as_str(), "system");
        assert_eq!(PromptCategory::Assistant.as_str(), "assistant");
        assert_eq!(PromptCategory::Prebuilt.as_str(), "prebuilts");
        assert_eq!(
            PromptCategory::EvidenceBased.as_str(),
            "evidence_based_data"
        );
    }

    #[test]
    fn substitute_replaces_in_pair_order() {
        let out = substitute(
            "Hello ### NAME ###, welcome to ### PLACE ###",
            &[("### NAME ###", "Ada"), ("### PLACE ###", "the session")],
        );
        assert_eq!(out, "Hello Ada, welcome to the session");
    }

    #[test]
    fn substitute_missing_placeholder_is_noop() {
        let out = substitute("no placeholders here", &[("### X ###", "y")]);
        assert_eq!(out, "no placeholders here");
    }

    #[test]
    fn substitute_replaces_all_occurrences() {
        let out = substitute("### A ### and ### A ###", &[("### A ###", "x")]);
        assert_eq!(out, "x and x");
    }

    #[test]
    fn not_found_error_names_category_and_template() {
        let err = PromptError::not_found(PromptCategory::Assistant, "missing");
        assert_eq!(err.to_string(), "prompt not found: assistant/missing");
    }
}
