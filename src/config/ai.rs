//! AI provider configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration.
///
/// The orchestrator uses two model tiers: a full-quality model for
/// client-facing dialogue and a fast model for side queries
/// (classification, profile extraction, summarization).
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the completion endpoint.
    pub api_key: Option<String>,

    /// Full-tier model identifier.
    #[serde(default = "default_full_model")]
    pub full_model: String,

    /// Fast-tier model identifier.
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::NoAiProviderConfigured);
        }
        if self.full_model.is_empty() {
            return Err(ValidationError::MissingRequired("ai.full_model"));
        }
        if self.fast_model.is_empty() {
            return Err(ValidationError::MissingRequired("ai.fast_model"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            full_model: default_full_model(),
            fast_model: default_fast_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_full_model() -> String {
    "gpt-4".to_string()
}

fn default_fast_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.full_model, "gpt-4");
        assert_eq!(config.fast_model, "gpt-3.5-turbo");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_no_key() {
        let config = AiConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_key_rejected() {
        let config = AiConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AiConfig {
            api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
