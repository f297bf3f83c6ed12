//! Therapist and token-budget configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Therapist presentation and available modalities.
#[derive(Debug, Clone, Deserialize)]
pub struct TherapistConfig {
    /// Display name substituted into the opening message.
    #[serde(default = "default_therapist_name")]
    pub name: String,

    /// Therapy modalities the selection step may choose from.
    #[serde(default = "default_modalities")]
    pub modalities: Vec<String>,
}

impl TherapistConfig {
    /// Validate therapist configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("therapist.name"));
        }
        if self.modalities.is_empty() {
            return Err(ValidationError::invalid(
                "therapist.modalities",
                "at least one modality is required",
            ));
        }
        Ok(())
    }
}

impl Default for TherapistConfig {
    fn default() -> Self {
        Self {
            name: default_therapist_name(),
            modalities: default_modalities(),
        }
    }
}

fn default_therapist_name() -> String {
    "Alex".to_string()
}

fn default_modalities() -> Vec<String> {
    vec![
        "cognitive_behavioral_therapy".to_string(),
        "psychodynamic_therapy".to_string(),
        "humanistic_therapy".to_string(),
    ]
}

/// Token budgets governing prompt assembly and answer sizing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BudgetConfig {
    /// Hard input ceiling per model call.
    #[serde(default = "default_max_tokens_per_message")]
    pub max_tokens_per_message: u32,

    /// Tokens reserved for the model answer.
    #[serde(default = "default_max_token_answer")]
    pub max_token_answer: u32,

    /// Target length of the running anamnesis.
    #[serde(default = "default_anamnesis_length")]
    pub anamnesis_length: u32,

    /// Route every call to the fast tier and shrink all budgets.
    #[serde(default)]
    pub only_fast_model: bool,
}

impl BudgetConfig {
    /// Returns the budgets with the fast-model downshift applied.
    ///
    /// When `only_fast_model` is set the ceilings drop to fit the smaller
    /// model's context window.
    pub fn effective(self) -> Self {
        if self.only_fast_model {
            Self {
                max_tokens_per_message: 4096,
                max_token_answer: 1024,
                anamnesis_length: 1024,
                only_fast_model: true,
            }
        } else {
            self
        }
    }

    /// Input tokens left once the answer reservation is subtracted.
    pub fn available_for_input(&self) -> u32 {
        self.max_tokens_per_message
            .saturating_sub(self.max_token_answer)
    }

    /// Validate budget configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_tokens_per_message == 0 {
            return Err(ValidationError::invalid(
                "budget.max_tokens_per_message",
                "must be positive",
            ));
        }
        if self.max_token_answer >= self.max_tokens_per_message {
            return Err(ValidationError::invalid(
                "budget.max_token_answer",
                "must be smaller than max_tokens_per_message",
            ));
        }
        Ok(())
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_message: default_max_tokens_per_message(),
            max_token_answer: default_max_token_answer(),
            anamnesis_length: default_anamnesis_length(),
            only_fast_model: false,
        }
    }
}

fn default_max_tokens_per_message() -> u32 {
    8192
}

fn default_max_token_answer() -> u32 {
    2048
}

fn default_anamnesis_length() -> u32 {
    2048
}

#[cfg(test)]
mod tests {
    use super::*;

    mod therapist {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            assert!(TherapistConfig::default().validate().is_ok());
        }

        #[test]
        fn empty_name_rejected() {
            let config = TherapistConfig {
                name: "  ".to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_modalities_rejected() {
            let config = TherapistConfig {
                modalities: vec![],
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    mod budget {
        use super::*;

        #[test]
        fn defaults_match_full_model() {
            let budget = BudgetConfig::default();
            assert_eq!(budget.max_tokens_per_message, 8192);
            assert_eq!(budget.max_token_answer, 2048);
            assert_eq!(budget.anamnesis_length, 2048);
        }

        #[test]
        fn effective_applies_fast_model_downshift() {
            let budget = BudgetConfig {
                only_fast_model: true,
                ..Default::default()
            }
            .effective();
            assert_eq!(budget.max_tokens_per_message, 4096);
            assert_eq!(budget.max_token_answer, 1024);
            assert_eq!(budget.anamnesis_length, 1024);
        }

        #[test]
        fn effective_is_identity_for_full_model() {
            let budget = BudgetConfig::default().effective();
            assert_eq!(budget.max_tokens_per_message, 8192);
        }

        #[test]
        fn available_for_input_subtracts_answer() {
            let budget = BudgetConfig::default();
            assert_eq!(budget.available_for_input(), 8192 - 2048);
        }

        #[test]
        fn answer_exceeding_ceiling_rejected() {
            let budget = BudgetConfig {
                max_tokens_per_message: 1024,
                max_token_answer: 2048,
                ..Default::default()
            };
            assert!(budget.validate().is_err());
        }
    }
}
