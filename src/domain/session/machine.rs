//! The session state machine.
//!
//! Drives the fixed therapy-intake script: opening, demographic
//! gathering, demand capture, modality selection, free dialogue with
//! periodic evaluation, and closing. The current stage is derived fresh
//! every turn from the state flags; there is no stored "current state"
//! value to drift out of sync.
//!
//! One machine owns one session. `advance` is the only entry point that
//! mutates state, and the caller must serialize calls per session: at
//! most one in-flight `advance` at a time. All model calls within a
//! turn are awaited sequentially.

use std::sync::Arc;

use crate::config::{BudgetConfig, TherapistConfig};
use crate::domain::foundation::Timestamp;
use crate::domain::ledger::Turn;
use crate::gateway::{CallOptions, GatewayError, ModelGateway};
use crate::ports::{substitute, ChatMessage, PromptCategory, PromptError, PromptStore};

use super::action::Action;
use super::context::SessionContext;
use super::profile::UserProfile;
use super::state::{SessionRecord, SessionState};

/// Turns between anamnesis maintenance passes.
const ANAMNESIS_REBUILD_THRESHOLD: u32 = 5;
/// Ledger length that triggers the first anamnesis build.
const ANAMNESIS_BOOTSTRAP_TURNS: usize = 8;
/// Minimum ledger length before modality selection is attempted.
const MODALITY_SELECTION_MIN_TURNS: usize = 7;
/// Completion budget reserved for the profile-extraction reply.
const PROFILE_REPLY_TOKENS: u32 = 300;
/// Completion budget for single-index classification replies.
const CLASSIFICATION_REPLY_TOKENS: u32 = 10;
/// Iteration cap for anamnesis recompression.
const SUMMARIZE_MAX_ITERATIONS: u32 = 10;

/// Errors that abort an `advance` call.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A required prompt template is unavailable. Fatal to the turn.
    #[error("prompt template unavailable")]
    Template(#[from] PromptError),

    /// The model-call boundary failed. The turn aborts; the user turn
    /// appended at the start of `advance` remains in the ledger.
    #[error("model query failed")]
    Gateway(#[from] GatewayError),

    /// A template's embedded data did not parse.
    #[error("template {name} is malformed: {reason}")]
    MalformedTemplate {
        /// Template name.
        name: String,
        /// Parse failure detail.
        reason: String,
    },

    /// Internal serialization failed while assembling a prompt.
    #[error("serialization failed")]
    Serialization(#[from] serde_json::Error),
}

/// Result of one `advance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Assistant-facing reply text.
    pub reply: String,
    /// The client's first name, set the first time it becomes known.
    ///
    /// Signals to the host that client-side personalization may begin;
    /// at most once per session.
    pub first_name: Option<String>,
}

/// Orchestrates one therapy session.
pub struct SessionStateMachine {
    state: SessionState,
    gateway: Arc<ModelGateway>,
    prompts: Arc<dyn PromptStore>,
    therapist: TherapistConfig,
    budget: BudgetConfig,
}

impl SessionStateMachine {
    /// Creates a machine for a fresh session.
    ///
    /// The fast-model downshift is applied to `budget` here, once.
    pub fn new(
        gateway: Arc<ModelGateway>,
        prompts: Arc<dyn PromptStore>,
        therapist: TherapistConfig,
        budget: BudgetConfig,
    ) -> Self {
        Self {
            state: SessionState::new(),
            gateway,
            prompts,
            therapist,
            budget: budget.effective(),
        }
    }

    /// Read access to the session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Snapshots the session for persistence.
    pub fn get_state(&self) -> SessionRecord {
        SessionRecord::from(&self.state)
    }

    /// Restores a previously snapshotted session.
    pub fn load_state(&mut self, record: SessionRecord) {
        self.state = record.into();
    }

    /// Drops ledger turns appended after `len`.
    ///
    /// For hosts that roll back the dangling user turn left behind when
    /// `advance` fails mid-turn.
    pub fn rollback_ledger(&mut self, len: usize) {
        self.state.ledger.truncate_to(len);
    }

    /// Runs one turn of the intake script.
    ///
    /// Appends the utterance, performs anamnesis maintenance, decides
    /// and executes the next action, and appends the reply.
    ///
    /// # Errors
    ///
    /// - `Template` when a referenced prompt is missing
    /// - `Gateway` when a model call fails; no partial assistant text
    ///   is recorded, but the user turn stays appended
    pub async fn advance(&mut self, utterance: &str) -> Result<AdvanceOutcome, SessionError> {
        self.state.ledger.append(Turn::user(utterance));

        if self.state.evaluation_pending {
            self.state.feedback.record(Timestamp::now(), utterance);
            self.state.evaluation_pending = false;
        }

        self.maintain_anamnesis().await?;

        let mut action = self.decide().await?;

        if action == Action::AskForEvaluation {
            self.state.evaluation_pending = true;
        }

        // Modality selection needs enough conversation to classify; too
        // early, keep talking instead.
        if action == Action::ChooseTherapyType {
            if self.state.ledger.len() >= MODALITY_SELECTION_MIN_TURNS {
                self.choose_therapy_type().await?;
                action = if self.state.therapy_type_chosen {
                    Action::PresentTherapyType
                } else {
                    Action::ContinueConversation
                };
            } else {
                action = Action::ContinueConversation;
            }
        }

        tracing::debug!(action = action.as_str(), "dispatching action");

        let reply = self.execute(action).await?;
        self.state
            .ledger
            .append(Turn::assistant_tagged(&reply, action.as_str()));

        let first_name = if self.state.name_surfaced {
            None
        } else {
            self.state.profile.first_name().map(str::to_string)
        };
        if first_name.is_some() {
            self.state.name_surfaced = true;
        }

        Ok(AdvanceOutcome { reply, first_name })
    }

    /// Decides the next action from the state flags, first match wins.
    async fn decide(&mut self) -> Result<Action, SessionError> {
        if self.state.therapy_ended {
            return Ok(Action::EndTherapy);
        }
        if !self.state.conversation_started {
            return Ok(Action::StartConversation);
        }
        if !(self.state.user_info_complete && self.state.demand_captured) {
            if self.state.user_demand_asked_once {
                self.check_user_info().await?;
                self.check_demand().await?;
            }
            return Ok(
                if self.state.user_info_complete && self.state.demand_captured {
                    Action::ChooseTherapyType
                } else {
                    Action::AskPrimaryInformations
                },
            );
        }
        if !self.state.therapy_type_chosen {
            return Ok(Action::ChooseTherapyType);
        }
        self.evaluate_whats_next().await
    }

    async fn execute(&mut self, action: Action) -> Result<String, SessionError> {
        match action {
            Action::StartConversation => self.start_conversation(),
            Action::AskPrimaryInformations => self.ask_primary_informations(),
            Action::AskForUserInfo => self.ask_for_user_info(),
            Action::AskForDemand => self.ask_for_demand().await,
            Action::ContinueConversation => self.continue_conversation().await,
            Action::AskForEvaluation => self.ask_for_evaluation().await,
            Action::PresentTherapyType => self.present_therapy_type().await,
            Action::EndTherapy => self.end_therapy().await,
            Action::ChooseTherapyType => {
                self.choose_therapy_type().await?;
                if self.state.therapy_type_chosen {
                    self.present_therapy_type().await
                } else {
                    self.continue_conversation().await
                }
            }
        }
    }

    /// Anamnesis upkeep at the top of every turn.
    ///
    /// Once initiated, the anamnesis is extended every
    /// `ANAMNESIS_REBUILD_THRESHOLD` turns. Before that, the first build
    /// happens when the ledger reaches the bootstrap length.
    async fn maintain_anamnesis(&mut self) -> Result<(), SessionError> {
        self.state.anamnesis_rebuild_count += 1;

        if self.state.anamnesis_initiated
            && self.state.anamnesis_rebuild_count >= ANAMNESIS_REBUILD_THRESHOLD
        {
            self.state.anamnesis_rebuild_count = 0;
            self.continue_anamnesis().await?;
        } else if !self.state.anamnesis_initiated
            && self.state.ledger.len() >= ANAMNESIS_BOOTSTRAP_TURNS
        {
            let anamnesis = self.build_anamnesis().await?;
            self.state.anamnesis = anamnesis;
            self.state.anamnesis_initiated = true;
        }

        Ok(())
    }

    fn context(&self) -> SessionContext<'_> {
        SessionContext::new(
            &self.state.profile,
            &self.state.demand,
            &self.state.anamnesis,
            &self.state.therapy,
            &self.state.feedback,
        )
    }

    fn tier(&self) -> CallOptions {
        CallOptions::tiered(self.budget.only_fast_model)
    }

    fn system_check_prompt(&self) -> Result<String, PromptError> {
        self.prompts
            .get(PromptCategory::System, "system_check_prompt")
    }

    /// Renders `0: item` lines for classification menus.
    fn numbered_menu<'a>(items: impl Iterator<Item = &'a str>) -> String {
        items
            .enumerate()
            .map(|(i, item)| format!("{i}: {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // --- action handlers -------------------------------------------------

    /// Fixed opening line with the therapist's name substituted in. No
    /// model call; there is no context to condition on yet.
    fn start_conversation(&mut self) -> Result<String, SessionError> {
        self.state.conversation_started = true;
        let template = self
            .prompts
            .get(PromptCategory::Prebuilt, "start_conversation")?;
        Ok(substitute(
            &template,
            &[("### THERAPIST NAME ###", &self.therapist.name)],
        ))
    }

    /// Numbered list of still-missing intake questions.
    ///
    /// Diffs the canonical question list against the profile, drops the
    /// demand question once the demand is captured, and switches to the
    /// continuation wording after the first ask.
    fn ask_primary_informations(&mut self) -> Result<String, SessionError> {
        let query = self
            .prompts
            .get(PromptCategory::Prebuilt, "information_query")?;
        let questions: Vec<(String, String)> =
            serde_json::from_str(&query).map_err(|e| SessionError::MalformedTemplate {
                name: "information_query".to_string(),
                reason: e.to_string(),
            })?;

        let remaining: Vec<&str> = questions
            .iter()
            .filter(|(key, _)| {
                let known = matches!(self.state.profile.field(key), Some(Some(_)));
                let demand_done = self.state.demand_captured && key.contains("therapy");
                !known && !demand_done
            })
            .map(|(_, question)| question.as_str())
            .collect();

        let template_name = if self.state.user_demand_asked_once {
            "continue_ask_primary_informations"
        } else {
            "ask_primary_informations"
        };
        let template = self.prompts.get(PromptCategory::Prebuilt, template_name)?;

        let listing: String = remaining
            .iter()
            .enumerate()
            .map(|(i, question)| format!("{}: {question}\n", i + 1))
            .collect();

        self.state.user_demand_asked_once = true;

        Ok(substitute(
            &template,
            &[("### INFORMATIONS QUERY ###", &listing)],
        ))
    }

    /// Direct request for the demographic fields, by key.
    fn ask_for_user_info(&self) -> Result<String, SessionError> {
        let template = self.prompts.get(PromptCategory::Prebuilt, "ask_user_info")?;
        let keys = UserProfile::KEYS.join(", ");
        Ok(substitute(&template, &[("### USER INFOS QUERY ###", &keys)]))
    }

    /// Asks what brings the client here, paraphrased with full context.
    async fn ask_for_demand(&self) -> Result<String, SessionError> {
        let template = self
            .prompts
            .get(PromptCategory::Prebuilt, "ask_user_demand")?;
        let context = self.context().render();
        Ok(self
            .gateway
            .paraphrase(&template, Some(&context))
            .await?)
    }

    /// Free dialogue turn: specialized system prompt, context turn, and
    /// as much recent history as the input budget allows.
    async fn continue_conversation(&self) -> Result<String, SessionError> {
        let system_prompt = self
            .prompts
            .get(PromptCategory::System, "system_specialized-therapist_prompt")?;
        let system_prompt = substitute(
            &system_prompt,
            &[("### THERAPY TYPE ###", self.state.therapy.kind())],
        );
        let context = self.context().render();

        let estimator = self.gateway.estimator();
        let used = estimator.count(&system_prompt) + estimator.count(&context);
        let history_budget = i64::from(self.budget.available_for_input()) - i64::from(used);
        let history = self
            .state
            .ledger
            .suffix_by_token_budget(estimator, history_budget);

        let mut messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(context),
        ];
        messages.extend(self.state.ledger.to_model_format(Some(&history)));

        Ok(self.gateway.complete(messages, self.tier()).await?)
    }

    /// Asks the model for a feedback question grounded in context.
    async fn ask_for_evaluation(&self) -> Result<String, SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "get_feedback_answer")?;
        let prompt = substitute(&template, &[("### CONTEXT ###", &self.context().render())]);

        Ok(self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                self.tier(),
            )
            .await?)
    }

    /// Classifies the modality from the transcript and commits it.
    ///
    /// A non-digit or out-of-range reply is a warned no-op; the caller
    /// falls back to continuing the dialogue.
    async fn choose_therapy_type(&mut self) -> Result<(), SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "therapy_type_inference")?;

        let profile_json = self.state.profile.to_string();
        let transcript = serde_json::to_string(&self.state.ledger.to_model_format(None))?;
        let types = Self::numbered_menu(self.therapist.modalities.iter().map(String::as_str));

        let prompt = substitute(
            &template,
            &[
                ("### ANAMNESIS ###", self.state.anamnesis.as_str()),
                ("### USER INFORMATIONS ###", &profile_json),
                ("### USER DEMAND ###", self.state.demand.as_str()),
                ("### THERAPY TRANSCRIPT ###", &transcript),
                ("### THERAPY TYPES ###", &types),
            ],
        );

        let reply = self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                self.tier()
                    .with_max_output_tokens(CLASSIFICATION_REPLY_TOKENS),
            )
            .await?;

        let index = reply
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as usize)
            .filter(|i| *i < self.therapist.modalities.len());

        match index {
            Some(index) => {
                let kind = self.therapist.modalities[index].clone();
                let guidelines = self.prompts.get(PromptCategory::EvidenceBased, &kind)?;
                self.state.therapy.choose(kind, guidelines);
                self.state.therapy_type_chosen = true;
            }
            None => {
                tracing::warn!(reply = %reply, "modality classification was not a usable index");
            }
        }

        Ok(())
    }

    /// Presents the committed modality with rationale. Always fast tier.
    async fn present_therapy_type(&self) -> Result<String, SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "present_therapy_type")?;
        let prompt = substitute(
            &template,
            &[
                ("### CONTEXT ###", self.context().render().as_str()),
                ("### THERAPY TYPE ###", self.state.therapy.kind()),
            ],
        );

        Ok(self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                CallOptions::fast(),
            )
            .await?)
    }

    /// Closes the session. Idempotent: once ended, replies with a fixed
    /// line and issues no model call.
    async fn end_therapy(&mut self) -> Result<String, SessionError> {
        if self.state.therapy_ended {
            return Ok("Therapy already ended.".to_string());
        }
        self.state.therapy_ended = true;

        let template = self.prompts.get(PromptCategory::Prebuilt, "end_therapy")?;
        let context = self.context().render();
        Ok(self.gateway.paraphrase(&template, Some(&context)).await?)
    }

    // --- support queries -------------------------------------------------

    /// Re-extracts the profile from recent conversation.
    ///
    /// Accepts the model's reply only when it is a strict profile
    /// mapping; anything else leaves the profile untouched. The
    /// completeness flag is recomputed either way.
    async fn check_user_info(&mut self) -> Result<(), SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "user_info_inference")?;

        let profile_json = self.state.profile.to_string();
        let prompt = substitute(
            &template,
            &[("### USER INFOS QUERY ###", profile_json.as_str())],
        );

        let estimator = self.gateway.estimator();
        let used = estimator.count(&system_prompt) + estimator.count(&prompt);
        let history_budget = i64::from(self.budget.max_tokens_per_message)
            - i64::from(PROFILE_REPLY_TOKENS)
            - i64::from(used);
        let history = self
            .state
            .ledger
            .suffix_by_token_budget(estimator, history_budget);
        let transcript = serde_json::to_string(&self.state.ledger.to_model_format(Some(&history)))?;

        let prompt = substitute(&prompt, &[("### CONVERSATION ###", &transcript)]);

        // Extraction runs on the fast tier regardless of the session's
        // main model.
        let reply = self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                CallOptions::fast().with_max_output_tokens(PROFILE_REPLY_TOKENS),
            )
            .await?;

        match UserProfile::parse_update(&reply) {
            Some(update) => self.state.profile = update,
            None => {
                tracing::warn!(reply = %reply, "profile extraction reply was not a coherent mapping");
            }
        }

        self.state.user_info_complete = self.state.profile.is_complete();
        Ok(())
    }

    /// Classifies whether a demand has been stated yet.
    ///
    /// A reply not starting with `0` means captured; a `0`-prefixed
    /// reply carries the model's current guess, kept as the working
    /// demand.
    async fn check_demand(&mut self) -> Result<(), SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "check_user_demand")?;

        let transcript = serde_json::to_string(&self.state.ledger.to_model_format(None))?;
        let combined = format!("{}\nTranscription: {transcript}", self.context().render());
        let prompt = substitute(&template, &[("### CONTEXT ###", &combined)]);

        let reply = self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                self.tier(),
            )
            .await?;

        if reply.trim().starts_with('0') {
            self.state.demand = reply;
        } else {
            self.state.demand_captured = true;
        }
        Ok(())
    }

    /// Asks the model which of the post-intake actions comes next.
    ///
    /// Unparseable or out-of-range replies default to continuing the
    /// conversation.
    async fn evaluate_whats_next(&self) -> Result<Action, SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "action_type_inference")?;

        let menu = Action::EVALUATION_MENU;
        let listing = Self::numbered_menu(menu.iter().map(Action::as_str));
        let prompt = substitute(
            &template,
            &[
                ("### CONTEXT ###", self.context().render().as_str()),
                ("### ACTIONS LIST ###", listing.as_str()),
            ],
        );

        let reply = self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                self.tier()
                    .with_max_output_tokens(CLASSIFICATION_REPLY_TOKENS),
            )
            .await?;

        let index = reply
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as usize)
            .filter(|i| *i < menu.len())
            .unwrap_or_else(|| {
                tracing::warn!(reply = %reply, "unparseable next-action classification, continuing conversation");
                0
            });

        Ok(menu[index])
    }

    /// First construction of the anamnesis from full context.
    async fn build_anamnesis(&self) -> Result<String, SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "build_anamnesis")?;
        let prompt = substitute(&template, &[("### CONTEXT ###", &self.context().render())]);

        Ok(self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                self.tier(),
            )
            .await?)
    }

    /// Extends the anamnesis and recompresses it when it outgrows the
    /// configured bound. Over-length after compression is a warning,
    /// not an error.
    async fn continue_anamnesis(&mut self) -> Result<(), SessionError> {
        let system_prompt = self.system_check_prompt()?;
        let template = self
            .prompts
            .get(PromptCategory::Assistant, "anamnesis_continuation_prompt")?;
        let prompt = substitute(
            &template,
            &[
                ("### ANAMNESIS ###", self.state.anamnesis.as_str()),
                ("### CONTEXT ###", self.context().render().as_str()),
            ],
        );

        let continuation = self
            .gateway
            .complete(
                vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
                self.tier(),
            )
            .await?;

        let candidate = format!("{}{continuation}", self.state.anamnesis);
        let target = self.budget.anamnesis_length;

        if self.gateway.estimator().count(&candidate) > target {
            let summarized = self
                .gateway
                .summarize(&candidate, target, SUMMARIZE_MAX_ITERATIONS)
                .await?;
            let tokens = self.gateway.estimator().count(&summarized);
            if tokens > target {
                tracing::warn!(
                    tokens,
                    target,
                    iterations = SUMMARIZE_MAX_ITERATIONS,
                    "anamnesis still over target after recompression"
                );
            }
            self.state.anamnesis = summarized;
        } else {
            self.state.anamnesis = candidate;
        }

        Ok(())
    }
}
