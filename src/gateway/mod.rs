//! Model gateway: budget-aware access to the completion capability.
//!
//! Wraps the [`AIProvider`] port with the token-ceiling enforcement every
//! caller needs: before a request goes out, the candidate message list is
//! trimmed down to the configured input ceiling by evicting turns under a
//! configurable policy. System messages are never evicted. Summarization
//! and paraphrase are exposed as composed operations on top of
//! [`ModelGateway::complete`].
//!
//! Failures from the provider map to [`GatewayError::Transient`]; the
//! gateway never retries internally.

use std::sync::Arc;

use crate::domain::foundation::TokenEstimator;
use crate::ports::{AIError, AIProvider, ChatMessage, CompletionRequest, MessageRole};

/// Which model services a call, trading quality for latency and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    /// The full-size model.
    #[default]
    Full,
    /// The smaller, faster model.
    Fast,
}

/// Token ceilings the gateway enforces.
#[derive(Debug, Clone, Copy)]
pub struct GatewayLimits {
    /// Hard ceiling on input tokens per request.
    pub max_input_tokens: u32,
    /// Default completion budget when a call does not override it.
    pub max_answer_tokens: u32,
}

impl GatewayLimits {
    /// Creates new limits.
    pub fn new(max_input_tokens: u32, max_answer_tokens: u32) -> Self {
        Self {
            max_input_tokens,
            max_answer_tokens,
        }
    }
}

/// Which message to drop when the input exceeds the ceiling.
///
/// System messages are protected under every policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Evict the first non-system message containing `marker`, falling
    /// back to the earliest non-system message when no marker is found.
    ///
    /// The marker singles out injected context turns, which are cheaper
    /// to lose than real conversation.
    MarkerFirst {
        /// Substring identifying the preferred eviction target.
        marker: String,
    },
    /// Evict the earliest non-system message.
    OldestFirst,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::MarkerFirst {
            marker: "CONTEXT".to_string(),
        }
    }
}

impl EvictionPolicy {
    /// Picks the index to evict from `messages`, or `None` if nothing
    /// may be evicted.
    fn pick(&self, messages: &[ChatMessage]) -> Option<usize> {
        let mut fallback = None;
        for (index, message) in messages.iter().enumerate() {
            if message.role == MessageRole::System {
                continue;
            }
            if fallback.is_none() {
                fallback = Some(index);
            }
            if let Self::MarkerFirst { marker } = self {
                if message.content.contains(marker.as_str()) {
                    return Some(index);
                }
            }
        }
        fallback
    }
}

/// Per-call options for [`ModelGateway::complete`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    /// Model tier to use.
    pub tier: Tier,
    /// Override for the completion budget.
    pub max_output_tokens: Option<u32>,
}

impl CallOptions {
    /// Options targeting the full model.
    pub fn full() -> Self {
        Self {
            tier: Tier::Full,
            ..Self::default()
        }
    }

    /// Options targeting the fast model.
    pub fn fast() -> Self {
        Self {
            tier: Tier::Fast,
            ..Self::default()
        }
    }

    /// Selects the tier from a boolean downshift switch.
    pub fn tiered(fast: bool) -> Self {
        if fast {
            Self::fast()
        } else {
            Self::full()
        }
    }

    /// Caps the completion budget for this call.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The underlying model call failed. Callers may retry the whole
    /// turn; the gateway itself does not.
    #[error("model call failed")]
    Transient(#[source] AIError),
}

/// Budget-aware front door to the completion capability.
pub struct ModelGateway {
    full: Arc<dyn AIProvider>,
    fast: Arc<dyn AIProvider>,
    estimator: TokenEstimator,
    limits: GatewayLimits,
    eviction: EvictionPolicy,
}

impl ModelGateway {
    /// Creates a gateway over a full-tier and a fast-tier provider.
    pub fn new(
        full: Arc<dyn AIProvider>,
        fast: Arc<dyn AIProvider>,
        limits: GatewayLimits,
    ) -> Self {
        Self {
            full,
            fast,
            estimator: TokenEstimator::new(),
            limits,
            eviction: EvictionPolicy::default(),
        }
    }

    /// Overrides the eviction policy.
    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction = policy;
        self
    }

    /// Returns the token estimator the gateway budgets with.
    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Returns the configured limits.
    pub fn limits(&self) -> GatewayLimits {
        self.limits
    }

    fn provider(&self, tier: Tier) -> &Arc<dyn AIProvider> {
        match tier {
            Tier::Full => &self.full,
            Tier::Fast => &self.fast,
        }
    }

    fn input_cost(&self, messages: &[ChatMessage]) -> u64 {
        messages
            .iter()
            .map(|m| u64::from(self.estimator.count(&m.content)))
            .sum()
    }

    /// Trims `messages` under the input ceiling, in place.
    ///
    /// Stops when the cost fits, when no evictable message remains, or
    /// when only one message is left (an empty request is never sent).
    fn enforce_ceiling(&self, messages: &mut Vec<ChatMessage>) {
        let ceiling = u64::from(self.limits.max_input_tokens);
        let mut cost = self.input_cost(messages);
        if cost <= ceiling {
            return;
        }

        tracing::warn!(
            tokens = cost,
            ceiling,
            "input exceeds token ceiling, evicting messages"
        );

        while cost > ceiling && messages.len() > 1 {
            let Some(index) = self.eviction.pick(messages) else {
                break;
            };
            let evicted = messages.remove(index);
            cost -= u64::from(self.estimator.count(&evicted.content));
        }
    }

    /// Issues one completion, evicting messages first if the input
    /// exceeds the ceiling.
    ///
    /// # Errors
    ///
    /// - `Transient` on any provider failure.
    pub async fn complete(
        &self,
        mut messages: Vec<ChatMessage>,
        options: CallOptions,
    ) -> Result<String, GatewayError> {
        self.enforce_ceiling(&mut messages);

        let max_tokens = options
            .max_output_tokens
            .unwrap_or(self.limits.max_answer_tokens);
        let request = CompletionRequest::from_messages(messages).with_max_tokens(max_tokens);

        let response = self
            .provider(options.tier)
            .complete(request)
            .await
            .map_err(GatewayError::Transient)?;

        Ok(response.content)
    }

    /// Repeatedly asks the model to shorten `text` until it fits within
    /// `target_tokens` or `max_iterations` is reached.
    ///
    /// Lossy and best-effort: the result may still exceed the target.
    /// Callers decide whether that warrants a diagnostic.
    pub async fn summarize(
        &self,
        text: &str,
        target_tokens: u32,
        max_iterations: u32,
    ) -> Result<String, GatewayError> {
        let mut draft = text.to_string();
        let mut iteration = 0;

        while self.estimator.count(&draft) > target_tokens && iteration < max_iterations {
            let prompt = format!("Please make the following content shorter: {draft}");
            draft = self
                .complete(vec![ChatMessage::user(prompt)], CallOptions::full())
                .await?;
            iteration += 1;
        }

        Ok(draft)
    }

    /// Asks the model for exactly one paraphrase of `text`, optionally
    /// conditioned on `context`.
    ///
    /// No structural validation of the reply is performed; compliance
    /// rests on the model.
    pub async fn paraphrase(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<String, GatewayError> {
        let prompt = match context {
            Some(context) => format!(
                "CONTEXT:\n{context}\nPlease paraphrase:\nCONTENT:\n{text}\n\
                 Only answer with one paraphrase, based on the content given previously, \
                 and absolutely nothing else."
            ),
            None => format!(
                "Please paraphrase:\n{text}\n\
                 Only answer with one paraphrase to the following sentence and absolutely \
                 nothing else."
            ),
        };

        self.complete(vec![ChatMessage::user(prompt)], CallOptions::full())
            .await
    }
}
