//! Turn entity for the conversation ledger.
//!
//! Turns are immutable records of one role-tagged message. Ordering is
//! insertion order; duplicate content is legal.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp};

/// Role of a turn's author.
///
/// Mirrors the AI provider message roles for consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System instructions (invisible to the client).
    System,
    /// Client input.
    User,
    /// Assistant response.
    Assistant,
}

impl Role {
    /// Returns the wire representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parses a role from its wire representation.
    ///
    /// # Errors
    ///
    /// - `InvalidRole` for anything outside {system, user, assistant}.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(DomainError::invalid_role(other)),
        }
    }
}

/// An immutable turn within the conversation ledger.
///
/// # Invariants
///
/// - Never mutated after being appended to a ledger
/// - `timestamp` is set for conversational turns and omitted for
///   ephemeral prompt-assembly messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    timestamp: Option<Timestamp>,
    /// Which action handler produced this turn (assistant turns only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    action_tag: Option<String>,
}

impl Turn {
    /// Creates a new turn stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Timestamp::now()),
            action_tag: None,
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn tagged with the action that produced it.
    pub fn assistant_tagged(content: impl Into<String>, action_tag: impl Into<String>) -> Self {
        Self {
            action_tag: Some(action_tag.into()),
            ..Self::new(Role::Assistant, content)
        }
    }

    /// Creates an untimestamped turn for prompt assembly.
    pub fn ephemeral(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
            action_tag: None,
        }
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation time, if stamped.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Returns the producing action tag, if any.
    pub fn action_tag(&self) -> Option<&str> {
        self.action_tag.as_deref()
    }
}
