//! Append-only conversation ledger.
//!
//! Owns the ordered sequence of turns for one session. Turns are never
//! mutated or removed during the session; suffix retrieval returns
//! trimmed copies for model submission while the ledger itself keeps
//! everything.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TokenEstimator;
use crate::ports::ChatMessage;

use super::turn::Turn;

/// Ordered, append-only log of conversation turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLedger {
    turns: Vec<Turn>,
}

impl MessageLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Number of turns in the ledger.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turn has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns all turns in chronological order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Drops turns appended after `len`, restoring an earlier length.
    ///
    /// The ledger is append-only within a turn; this exists so a hosting
    /// application can roll back the dangling user turn left behind by a
    /// failed advance.
    pub fn truncate_to(&mut self, len: usize) {
        self.turns.truncate(len);
    }

    /// Returns the most recent turns whose cumulative token cost stays
    /// strictly under `budget`, in chronological order.
    ///
    /// Scans backward from the newest turn; stops before the turn that
    /// would make the running cost reach or exceed the budget. A single
    /// newest turn that alone meets the budget is excluded, so the result
    /// never costs `budget` tokens or more. A non-positive budget yields
    /// an empty suffix.
    pub fn suffix_by_token_budget(&self, estimator: &TokenEstimator, budget: i64) -> Vec<Turn> {
        if budget <= 0 {
            return Vec::new();
        }

        let mut cost: i64 = 0;
        let mut picked = Vec::new();
        for turn in self.turns.iter().rev() {
            cost += i64::from(estimator.count(turn.content()));
            if cost >= budget {
                break;
            }
            picked.push(turn.clone());
        }
        picked.reverse();
        picked
    }

    /// Returns the last `n` turns in chronological order.
    pub fn suffix_by_count(&self, n: usize) -> Vec<Turn> {
        let start = self.turns.len().saturating_sub(n);
        self.turns[start..].to_vec()
    }

    /// Strips metadata for model submission.
    ///
    /// With no subset the full ledger is converted.
    pub fn to_model_format(&self, subset: Option<&[Turn]>) -> Vec<ChatMessage> {
        subset
            .unwrap_or(&self.turns)
            .iter()
            .map(|turn| ChatMessage::new(turn.role().into(), turn.content()))
            .collect()
    }
}
