//! Client feedback log.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Append-only log of raw client feedback, keyed by capture time.
///
/// Written only while the machine is awaiting an evaluation answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackLog {
    entries: BTreeMap<String, String>,
}

impl FeedbackLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records feedback captured at `at`.
    pub fn record(&mut self, at: Timestamp, text: impl Into<String>) {
        self.entries.insert(at.to_rfc3339(), text.into());
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no feedback has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in timestamp order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FeedbackLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (at, text)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{at}\": \"{}\"", text.replace('"', "\\\""))?;
        }
        write!(f, "}}")
    }
}
