//! Session context rendering for prompt injection.
//!
//! Handlers inject a snapshot of what is known about the client into
//! their prompts. The rendered block starts with the `CONTEXT:` header,
//! which doubles as the gateway's default eviction marker, so the
//! injected block is the first thing dropped when a request runs over
//! the token ceiling.

use std::fmt::Write as _;

use super::feedback::FeedbackLog;
use super::profile::UserProfile;
use super::therapy::TherapyInfo;

/// Renders selected session facts into a prompt-ready block.
///
/// All sections are included by default; `without_*` methods trim the
/// snapshot for prompts that only need part of it.
pub struct SessionContext<'a> {
    profile: &'a UserProfile,
    demand: &'a str,
    anamnesis: &'a str,
    therapy: &'a TherapyInfo,
    feedback: &'a FeedbackLog,
    include_user_info: bool,
    include_demand: bool,
    include_anamnesis: bool,
    include_therapy_type: bool,
    include_feedback: bool,
    include_guidelines: bool,
}

impl<'a> SessionContext<'a> {
    /// Creates a full-context renderer over the session's facts.
    pub fn new(
        profile: &'a UserProfile,
        demand: &'a str,
        anamnesis: &'a str,
        therapy: &'a TherapyInfo,
        feedback: &'a FeedbackLog,
    ) -> Self {
        Self {
            profile,
            demand,
            anamnesis,
            therapy,
            feedback,
            include_user_info: true,
            include_demand: true,
            include_anamnesis: true,
            include_therapy_type: true,
            include_feedback: true,
            include_guidelines: true,
        }
    }

    /// Excludes the demographic section.
    pub fn without_user_info(mut self) -> Self {
        self.include_user_info = false;
        self
    }

    /// Excludes the demand section.
    pub fn without_demand(mut self) -> Self {
        self.include_demand = false;
        self
    }

    /// Excludes the anamnesis section.
    pub fn without_anamnesis(mut self) -> Self {
        self.include_anamnesis = false;
        self
    }

    /// Excludes the modality section.
    pub fn without_therapy_type(mut self) -> Self {
        self.include_therapy_type = false;
        self
    }

    /// Excludes the feedback section.
    pub fn without_feedback(mut self) -> Self {
        self.include_feedback = false;
        self
    }

    /// Excludes the guideline section.
    pub fn without_guidelines(mut self) -> Self {
        self.include_guidelines = false;
        self
    }

    /// Renders the included sections.
    pub fn render(&self) -> String {
        let mut out = String::from("CONTEXT:");

        if self.include_user_info {
            let _ = write!(out, "\nClient informations: {}", self.profile);
        }
        if self.include_demand {
            let _ = write!(out, "\nClient demand: {}", self.demand);
        }
        if self.include_anamnesis {
            let _ = write!(out, "\nClient anamnesis: {}", self.anamnesis);
        }
        if self.include_therapy_type {
            let _ = write!(out, "\nType of therapy: {}", self.therapy.kind());
        }
        if self.include_feedback {
            let _ = write!(out, "\nUser feedbacks: {}", self.feedback);
        }
        if self.include_guidelines {
            let _ = write!(out, "\nTherapy guidelines: {}", self.therapy.guidelines());
        }

        out
    }
}
