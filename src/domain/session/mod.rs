//! Session orchestration: profile, modality, anamnesis bookkeeping,
//! and the state machine driving the intake script.

mod action;
mod context;
mod feedback;
mod machine;
mod profile;
mod state;
mod therapy;

pub use action::Action;
pub use context::SessionContext;
pub use feedback::FeedbackLog;
pub use machine::{AdvanceOutcome, SessionError, SessionStateMachine};
pub use profile::UserProfile;
pub use state::{SessionRecord, SessionState};
pub use therapy::{TherapyInfo, NOT_DEFINED};
