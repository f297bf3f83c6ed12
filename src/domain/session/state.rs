//! Session state aggregate and its serialization record.

use serde::{Deserialize, Serialize};

use crate::domain::ledger::MessageLedger;

use super::feedback::FeedbackLog;
use super::profile::UserProfile;
use super::therapy::TherapyInfo;

/// Everything one session knows, owned by its state machine.
///
/// The boolean flags are the implicit state of the intake script; the
/// decision function derives the next action from them fresh every
/// turn, so they must stay mutually consistent. Only the state machine
/// mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Demographic profile filled by extraction.
    pub profile: UserProfile,
    /// Selected modality and guidelines.
    pub therapy: TherapyInfo,
    /// Running clinical summary.
    pub anamnesis: String,
    /// Working value of the client's stated demand.
    pub demand: String,
    /// Raw evaluation answers.
    pub feedback: FeedbackLog,
    /// Full conversation log.
    pub ledger: MessageLedger,

    /// The opening line has been delivered.
    pub conversation_started: bool,
    /// The missing-information list has been asked at least once.
    pub user_demand_asked_once: bool,
    /// Every profile field holds a value.
    pub user_info_complete: bool,
    /// The client's demand has been captured.
    pub demand_captured: bool,
    /// A modality has been committed.
    pub therapy_type_chosen: bool,
    /// The session is closed.
    pub therapy_ended: bool,
    /// An anamnesis has been built at least once.
    pub anamnesis_initiated: bool,
    /// The next user utterance is an evaluation answer.
    pub evaluation_pending: bool,
    /// The client's first name has already been surfaced to the host.
    pub name_surfaced: bool,
    /// Turns since the last anamnesis maintenance.
    pub anamnesis_rebuild_count: u32,
}

impl SessionState {
    /// Creates the state of a fresh session.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transport-neutral snapshot of a [`SessionState`].
///
/// The hosting application persists this between requests; the state
/// machine does not assume in-process persistence. Field-for-field
/// equivalent to the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Demographic profile.
    pub user_informations: UserProfile,
    /// Modality selection.
    pub therapy_informations: TherapyInfo,
    /// Running clinical summary.
    pub anamnesis: String,
    /// Working demand value.
    pub demand: String,
    /// Evaluation answers.
    pub user_feedbacks: FeedbackLog,
    /// Conversation log.
    pub conversation: MessageLedger,
    /// Flag: opening line delivered.
    pub conversation_started: bool,
    /// Flag: missing-information list asked at least once.
    pub user_demand_asked_once: bool,
    /// Flag: profile complete.
    pub user_info_complete: bool,
    /// Flag: demand captured.
    pub demand_captured: bool,
    /// Flag: modality committed.
    pub therapy_type_chosen: bool,
    /// Flag: session closed.
    pub therapy_ended: bool,
    /// Flag: anamnesis built at least once.
    pub anamnesis_initiated: bool,
    /// Flag: next utterance is an evaluation answer.
    pub evaluation_pending: bool,
    /// Flag: first name already surfaced.
    pub name_surfaced: bool,
    /// Turns since last anamnesis maintenance.
    pub anamnesis_rebuild_count: u32,
}

impl SessionRecord {
    /// Serializes the record to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&SessionState> for SessionRecord {
    fn from(state: &SessionState) -> Self {
        Self {
            user_informations: state.profile.clone(),
            therapy_informations: state.therapy.clone(),
            anamnesis: state.anamnesis.clone(),
            demand: state.demand.clone(),
            user_feedbacks: state.feedback.clone(),
            conversation: state.ledger.clone(),
            conversation_started: state.conversation_started,
            user_demand_asked_once: state.user_demand_asked_once,
            user_info_complete: state.user_info_complete,
            demand_captured: state.demand_captured,
            therapy_type_chosen: state.therapy_type_chosen,
            therapy_ended: state.therapy_ended,
            anamnesis_initiated: state.anamnesis_initiated,
            evaluation_pending: state.evaluation_pending,
            name_surfaced: state.name_surfaced,
            anamnesis_rebuild_count: state.anamnesis_rebuild_count,
        }
    }
}

impl From<SessionRecord> for SessionState {
    fn from(record: SessionRecord) -> Self {
        Self {
            profile: record.user_informations,
            therapy: record.therapy_informations,
            anamnesis: record.anamnesis,
            demand: record.demand,
            feedback: record.user_feedbacks,
            ledger: record.conversation,
            conversation_started: record.conversation_started,
            user_demand_asked_once: record.user_demand_asked_once,
            user_info_complete: record.user_info_complete,
            demand_captured: record.demand_captured,
            therapy_type_chosen: record.therapy_type_chosen,
            therapy_ended: record.therapy_ended,
            anamnesis_initiated: record.anamnesis_initiated,
            evaluation_pending: record.evaluation_pending,
            name_surfaced: record.name_surfaced,
            anamnesis_rebuild_count: record.anamnesis_rebuild_count,
        }
    }
}
