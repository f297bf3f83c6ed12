//! Integration tests for the therapy-intake session flow.
//!
//! These tests drive the public surface end to end:
//! 1. SessionStateMachine::advance runs the intake script turn by turn
//! 2. ModelGateway routes calls to the configured tier with budgets applied
//! 3. StaticPromptStore serves every template the script references
//! 4. SessionRecord hands state across simulated request boundaries
//!
//! Model calls are served by MockAIProvider with scripted replies.

use std::sync::Arc;

use mindline::adapters::ai::{MockAIProvider, MockError};
use mindline::adapters::prompts::StaticPromptStore;
use mindline::config::{BudgetConfig, TherapistConfig};
use mindline::domain::session::{SessionError, SessionRecord, SessionStateMachine, UserProfile};
use mindline::gateway::{GatewayLimits, ModelGateway};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mindline=debug")
        .with_test_writer()
        .try_init();
}

fn machine(full: &MockAIProvider, fast: &MockAIProvider) -> SessionStateMachine {
    init_tracing();
    let budget = BudgetConfig::default();
    let gateway = ModelGateway::new(
        Arc::new(full.clone()),
        Arc::new(fast.clone()),
        GatewayLimits::new(budget.max_tokens_per_message, budget.max_token_answer),
    );
    SessionStateMachine::new(
        Arc::new(gateway),
        Arc::new(StaticPromptStore::new()),
        TherapistConfig::default(),
        budget,
    )
}

const PROFILE_REPLY: &str = r#"{"name": "Ada Lovelace", "age": "36",
    "gender": "female", "occupation": "mathematician",
    "language": "english", "marital_status": "married"}"#;

/// A record in the free-dialogue stage, as a host would restore it.
fn active_dialogue_record() -> SessionRecord {
    let empty = machine(&MockAIProvider::new(), &MockAIProvider::new());
    let mut record = empty.get_state();
    record.user_informations = UserProfile {
        name: Some("Ada Lovelace".into()),
        age: Some("36".into()),
        gender: Some("female".into()),
        occupation: Some("mathematician".into()),
        language: Some("english".into()),
        marital_status: Some("married".into()),
    };
    record.conversation_started = true;
    record.user_demand_asked_once = true;
    record.user_info_complete = true;
    record.demand_captured = true;
    record.therapy_type_chosen = true;
    record.name_surfaced = true;
    record
}

// =============================================================================
// Full intake script
// =============================================================================

#[tokio::test]
async fn full_session_runs_the_intake_script() {
    let full = MockAIProvider::new()
        // turn 3: demand classification, then the dialogue reply
        .with_response("She struggles with anxiety at work")
        .with_response("Tell me more about that anxiety.")
        // turn 4: modality classification
        .with_response("0")
        // turn 5: anamnesis bootstrap, next-action "1", feedback question
        .with_response("Ada, 36, presents with work-related anxiety.")
        .with_response("1")
        .with_response("How is this session going for you so far?")
        // turn 6: anamnesis continuation, next-action "2", closing line
        .with_response(" Symptoms are improving.")
        .with_response("2")
        .with_response("Goodbye Ada, take care of yourself.");
    let fast = MockAIProvider::new()
        // turn 3: profile extraction; turn 4: modality presentation
        .with_response(PROFILE_REPLY)
        .with_response("I suggest we work with cognitive behavioral therapy.");
    let mut session = machine(&full, &fast);

    // Turn 1: opening line, no model involved.
    let opening = session.advance("Hello").await.unwrap();
    assert!(opening.reply.contains("Alex"));
    assert_eq!(session.state().ledger.len(), 2);
    assert_eq!(full.call_count() + fast.call_count(), 0);

    // Turn 2: the machine asks for primary informations.
    let asking = session.advance("Hi, I could use some help").await.unwrap();
    assert!(asking.reply.contains("1:"));

    // Turn 3: the recheck fills the profile and captures the demand, but
    // the conversation is still too short for modality selection.
    let dialogue = session
        .advance("I'm Ada Lovelace, 36, a married mathematician. I'm anxious all the time.")
        .await
        .unwrap();
    assert_eq!(dialogue.reply, "Tell me more about that anxiety.");
    assert_eq!(dialogue.first_name.as_deref(), Some("Ada"));
    assert!(session.state().user_info_complete);
    assert!(session.state().demand_captured);
    assert!(!session.state().therapy_type_chosen);

    // Turn 4: enough turns now; modality 0 is chosen and presented.
    let presented = session.advance("It gets worse at night").await.unwrap();
    assert!(session.state().therapy_type_chosen);
    assert_eq!(
        session.state().therapy.kind(),
        "cognitive_behavioral_therapy"
    );
    assert_eq!(
        presented.reply,
        "I suggest we work with cognitive behavioral therapy."
    );

    // Turn 5: the ledger is long enough to bootstrap the anamnesis; the
    // classifier then asks for an evaluation.
    let evaluation = session.advance("That sounds good to me").await.unwrap();
    assert!(session.state().anamnesis_initiated);
    assert_eq!(
        session.state().anamnesis,
        "Ada, 36, presents with work-related anxiety."
    );
    assert!(session.state().evaluation_pending);
    assert_eq!(evaluation.reply, "How is this session going for you so far?");

    // Turn 6: the answer lands in the feedback log, the anamnesis is
    // extended, and the classifier ends the session.
    let closing = session.advance("Really well, thank you").await.unwrap();
    assert_eq!(session.state().feedback.len(), 1);
    assert_eq!(
        session.state().anamnesis,
        "Ada, 36, presents with work-related anxiety. Symptoms are improving."
    );
    assert!(session.state().therapy_ended);
    assert_eq!(closing.reply, "Goodbye Ada, take care of yourself.");

    // Turn 7: the session stays ended without further model calls.
    let calls_before = full.call_count() + fast.call_count();
    let after = session.advance("wait, one more thing").await.unwrap();
    assert_eq!(after.reply, "Therapy already ended.");
    assert_eq!(full.call_count() + fast.call_count(), calls_before);
}

// =============================================================================
// Individual scenario properties
// =============================================================================

#[tokio::test]
async fn first_advance_is_the_opening_with_no_model_call() {
    let full = MockAIProvider::new();
    let fast = MockAIProvider::new();
    let mut session = machine(&full, &fast);

    session.advance("Hello").await.unwrap();

    assert!(session.state().conversation_started);
    assert_eq!(session.state().ledger.len(), 2);
    assert_eq!(full.call_count(), 0);
    assert_eq!(fast.call_count(), 0);
}

#[tokio::test]
async fn modality_classification_reply_indexes_the_configured_list() {
    let full = MockAIProvider::new().with_response("2");
    let fast = MockAIProvider::new().with_response("Presenting humanistic therapy.");
    let mut session = machine(&full, &fast);

    let mut record = active_dialogue_record();
    record.therapy_type_chosen = false;
    for i in 0..6 {
        record
            .conversation
            .append(mindline::domain::ledger::Turn::user(format!("turn {i}")));
    }
    session.load_state(record);

    session.advance("what approach fits me?").await.unwrap();

    assert!(session.state().therapy_type_chosen);
    assert_eq!(session.state().therapy.kind(), "humanistic_therapy");
    assert!(session
        .state()
        .therapy
        .guidelines()
        .contains("Humanistic therapy guidelines"));
}

#[tokio::test]
async fn malformed_profile_extraction_leaves_profile_unchanged() {
    let full = MockAIProvider::new().with_response("0: still unclear");
    let fast = MockAIProvider::new().with_response("I think her name might be Ada?");
    let mut session = machine(&full, &fast);

    let mut record = active_dialogue_record();
    record.user_informations = UserProfile {
        age: Some("36".into()),
        ..Default::default()
    };
    record.user_info_complete = false;
    record.demand_captured = false;
    session.load_state(record);

    session.advance("hello again").await.unwrap();

    assert_eq!(session.state().profile.age.as_deref(), Some("36"));
    assert!(session.state().profile.name.is_none());
    assert!(!session.state().user_info_complete);
}

// =============================================================================
// Persistence across request boundaries
// =============================================================================

#[tokio::test]
async fn session_survives_serialization_between_requests() {
    let full = MockAIProvider::new();
    let fast = MockAIProvider::new();

    // Request 1: fresh session, opening line.
    let mut first = machine(&full, &fast);
    first.advance("Hello").await.unwrap();
    let persisted = first.get_state().to_json().unwrap();

    // Request 2: a different machine instance picks the session up.
    let mut second = machine(&full, &fast);
    second.load_state(SessionRecord::from_json(&persisted).unwrap());
    assert!(second.state().conversation_started);
    assert_eq!(second.state().ledger.len(), 2);

    let outcome = second.advance("I'd like to talk").await.unwrap();
    assert!(outcome.reply.contains("1:"));
    assert_eq!(second.state().ledger.len(), 4);
}

#[tokio::test]
async fn record_round_trip_is_lossless() {
    let full = MockAIProvider::new();
    let fast = MockAIProvider::new();
    let mut session = machine(&full, &fast);
    session.advance("Hello").await.unwrap();
    session.advance("Nice to meet you").await.unwrap();

    let record = session.get_state();
    let json = record.to_json().unwrap();
    let restored = SessionRecord::from_json(&json).unwrap();
    assert_eq!(record, restored);
}

// =============================================================================
// Failure behavior
// =============================================================================

#[tokio::test]
async fn model_failure_aborts_the_turn_and_leaves_the_user_turn() {
    let full = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "upstream down".into(),
    });
    let fast = MockAIProvider::new();
    let mut session = machine(&full, &fast);
    session.load_state(active_dialogue_record());

    let checkpoint = session.state().ledger.len();
    let err = session.advance("are you there?").await.unwrap_err();

    assert!(matches!(err, SessionError::Gateway(_)));
    // The user turn stays; no assistant turn was appended.
    assert_eq!(session.state().ledger.len(), checkpoint + 1);
    assert_eq!(
        session.state().ledger.turns().last().unwrap().content(),
        "are you there?"
    );

    // Hosts that want a clean ledger can roll the dangling turn back.
    session.rollback_ledger(checkpoint);
    assert_eq!(session.state().ledger.len(), checkpoint);
}
