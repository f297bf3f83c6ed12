//! The closed set of actions the state machine can take.

/// One step of the intake script.
///
/// Dispatched by exhaustive `match`; there is no runtime lookup and no
/// "unknown action" path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Deliver the fixed opening line.
    StartConversation,
    /// List the demographic fields still missing.
    AskPrimaryInformations,
    /// Ask for the demographic fields by name.
    AskForUserInfo,
    /// Ask what brings the client to therapy.
    AskForDemand,
    /// Free dialogue turn.
    ContinueConversation,
    /// Solicit session feedback.
    AskForEvaluation,
    /// Select a therapy modality.
    ChooseTherapyType,
    /// Present the selected modality to the client.
    PresentTherapyType,
    /// Close the session.
    EndTherapy,
}

impl Action {
    /// Tag recorded on the assistant turn this action produces.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartConversation => "start_conversation",
            Self::AskPrimaryInformations => "ask_primary_informations",
            Self::AskForUserInfo => "ask_for_user_info",
            Self::AskForDemand => "ask_for_demand",
            Self::ContinueConversation => "continue_conversation",
            Self::AskForEvaluation => "ask_for_evaluation",
            Self::ChooseTherapyType => "choose_therapy_type",
            Self::PresentTherapyType => "present_therapy_type",
            Self::EndTherapy => "end_therapy",
        }
    }

    /// The menu offered to the model once the intake is complete.
    ///
    /// Classification replies index into this table; anything
    /// unparseable falls back to index 0.
    pub const EVALUATION_MENU: [Action; 3] = [
        Action::ContinueConversation,
        Action::AskForEvaluation,
        Action::EndTherapy,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let all = [
            Action::StartConversation,
            Action::AskPrimaryInformations,
            Action::AskForUserInfo,
            Action::AskForDemand,
            Action::ContinueConversation,
            Action::AskForEvaluation,
            Action::ChooseTherapyType,
            Action::PresentTherapyType,
            Action::EndTherapy,
        ];
        let mut tags: Vec<_> = all.iter().map(Action::as_str).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), all.len());
    }

    #[test]
    fn evaluation_menu_defaults_to_continuing() {
        assert_eq!(Action::EVALUATION_MENU[0], Action::ContinueConversation);
        assert_eq!(Action::EVALUATION_MENU.len(), 3);
    }
}
