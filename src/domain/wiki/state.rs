//! Wiki skill dialog states.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The dialog state of the fact-retrieval scenario.
///
/// `Start` is the conversation-initial state; an empty or unreadable
/// persisted state resets to it. `Error` clears all context slots and is
/// immediately re-entered as `Start` on the next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WikiState {
    #[default]
    Start,
    /// Proposed a topic, waiting for the user to take it up.
    StartTalk,
    /// Told a fact and asked a follow-up section question.
    TellFact,
    /// Dug into a cross-referenced page the user asked about.
    MoreDetailed,
    /// Answered a factoid question over tracked passages.
    FactoidQ,
    /// Something went wrong; context was cleared.
    Error,
}

impl WikiState {
    /// Outgoing transition candidates in evaluation priority order.
    ///
    /// Guards are evaluated against this list front to back and the FIRST
    /// satisfied guard wins; callers depend on this ordering because the
    /// guards are not mutually exclusive.
    pub fn transition_candidates(&self) -> &'static [WikiState] {
        use WikiState::*;
        match self {
            Start => &[FactoidQ, TellFact, StartTalk],
            StartTalk => &[FactoidQ, TellFact],
            TellFact => &[FactoidQ, MoreDetailed, TellFact],
            MoreDetailed => &[TellFact],
            // A factoid answer closes the exchange; the next turn resets.
            FactoidQ => &[],
            Error => &[],
        }
    }
}

impl StateMachine for WikiState {
    fn can_transition_to(&self, target: &Self) -> bool {
        // Every state may fall through to Error when no guard fires.
        *target == WikiState::Error || self.transition_candidates().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        let mut targets = self.transition_candidates().to_vec();
        targets.push(WikiState::Error);
        targets
    }
}
