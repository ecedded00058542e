//! Emotion scenario states.

use serde::{Deserialize, Serialize};

/// Position within the emotion support scenario.
///
/// Unlike the wiki flow, the outgoing transitions here are data, declared
/// per step in the scenario table, so the enum only names the positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    /// The user sounds sad or lonely.
    SadAndLonely,
    /// The user is bored.
    Bored,
    /// The user reports physical pain.
    PainIFeel,
    /// The user says they themselves feel happy.
    JoyIFeel,
    /// Something makes the user happy.
    JoyFeelingTowardsSmth,
    /// The user sounds afraid.
    Fear,
    /// The user sounds angry.
    Anger,
    /// The user sounds surprised.
    Surprise,
    /// The user talks about love.
    Love,
    /// A joke was requested or accepted; drawn from the joke pool.
    JokeRequested,
    /// Advice was offered, waiting for yes or no.
    OfferedAdvice,
    /// Advice was accepted; drawn from the advice pool.
    AdviceGiven,
    /// Advice was declined; close warmly.
    DeclinedAdvice,
    /// The advice pool ran out; close the scenario.
    SadAndLonelyEnd,
}

impl ScenarioState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SadAndLonely => "sad_and_lonely",
            Self::Bored => "bored",
            Self::PainIFeel => "pain_i_feel",
            Self::JoyIFeel => "joy_i_feel",
            Self::JoyFeelingTowardsSmth => "joy_feeling_towards_smth",
            Self::Fear => "fear",
            Self::Anger => "anger",
            Self::Surprise => "surprise",
            Self::Love => "love",
            Self::JokeRequested => "joke_requested",
            Self::OfferedAdvice => "offered_advice",
            Self::AdviceGiven => "advice_given",
            Self::DeclinedAdvice => "declined_advice",
            Self::SadAndLonelyEnd => "sad_and_lonely_end",
        }
    }

    /// States whose reply is drawn from a shared pool instead of the
    /// per-step answer list.
    pub fn is_pool_backed(&self) -> bool {
        matches!(self, Self::JokeRequested | Self::AdviceGiven)
    }
}
