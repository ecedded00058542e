//! The standardized per-turn skill output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shared confidence ladder.
///
/// Confidence is a small fixed set of levels chosen by which trigger
/// matched, not a continuous score; the arbitrator depends on these values
/// being consistent across skills. The exact mapping of code path to level
/// is load-bearing and preserved as is.
pub mod confidence {
    /// A forced or certain match.
    pub const CERTAIN: f64 = 1.0;
    /// A strong trigger match.
    pub const HIGH: f64 = 0.98;
    /// A moderate match.
    pub const MODERATE: f64 = 0.95;
    /// The default when proposing a topic unprompted.
    pub const LOW: f64 = 0.9;
    /// Decline to answer.
    pub const DECLINE: f64 = 0.0;
}

/// Signal to the orchestrator about whether this skill expects the next
/// turn too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationDirective {
    /// Cannot continue: the reply is empty or the topic is closed.
    #[default]
    Stop,
    /// Normal scenario continuation; the caller may pick another skill.
    MayContinue,
    /// This skill should keep the floor (e.g. it just asked a question).
    MustContinue,
}

impl ContinuationDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::MayContinue => "may_continue",
            Self::MustContinue => "must_continue",
        }
    }
}

/// A hand-off record pointing the orchestrator at another skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillLink {
    /// Target skill name (e.g. "book_skill").
    pub skill: String,
    /// The phrase that carried the hand-off.
    pub phrase: String,
}

/// One skill's answer for one turn.
///
/// Produced fresh every turn and never mutated after return. The reply,
/// confidence and directive fields are private so construction always goes
/// through [`SkillTurnResult::answer`] or [`SkillTurnResult::decline`],
/// which enforce the core invariant: an empty reply carries zero
/// confidence and never demands the floor.
#[derive(Debug, Clone, Serialize)]
pub struct SkillTurnResult {
    reply: String,
    confidence: f64,
    continuation: ContinuationDirective,
    /// Human-side attributes to persist.
    pub human_attributes: Map<String, Value>,
    /// Bot-side attributes to persist.
    pub bot_attributes: Map<String, Value>,
    /// Skill bookkeeping handed back verbatim next turn.
    pub attributes: Map<String, Value>,
    /// Optional hand-off to another skill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<SkillLink>,
}

impl SkillTurnResult {
    /// A decline-to-answer result: empty reply, zero confidence, STOP.
    pub fn decline() -> Self {
        Self {
            reply: String::new(),
            confidence: confidence::DECLINE,
            continuation: ContinuationDirective::Stop,
            human_attributes: Map::new(),
            bot_attributes: Map::new(),
            attributes: Map::new(),
            link: None,
        }
    }

    /// A reply with a confidence level and continuation directive.
    ///
    /// Normalizes to uphold the result invariant: an empty reply (or zero
    /// confidence) collapses to a decline; confidence is clamped to [0, 1].
    pub fn answer(
        reply: impl Into<String>,
        confidence_level: f64,
        continuation: ContinuationDirective,
    ) -> Self {
        let reply = reply.into();
        let confidence_level = confidence_level.clamp(0.0, 1.0);
        if reply.trim().is_empty() || confidence_level == confidence::DECLINE {
            return Self::decline();
        }
        Self {
            reply,
            confidence: confidence_level,
            continuation,
            human_attributes: Map::new(),
            bot_attributes: Map::new(),
            attributes: Map::new(),
            link: None,
        }
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn continuation(&self) -> ContinuationDirective {
        self.continuation
    }

    pub fn is_decline(&self) -> bool {
        self.reply.is_empty()
    }

    /// Re-levels the confidence of a non-decline result.
    pub fn with_confidence(mut self, confidence_level: f64) -> Self {
        if self.is_decline() {
            return self;
        }
        let confidence_level = confidence_level.clamp(0.0, 1.0);
        if confidence_level == confidence::DECLINE {
            return Self::decline();
        }
        self.confidence = confidence_level;
        self
    }

    /// Changes the continuation directive of a non-decline result.
    pub fn with_continuation(mut self, continuation: ContinuationDirective) -> Self {
        if !self.is_decline() {
            self.continuation = continuation;
        }
        self
    }

    /// Adds one skill bookkeeping attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Replaces the human-side attribute map.
    pub fn with_human_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.human_attributes = attributes;
        self
    }

    /// Replaces the bot-side attribute map.
    pub fn with_bot_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.bot_attributes = attributes;
        self
    }

    /// Attaches a hand-off link to another skill.
    pub fn with_link(mut self, link: SkillLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Records the continuation directive into the bookkeeping attributes
    /// so the caller persists it alongside the skill state.
    pub fn record_continuation(mut self) -> Self {
        self.attributes.insert(
            "can_continue".to_string(),
            Value::String(self.continuation.as_str().to_string()),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod construction {
        use super::*;

        #[test]
        fn decline_is_empty_zero_stop() {
            let result = SkillTurnResult::decline();
            assert_eq!(result.reply(), "");
            assert_eq!(result.confidence(), confidence::DECLINE);
            assert_eq!(result.continuation(), ContinuationDirective::Stop);
            assert!(result.is_decline());
        }

        #[test]
        fn answer_keeps_reply_and_level() {
            let result = SkillTurnResult::answer(
                "Dogs descend from wolves.",
                confidence::CERTAIN,
                ContinuationDirective::MustContinue,
            );
            assert_eq!(result.reply(), "Dogs descend from wolves.");
            assert_eq!(result.confidence(), confidence::CERTAIN);
            assert_eq!(result.continuation(), ContinuationDirective::MustContinue);
        }

        #[test]
        fn empty_reply_collapses_to_decline() {
            let result = SkillTurnResult::answer(
                "   ",
                confidence::CERTAIN,
                ContinuationDirective::MustContinue,
            );
            assert!(result.is_decline());
            assert_eq!(result.continuation(), ContinuationDirective::Stop);
        }

        #[test]
        fn zero_confidence_collapses_to_decline() {
            let result = SkillTurnResult::answer(
                "something",
                confidence::DECLINE,
                ContinuationDirective::MayContinue,
            );
            assert!(result.is_decline());
        }

        #[test]
        fn confidence_is_clamped() {
            let result =
                SkillTurnResult::answer("hi", 1.7, ContinuationDirective::MayContinue);
            assert_eq!(result.confidence(), 1.0);
        }

        #[test]
        fn with_confidence_zero_collapses_to_decline() {
            let result = SkillTurnResult::answer(
                "hi",
                confidence::HIGH,
                ContinuationDirective::MayContinue,
            )
            .with_confidence(0.0);
            assert!(result.is_decline());
        }

        #[test]
        fn with_continuation_is_ignored_on_declines() {
            let result =
                SkillTurnResult::decline().with_continuation(ContinuationDirective::MustContinue);
            assert_eq!(result.continuation(), ContinuationDirective::Stop);
        }

        #[test]
        fn record_continuation_mirrors_directive_into_attributes() {
            let result = SkillTurnResult::answer(
                "hi",
                confidence::HIGH,
                ContinuationDirective::MayContinue,
            )
            .record_continuation();
            assert_eq!(
                result.attributes["can_continue"],
                serde_json::json!("may_continue")
            );
        }
    }

    proptest! {
        // The core invariant: zero confidence implies an empty reply and a
        // directive other than MUST_CONTINUE, for any construction input.
        #[test]
        fn zero_confidence_implies_empty_non_continuing(
            reply in ".{0,40}",
            level in 0.0f64..=1.0,
            directive in prop_oneof![
                Just(ContinuationDirective::Stop),
                Just(ContinuationDirective::MayContinue),
                Just(ContinuationDirective::MustContinue),
            ],
        ) {
            let result = SkillTurnResult::answer(reply, level, directive);
            if result.confidence() == 0.0 {
                prop_assert_eq!(result.reply(), "");
                prop_assert_ne!(result.continuation(), ContinuationDirective::MustContinue);
            }
            if result.reply().is_empty() {
                prop_assert_eq!(result.confidence(), 0.0);
            }
        }
    }
}
