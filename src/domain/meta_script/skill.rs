//! The meta-script small-talk skill turn logic.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::domain::dialog::{
    annotations, confidence, ContinuationDirective, Dialog, SkillTurnResult, SpeakerRole,
    Utterance,
};
use crate::domain::foundation::{SkillError, StateMachine};
use crate::ports::{chance, choose, RandomSource};

use super::phrases;
use super::status::MetaScriptStatus;
use super::topics::MetaScriptTopics;

pub const META_SCRIPT_SKILL_NAME: &str = "meta_script_skill";

/// Bookkeeping attribute keys echoed back on the bot utterance.
const STATUS_KEY: &str = "meta_script_status";
const TOPIC_KEY: &str = "meta_script_topic";
const TEMPLATE_KEY: &str = "meta_script_template";

/// How far back an in-progress run is recovered from.
const LOOKBACK: usize = 7;
/// How far back spoken templates are excluded from the next draw.
const TEMPLATE_LOOKBACK: usize = 4;

/// Probability of asking the optional deeper question instead of jumping
/// ahead to the opinion question.
const DEEPER_QUESTION_CHANCE: f64 = 0.5;

/// Starting confidence for a predefined topic.
const STARTING_CONFIDENCE: f64 = 0.98;
/// Starting confidence when the topic came from the user's own words.
const MATCHED_PHRASE_CONFIDENCE: f64 = 0.99;
/// Starting confidence at the very beginning of a conversation.
const DIALOG_BEGIN_CONFIDENCE: f64 = 0.9;

/// Brings up an everyday activity and walks a short fixed script of
/// follow-up questions about it, ending with a comment on the user's
/// opinion.
pub struct MetaScriptSkill {
    topics: MetaScriptTopics,
    rng: Arc<dyn RandomSource>,
}

impl MetaScriptSkill {
    pub fn new(topics: MetaScriptTopics, rng: Arc<dyn RandomSource>) -> Self {
        Self { topics, rng }
    }

    /// Builds the skill over the embedded topic table.
    pub fn with_default_topics(rng: Arc<dyn RandomSource>) -> Self {
        Self::new(MetaScriptTopics::defaults().clone(), rng)
    }

    /// Produces this skill's answer for the newest human utterance.
    pub fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
        let Some(user) = dialog.last_human() else {
            return Ok(SkillTurnResult::decline());
        };
        // The user is steering the conversation elsewhere; let go.
        if annotations::topic_switching(user) || annotations::lets_chat_about(user) {
            return Ok(SkillTurnResult::decline());
        }

        if let Some((status, topic)) = self.recover_run(dialog) {
            if status != MetaScriptStatus::Comment && dialog.was_active(META_SCRIPT_SKILL_NAME) {
                return self.advance(dialog, status, &topic, user);
            }
        }
        self.start(dialog, user)
    }

    /// The in-progress run within the lookback window, if any.
    fn recover_run(&self, dialog: &Dialog) -> Option<(MetaScriptStatus, String)> {
        let outputs = dialog.skill_outputs(META_SCRIPT_SKILL_NAME, LOOKBACK);
        let attrs = outputs.last()?;
        let status = MetaScriptStatus::parse(attrs.get(STATUS_KEY)?.as_str()?)?;
        let topic = attrs.get(TOPIC_KEY)?.as_str()?.to_string();
        Some((status, topic))
    }

    /// Template ids this skill spoke within the exclusion window.
    fn used_templates(&self, dialog: &Dialog) -> Vec<String> {
        dialog
            .skill_outputs(META_SCRIPT_SKILL_NAME, TEMPLATE_LOOKBACK)
            .iter()
            .filter_map(|attrs| attrs.get(TEMPLATE_KEY).and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Topics this skill already brought up anywhere in the dialog.
    fn used_topics(&self, dialog: &Dialog) -> Vec<String> {
        dialog
            .skill_outputs(META_SCRIPT_SKILL_NAME, usize::MAX)
            .iter()
            .filter_map(|attrs| attrs.get(TOPIC_KEY).and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Asks the next scripted question, or closes with a comment.
    fn advance(
        &self,
        dialog: &Dialog,
        status: MetaScriptStatus,
        topic: &str,
        user: &Utterance,
    ) -> Result<SkillTurnResult, SkillError> {
        // User-phrased topics run the shorter variant without deeper3.
        let predefined = self.topics.knowledge(topic).is_some();
        let next = match status {
            MetaScriptStatus::Starting => MetaScriptStatus::Deeper1,
            MetaScriptStatus::Deeper1 => {
                if chance(self.rng.as_ref(), DEEPER_QUESTION_CHANCE) {
                    MetaScriptStatus::Deeper2
                } else {
                    MetaScriptStatus::Opinion
                }
            }
            MetaScriptStatus::Deeper2 => {
                if predefined && chance(self.rng.as_ref(), DEEPER_QUESTION_CHANCE) {
                    MetaScriptStatus::Deeper3
                } else {
                    MetaScriptStatus::Opinion
                }
            }
            MetaScriptStatus::Deeper3 => MetaScriptStatus::Opinion,
            MetaScriptStatus::Opinion => MetaScriptStatus::Comment,
            MetaScriptStatus::Comment => return Ok(SkillTurnResult::decline()),
        };
        let next = status.transition_to(next)?;
        debug!(from = status.as_str(), to = next.as_str(), topic, "meta-script advanced");

        if next == MetaScriptStatus::Comment {
            let sentiment = annotations::sentiment(user);
            let reply = phrases::comment_for(sentiment.as_deref(), self.rng.as_ref());
            return Ok(SkillTurnResult::answer(
                reply,
                confidence::CERTAIN,
                ContinuationDirective::Stop,
            )
            .with_attribute(STATUS_KEY, Value::String(next.as_str().to_string()))
            .with_attribute(TOPIC_KEY, Value::String(topic.to_string()))
            .record_continuation());
        }

        let used = self.used_templates(dialog);
        let picked = if next == MetaScriptStatus::Opinion {
            phrases::opinion_question(topic, &used, self.rng.as_ref())
        } else {
            phrases::deeper_question(topic, self.topics.knowledge(topic), &used, self.rng.as_ref())
        };
        let Some((template_id, reply)) = picked else {
            return Ok(SkillTurnResult::decline());
        };
        Ok(
            SkillTurnResult::answer(reply, confidence::CERTAIN, ContinuationDirective::MustContinue)
                .with_attribute(STATUS_KEY, Value::String(next.as_str().to_string()))
                .with_attribute(TOPIC_KEY, Value::String(topic.to_string()))
                .with_attribute(TEMPLATE_KEY, Value::String(template_id.to_string()))
                .record_continuation(),
        )
    }

    /// Brings up a new activity, preferring one phrased by the user. A
    /// user-phrased topic jumps straight into the first deeper question.
    fn start(&self, dialog: &Dialog, user: &Utterance) -> Result<SkillTurnResult, SkillError> {
        // Never talk over a direct question.
        if user.text.contains('?') {
            return Ok(SkillTurnResult::decline());
        }

        if let Some(topic) = user_activity(dialog) {
            let used = self.used_templates(dialog);
            let Some((template_id, question)) =
                phrases::deeper_question(&topic, None, &used, self.rng.as_ref())
            else {
                return Ok(SkillTurnResult::decline());
            };
            let reply = format!("You mentioned that you like to {}. {}", topic, question);
            return Ok(SkillTurnResult::answer(
                reply,
                MATCHED_PHRASE_CONFIDENCE,
                ContinuationDirective::MayContinue,
            )
            .with_attribute(
                STATUS_KEY,
                Value::String(MetaScriptStatus::Deeper1.as_str().to_string()),
            )
            .with_attribute(TOPIC_KEY, Value::String(topic))
            .with_attribute(TEMPLATE_KEY, Value::String(template_id.to_string()))
            .record_continuation());
        }

        // A topic spoken earlier in the dialog is never brought up again.
        let used = self.used_topics(dialog);
        let available: Vec<&String> = self
            .topics
            .all()
            .iter()
            .filter(|topic| !used.iter().any(|u| u == *topic))
            .collect();
        let Some(topic) = choose(self.rng.as_ref(), &available) else {
            return Ok(SkillTurnResult::decline());
        };
        let topic = (*topic).clone();
        let conf = if dialog.utterances.len() <= 2 {
            DIALOG_BEGIN_CONFIDENCE
        } else {
            STARTING_CONFIDENCE
        };
        let reply = phrases::starting_phrase(&topic, self.rng.as_ref());
        Ok(
            SkillTurnResult::answer(reply, conf, ContinuationDirective::MayContinue)
                .with_attribute(
                    STATUS_KEY,
                    Value::String(MetaScriptStatus::Starting.as_str().to_string()),
                )
                .with_attribute(TOPIC_KEY, Value::String(topic))
                .record_continuation(),
        )
    }
}

/// The newest usable verb phrase from the user's recent utterances.
fn user_activity(dialog: &Dialog) -> Option<String> {
    dialog
        .recent(LOOKBACK)
        .iter()
        .rev()
        .filter(|u| u.speaker == SpeakerRole::Human)
        .flat_map(|u| annotations::verb_noun_phrases(u).into_iter().rev())
        .find(|phrase| is_usable_activity(phrase))
}

fn is_usable_activity(phrase: &str) -> bool {
    let lower = phrase.to_lowercase();
    !lower.is_empty()
        && !lower.eq_ignore_ascii_case("none")
        && !lower.contains("talk")
        && !lower.contains("chat")
        && lower.split_whitespace().count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FirstPick;

    impl RandomSource for FirstPick {
        fn next_f64(&self) -> f64 {
            0.0
        }

        fn pick_index(&self, _len: usize) -> usize {
            0
        }
    }

    /// Always skips the optional deeper questions.
    struct AlwaysSkip;

    impl RandomSource for AlwaysSkip {
        fn next_f64(&self) -> f64 {
            0.99
        }

        fn pick_index(&self, _len: usize) -> usize {
            0
        }
    }

    fn topics() -> MetaScriptTopics {
        MetaScriptTopics::load(
            r#"
topics:
  - name: "go hiking"
    has_property: ["very relaxing"]
    causes: ["sore legs the next day"]
  - name: "cook new dishes"
"#,
        )
        .unwrap()
    }

    fn skill(rng: Arc<dyn RandomSource>) -> MetaScriptSkill {
        MetaScriptSkill::new(topics(), rng)
    }

    fn run_dialog(status: MetaScriptStatus, topic: &str, user: Utterance) -> Dialog {
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("i had a pretty normal day", 0));
        dialog.push(
            Utterance::bot("Have you ever thought about trying to go hiking?", 0)
                .with_active_skill(META_SCRIPT_SKILL_NAME)
                .with_attribute(STATUS_KEY, json!(status.as_str()))
                .with_attribute(TOPIC_KEY, json!(topic)),
        );
        dialog.push(user);
        dialog
    }

    #[test]
    fn fresh_dialog_starts_with_predefined_topic() {
        let skill = skill(Arc::new(FirstPick));
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("hello there", 0));

        let result = skill.respond(&dialog).unwrap();
        assert!(result.reply().contains("go hiking"));
        assert_eq!(result.confidence(), DIALOG_BEGIN_CONFIDENCE);
        assert_eq!(result.continuation(), ContinuationDirective::MayContinue);
        assert_eq!(result.attributes[STATUS_KEY], json!("starting"));
        assert_eq!(result.attributes[TOPIC_KEY], json!("go hiking"));
    }

    #[test]
    fn user_verb_phrase_jumps_into_the_deeper_phase() {
        let skill = skill(Arc::new(FirstPick));
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("hi", 0));
        dialog.push(Utterance::bot("Hello!", 0).with_active_skill("other_skill"));
        dialog.push(
            Utterance::human("yesterday i started to restore old furniture", 0).with_annotation(
                annotations::VERB_NOUN_PHRASES,
                json!(["restore old furniture"]),
            ),
        );

        let result = skill.respond(&dialog).unwrap();
        assert!(result.reply().contains("restore old furniture"));
        assert_eq!(result.confidence(), MATCHED_PHRASE_CONFIDENCE);
        assert_eq!(result.attributes[STATUS_KEY], json!("deeper1"));
        assert_eq!(result.attributes[TEMPLATE_KEY], json!("deeper_best_part"));
    }

    #[test]
    fn direct_question_is_not_talked_over() {
        let skill = skill(Arc::new(FirstPick));
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("what time is it?", 0));
        assert!(skill.respond(&dialog).unwrap().is_decline());
    }

    #[test]
    fn starting_run_advances_to_a_knowledge_question() {
        let skill = skill(Arc::new(FirstPick));
        let dialog = run_dialog(
            MetaScriptStatus::Starting,
            "go hiking",
            Utterance::human("yes i do", 0),
        );

        let result = skill.respond(&dialog).unwrap();
        assert!(result.reply().contains("go hiking"));
        assert!(result.reply().contains("very relaxing"));
        assert_eq!(result.confidence(), confidence::CERTAIN);
        assert_eq!(result.continuation(), ContinuationDirective::MustContinue);
        assert_eq!(result.attributes[STATUS_KEY], json!("deeper1"));
        assert_eq!(result.attributes[TEMPLATE_KEY], json!("deeper_property"));
    }

    #[test]
    fn recently_spoken_template_is_not_repeated() {
        let skill = skill(Arc::new(FirstPick));
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("i had a normal day", 0));
        dialog.push(
            Utterance::bot("I heard that getting to go hiking can be very relaxing.", 0)
                .with_active_skill(META_SCRIPT_SKILL_NAME)
                .with_attribute(STATUS_KEY, json!("deeper1"))
                .with_attribute(TOPIC_KEY, json!("go hiking"))
                .with_attribute(TEMPLATE_KEY, json!("deeper_property")),
        );
        dialog.push(Utterance::human("yes, it clears my head", 0));

        let result = skill.respond(&dialog).unwrap();
        assert_eq!(result.attributes[STATUS_KEY], json!("deeper2"));
        assert_eq!(result.attributes[TEMPLATE_KEY], json!("deeper_causes"));
        assert!(result.reply().contains("sore legs"));
    }

    #[test]
    fn deeper_question_can_be_skipped_to_opinion() {
        let skill = skill(Arc::new(AlwaysSkip));
        let dialog = run_dialog(
            MetaScriptStatus::Deeper1,
            "go hiking",
            Utterance::human("the views", 0),
        );

        let result = skill.respond(&dialog).unwrap();
        assert_eq!(result.attributes[STATUS_KEY], json!("opinion"));
    }

    #[test]
    fn user_topic_never_reaches_deeper3() {
        let skill = skill(Arc::new(FirstPick));
        let dialog = run_dialog(
            MetaScriptStatus::Deeper2,
            "restore old furniture",
            Utterance::human("it takes patience", 0),
        );

        // The chance would allow deeper3, but user topics skip it.
        let result = skill.respond(&dialog).unwrap();
        assert_eq!(result.attributes[STATUS_KEY], json!("opinion"));
    }

    #[test]
    fn predefined_topic_can_reach_deeper3() {
        let skill = skill(Arc::new(FirstPick));
        let dialog = run_dialog(
            MetaScriptStatus::Deeper2,
            "go hiking",
            Utterance::human("it takes patience", 0),
        );

        let result = skill.respond(&dialog).unwrap();
        assert_eq!(result.attributes[STATUS_KEY], json!("deeper3"));
    }

    #[test]
    fn opinion_answer_gets_sentiment_comment_and_stops() {
        let skill = skill(Arc::new(FirstPick));
        let user = Utterance::human("i love it, it is the best", 0).with_annotation(
            annotations::SENTIMENT_CLASSIFICATION,
            json!({"label": "positive"}),
        );
        let dialog = run_dialog(MetaScriptStatus::Opinion, "go hiking", user);

        let result = skill.respond(&dialog).unwrap();
        assert!(result.reply().contains("great"));
        assert_eq!(result.continuation(), ContinuationDirective::Stop);
        assert_eq!(result.attributes[STATUS_KEY], json!("comment"));
    }

    #[test]
    fn finished_run_starts_over_with_an_unused_topic() {
        let skill = skill(Arc::new(FirstPick));
        let dialog = run_dialog(
            MetaScriptStatus::Comment,
            "go hiking",
            Utterance::human("okay then", 0),
        );

        // "go hiking" was already discussed, so the next run must not
        // bring it up again even though the first index points at it.
        let result = skill.respond(&dialog).unwrap();
        assert_eq!(result.attributes[STATUS_KEY], json!("starting"));
        assert_eq!(result.attributes[TOPIC_KEY], json!("cook new dishes"));
        assert!(!result.reply().contains("go hiking"));
    }

    #[test]
    fn exhausted_topic_pool_declines() {
        let skill = skill(Arc::new(FirstPick));
        let mut dialog = run_dialog(
            MetaScriptStatus::Comment,
            "go hiking",
            Utterance::human("okay then", 0),
        );
        dialog.push(
            Utterance::bot("Have you ever thought about trying to cook new dishes?", 0)
                .with_active_skill(META_SCRIPT_SKILL_NAME)
                .with_attribute(STATUS_KEY, json!("comment"))
                .with_attribute(TOPIC_KEY, json!("cook new dishes")),
        );
        dialog.push(Utterance::human("that was fun", 0));

        assert!(skill.respond(&dialog).unwrap().is_decline());
    }

    #[test]
    fn topic_switch_intent_aborts_the_run() {
        let skill = skill(Arc::new(FirstPick));
        let user = Utterance::human("let's talk about something else", 0).with_annotation(
            annotations::INTENT_CATCHER,
            json!({"topic_switching": {"detected": 1}}),
        );
        let dialog = run_dialog(MetaScriptStatus::Deeper1, "go hiking", user);
        assert!(skill.respond(&dialog).unwrap().is_decline());
    }

    #[test]
    fn interruption_by_another_skill_prevents_advancement() {
        let skill = skill(Arc::new(FirstPick));
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("hello", 0));
        dialog.push(
            Utterance::bot("Have you ever thought about trying to go hiking?", 0)
                .with_active_skill(META_SCRIPT_SKILL_NAME)
                .with_attribute(STATUS_KEY, json!("deeper1"))
                .with_attribute(TOPIC_KEY, json!("go hiking")),
        );
        dialog.push(Utterance::human("i am so sad", 0));
        dialog.push(
            Utterance::bot("I am so sorry to hear that.", 0).with_active_skill("emotion_skill"),
        );
        dialog.push(Utterance::human("thanks, i feel better now", 0));

        let result = skill.respond(&dialog).unwrap();
        // The floor was lost; a fresh run starts instead of deeper2.
        assert_eq!(result.attributes[STATUS_KEY], json!("starting"));
    }
}
