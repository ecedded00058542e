//! Utterances and the per-conversation dialog record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Who produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    Human,
    Bot,
}

/// One recorded utterance with its annotator output.
///
/// Immutable once recorded: skills read utterances, they never modify them.
/// Annotation values are opaque to the core except for the documented keys
/// read through [`super::annotations`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub speaker: SpeakerRole,
    /// Ordinal position within the conversation, starting at 0.
    pub position: usize,
    #[serde(default)]
    pub annotations: HashMap<String, Value>,
    /// For bot turns, the skill that produced the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_skill: Option<String>,
    /// For bot turns, the skill bookkeeping attributes echoed back by the
    /// caller (e.g. `meta_script_status`), handed back verbatim next turn.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl Utterance {
    /// Creates a human utterance.
    pub fn human(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            speaker: SpeakerRole::Human,
            position,
            annotations: HashMap::new(),
            active_skill: None,
            attributes: Map::new(),
            received_at: Utc::now(),
        }
    }

    /// Creates a bot utterance.
    pub fn bot(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            speaker: SpeakerRole::Bot,
            position,
            annotations: HashMap::new(),
            active_skill: None,
            attributes: Map::new(),
            received_at: Utc::now(),
        }
    }

    /// Attaches an annotator output under the given key.
    pub fn with_annotation(mut self, key: impl Into<String>, value: Value) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }

    /// Marks the skill that produced this bot utterance.
    pub fn with_active_skill(mut self, skill: impl Into<String>) -> Self {
        self.active_skill = Some(skill.into());
        self
    }

    /// Attaches a skill bookkeeping attribute to this bot utterance.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Lowercased utterance text, the form trigger patterns match against.
    pub fn text_lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// One conversation's turn input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialog {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,
    pub utterances: Vec<Utterance>,
    /// Human-side attributes persisted by the caller from the previous turn.
    #[serde(default)]
    pub human_attributes: Map<String, Value>,
    /// Bot-side attributes persisted by the caller from the previous turn.
    #[serde(default)]
    pub bot_attributes: Map<String, Value>,
}

impl Dialog {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            utterances: Vec::new(),
            human_attributes: Map::new(),
            bot_attributes: Map::new(),
        }
    }

    /// Appends an utterance, assigning its ordinal position.
    pub fn push(&mut self, mut utterance: Utterance) {
        utterance.position = self.utterances.len();
        self.utterances.push(utterance);
    }

    /// The newest human utterance, if any.
    pub fn last_human(&self) -> Option<&Utterance> {
        self.utterances
            .iter()
            .rev()
            .find(|u| u.speaker == SpeakerRole::Human)
    }

    /// The newest bot utterance, if any.
    pub fn last_bot(&self) -> Option<&Utterance> {
        self.utterances
            .iter()
            .rev()
            .find(|u| u.speaker == SpeakerRole::Bot)
    }

    /// The trailing window of the last `n` utterances.
    pub fn recent(&self, n: usize) -> &[Utterance] {
        let start = self.utterances.len().saturating_sub(n);
        &self.utterances[start..]
    }

    /// Bot turns within the last `window` utterances produced by `skill`.
    ///
    /// Returns the bookkeeping attribute maps those turns carried, oldest
    /// first. Pass `usize::MAX` for the whole conversation.
    pub fn skill_outputs(&self, skill: &str, window: usize) -> Vec<&Map<String, Value>> {
        self.recent(window)
            .iter()
            .filter(|u| {
                u.speaker == SpeakerRole::Bot && u.active_skill.as_deref() == Some(skill)
            })
            .map(|u| &u.attributes)
            .collect()
    }

    /// True if the immediately preceding bot turn was produced by `skill`.
    ///
    /// Skills use this to detect interruption by another skill: an
    /// in-progress scenario resets when the floor was taken.
    pub fn was_active(&self, skill: &str) -> bool {
        self.last_bot()
            .map(|u| u.active_skill.as_deref() == Some(skill))
            .unwrap_or(false)
    }
}

impl Default for Dialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_dialog() -> Dialog {
        let mut dialog = Dialog::new();
        dialog.push(Utterance::human("hello there", 0));
        dialog.push(
            Utterance::bot("Hi! Would you like to talk about dogs?", 0)
                .with_active_skill("wiki_skill"),
        );
        dialog.push(Utterance::human("sure, why not", 0));
        dialog
    }

    mod utterance_basics {
        use super::*;

        #[test]
        fn text_lower_lowercases() {
            let u = Utterance::human("I Am SO Sad", 0);
            assert_eq!(u.text_lower(), "i am so sad");
        }

        #[test]
        fn with_annotation_stores_value() {
            let u = Utterance::human("hi", 0)
                .with_annotation("intent_catcher", json!({"yes": {"detected": 1}}));
            assert!(u.annotations.contains_key("intent_catcher"));
        }

        #[test]
        fn serializes_speaker_to_snake_case() {
            let json = serde_json::to_string(&SpeakerRole::Human).unwrap();
            assert_eq!(json, "\"human\"");
        }
    }

    mod dialog_navigation {
        use super::*;

        #[test]
        fn push_assigns_positions() {
            let dialog = sample_dialog();
            let positions: Vec<usize> = dialog.utterances.iter().map(|u| u.position).collect();
            assert_eq!(positions, vec![0, 1, 2]);
        }

        #[test]
        fn last_human_skips_bot_turns() {
            let dialog = sample_dialog();
            assert_eq!(dialog.last_human().unwrap().text, "sure, why not");
        }

        #[test]
        fn last_bot_finds_bot_turn() {
            let dialog = sample_dialog();
            assert!(dialog.last_bot().unwrap().text.contains("dogs"));
        }

        #[test]
        fn was_active_matches_last_bot_skill() {
            let dialog = sample_dialog();
            assert!(dialog.was_active("wiki_skill"));
            assert!(!dialog.was_active("emotion_skill"));
        }

        #[test]
        fn recent_returns_trailing_window() {
            let dialog = sample_dialog();
            assert_eq!(dialog.recent(2).len(), 2);
            assert_eq!(dialog.recent(10).len(), 3);
        }

        #[test]
        fn skill_outputs_filters_by_skill_and_window() {
            let mut dialog = sample_dialog();
            dialog.push(
                Utterance::bot("Recently I thought about going hiking.", 0)
                    .with_active_skill("meta_script_skill")
                    .with_attribute("meta_script_status", json!("starting")),
            );
            let outputs = dialog.skill_outputs("meta_script_skill", usize::MAX);
            assert_eq!(outputs.len(), 1);
            assert_eq!(outputs[0]["meta_script_status"], json!("starting"));
            // Window of 0 sees nothing.
            assert!(dialog.skill_outputs("meta_script_skill", 0).is_empty());
        }
    }
}
