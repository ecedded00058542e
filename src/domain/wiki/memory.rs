//! Per-user persisted memory for the fact-retrieval skill.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::domain::dialog::BoundedHistory;
use crate::domain::wiki::state::WikiState;

/// Key under which the memory is persisted in the human attributes.
pub const MEMORY_KEY: &str = "wiki_skill_memory";

/// Titles cap. Old section titles fall off and may be offered again.
const USED_TITLES_CAP: usize = 16;
/// Only the two most recent pages stay in scope for factoid answers.
const PAGE_CAP: usize = 2;

/// Everything the skill remembers about one user between turns.
///
/// Serialized as a whole into the human attributes; a missing or
/// unreadable blob resets to the default, which restarts the scenario.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WikiMemory {
    pub state: WikiState,
    /// The entity currently under discussion, lowercased surface form.
    pub entity: String,
    /// Entity types from entity linking, used for title lookup.
    pub entity_types: Vec<String>,
    /// Page titles whose content is in scope, most recent last.
    pub current_pages: BoundedHistory<PAGE_CAP>,
    /// The section title proposed in the previous bot question.
    pub previous_title: String,
    /// The page the previous fact was taken from.
    pub previous_page_title: String,
    /// Section titles already offered for the current entity.
    pub used_titles: BoundedHistory<USED_TITLES_CAP>,
    /// Anchor texts surfaced in the previous fact, lowercased.
    pub mentions: Vec<String>,
    /// Anchor text to target page, keyed by lowercased anchor.
    pub mention_pages: HashMap<String, String>,
    /// Set when the latest fact came from a newly opened page.
    pub new_page: bool,
    /// Whether the scenario has produced at least one reply.
    pub started: bool,
}

impl WikiMemory {
    /// Reads the memory out of a human-attributes map.
    pub fn load(human_attributes: &Map<String, Value>) -> Self {
        human_attributes
            .get(MEMORY_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Writes the memory into a human-attributes map.
    pub fn store(&self, human_attributes: &mut Map<String, Value>) {
        // Serializing a plain struct of maps and strings cannot fail.
        if let Ok(value) = serde_json::to_value(self) {
            human_attributes.insert(MEMORY_KEY.to_string(), value);
        }
    }

    /// Clears every context slot, keeping only the state machine position.
    pub fn clear_context(&mut self) {
        let state = self.state;
        *self = WikiMemory {
            state,
            ..WikiMemory::default()
        };
    }

    /// Records the mentions of the latest fact.
    pub fn set_mentions(&mut self, mentions: &[super::content::Mention]) {
        self.mentions = mentions.iter().map(|m| m.anchor.clone()).collect();
        self.mention_pages = mentions
            .iter()
            .map(|m| (m.anchor.clone(), m.page.clone()))
            .collect();
    }

    /// The mention page matching a user utterance, if any anchor occurs
    /// in it as a substring.
    pub fn mentioned_page_in(&self, user_text_lower: &str) -> Option<(&str, &str)> {
        self.mentions.iter().find_map(|anchor| {
            if user_text_lower.contains(anchor.as_str()) {
                self.mention_pages
                    .get(anchor)
                    .map(|page| (anchor.as_str(), page.as_str()))
            } else {
                None
            }
        })
    }

    /// The mention page matching one of the user's noun phrases.
    pub fn mention_matching_phrase(&self, phrases: &[String]) -> Option<(&str, &str)> {
        self.mentions.iter().find_map(|anchor| {
            let hit = phrases.iter().any(|phrase| {
                let phrase = phrase.to_lowercase();
                phrase.contains(anchor.as_str()) || anchor.contains(&phrase)
            });
            if hit {
                self.mention_pages
                    .get(anchor)
                    .map(|page| (anchor.as_str(), page.as_str()))
            } else {
                None
            }
        })
    }
}
