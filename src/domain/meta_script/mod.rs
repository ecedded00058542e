//! Meta-script small-talk skill.
//!
//! Runs a short scripted exchange about an everyday activity: bring it
//! up, ask a couple of deeper questions, ask for an opinion, comment on
//! the answer. The activity comes from the user's own words when a recent
//! utterance offered a usable verb phrase, otherwise from a curated list.

mod phrases;
mod skill;
mod status;
mod topics;

pub use skill::{MetaScriptSkill, META_SCRIPT_SKILL_NAME};
pub use status::MetaScriptStatus;
pub use topics::{MetaScriptTopics, Relation, TopicKnowledge};
