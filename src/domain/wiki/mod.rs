//! Fact-retrieval skill.
//!
//! Tracks a topic entity and its content pages across turns, tells short
//! facts section by section, answers factoid questions over the tracked
//! passages, and digs into cross-referenced pages on request.

pub mod content;
mod memory;
mod responder;
mod skill;
mod state;
mod tables;
mod triggers;

pub use memory::WikiMemory;
pub use skill::{WikiSkill, WIKI_SKILL_NAME};
pub use state::WikiState;
pub use tables::{TitleTemplate, WikiTables};
