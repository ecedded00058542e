//! Dialog primitives shared by all skills.
//!
//! A [`Dialog`] is the per-conversation turn input: ordered utterances with
//! annotator output attached, plus the attribute maps persisted by the
//! caller between turns. [`SkillTurnResult`] is the standardized output
//! tuple every skill produces.

pub mod annotations;
mod context;
mod result;
mod utterance;

pub use context::BoundedHistory;
pub use result::{confidence, ContinuationDirective, SkillLink, SkillTurnResult};
pub use utterance::{Dialog, SpeakerRole, Utterance};
