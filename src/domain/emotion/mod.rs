//! Emotion support skill.
//!
//! Detects the user's feeling from surface patterns and the emotion
//! classifier, then walks a small data-driven comfort scenario: sympathy,
//! an offered joke, an offered piece of advice.

pub mod patterns;
mod skill;
mod state;
mod table;

pub use skill::{EmotionSkill, EMOTION_SKILL_NAME};
pub use state::ScenarioState;
pub use table::{ScenarioStep, ScenarioTable};
