//! Shared building blocks for the skill domain layer.

mod errors;
mod state_machine;

pub use errors::{SkillError, TableError, ValidationError};
pub use state_machine::StateMachine;
