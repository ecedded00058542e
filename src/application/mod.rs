//! Application services wiring skills to the outside world.

mod skill;
mod turn_driver;

pub use skill::Skill;
pub use turn_driver::TurnDriver;
