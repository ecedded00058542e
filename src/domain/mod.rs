//! Domain layer: dialog primitives and the three skill implementations.

pub mod dialog;
pub mod emotion;
pub mod foundation;
pub mod meta_script;
pub mod wiki;
