//! Ports: interfaces to external collaborators.
//!
//! The skill core never talks to the outside world directly. Content
//! pages, passage question answering, crash reporting and randomness all
//! come in through these traits so the domain stays deterministic and
//! testable.

mod content_fetcher;
mod crash_reporter;
mod random_source;
mod text_qa;

pub use content_fetcher::{ContentError, ContentFetcher, PageContent};
pub use crash_reporter::{CrashReporter, NoopCrashReporter};
pub use random_source::{chance, choose, RandomSource};
pub use text_qa::{QaAnswer, QaError, TextQa};
