//! Adapters: concrete implementations of the ports.

mod content_client;
mod crash_log;
mod qa_client;
mod rng;

pub use content_client::{ContentClientConfig, HttpContentFetcher};
pub use crash_log::TracingCrashReporter;
pub use qa_client::{HttpTextQa, QaClientConfig};
pub use rng::{SeededRandom, ThreadRandom};
