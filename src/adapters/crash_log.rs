//! Crash reporter backed by structured logging.

use tracing::error;

use crate::domain::foundation::SkillError;
use crate::ports::CrashReporter;

/// Reports degraded turns through `tracing::error!`.
///
/// Stands in for an external crash collector; the error event carries the
/// skill name so per-skill alerting can filter on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCrashReporter;

impl CrashReporter for TracingCrashReporter {
    fn capture(&self, skill: &str, error: &SkillError) {
        error!(skill, error = %error, "skill turn failed, declining");
    }
}
