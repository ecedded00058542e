//! Crash Reporter Port - out-of-band visibility for degraded turns.

use crate::domain::foundation::SkillError;

/// Port for reporting internal failures to an out-of-band collector.
///
/// Reporting is fire-and-forget: a failure to report must never affect
/// the turn result.
pub trait CrashReporter: Send + Sync {
    /// Records a failure that was converted into a decline result.
    fn capture(&self, skill: &str, error: &SkillError);
}

/// Reporter that drops everything. Useful in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCrashReporter;

impl CrashReporter for NoopCrashReporter {
    fn capture(&self, _skill: &str, _error: &SkillError) {}
}
