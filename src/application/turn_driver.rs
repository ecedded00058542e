//! The turn driver: the error boundary around skill execution.
//!
//! A skill failure must never take down a turn; it degrades to a decline
//! after being reported, so the conversation continues on other skills.

use std::sync::Arc;

use futures::future::join_all;

use crate::domain::dialog::{Dialog, SkillTurnResult};
use crate::ports::CrashReporter;

use super::skill::Skill;

/// Runs skills over dialogs, converting failures into declines.
pub struct TurnDriver {
    reporter: Arc<dyn CrashReporter>,
}

impl TurnDriver {
    pub fn new(reporter: Arc<dyn CrashReporter>) -> Self {
        Self { reporter }
    }

    /// Runs one skill over one dialog.
    pub async fn drive(&self, skill: &dyn Skill, dialog: &Dialog) -> SkillTurnResult {
        match skill.respond(dialog).await {
            Ok(result) => result,
            Err(error) => {
                self.reporter.capture(skill.name(), &error);
                SkillTurnResult::decline()
            }
        }
    }

    /// Runs one skill over a batch of dialogs concurrently, preserving
    /// input order in the output.
    pub async fn drive_batch(
        &self,
        skill: &dyn Skill,
        dialogs: &[Dialog],
    ) -> Vec<SkillTurnResult> {
        join_all(dialogs.iter().map(|dialog| self.drive(skill, dialog))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::{confidence, ContinuationDirective};
    use crate::domain::foundation::{SkillError, TableError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OkSkill;

    #[async_trait]
    impl Skill for OkSkill {
        fn name(&self) -> &'static str {
            "ok_skill"
        }

        async fn respond(&self, _dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
            Ok(SkillTurnResult::answer(
                "hello",
                confidence::HIGH,
                ContinuationDirective::MayContinue,
            ))
        }
    }

    struct FailingSkill;

    #[async_trait]
    impl Skill for FailingSkill {
        fn name(&self) -> &'static str {
            "failing_skill"
        }

        async fn respond(&self, _dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
            Err(TableError::Empty {
                table: "whatever".to_string(),
            }
            .into())
        }
    }

    #[derive(Default)]
    struct CountingReporter(AtomicUsize);

    impl CrashReporter for CountingReporter {
        fn capture(&self, _skill: &str, _error: &SkillError) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn successful_turn_passes_through() {
        let driver = TurnDriver::new(Arc::new(CountingReporter::default()));
        let result = driver.drive(&OkSkill, &Dialog::new()).await;
        assert_eq!(result.reply(), "hello");
    }

    #[tokio::test]
    async fn failure_is_reported_and_becomes_a_decline() {
        let reporter = Arc::new(CountingReporter::default());
        let driver = TurnDriver::new(reporter.clone());
        let result = driver.drive(&FailingSkill, &Dialog::new()).await;
        assert!(result.is_decline());
        assert_eq!(reporter.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_isolates_failures() {
        let driver = TurnDriver::new(Arc::new(CountingReporter::default()));
        let dialogs = vec![Dialog::new(), Dialog::new(), Dialog::new()];
        let results = driver.drive_batch(&OkSkill, &dialogs).await;
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.reply() == "hello"));
    }
}
