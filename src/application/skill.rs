//! The common skill interface the turn driver runs against.

use async_trait::async_trait;

use crate::domain::dialog::{Dialog, SkillTurnResult};
use crate::domain::emotion::{EmotionSkill, EMOTION_SKILL_NAME};
use crate::domain::foundation::SkillError;
use crate::domain::meta_script::{MetaScriptSkill, META_SCRIPT_SKILL_NAME};
use crate::domain::wiki::{WikiSkill, WIKI_SKILL_NAME};

/// One conversational skill: reads a dialog, produces one turn result.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Stable skill name, used as the `active_skill` marker and in logs.
    fn name(&self) -> &'static str;

    /// Produces this skill's answer for the dialog's newest utterance.
    ///
    /// # Errors
    /// Internal failures surface as `SkillError`; the turn driver converts
    /// them into declines.
    async fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError>;
}

#[async_trait]
impl Skill for WikiSkill {
    fn name(&self) -> &'static str {
        WIKI_SKILL_NAME
    }

    async fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
        WikiSkill::respond(self, dialog).await
    }
}

#[async_trait]
impl Skill for EmotionSkill {
    fn name(&self) -> &'static str {
        EMOTION_SKILL_NAME
    }

    async fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
        EmotionSkill::respond(self, dialog)
    }
}

#[async_trait]
impl Skill for MetaScriptSkill {
    fn name(&self) -> &'static str {
        META_SCRIPT_SKILL_NAME
    }

    async fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
        MetaScriptSkill::respond(self, dialog)
    }
}
