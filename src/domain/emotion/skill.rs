//! The emotion support skill turn logic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::dialog::{
    annotations, confidence, ContinuationDirective, Dialog, SkillLink, SkillTurnResult, Utterance,
};
use crate::domain::foundation::SkillError;
use crate::ports::{choose, RandomSource};

use super::patterns;
use super::state::ScenarioState;
use super::table::ScenarioTable;

pub const EMOTION_SKILL_NAME: &str = "emotion_skill";

/// Key under which the scenario bookkeeping is persisted.
const ATTRIBUTES_KEY: &str = "emotion_skill_attributes";

/// Measured precision of the emotion classifier per label; a detection
/// can never be trusted beyond the classifier's precision for it.
fn classifier_precision(label: &str) -> f64 {
    match label {
        "anger" => 1.0,
        "fear" => 0.894,
        "joy" => 1.0,
        "love" => 0.778,
        "sadness" => 1.0,
        "surprise" => 0.745,
        _ => 0.0,
    }
}

/// Fixed start-state mapping from the classified emotion. Joy splits on
/// whether the user phrases the feeling as their own.
fn state_for_emotion(label: &str, first_person: bool) -> Option<ScenarioState> {
    match label {
        "sadness" => Some(ScenarioState::SadAndLonely),
        "fear" => Some(ScenarioState::Fear),
        "anger" => Some(ScenarioState::Anger),
        "surprise" => Some(ScenarioState::Surprise),
        "love" => Some(ScenarioState::Love),
        "joy" if first_person => Some(ScenarioState::JoyIFeel),
        "joy" => Some(ScenarioState::JoyFeelingTowardsSmth),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
struct EmotionMemory {
    state: Option<ScenarioState>,
    /// Indices of advice already given, so none repeats.
    given_advice: Vec<usize>,
    /// Set when an explicit sadness or loneliness wording was matched.
    regex_sad: bool,
}

impl EmotionMemory {
    fn load(human_attributes: &Map<String, Value>) -> Self {
        human_attributes
            .get(ATTRIBUTES_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    fn store(&self, human_attributes: &mut Map<String, Value>) {
        if let Ok(value) = serde_json::to_value(self) {
            human_attributes.insert(ATTRIBUTES_KEY.to_string(), value);
        }
    }
}

/// What entering a scenario step produced.
struct Entered {
    state: ScenarioState,
    reply: String,
    terminal: bool,
    link: Option<SkillLink>,
    advice_index: Option<usize>,
}

/// Offers comfort, jokes and advice when the user expresses a feeling,
/// driven by surface patterns first and the emotion classifier second.
pub struct EmotionSkill {
    table: ScenarioTable,
    rng: Arc<dyn RandomSource>,
}

impl EmotionSkill {
    pub fn new(table: ScenarioTable, rng: Arc<dyn RandomSource>) -> Self {
        Self { table, rng }
    }

    /// Builds the skill over the embedded scenario table.
    pub fn with_default_table(rng: Arc<dyn RandomSource>) -> Self {
        Self::new(ScenarioTable::defaults().clone(), rng)
    }

    /// Produces this skill's answer for the newest human utterance.
    pub fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
        let Some(user) = dialog.last_human() else {
            return Ok(SkillTurnResult::decline());
        };
        let lower = user.text_lower();
        let memory = EmotionMemory::load(&dialog.human_attributes);
        let was_active = dialog.was_active(EMOTION_SKILL_NAME);

        if patterns::wants_emotion_talk(&lower) {
            let mut human_attributes = dialog.human_attributes.clone();
            EmotionMemory::default().store(&mut human_attributes);
            return Ok(SkillTurnResult::answer(
                "OK. How do you feel today?",
                confidence::CERTAIN,
                ContinuationDirective::MustContinue,
            )
            .with_human_attributes(human_attributes)
            .record_continuation());
        }

        let forced = patterns::forced_state(&lower);
        let regex_sad = matches!(forced, Some(ScenarioState::SadAndLonely));
        let first_person = patterns::first_person_feeling(&lower)
            || dialog
                .last_bot()
                .is_some_and(|bot| bot.text_lower().contains("how do you feel"));

        // A pending step only survives while this skill holds the floor.
        let pending = if was_active { memory.state } else { None };
        let entered = self
            .continue_scenario(user, pending)
            .or_else(|| forced.map(|s| (s, confidence::CERTAIN)))
            .or_else(|| self.classified_start(user, first_person));

        let Some((state, base_confidence)) = entered else {
            let mut human_attributes = dialog.human_attributes.clone();
            EmotionMemory::default().store(&mut human_attributes);
            return Ok(SkillTurnResult::decline().with_human_attributes(human_attributes));
        };

        let Some(entered) = self.enter(state, &memory.given_advice) else {
            return Ok(SkillTurnResult::decline());
        };

        let mut conf = base_confidence;
        if patterns::mentions_media(&lower) {
            // Mood words about a book or a movie are opinions, not feelings.
            conf = conf.min(confidence::LOW);
        }
        if let Some(bot) = dialog.last_bot() {
            if !was_active && patterns::mentions_media(&bot.text_lower()) {
                conf *= 0.5;
            }
        }

        let mut directive = if entered.terminal {
            ContinuationDirective::Stop
        } else {
            ContinuationDirective::MustContinue
        };
        if conf < confidence::CERTAIN && directive == ContinuationDirective::MustContinue {
            directive = ContinuationDirective::MayContinue;
        }

        let next_memory = if entered.terminal {
            EmotionMemory::default()
        } else {
            let mut given_advice = memory.given_advice.clone();
            given_advice.extend(entered.advice_index);
            EmotionMemory {
                state: Some(entered.state),
                given_advice,
                regex_sad: regex_sad || (was_active && memory.regex_sad),
            }
        };
        let mut human_attributes = dialog.human_attributes.clone();
        next_memory.store(&mut human_attributes);

        debug!(state = entered.state.as_str(), confidence = conf, "emotion turn answered");
        let mut result = SkillTurnResult::answer(entered.reply, conf, directive)
            .with_human_attributes(human_attributes)
            .record_continuation();
        if let Some(link) = entered.link {
            result = result.with_link(link);
        }
        Ok(result)
    }

    /// Follows the pending step's yes/no edge, when one applies.
    fn continue_scenario(
        &self,
        user: &Utterance,
        pending: Option<ScenarioState>,
    ) -> Option<(ScenarioState, f64)> {
        let step = self.table.step(pending?)?;
        if annotations::is_yes(user) {
            step.on_yes.map(|next| (next, confidence::CERTAIN))
        } else if annotations::is_no(user) {
            step.on_no.map(|next| (next, confidence::CERTAIN))
        } else {
            None
        }
    }

    /// Starts the scenario from the dominant classified emotion.
    fn classified_start(&self, user: &Utterance, first_person: bool) -> Option<(ScenarioState, f64)> {
        let (label, _prob) = annotations::emotion_probs(user)
            .into_iter()
            .filter(|(label, _)| label != "neutral")
            .max_by(|a, b| a.1.total_cmp(&b.1))?;
        let state = state_for_emotion(&label, first_person)?;
        let conf = confidence::HIGH.min(classifier_precision(&label));
        if conf == 0.0 {
            return None;
        }
        Some((state, conf))
    }

    /// Enters a scenario step: the reply spoken, whether it closes the
    /// scenario and the hand-off it suggests. Accepted advice draws an
    /// unused entry from the pool; an exhausted pool closes instead.
    fn enter(&self, state: ScenarioState, given_advice: &[usize]) -> Option<Entered> {
        if state == ScenarioState::AdviceGiven {
            let fresh: Vec<usize> = (0..self.table.advice().len())
                .filter(|i| !given_advice.contains(i))
                .collect();
            if fresh.is_empty() {
                return self.enter(ScenarioState::SadAndLonelyEnd, given_advice);
            }
            let index = fresh[self.rng.pick_index(fresh.len())];
            let step = self.table.step(state)?;
            let mut reply = self.table.advice()[index].clone();
            if let Some(follow_up) = choose(self.rng.as_ref(), &step.answers) {
                reply.push(' ');
                reply.push_str(follow_up);
            }
            return Some(Entered {
                state,
                reply,
                terminal: step.is_terminal(),
                link: step.link.clone(),
                advice_index: Some(index),
            });
        }

        let reply = match state {
            ScenarioState::JokeRequested => choose(self.rng.as_ref(), self.table.jokes()),
            _ => choose(self.rng.as_ref(), &self.table.step(state)?.answers),
        }?
        .clone();
        let step = self.table.step(state);
        Some(Entered {
            state,
            reply,
            terminal: step.map(|s| s.is_terminal()).unwrap_or(true),
            link: step.and_then(|s| s.link.clone()),
            advice_index: None,
        })
    }
}
