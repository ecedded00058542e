//! The emotion scenario table.
//!
//! Transitions live in data: each step declares the answer pool spoken on
//! entry plus the step taken on an affirmative or negative follow-up. The
//! table is validated once at load so a dangling step reference or an
//! empty answer pool fails fast instead of mid-conversation.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::dialog::SkillLink;
use crate::domain::foundation::TableError;
use super::state::ScenarioState;

/// One scenario step.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioStep {
    /// Replies spoken when this step is entered, one chosen at random.
    /// Empty for pool-backed steps, which draw from the jokes or advice
    /// pool instead.
    #[serde(default)]
    pub answers: Vec<String>,
    /// Step entered when the user affirms.
    #[serde(default)]
    pub on_yes: Option<ScenarioState>,
    /// Step entered when the user declines.
    #[serde(default)]
    pub on_no: Option<ScenarioState>,
    /// Hand-off suggested to the orchestrator on entering this step.
    #[serde(default)]
    pub link: Option<SkillLink>,
}

impl ScenarioStep {
    /// A step with no outgoing edges closes the scenario.
    pub fn is_terminal(&self) -> bool {
        self.on_yes.is_none() && self.on_no.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct RawTable {
    steps: HashMap<ScenarioState, ScenarioStep>,
    jokes: Vec<String>,
    advice: Vec<String>,
}

/// The validated scenario table.
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    steps: HashMap<ScenarioState, ScenarioStep>,
    jokes: Vec<String>,
    advice: Vec<String>,
}

static DEFAULT_TABLE: Lazy<ScenarioTable> = Lazy::new(|| {
    ScenarioTable::load(include_str!("../../../data/emotion_scenario.yaml"))
        .expect("embedded emotion scenario table is valid")
});

impl ScenarioTable {
    /// Parses and validates a scenario table from YAML.
    pub fn load(yaml: &str) -> Result<Self, TableError> {
        let raw: RawTable = serde_yaml::from_str(yaml).map_err(|e| TableError::Parse {
            table: "emotion_scenario".to_string(),
            reason: e.to_string(),
        })?;
        if raw.jokes.is_empty() {
            return Err(TableError::Empty {
                table: "emotion_scenario.jokes".to_string(),
            });
        }
        if raw.advice.is_empty() {
            return Err(TableError::Empty {
                table: "emotion_scenario.advice".to_string(),
            });
        }
        for (state, step) in &raw.steps {
            if step.answers.is_empty() && !state.is_pool_backed() {
                return Err(TableError::EmptyAnswerPool {
                    state: state.as_str().to_string(),
                });
            }
            for next in [step.on_yes, step.on_no].into_iter().flatten() {
                if !raw.steps.contains_key(&next) {
                    return Err(TableError::DanglingNextState {
                        state: state.as_str().to_string(),
                        next: next.as_str().to_string(),
                    });
                }
            }
        }
        Ok(Self {
            steps: raw.steps,
            jokes: raw.jokes,
            advice: raw.advice,
        })
    }

    /// The table embedded in the binary.
    pub fn defaults() -> &'static ScenarioTable {
        &DEFAULT_TABLE
    }

    pub fn step(&self, state: ScenarioState) -> Option<&ScenarioStep> {
        self.steps.get(&state)
    }

    pub fn jokes(&self) -> &[String] {
        &self.jokes
    }

    pub fn advice(&self) -> &[String] {
        &self.advice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
steps:
  sad_and_lonely:
    answers: ["I am so sorry to hear that. Would you like to hear a joke to cheer you up?"]
    on_yes: joke_requested
    on_no: offered_advice
  offered_advice:
    answers: ["Then maybe a piece of advice would help?"]
    on_yes: advice_given
    on_no: declined_advice
  joke_requested: {}
  advice_given: {}
  declined_advice:
    answers: ["I see. Remember that I am always here for you."]
    link:
      skill: "book_skill"
      phrase: "Maybe a good book could take your mind off things."
jokes: ["Why did the scarecrow win an award? He was outstanding in his field."]
advice: ["Try to take a short walk outside, it often helps."]
"#;

    #[test]
    fn loads_valid_table() {
        let table = ScenarioTable::load(SAMPLE).unwrap();
        let step = table.step(ScenarioState::SadAndLonely).unwrap();
        assert_eq!(step.on_yes, Some(ScenarioState::JokeRequested));
        assert!(!step.is_terminal());
        let declined = table.step(ScenarioState::DeclinedAdvice).unwrap();
        assert!(declined.is_terminal());
        assert_eq!(declined.link.as_ref().unwrap().skill, "book_skill");
    }

    #[test]
    fn rejects_dangling_next_state() {
        let yaml = r#"
steps:
  sad_and_lonely:
    answers: ["So sorry."]
    on_yes: joke_requested
jokes: ["a joke"]
advice: ["some advice"]
"#;
        let err = ScenarioTable::load(yaml).unwrap_err();
        assert!(matches!(err, TableError::DanglingNextState { .. }));
    }

    #[test]
    fn rejects_empty_answer_pool_on_non_pool_step() {
        let yaml = r#"
steps:
  sad_and_lonely: {}
jokes: ["a joke"]
advice: ["some advice"]
"#;
        let err = ScenarioTable::load(yaml).unwrap_err();
        assert!(matches!(err, TableError::EmptyAnswerPool { .. }));
    }

    #[test]
    fn rejects_empty_pools() {
        let yaml = "steps: {}\njokes: []\nadvice: [\"x\"]";
        assert!(matches!(
            ScenarioTable::load(yaml).unwrap_err(),
            TableError::Empty { .. }
        ));
    }

    #[test]
    fn loading_twice_yields_identical_tables() {
        let a = ScenarioTable::load(SAMPLE).unwrap();
        let b = ScenarioTable::load(SAMPLE).unwrap();
        assert_eq!(a.jokes(), b.jokes());
        assert_eq!(a.advice(), b.advice());
        assert_eq!(
            a.step(ScenarioState::OfferedAdvice),
            b.step(ScenarioState::OfferedAdvice)
        );
    }

    #[test]
    fn embedded_defaults_parse() {
        let table = ScenarioTable::defaults();
        assert!(table.step(ScenarioState::SadAndLonely).is_some());
        assert!(table.step(ScenarioState::JoyIFeel).is_some());
        assert!(table.step(ScenarioState::SadAndLonelyEnd).is_some());
        assert!(!table.jokes().is_empty());
    }
}
