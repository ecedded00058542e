//! Phrase templates for the activity small-talk script.
//!
//! Deeper and opinion questions carry stable ids so templates spoken in
//! recent turns can be excluded from the next draw.

use crate::ports::{choose, RandomSource};

use super::topics::{Relation, TopicKnowledge};

/// A question template. Relation-tagged templates also need a `{phrase}`
/// drawn from the topic's knowledge for that relation.
pub struct QuestionTemplate {
    pub id: &'static str,
    relation: Option<Relation>,
    text: &'static str,
}

const STARTING: &[&str] = &[
    "I wanted to ask you. Have you ever thought about trying to {topic}?",
    "By the way, recently I was thinking about how people like to {topic}. Do you ever do that?",
    "Here is a thought. Some people really enjoy finding time to {topic}. Is that something you do?",
];

const DEEPER: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "deeper_desires",
        relation: Some(Relation::Desires),
        text: "Some people {topic} because they want {phrase}. Is that what draws you to it?",
    },
    QuestionTemplate {
        id: "deeper_property",
        relation: Some(Relation::HasProperty),
        text: "I heard that getting to {topic} can be {phrase}. Has that been true for you?",
    },
    QuestionTemplate {
        id: "deeper_causes",
        relation: Some(Relation::Causes),
        text: "They say that when you {topic} it often leads to {phrase}. Did you notice that?",
    },
    QuestionTemplate {
        id: "deeper_subevent",
        relation: Some(Relation::HasSubevent),
        text: "Is {phrase} your favorite part of getting to {topic}?",
    },
    QuestionTemplate {
        id: "deeper_attribute",
        relation: Some(Relation::Attribute),
        text: "Do you think people who {topic} tend to be {phrase}?",
    },
    QuestionTemplate {
        id: "deeper_best_part",
        relation: None,
        text: "What do you think is the best part about getting to {topic}?",
    },
    QuestionTemplate {
        id: "deeper_hard_part",
        relation: None,
        text: "Is there anything hard or annoying about trying to {topic}?",
    },
    QuestionTemplate {
        id: "deeper_change",
        relation: None,
        text: "If you could, what would you change to make it easier to {topic}?",
    },
];

const OPINION: &[QuestionTemplate] = &[
    QuestionTemplate {
        id: "opinion_worth",
        relation: None,
        text: "So, all in all, do you think it is worth it to {topic}?",
    },
    QuestionTemplate {
        id: "opinion_feel",
        relation: None,
        text: "In general, how do you feel about taking time to {topic}?",
    },
];

const COMMENT_POSITIVE: &[&str] = &[
    "That is great to hear! It sounds like a good thing to keep doing.",
    "Nice! I am glad you feel that way about it.",
];

const COMMENT_NEGATIVE: &[&str] = &[
    "I see, so it is not really your cup of tea. Fair enough.",
    "Got it, not everything is for everyone.",
];

const COMMENT_NEUTRAL: &[&str] = &[
    "Well, it is something to think about either way.",
    "Interesting. Thanks for sharing your take on it.",
];

/// The opening line that brings up the activity.
pub fn starting_phrase(topic: &str, rng: &dyn RandomSource) -> String {
    let template = choose(rng, STARTING).unwrap_or(&STARTING[0]);
    template.replace("{topic}", topic)
}

/// A deeper question about the topic, excluding templates spoken in
/// recent turns. Relation templates need matching knowledge phrases, so
/// user-supplied topics only draw the generic ones.
pub fn deeper_question(
    topic: &str,
    knowledge: Option<&TopicKnowledge>,
    used: &[String],
    rng: &dyn RandomSource,
) -> Option<(&'static str, String)> {
    pick(DEEPER, knowledge, used, rng).map(|t| (t.id, fill(t, topic, knowledge, rng)))
}

/// The opinion question closing the deeper phase.
pub fn opinion_question(
    topic: &str,
    used: &[String],
    rng: &dyn RandomSource,
) -> Option<(&'static str, String)> {
    pick(OPINION, None, used, rng).map(|t| (t.id, fill(t, topic, None, rng)))
}

/// The closing comment, keyed by the sentiment of the user's opinion.
pub fn comment_for(sentiment: Option<&str>, rng: &dyn RandomSource) -> String {
    let pool = match sentiment {
        Some("positive") => COMMENT_POSITIVE,
        Some("negative") => COMMENT_NEGATIVE,
        _ => COMMENT_NEUTRAL,
    };
    choose(rng, pool).unwrap_or(&COMMENT_NEUTRAL[0]).to_string()
}

/// Uniform choice among fillable templates, preferring ones not used
/// recently; when every fillable template was used, reuse is allowed.
fn pick<'a>(
    pool: &'a [QuestionTemplate],
    knowledge: Option<&TopicKnowledge>,
    used: &[String],
    rng: &dyn RandomSource,
) -> Option<&'a QuestionTemplate> {
    let fillable: Vec<&QuestionTemplate> = pool
        .iter()
        .filter(|t| match t.relation {
            Some(relation) => knowledge.is_some_and(|k| !k.phrases(relation).is_empty()),
            None => true,
        })
        .collect();
    let fresh: Vec<&QuestionTemplate> = fillable
        .iter()
        .copied()
        .filter(|t| !used.iter().any(|u| u == t.id))
        .collect();
    let candidates = if fresh.is_empty() { &fillable } else { &fresh };
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.pick_index(candidates.len())])
}

fn fill(
    template: &QuestionTemplate,
    topic: &str,
    knowledge: Option<&TopicKnowledge>,
    rng: &dyn RandomSource,
) -> String {
    let mut text = template.text.replace("{topic}", topic);
    if let (Some(relation), Some(knowledge)) = (template.relation, knowledge) {
        if let Some(phrase) = choose(rng, knowledge.phrases(relation)) {
            text = text.replace("{phrase}", phrase);
        }
    }
    text
}
