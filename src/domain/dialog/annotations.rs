//! Total accessors over annotator output maps.
//!
//! Annotators run upstream; skills only read their structured output from
//! the per-utterance annotation map. Every accessor here is a total
//! function: a missing or malformed key reads as "feature absent", never
//! as an error.

use serde_json::Value;

use super::Utterance;

/// Annotation key carrying entity linking hits.
pub const ENTITY_LINKING: &str = "entity_linking";
/// Annotation key carrying extracted noun phrases.
pub const NOUN_PHRASES: &str = "cobot_nounphrases";
/// Annotation key carrying extracted verb+noun phrases.
pub const VERB_NOUN_PHRASES: &str = "verb_noun_phrases";
/// Annotation key carrying intent classifier detections.
pub const INTENT_CATCHER: &str = "intent_catcher";
/// Annotation key carrying emotion probabilities.
pub const EMOTION_CLASSIFICATION: &str = "emotion_classification";
/// Annotation key carrying factoid-vs-conversational scores.
pub const FACTOID_CLASSIFICATION: &str = "factoid_classification";
/// Annotation key carrying sentiment classification.
pub const SENTIMENT_CLASSIFICATION: &str = "sentiment_classification";

/// An entity surfaced by the entity linking annotator.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedEntity {
    pub substr: String,
    pub id: String,
    pub types: Vec<String>,
    /// Candidate content page titles, best first.
    pub pages: Vec<String>,
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Entity linking hits, in annotator order.
pub fn linked_entities(utterance: &Utterance) -> Vec<LinkedEntity> {
    let Some(items) = utterance
        .annotations
        .get(ENTITY_LINKING)
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let substr = obj.get("entity_substr")?.as_str()?.to_string();
            Some(LinkedEntity {
                substr,
                id: obj
                    .get("entity_id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                types: string_list(obj.get("types")),
                pages: string_list(obj.get("entity_pages_titles")),
            })
        })
        .collect()
}

/// Noun phrases extracted from the utterance.
pub fn noun_phrases(utterance: &Utterance) -> Vec<String> {
    string_list(utterance.annotations.get(NOUN_PHRASES))
}

/// Verb+noun phrases extracted from the utterance (meta-script topics).
pub fn verb_noun_phrases(utterance: &Utterance) -> Vec<String> {
    string_list(utterance.annotations.get(VERB_NOUN_PHRASES))
}

/// True if the intent classifier detected the named intent.
pub fn intent_detected(utterance: &Utterance, intent: &str) -> bool {
    utterance
        .annotations
        .get(INTENT_CATCHER)
        .and_then(|v| v.get(intent))
        .and_then(|v| v.get("detected"))
        .map(|v| v.as_f64().unwrap_or(0.0) >= 1.0 || v.as_bool().unwrap_or(false))
        .unwrap_or(false)
}

/// True if the user affirmed (intent classifier "yes").
pub fn is_yes(utterance: &Utterance) -> bool {
    intent_detected(utterance, "yes")
}

/// True if the user declined (intent classifier "no").
pub fn is_no(utterance: &Utterance) -> bool {
    intent_detected(utterance, "no")
}

/// True if the intent classifier saw a topic switch.
pub fn topic_switching(utterance: &Utterance) -> bool {
    intent_detected(utterance, "topic_switching")
}

/// True if the intent classifier saw a "let's chat about" request.
pub fn lets_chat_about(utterance: &Utterance) -> bool {
    intent_detected(utterance, "lets_chat_about")
}

/// Emotion label/probability pairs from the emotion classifier.
pub fn emotion_probs(utterance: &Utterance) -> Vec<(String, f64)> {
    utterance
        .annotations
        .get(EMOTION_CLASSIFICATION)
        .and_then(Value::as_object)
        .map(|probs| {
            probs
                .iter()
                .filter_map(|(label, prob)| prob.as_f64().map(|p| (label.clone(), p)))
                .collect()
        })
        .unwrap_or_default()
}

/// (factoid, conversational) scores from the factoid classifier.
pub fn factoid_scores(utterance: &Utterance) -> (f64, f64) {
    let scores = utterance.annotations.get(FACTOID_CLASSIFICATION);
    let get = |key: &str| {
        scores
            .and_then(|v| v.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    (get("factoid"), get("conversational"))
}

/// True if the factoid score beats the conversational score.
pub fn is_factoid(utterance: &Utterance) -> bool {
    let (factoid, conversational) = factoid_scores(utterance);
    factoid > conversational
}

/// Sentiment label from the sentiment classifier, if present.
pub fn sentiment(utterance: &Utterance) -> Option<String> {
    utterance
        .annotations
        .get(SENTIMENT_CLASSIFICATION)
        .and_then(|v| v.get("label"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
