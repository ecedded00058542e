//! Utterance-level trigger predicates for the fact-retrieval skill.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::dialog::annotations;
use crate::domain::dialog::Utterance;
use crate::domain::wiki::tables::WikiTables;

static LETS_TALK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:let'?s|can we|could we|i (?:want|wanna|would like) to)\s+(?:talk|chat|speak)")
        .expect("valid lets-talk regex")
});

static NOT_WANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:do not|don'?t|not)\s+(?:want|wanna|like)|no more|stop(?:\s+it)?|enough)\b")
        .expect("valid refusal regex")
});

static DONT_KNOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:i\s+)?(?:do not|don'?t)\s+know|not sure|whatever|anything|you decide)\b")
        .expect("valid dont-know regex")
});

static QUESTION_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:who|what|when|where|which|whose|how (?:much|many|long|old))\b")
        .expect("valid question-word regex")
});

/// Topic the user explicitly asked to talk about, if it matches a
/// predefined topic. Fires on the intent classifier's "lets_chat_about"
/// or on the surface pattern, then picks the first declared topic whose
/// substring occurs in the utterance.
pub fn requested_topic<'a>(utterance: &Utterance, tables: &'a WikiTables) -> Option<&'a str> {
    let lower = utterance.text_lower();
    if !annotations::lets_chat_about(utterance) && !LETS_TALK.is_match(&lower) {
        return None;
    }
    tables
        .topic_pages()
        .iter()
        .find(|(substr, _)| lower.contains(substr.as_str()))
        .map(|(substr, _)| substr.as_str())
}

/// The user declined to keep talking about the current topic.
pub fn is_refusal(utterance: &Utterance) -> bool {
    annotations::is_no(utterance) || NOT_WANT.is_match(&utterance.text_lower())
}

/// The user has no topic preference.
pub fn is_dont_know(utterance: &Utterance) -> bool {
    DONT_KNOW.is_match(&utterance.text_lower())
}

/// The utterance reads as a factoid question.
pub fn is_question(utterance: &Utterance) -> bool {
    let lower = utterance.text_lower();
    lower.contains('?') || QUESTION_WORD.is_match(&lower)
}
