//! Surface trigger patterns for the emotion support skill.
//!
//! These fire on the raw utterance text and override the emotion
//! classifier: an explicit "I am so lonely" or "tell me a joke" is a
//! stronger signal than any classifier probability.

use once_cell::sync::Lazy;
use regex::Regex;

use super::state::ScenarioState;

static SAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:sad|unhappy|horrible|depressed|awful|terrible|dire)\b|pretty bad|^bad$")
        .expect("valid sadness regex")
});

static LONELY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"i(?: a|')m alone|\b(?:lonely|loneliness)\b").expect("valid loneliness regex")
});

static BORED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:boring|bored)\b").expect("valid boredom regex"));

static PAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:pain|painful|hurts?|aches?|aching)\b").expect("valid pain regex")
});

static JOKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:tell(?: me)?|hear|know)(?: [a-z]+){0,3} jokes?").expect("valid joke regex")
});

static TALK_ABOUT_EMOTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:talk|chat|speak) about (?:emotion|feeling)s?")
        .expect("valid talk-about-emotion regex")
});

static FIRST_PERSON_FEELING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bi (?:feel|felt|am|have been)\b|\bi'm\b")
        .expect("valid first-person-feeling regex")
});

static BOOK_MOVIE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:books?|movies?|films?|music|songs?|bands?)\b")
        .expect("valid book-movie regex")
});

/// Scenario state forced by a surface pattern, if any. Joke requests win
/// over mood words so "tell me a sad joke" still gets a joke.
pub fn forced_state(text_lower: &str) -> Option<ScenarioState> {
    if JOKE.is_match(text_lower) {
        Some(ScenarioState::JokeRequested)
    } else if PAIN.is_match(text_lower) {
        Some(ScenarioState::PainIFeel)
    } else if BORED.is_match(text_lower) {
        Some(ScenarioState::Bored)
    } else if SAD.is_match(text_lower) || LONELY.is_match(text_lower) {
        Some(ScenarioState::SadAndLonely)
    } else {
        None
    }
}

/// The user explicitly asked to talk about feelings.
pub fn wants_emotion_talk(text_lower: &str) -> bool {
    TALK_ABOUT_EMOTION.is_match(text_lower)
}

/// The user phrases the feeling as their own, not something else's.
pub fn first_person_feeling(text_lower: &str) -> bool {
    FIRST_PERSON_FEELING.is_match(text_lower)
}

/// Text is about books, movies or music; mood words there are usually
/// opinions about the work, not the user's state.
pub fn mentions_media(text_lower: &str) -> bool {
    BOOK_MOVIE.is_match(text_lower)
}
