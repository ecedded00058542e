//! Fact text construction from page paragraphs.
//!
//! Builds the short factual snippet prefixed to a follow-up question:
//! whole sentences of the lead paragraph up to a word budget, falling
//! back to comma-delimited clauses of the first sentence when no whole
//! sentence fits. Hyperlink markers are stripped and their anchors kept
//! as cross-reference mentions.

use once_cell::sync::Lazy;
use regex::Regex;

/// Word budget for one fact snippet.
pub const FACT_WORD_BUDGET: usize = 50;

/// `[[Target Page|anchor]]` or `[[Target Page]]` inline markers.
static HYPERLINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("valid hyperlink regex"));

/// A cross-reference surfaced in generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// The anchor text as it appeared in the reply.
    pub anchor: String,
    /// The content page the anchor points at.
    pub page: String,
}

/// A fact snippet plus the cross-references it surfaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactText {
    pub text: String,
    pub mentions: Vec<Mention>,
}

/// Strips hyperlink markers, returning clean text and the mentions found.
pub fn strip_hyperlinks(text: &str) -> (String, Vec<Mention>) {
    let mut mentions = Vec::new();
    let clean = HYPERLINK
        .replace_all(text, |caps: &regex::Captures| {
            let page = caps[1].trim().to_string();
            let anchor = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| page.clone());
            mentions.push(Mention {
                anchor: anchor.to_lowercase(),
                page,
            });
            anchor
        })
        .into_owned();
    (clean, mentions)
}

/// Splits text into sentences on terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            // Sentence boundary only when followed by whitespace or EOF.
            if chars.peek().map(|n| n.is_whitespace()).unwrap_or(true) {
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Builds a fact snippet from paragraphs under the given word budget.
///
/// Whole sentences of the first paragraph are accumulated while they fit;
/// if not even the first sentence fits, its comma-delimited clauses are
/// accumulated instead and the snippet is closed with a period.
pub fn build_fact_text(paragraphs: &[String], budget: usize) -> FactText {
    let Some(paragraph) = paragraphs.first() else {
        return FactText::default();
    };
    let sentences = split_sentences(paragraph);

    let mut picked = Vec::new();
    let mut mentions = Vec::new();
    let mut used_words = 0;
    for sentence in &sentences {
        let (clean, sentence_mentions) = strip_hyperlinks(sentence);
        let words = word_count(&clean);
        if used_words + words < budget {
            picked.push(clean);
            used_words += words;
            mentions.extend(sentence_mentions);
        }
    }
    if !picked.is_empty() {
        return FactText {
            text: picked.join(" "),
            mentions,
        };
    }

    // No whole sentence fits; fall back to clauses of the first sentence.
    let Some(first) = sentences.first() else {
        return FactText::default();
    };
    let (clean, sentence_mentions) = strip_hyperlinks(first);
    let mut clauses = Vec::new();
    let mut used_words = 0;
    for clause in clean.split(", ") {
        let words = word_count(clause);
        if used_words + words < budget {
            clauses.push(clause.trim_end_matches('.').to_string());
            used_words += words;
        }
    }
    if clauses.is_empty() {
        return FactText::default();
    }
    let mut text = clauses.join(", ");
    if !text.ends_with('.') {
        text.push('.');
    }
    FactText {
        text,
        mentions: sentence_mentions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod hyperlinks {
        use super::*;

        #[test]
        fn strips_anchor_markers() {
            let (clean, mentions) =
                strip_hyperlinks("The dog descends from the [[Wolf|wolf]].");
            assert_eq!(clean, "The dog descends from the wolf.");
            assert_eq!(
                mentions,
                vec![Mention { anchor: "wolf".to_string(), page: "Wolf".to_string() }]
            );
        }

        #[test]
        fn marker_without_anchor_uses_page_title() {
            let (clean, mentions) = strip_hyperlinks("See [[Dog breed]] for details.");
            assert_eq!(clean, "See Dog breed for details.");
            assert_eq!(mentions[0].anchor, "dog breed");
            assert_eq!(mentions[0].page, "Dog breed");
        }

        #[test]
        fn plain_text_passes_through() {
            let (clean, mentions) = strip_hyperlinks("No links here.");
            assert_eq!(clean, "No links here.");
            assert!(mentions.is_empty());
        }
    }

    mod sentences {
        use super::*;

        #[test]
        fn splits_on_terminal_punctuation() {
            let sentences = split_sentences("One fact. Another fact! A question? Done.");
            assert_eq!(sentences.len(), 4);
            assert_eq!(sentences[0], "One fact.");
            assert_eq!(sentences[2], "A question?");
        }

        #[test]
        fn keeps_decimal_points_inside_sentences() {
            let sentences = split_sentences("It weighs 3.5 kilograms. It is small.");
            assert_eq!(sentences.len(), 2);
            assert_eq!(sentences[0], "It weighs 3.5 kilograms.");
        }

        #[test]
        fn keeps_unterminated_tail() {
            let sentences = split_sentences("First. trailing fragment");
            assert_eq!(sentences, vec!["First.", "trailing fragment"]);
        }
    }

    mod fact_text {
        use super::*;

        #[test]
        fn empty_paragraphs_give_empty_fact() {
            assert_eq!(build_fact_text(&[], FACT_WORD_BUDGET), FactText::default());
        }

        #[test]
        fn accumulates_whole_sentences_under_budget() {
            let paragraphs = vec![
                "Dogs are loyal. Dogs descend from the [[Wolf|wolf]]. Dogs bark.".to_string(),
            ];
            let fact = build_fact_text(&paragraphs, FACT_WORD_BUDGET);
            assert!(fact.text.contains("Dogs are loyal."));
            assert!(fact.text.contains("wolf"));
            assert!(!fact.text.contains("[["));
            assert_eq!(fact.mentions.len(), 1);
        }

        #[test]
        fn only_first_paragraph_is_used() {
            let paragraphs = vec![
                "Lead sentence.".to_string(),
                "Second paragraph sentence.".to_string(),
            ];
            let fact = build_fact_text(&paragraphs, FACT_WORD_BUDGET);
            assert_eq!(fact.text, "Lead sentence.");
        }

        #[test]
        fn falls_back_to_clauses_when_first_sentence_exceeds_budget() {
            let long = format!(
                "{}, {}, {}.",
                "alpha beta gamma delta".repeat(3).trim(),
                "short clause here",
                "tail words beyond the budget again and again and again"
            );
            let fact = build_fact_text(&[long], 12);
            assert!(!fact.text.is_empty());
            assert!(fact.text.ends_with('.'));
            assert!(word_count(&fact.text) < 12 + 1);
        }

        #[test]
        fn budget_counts_sanitized_words() {
            let paragraphs =
                vec!["A [[Very Long Page Title|tiny]] fact.".to_string()];
            let fact = build_fact_text(&paragraphs, FACT_WORD_BUDGET);
            assert_eq!(fact.text, "A tiny fact.");
        }
    }
}
