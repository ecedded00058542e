//! Reply phrasing for the fact-retrieval skill.

use crate::domain::wiki::tables::{TitleTemplate, WikiTables};
use crate::ports::{choose, RandomSource};

/// Fills `{title}` and `{entity}` placeholders. Titles are lowercased in
/// running text.
pub fn fill_template(template: &str, title: &str, entity: &str) -> String {
    template
        .replace("{title}", &title.to_lowercase())
        .replace("{entity}", entity)
}

/// Builds the follow-up question offering a section title.
///
/// A title-specific template wins; otherwise the generic pool is used,
/// with the first offer for an entity pinned to the first pool template
/// so openings read the same across conversations.
pub fn make_question(
    template: &TitleTemplate,
    tables: &WikiTables,
    offers_made: usize,
    entity: &str,
    rng: &dyn RandomSource,
) -> String {
    if !template.question.is_empty() {
        return fill_template(&template.question, &template.title, entity);
    }
    let pool = tables.question_templates();
    let generic = if offers_made <= 1 {
        &pool[0]
    } else {
        choose(rng, pool).unwrap_or(&pool[0])
    };
    fill_template(generic, &template.title, entity)
}

/// A fact followed by the next section question.
pub fn tell_fact_reply(fact: &str, question: &str) -> String {
    if fact.is_empty() {
        question.to_string()
    } else if question.is_empty() {
        fact.to_string()
    } else {
        format!("{} {}", fact, question)
    }
}

/// Opening offer for a topic the skill can talk about.
pub fn start_talk_reply(topic: &str) -> String {
    format!("Would you like to talk about {}?", topic)
}
