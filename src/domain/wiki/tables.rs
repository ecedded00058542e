//! Predefined topic tables for the fact-retrieval skill.
//!
//! Immutable lookup structures built once at process start from embedded
//! YAML and passed by reference into the skill: section titles (with
//! optional title-specific question templates) keyed by entity type and by
//! entity substring, plus the generic question template pool.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::foundation::TableError;

/// A section title the skill may talk about, with an optional
/// title-specific question template. Templates use `{title}` and
/// `{entity}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TitleTemplate {
    pub title: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
struct TopicEntry {
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    entity_substr: Vec<String>,
    #[serde(default)]
    page_title: String,
    #[serde(default)]
    titles: Vec<TitleTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawTables {
    question_templates: Vec<String>,
    topics: Vec<TopicEntry>,
}

/// The fact-retrieval lookup tables.
#[derive(Debug, Clone)]
pub struct WikiTables {
    titles_by_type: HashMap<String, Vec<TitleTemplate>>,
    titles_by_entity_substr: HashMap<String, Vec<TitleTemplate>>,
    /// (entity substring, page title) pairs in declared order; the order
    /// keeps random fallback-topic selection reproducible under a seeded
    /// random source.
    topic_pages: Vec<(String, String)>,
    question_templates: Vec<String>,
}

static DEFAULT_TABLES: Lazy<WikiTables> = Lazy::new(|| {
    WikiTables::load(include_str!("../../../data/wiki_topics.yaml"))
        .expect("embedded wiki topic table is valid")
});

impl WikiTables {
    /// Parses tables from YAML, validating the generic template pool.
    pub fn load(yaml: &str) -> Result<Self, TableError> {
        let raw: RawTables = serde_yaml::from_str(yaml).map_err(|e| TableError::Parse {
            table: "wiki_topics".to_string(),
            reason: e.to_string(),
        })?;
        if raw.question_templates.is_empty() {
            return Err(TableError::Empty {
                table: "wiki_topics.question_templates".to_string(),
            });
        }

        let mut titles_by_type: HashMap<String, Vec<TitleTemplate>> = HashMap::new();
        let mut titles_by_entity_substr: HashMap<String, Vec<TitleTemplate>> = HashMap::new();
        let mut topic_pages = Vec::new();
        for entry in raw.topics {
            for tp in &entry.types {
                titles_by_type
                    .entry(tp.clone())
                    .or_default()
                    .extend(entry.titles.iter().cloned());
            }
            for substr in &entry.entity_substr {
                titles_by_entity_substr
                    .entry(substr.clone())
                    .or_default()
                    .extend(entry.titles.iter().cloned());
                if !entry.page_title.is_empty() {
                    topic_pages.push((substr.clone(), entry.page_title.clone()));
                }
            }
        }
        Ok(Self {
            titles_by_type,
            titles_by_entity_substr,
            topic_pages,
            question_templates: raw.question_templates,
        })
    }

    /// The tables embedded in the binary.
    pub fn defaults() -> &'static WikiTables {
        &DEFAULT_TABLES
    }

    /// Candidate section titles for an entity, type-keyed titles first,
    /// in declared order with duplicates removed.
    pub fn candidate_titles(&self, entity_substr: &str, types: &[String]) -> Vec<TitleTemplate> {
        let mut candidates: Vec<TitleTemplate> = Vec::new();
        let mut push_all = |templates: &[TitleTemplate]| {
            for template in templates {
                if !candidates.iter().any(|c| c.title == template.title) {
                    candidates.push(template.clone());
                }
            }
        };
        for tp in types {
            if let Some(templates) = self.titles_by_type.get(tp) {
                push_all(templates);
            }
        }
        if let Some(templates) = self.titles_by_entity_substr.get(entity_substr) {
            push_all(templates);
        }
        candidates
    }

    /// The predefined page for an entity substring, if one is declared.
    pub fn page_for(&self, entity_substr: &str) -> Option<&str> {
        self.topic_pages
            .iter()
            .find(|(substr, _)| substr == entity_substr)
            .map(|(_, page)| page.as_str())
    }

    /// All (topic, page) fallback pairs in declared order.
    pub fn topic_pages(&self) -> &[(String, String)] {
        &self.topic_pages
    }

    /// The generic question template pool.
    pub fn question_templates(&self) -> &[String] {
        &self.question_templates
    }
}
