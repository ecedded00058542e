//! Predefined activity topics and their relation knowledge.
//!
//! Each curated topic may carry phrases under a handful of knowledge
//! relations; the deeper questions of the script are filled from them.
//! Placeholder entries valued "none" are dropped at load time, so
//! loading the same source twice yields identical tables.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::foundation::TableError;

/// Knowledge relation linking an activity to candidate phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// What people want out of the activity.
    Desires,
    /// What the activity is like.
    HasProperty,
    /// What the activity leads to.
    Causes,
    /// A part of doing the activity.
    HasSubevent,
    /// What people who do the activity tend to be.
    Attribute,
}

/// Relation phrases known about one topic.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TopicKnowledge {
    desires: Vec<String>,
    has_property: Vec<String>,
    causes: Vec<String>,
    has_subevent: Vec<String>,
    attributes: Vec<String>,
}

impl TopicKnowledge {
    pub fn phrases(&self, relation: Relation) -> &[String] {
        match relation {
            Relation::Desires => &self.desires,
            Relation::HasProperty => &self.has_property,
            Relation::Causes => &self.causes,
            Relation::HasSubevent => &self.has_subevent,
            Relation::Attribute => &self.attributes,
        }
    }

    fn filtered(mut self) -> Self {
        for pool in [
            &mut self.desires,
            &mut self.has_property,
            &mut self.causes,
            &mut self.has_subevent,
            &mut self.attributes,
        ] {
            pool.retain(|p| !p.trim().is_empty() && !p.trim().eq_ignore_ascii_case("none"));
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    #[serde(flatten)]
    knowledge: TopicKnowledge,
}

#[derive(Debug, Deserialize)]
struct RawTopics {
    topics: Vec<RawEntry>,
}

/// The curated activity table, filtered of placeholder entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaScriptTopics {
    names: Vec<String>,
    knowledge: HashMap<String, TopicKnowledge>,
}

static DEFAULT_TOPICS: Lazy<MetaScriptTopics> = Lazy::new(|| {
    MetaScriptTopics::load(include_str!("../../../data/meta_script_topics.yaml"))
        .expect("embedded meta-script topic table is valid")
});

impl MetaScriptTopics {
    /// Parses the topic table from YAML, dropping empty and "none" entries.
    pub fn load(yaml: &str) -> Result<Self, TableError> {
        let raw: RawTopics = serde_yaml::from_str(yaml).map_err(|e| TableError::Parse {
            table: "meta_script_topics".to_string(),
            reason: e.to_string(),
        })?;
        let mut names = Vec::new();
        let mut knowledge = HashMap::new();
        for entry in raw.topics {
            let name = entry.name.trim().to_string();
            if name.is_empty() || name.eq_ignore_ascii_case("none") {
                continue;
            }
            names.push(name.clone());
            knowledge.insert(name, entry.knowledge.filtered());
        }
        if names.is_empty() {
            return Err(TableError::Empty {
                table: "meta_script_topics".to_string(),
            });
        }
        Ok(Self { names, knowledge })
    }

    /// The topics embedded in the binary.
    pub fn defaults() -> &'static MetaScriptTopics {
        &DEFAULT_TOPICS
    }

    /// Topic names in declaration order.
    pub fn all(&self) -> &[String] {
        &self.names
    }

    /// Relation knowledge for a predefined topic; `None` for topics
    /// phrased by the user.
    pub fn knowledge(&self, topic: &str) -> Option<&TopicKnowledge> {
        self.knowledge.get(topic)
    }
}
