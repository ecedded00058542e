//! Content Fetcher Port - structured page content keyed by title.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Structured content of one page.
///
/// Paragraph text may embed hyperlink markers of the form
/// `[[Target Page|anchor text]]` (or `[[Target Page]]` when the anchor is
/// the page title itself); the wiki skill strips them and keeps the
/// anchors as cross-reference mentions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Lead paragraphs, before any named section.
    #[serde(default)]
    pub first_paragraph: Vec<String>,
    /// Section title to paragraph list.
    #[serde(default)]
    pub sections: HashMap<String, Vec<String>>,
    /// Section title to cross-referenced page titles.
    #[serde(default)]
    pub main_pages: HashMap<String, Vec<String>>,
}

impl PageContent {
    /// Paragraphs of a named section; empty when the section is missing.
    pub fn paragraphs(&self, section: &str) -> &[String] {
        self.sections
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every paragraph of the page, lead first.
    pub fn all_paragraphs(&self) -> Vec<String> {
        let mut paragraphs = self.first_paragraph.clone();
        for section in self.sections.values() {
            paragraphs.extend(section.iter().cloned());
        }
        paragraphs
    }

    /// Cross-referenced pages reachable from a section.
    pub fn main_pages_for(&self, section: &str) -> &[String] {
        self.main_pages
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.first_paragraph.is_empty() && self.sections.is_empty()
    }
}

/// Content service failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContentError {
    #[error("page '{0}' not found")]
    NotFound(String),

    #[error("content request timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed content response: {0}")]
    Malformed(String),
}

/// Port for fetching structured page content by title.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches the content of the page with the given title.
    ///
    /// # Errors
    /// Returns `ContentError` on timeout, transport failure, or a missing
    /// or malformed page.
    async fn fetch(&self, page_title: &str) -> Result<PageContent, ContentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> PageContent {
        PageContent {
            first_paragraph: vec!["The dog is a domesticated descendant of the [[Wolf|wolf]].".to_string()],
            sections: HashMap::from([(
                "Breeds".to_string(),
                vec!["Dog breeds vary widely.".to_string()],
            )]),
            main_pages: HashMap::from([(
                "Breeds".to_string(),
                vec!["Dog breed".to_string()],
            )]),
        }
    }

    #[test]
    fn paragraphs_of_missing_section_is_empty() {
        let page = sample_page();
        assert!(page.paragraphs("History").is_empty());
        assert_eq!(page.paragraphs("Breeds").len(), 1);
    }

    #[test]
    fn all_paragraphs_includes_lead_first() {
        let page = sample_page();
        let all = page.all_paragraphs();
        assert_eq!(all.len(), 2);
        assert!(all[0].contains("domesticated"));
    }

    #[test]
    fn main_pages_for_section() {
        let page = sample_page();
        assert_eq!(page.main_pages_for("Breeds"), &["Dog breed".to_string()]);
        assert!(page.main_pages_for("History").is_empty());
    }

    #[test]
    fn empty_page_is_empty() {
        assert!(PageContent::default().is_empty());
        assert!(!sample_page().is_empty());
    }
}
