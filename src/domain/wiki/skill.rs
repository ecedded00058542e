//! The fact-retrieval skill turn logic.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::dialog::{
    annotations, confidence, ContinuationDirective, Dialog, SkillTurnResult, Utterance,
};
use crate::domain::foundation::{SkillError, StateMachine};
use crate::domain::wiki::content::{self, FACT_WORD_BUDGET};
use crate::domain::wiki::memory::WikiMemory;
use crate::domain::wiki::responder;
use crate::domain::wiki::state::WikiState;
use crate::domain::wiki::tables::{TitleTemplate, WikiTables};
use crate::domain::wiki::triggers;
use crate::ports::{choose, ContentFetcher, PageContent, RandomSource, TextQa};

pub const WIKI_SKILL_NAME: &str = "wiki_skill";

/// Minimum extractive-QA confidence for a factoid answer to be voiced.
const QA_THRESHOLD: f64 = 0.95;

/// Tells section-by-section facts about a linked entity, answers factoid
/// questions over the tracked pages and digs into mentioned cross pages.
pub struct WikiSkill {
    tables: WikiTables,
    fetcher: Arc<dyn ContentFetcher>,
    qa: Arc<dyn TextQa>,
    rng: Arc<dyn RandomSource>,
    qa_threshold: f64,
}

impl WikiSkill {
    pub fn new(
        tables: WikiTables,
        fetcher: Arc<dyn ContentFetcher>,
        qa: Arc<dyn TextQa>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            tables,
            fetcher,
            qa,
            rng,
            qa_threshold: QA_THRESHOLD,
        }
    }

    /// Builds the skill over the embedded topic tables.
    pub fn with_default_tables(
        fetcher: Arc<dyn ContentFetcher>,
        qa: Arc<dyn TextQa>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self::new(WikiTables::defaults().clone(), fetcher, qa, rng)
    }

    /// Produces this skill's answer for the newest human utterance.
    ///
    /// # Errors
    /// Returns `SkillError` when page content cannot be fetched; the turn
    /// driver converts that into a decline.
    pub async fn respond(&self, dialog: &Dialog) -> Result<SkillTurnResult, SkillError> {
        let Some(user) = dialog.last_human() else {
            return Ok(SkillTurnResult::decline());
        };

        let mut memory = WikiMemory::load(&dialog.human_attributes);
        // Another skill took the floor: the scenario context is stale.
        if memory.started && !dialog.was_active(WIKI_SKILL_NAME) {
            memory = WikiMemory::default();
        }
        if memory.state == WikiState::Error {
            memory.clear_context();
            memory.state = WikiState::Start;
        }

        let entity_adopted = self.adopt_entity(user, &mut memory);

        let mut pages = Vec::new();
        for title in memory.current_pages.iter() {
            pages.push((title.to_string(), self.fetcher.fetch(title).await?));
        }

        let state = memory.state;
        let mut outcome = None;
        for target in state.transition_candidates() {
            let produced = match target {
                WikiState::FactoidQ => self.try_factoid(user, &pages).await,
                WikiState::MoreDetailed => {
                    self.try_more_details(user, dialog.last_bot(), &mut memory).await?
                }
                WikiState::TellFact => {
                    self.try_tell_fact(user, &mut memory, &pages, state, entity_adopted)
                }
                WikiState::StartTalk => self.try_start_talk(user, &mut memory),
                WikiState::Start | WikiState::Error => None,
            };
            if let Some(result) = produced {
                outcome = Some((*target, result));
                break;
            }
        }

        let mut human_attributes = dialog.human_attributes.clone();
        match outcome {
            Some((target, result)) => {
                memory.state = state.transition_to(target)?;
                memory.started = true;
                memory.store(&mut human_attributes);
                debug!(state = ?memory.state, entity = %memory.entity, "wiki turn answered");
                Ok(result
                    .with_human_attributes(human_attributes)
                    .record_continuation())
            }
            None => {
                // No guard fired: fall through to the error state, which
                // clears the scenario context.
                memory.state = WikiState::Error;
                memory.clear_context();
                memory.store(&mut human_attributes);
                Ok(SkillTurnResult::decline().with_human_attributes(human_attributes))
            }
        }
    }

    /// Adopts the newest linked entity into memory. Returns true when the
    /// utterance carried one.
    fn adopt_entity(&self, user: &Utterance, memory: &mut WikiMemory) -> bool {
        let entities = annotations::linked_entities(user);
        let Some(entity) = entities.last() else {
            return false;
        };
        let substr = entity.substr.to_lowercase();
        if substr != memory.entity {
            memory.entity = substr;
            memory.entity_types = entity.types.clone();
            memory.used_titles.clear();
            memory.previous_title.clear();
            if let Some(page) = entity.pages.first() {
                if memory.current_pages.last() != Some(page.as_str()) {
                    memory.current_pages.push(page.clone());
                }
            }
        }
        true
    }

    /// Factoid branch: an extractive answer over the tracked passages.
    /// QA failures degrade to "no answer", they never fail the turn.
    async fn try_factoid(
        &self,
        user: &Utterance,
        pages: &[(String, PageContent)],
    ) -> Option<SkillTurnResult> {
        if pages.is_empty() || !triggers::is_question(user) || !annotations::is_factoid(user) {
            return None;
        }
        let passages: Vec<String> = pages
            .iter()
            .flat_map(|(_, page)| page.all_paragraphs())
            .map(|p| content::strip_hyperlinks(&p).0)
            .collect();
        if passages.is_empty() {
            return None;
        }
        match self.qa.answer(&user.text, &passages).await {
            Ok(answer) if answer.confidence >= self.qa_threshold => {
                let reply = if answer.answer_sentence.is_empty() {
                    answer.answer
                } else {
                    answer.answer_sentence
                };
                Some(SkillTurnResult::answer(
                    reply,
                    confidence::HIGH,
                    ContinuationDirective::Stop,
                ))
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "question answering failed, skipping factoid branch");
                None
            }
        }
    }

    /// Cross-reference branch: the user named an anchor from the last
    /// fact, or affirmed the bot's offer to go deeper and a tracked
    /// anchor occurs among their noun phrases.
    async fn try_more_details(
        &self,
        user: &Utterance,
        last_bot: Option<&Utterance>,
        memory: &mut WikiMemory,
    ) -> Result<Option<SkillTurnResult>, SkillError> {
        let lower = user.text_lower();
        let target = memory.mentioned_page_in(&lower).or_else(|| {
            let offered = last_bot.is_some_and(|bot| {
                let text = bot.text_lower();
                text.contains("more detail") || text.contains("more about")
            });
            if offered && annotations::is_yes(user) {
                memory.mention_matching_phrase(&annotations::noun_phrases(user))
            } else {
                None
            }
        });
        let Some((anchor, page_title)) = target else {
            return Ok(None);
        };
        let anchor = anchor.to_string();
        let page_title = page_title.to_string();

        let page = self.fetcher.fetch(&page_title).await?;
        let fact = content::build_fact_text(&page.first_paragraph, FACT_WORD_BUDGET);
        if fact.text.is_empty() {
            return Ok(None);
        }

        memory.current_pages.push(page_title.clone());
        memory.previous_page_title = page_title;
        memory.new_page = true;
        memory.set_mentions(&fact.mentions);

        let question = match self.next_title(memory, &page) {
            Some(template) => {
                memory.used_titles.push(template.title.clone());
                memory.previous_title = template.title.clone();
                responder::make_question(
                    &template,
                    &self.tables,
                    memory.used_titles.len(),
                    &memory.entity,
                    self.rng.as_ref(),
                )
            }
            None => {
                memory.previous_title.clear();
                format!("Would you like to learn more about {}?", anchor)
            }
        };
        let reply = responder::tell_fact_reply(&fact.text, &question);
        Ok(Some(SkillTurnResult::answer(
            reply,
            confidence::CERTAIN,
            ContinuationDirective::MustContinue,
        )))
    }

    /// Fact branch: answer the pending section offer, or open the topic
    /// with the lead paragraph, then offer the next section.
    fn try_tell_fact(
        &self,
        user: &Utterance,
        memory: &mut WikiMemory,
        pages: &[(String, PageContent)],
        from_state: WikiState,
        entity_adopted: bool,
    ) -> Option<SkillTurnResult> {
        let engaged = match from_state {
            WikiState::Start => entity_adopted,
            WikiState::StartTalk => {
                annotations::is_yes(user)
                    || (!memory.entity.is_empty() && user.text_lower().contains(&memory.entity))
            }
            WikiState::TellFact | WikiState::MoreDetailed => annotations::is_yes(user),
            _ => false,
        };
        if !engaged || triggers::is_refusal(user) {
            return None;
        }

        let (fact_page_title, fact_page) = pick_fact_page(memory, pages)?;
        let paragraphs: &[String] = if memory.previous_title.is_empty() {
            &fact_page.first_paragraph
        } else {
            match section_for(fact_page, &memory.previous_title) {
                Some(section) => fact_page.paragraphs(&section),
                None => &fact_page.first_paragraph,
            }
        };
        let fact = content::build_fact_text(paragraphs, FACT_WORD_BUDGET);
        let fact_page_title = fact_page_title.to_string();

        memory.set_mentions(&fact.mentions);
        memory.previous_page_title = fact_page_title;
        memory.new_page = false;

        // The next offer always comes from the newest page in scope.
        let offer_page = pages.last().map(|(_, page)| page)?;
        let question = match self.next_title(memory, offer_page) {
            Some(template) => {
                memory.used_titles.push(template.title.clone());
                memory.previous_title = template.title.clone();
                responder::make_question(
                    &template,
                    &self.tables,
                    memory.used_titles.len(),
                    &memory.entity,
                    self.rng.as_ref(),
                )
            }
            None => {
                memory.previous_title.clear();
                String::new()
            }
        };
        let reply = responder::tell_fact_reply(&fact.text, &question);
        if reply.is_empty() {
            return None;
        }
        let directive = if question.is_empty() {
            ContinuationDirective::MayContinue
        } else {
            ContinuationDirective::MustContinue
        };
        Some(SkillTurnResult::answer(reply, confidence::CERTAIN, directive))
    }

    /// Topic proposal branch: an explicit "let's talk about" request, or a
    /// random predefined topic when the user has no preference.
    fn try_start_talk(&self, user: &Utterance, memory: &mut WikiMemory) -> Option<SkillTurnResult> {
        if let Some(topic) = triggers::requested_topic(user, &self.tables) {
            let topic = topic.to_string();
            if let Some(page) = self.tables.page_for(&topic) {
                if memory.current_pages.last() != Some(page) {
                    memory.current_pages.push(page.to_string());
                }
            }
            memory.entity = topic.clone();
            memory.entity_types.clear();
            return Some(SkillTurnResult::answer(
                responder::start_talk_reply(&topic),
                confidence::LOW,
                ContinuationDirective::MayContinue,
            ));
        }
        if triggers::is_dont_know(user) {
            let (topic, page) = choose(self.rng.as_ref(), self.tables.topic_pages())?;
            memory.entity = topic.clone();
            memory.entity_types.clear();
            if memory.current_pages.last() != Some(page.as_str()) {
                memory.current_pages.push(page.clone());
            }
            return Some(SkillTurnResult::answer(
                responder::start_talk_reply(topic),
                confidence::LOW,
                ContinuationDirective::MayContinue,
            ));
        }
        None
    }

    /// First unused candidate title that names a section of the page.
    fn next_title(&self, memory: &WikiMemory, page: &PageContent) -> Option<TitleTemplate> {
        self.tables
            .candidate_titles(&memory.entity, &memory.entity_types)
            .into_iter()
            .find(|t| !memory.used_titles.contains(&t.title) && section_for(page, &t.title).is_some())
    }
}

/// The page a pending section offer refers to, defaulting to the newest.
fn pick_fact_page<'a>(
    memory: &WikiMemory,
    pages: &'a [(String, PageContent)],
) -> Option<(&'a str, &'a PageContent)> {
    if !memory.previous_page_title.is_empty() && !memory.previous_title.is_empty() {
        if let Some((title, page)) = pages
            .iter()
            .find(|(title, _)| *title == memory.previous_page_title)
        {
            return Some((title, page));
        }
    }
    pages.last().map(|(title, page)| (title.as_str(), page))
}

/// The section title containing the candidate title as a substring.
fn section_for(page: &PageContent, title: &str) -> Option<String> {
    let lower = title.to_lowercase();
    page.sections
        .keys()
        .find(|section| section.to_lowercase().contains(&lower))
        .cloned()
}
