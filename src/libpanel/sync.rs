//! The list → edit → submit → refresh cycle.
//!
//! Views never patch themselves after a mutation: every successful write is
//! followed by a full re-fetch, so what is shown is always what the server
//! holds.

use crate::libpanel::api::{ApiClient, Transport};
use crate::libpanel::duplicate::{appended_question_id, copy_title, duplicate_test};
use crate::libpanel::error::{Error, Result};
use crate::libpanel::form::{run_form, FormOutcome, NewsForm, QuestionForm, TestForm, TitleForm};
use crate::libpanel::model::{ContentBlock, Entity, NewsItem, ResourceKind, Section, Test};
use crate::libpanel::prompt::{Notice, Prompter};
use log::{debug, error, info, warn};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Viewing,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Delete,
    Copy,
    AddQuestion,
    AddMultipleQuestions,
    Duplicate,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Save => "Save",
            Action::Delete => "Delete",
            Action::Copy => "Copy JSON",
            Action::AddQuestion => "Add question",
            Action::AddMultipleQuestions => "Add several questions",
            Action::Duplicate => "Duplicate test",
        }
    }
}

pub fn actions_for(kind: ResourceKind) -> &'static [Action] {
    match kind {
        ResourceKind::Tests => &[
            Action::Save,
            Action::Delete,
            Action::Copy,
            Action::AddQuestion,
            Action::AddMultipleQuestions,
            Action::Duplicate,
        ],
        ResourceKind::News => &[Action::Save, Action::Delete, Action::Copy],
        ResourceKind::Content => &[Action::Save],
    }
}

/// One rendered entity with its edit buffer.
#[derive(Debug, Clone)]
pub struct Card<E: Entity> {
    entity: E,
    buffer: String,
    state: CardState,
    error: Option<String>,
}

impl<E: Entity> Card<E> {
    pub fn new(entity: E) -> Self {
        let buffer = serde_json::to_string_pretty(&entity).unwrap_or_else(|err| {
            error!("[Sync] Cannot serialize {} {}: {}", E::KIND.singular(), entity.id(), err);
            String::new()
        });
        Self {
            entity,
            buffer,
            state: CardState::Viewing,
            error: None,
        }
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn id(&self) -> &str {
        self.entity.id()
    }

    pub fn title(&self) -> &str {
        self.entity.title()
    }

    pub fn stats(&self) -> String {
        self.entity.stats()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn actions(&self) -> &'static [Action] {
        actions_for(E::KIND)
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.state = CardState::Editing;
        self.error = None;
    }

    /// Reads the edit buffer back into the typed entity.
    pub fn parse(&self) -> Result<E> {
        let entity: E = serde_json::from_str(&self.buffer)?;
        entity.validate()?;
        Ok(entity)
    }

    fn submitting(&mut self) {
        self.state = CardState::Submitting;
    }

    fn failed(&mut self, err: &Error) {
        self.state = CardState::Editing;
        self.error = Some(err.to_string());
    }
}

pub fn fetch_or_default<E: Entity, T: Transport>(
    api: &ApiClient<T>,
    prompter: &mut impl Prompter,
) -> E::Snapshot {
    match api.fetch::<E>() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!("[Sync] Failed to load {}: {}", E::KIND, err);
            prompter.notify(Notice::error(format!(
                "Failed to load {}. Check the connection to the server.",
                E::KIND
            )));
            E::Snapshot::default()
        }
    }
}

pub fn fetch_content_or_default<T: Transport>(
    api: &ApiClient<T>,
    prompter: &mut impl Prompter,
) -> ContentBlock {
    match api.fetch_content() {
        Ok(content) => content,
        Err(err) => {
            error!("[Sync] Failed to load content: {}", err);
            prompter.notify(Notice::error(
                "Failed to load content. Check the connection to the server.",
            ));
            ContentBlock::default()
        }
    }
}

/// Rendered list of one collection.
#[derive(Debug, Clone)]
pub struct CollectionView<E: Entity> {
    cards: Vec<Card<E>>,
}

impl<E: Entity> Default for CollectionView<E> {
    fn default() -> Self {
        Self { cards: Vec::new() }
    }
}

impl<E: Entity> CollectionView<E> {
    /// Replaces whatever was shown before with `items`.
    pub fn render(&mut self, items: Vec<E>) {
        debug!("[Sync] Rendering {} {}", items.len(), E::KIND);
        self.cards = items.into_iter().map(Card::new).collect();
    }

    pub fn cards(&self) -> &[Card<E>] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card<E>> {
        self.cards.get(index)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut Card<E>> {
        self.cards.get_mut(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then(|| E::KIND.empty_message())
    }

    pub fn load<T: Transport>(&mut self, api: &ApiClient<T>, prompter: &mut impl Prompter) {
        let snapshot = fetch_or_default::<E, T>(api, prompter);
        self.render(E::into_items(snapshot));
    }

    /// Copy action: the text currently in the edit buffer.
    pub fn copy(&self, index: usize) -> Option<&str> {
        self.card(index).map(Card::buffer)
    }

    pub fn save<T: Transport>(
        &mut self,
        index: usize,
        api: &ApiClient<T>,
        prompter: &mut impl Prompter,
    ) -> bool {
        let Some(card) = self.cards.get_mut(index) else {
            prompter.notify(Notice::error(format!("No {} #{}", E::KIND.singular(), index + 1)));
            return false;
        };
        let entity = match card.parse() {
            Ok(entity) => entity,
            Err(err) => {
                warn!("[Sync] Not saving {} {}: {}", E::KIND.singular(), card.id(), err);
                card.failed(&err);
                prompter.notify(Notice::error(err.to_string()));
                return false;
            }
        };

        card.submitting();
        let id = card.id().to_string();
        match api.replace(&id, &entity) {
            Ok(()) => {
                info!("[Sync] Saved {} {}", E::KIND.singular(), id);
                prompter.notify(Notice::success(format!("{} saved!", E::KIND.label())));
                self.load(api, prompter);
                true
            }
            Err(err) => {
                card.failed(&err);
                prompter.notify(Notice::error(format!(
                    "Failed to save {}: {}",
                    E::KIND.singular(),
                    err
                )));
                false
            }
        }
    }

    pub fn delete<T: Transport>(
        &mut self,
        index: usize,
        api: &ApiClient<T>,
        prompter: &mut impl Prompter,
    ) -> bool {
        let Some(card) = self.cards.get_mut(index) else {
            prompter.notify(Notice::error(format!("No {} #{}", E::KIND.singular(), index + 1)));
            return false;
        };
        let question = format!("Delete {} {:?}?", E::KIND.singular(), card.title());
        if !prompter.confirm(&question) {
            debug!("[Sync] Delete of {} not confirmed", card.id());
            return false;
        }

        card.submitting();
        let id = card.id().to_string();
        match api.delete::<E>(&id) {
            Ok(()) => {
                info!("[Sync] Deleted {} {}", E::KIND.singular(), id);
                prompter.notify(Notice::success(format!("{} deleted!", E::KIND.label())));
                self.load(api, prompter);
                true
            }
            Err(err) => {
                card.failed(&err);
                prompter.notify(Notice::error(format!(
                    "Failed to delete {}: {}",
                    E::KIND.singular(),
                    err
                )));
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    About,
    Theory,
}

/// Editable fields of the content block, seeded with display defaults.
#[derive(Debug, Clone, Default)]
pub struct ContentView {
    fields: ContentBlock,
    error: Option<String>,
}

impl ContentView {
    pub fn render(&mut self, content: ContentBlock) {
        let about_title = content.about_title().to_string();
        let theory_title = content.theory_title().to_string();
        self.fields = ContentBlock {
            about: Section {
                title: about_title,
                content: content.about.content,
            },
            theory: Section {
                title: theory_title,
                content: content.theory.content,
            },
        };
        self.error = None;
    }

    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::About => &self.fields.about,
            SectionKind::Theory => &self.fields.theory,
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::About => &mut self.fields.about,
            SectionKind::Theory => &mut self.fields.theory,
        }
    }

    pub fn to_block(&self) -> ContentBlock {
        self.fields.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Final tally of a multi-question run. Informational only.
///
/// `added` counts questions the server stored; a round whose wizard was
/// cancelled or failed is not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedCount {
    pub added: usize,
    pub requested: usize,
}

impl fmt::Display for AddedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.added, self.requested)
    }
}

pub struct AdminPanel<T: Transport> {
    api: ApiClient<T>,
    tests: CollectionView<Test>,
    news: CollectionView<NewsItem>,
    content: ContentView,
}

impl<T: Transport> AdminPanel<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self {
            api,
            tests: CollectionView::default(),
            news: CollectionView::default(),
            content: ContentView::default(),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn tests(&self) -> &CollectionView<Test> {
        &self.tests
    }

    pub fn tests_mut(&mut self) -> &mut CollectionView<Test> {
        &mut self.tests
    }

    pub fn news(&self) -> &CollectionView<NewsItem> {
        &self.news
    }

    pub fn news_mut(&mut self) -> &mut CollectionView<NewsItem> {
        &mut self.news
    }

    pub fn content(&self) -> &ContentView {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentView {
        &mut self.content
    }

    pub fn load_tests(&mut self, prompter: &mut impl Prompter) {
        self.tests.load(&self.api, prompter);
    }

    pub fn load_news(&mut self, prompter: &mut impl Prompter) {
        self.news.load(&self.api, prompter);
    }

    pub fn load_content(&mut self, prompter: &mut impl Prompter) {
        let content = fetch_content_or_default(&self.api, prompter);
        self.content.render(content);
    }

    pub fn save_test(&mut self, index: usize, prompter: &mut impl Prompter) -> bool {
        self.tests.save(index, &self.api, prompter)
    }

    pub fn delete_test(&mut self, index: usize, prompter: &mut impl Prompter) -> bool {
        self.tests.delete(index, &self.api, prompter)
    }

    pub fn save_news(&mut self, index: usize, prompter: &mut impl Prompter) -> bool {
        self.news.save(index, &self.api, prompter)
    }

    pub fn delete_news(&mut self, index: usize, prompter: &mut impl Prompter) -> bool {
        self.news.delete(index, &self.api, prompter)
    }

    pub fn save_content(&mut self, prompter: &mut impl Prompter) -> bool {
        let block = self.content.to_block();
        match self.api.replace_content(&block) {
            Ok(()) => {
                info!("[Sync] Saved content");
                prompter.notify(Notice::success("Content saved!"));
                self.load_content(prompter);
                true
            }
            Err(err) => {
                self.content.error = Some(err.to_string());
                prompter.notify(Notice::error(format!("Failed to save content: {err}")));
                false
            }
        }
    }

    pub fn create_test(&mut self, prompter: &mut impl Prompter) -> bool {
        let FormOutcome::Submitted(new_test) = run_form(TestForm::new(), prompter) else {
            return false;
        };
        self.submit_new::<Test, _>(&new_test, "Test created!", prompter)
    }

    pub fn create_news(&mut self, prompter: &mut impl Prompter) -> bool {
        self.create_news_from(NewsForm::for_today(), prompter)
    }

    pub fn create_news_from(&mut self, form: NewsForm, prompter: &mut impl Prompter) -> bool {
        let FormOutcome::Submitted(item) = run_form(form, prompter) else {
            return false;
        };
        self.submit_new::<NewsItem, _>(&item, "News item published!", prompter)
    }

    fn submit_new<E: Entity, B: serde::Serialize>(
        &mut self,
        body: &B,
        success: &str,
        prompter: &mut impl Prompter,
    ) -> bool {
        match self.api.create::<E, B>(body) {
            Ok(()) => {
                info!("[Sync] Created {}", E::KIND.singular());
                prompter.notify(Notice::success(success));
                self.reload(E::KIND, prompter);
                true
            }
            Err(err) => {
                prompter.notify(Notice::error(format!(
                    "Failed to create {}: {}",
                    E::KIND.singular(),
                    err
                )));
                false
            }
        }
    }

    fn reload(&mut self, kind: ResourceKind, prompter: &mut impl Prompter) {
        match kind {
            ResourceKind::Tests => self.load_tests(prompter),
            ResourceKind::News => self.load_news(prompter),
            ResourceKind::Content => self.load_content(prompter),
        }
    }

    /// Fresh copy of one test from the server.
    fn find_test(&self, test_id: &str, prompter: &mut impl Prompter) -> Option<Test> {
        let snapshot = fetch_or_default::<Test, T>(&self.api, prompter);
        let found = Test::into_items(snapshot)
            .into_iter()
            .find(|t| t.id == test_id);
        if found.is_none() {
            warn!("[Sync] Test {} not found", test_id);
            prompter.notify(Notice::error(
                Error::NotFound {
                    kind: "test",
                    id: test_id.to_string(),
                }
                .to_string(),
            ));
        }
        found
    }

    /// Runs the question wizard and appends the result to the test.
    pub fn add_question(&mut self, test_id: &str, prompter: &mut impl Prompter) -> bool {
        let FormOutcome::Submitted(draft) = run_form(QuestionForm::new(), prompter) else {
            return false;
        };
        let Some(mut test) = self.find_test(test_id, prompter) else {
            return false;
        };

        let id = appended_question_id(test.questions.len() + 1);
        debug!("[Sync] Appending question {} to test {}", id, test_id);
        test.questions.push(draft.into_question(id));
        match self.api.replace(test_id, &test) {
            Ok(()) => {
                prompter.notify(Notice::success("Question added!"));
                self.load_tests(prompter);
                true
            }
            Err(err) => {
                prompter.notify(Notice::error(format!("Failed to add question: {err}")));
                false
            }
        }
    }

    /// Repeats the question wizard, asking before each round.
    /// `None` if the count itself was not given.
    pub fn add_multiple_questions(
        &mut self,
        test_id: &str,
        prompter: &mut impl Prompter,
    ) -> Option<AddedCount> {
        let input = prompter.ask("How many questions do you want to add?", "3")?;
        let requested = match input.trim().parse::<usize>() {
            Ok(n) if n >= 1 => n,
            _ => {
                prompter.notify(Notice::error("Enter a valid number"));
                return None;
            }
        };

        let mut count = AddedCount { added: 0, requested };
        for round in 1..=requested {
            if !prompter.confirm(&format!("Add question {round} of {requested}?")) {
                debug!("[Sync] Stopped before question {}", round);
                break;
            }
            if self.add_question(test_id, prompter) {
                count.added += 1;
            }
        }

        info!("[Sync] Added {} questions to test {}", count, test_id);
        prompter.notify(Notice::info(format!("Done! Added {count} questions.")));
        Some(count)
    }

    pub fn duplicate_test(&mut self, test_id: &str, prompter: &mut impl Prompter) -> bool {
        let Some(source) = self.find_test(test_id, prompter) else {
            return false;
        };
        let form = TitleForm::new("New test title:", copy_title(&source.title));
        let FormOutcome::Submitted(title) = run_form(form, prompter) else {
            return false;
        };
        let copy = duplicate_test(&source, Some(&title));
        debug!("[Sync] Duplicating test {} as {}", source.id, copy.id);
        self.submit_new::<Test, _>(&copy, "Test duplicated!", prompter)
    }
}
