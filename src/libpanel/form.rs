//! Guided creation flows.
//!
//! Each form is a small state machine that asks for one field at a time and
//! only moves on once the current field is accepted. Forms know nothing about
//! where the input comes from; [`run_form`] drives one through a [`Prompter`].

use crate::libpanel::model::{validate_date, NewNewsItem, NewTest, Question, DATE_FORMAT, MAX_OPTIONS, MIN_OPTIONS};
use crate::libpanel::prompt::{Notice, Prompter};
use chrono::NaiveDate;
use log::debug;
use thiserror::Error;

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} cannot be empty")]
    Blank(&'static str),
    #[error("{field}: {input:?} is not a number")]
    NotANumber { field: &'static str, input: String },
    #[error("enter a number from {min} to {max}")]
    OutOfRange { min: usize, max: usize },
    #[error("{0}")]
    BadDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub label: String,
    pub default: String,
}

impl Prompt {
    fn new(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default: default.into(),
        }
    }
}

pub trait Form {
    type Output;

    /// The field currently asked for, `None` once every field is accepted.
    fn prompt(&self) -> Option<Prompt>;
    fn accept(&mut self, input: &str) -> Result<(), FieldError>;
    /// Summary to confirm before submitting. `None` skips confirmation.
    fn preview(&self) -> Option<String>;
    fn finish(self) -> Option<Self::Output>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    Submitted(T),
    /// The user walked away from one of the fields.
    Cancelled,
    /// The user said no to the preview.
    Declined,
}

pub fn run_form<F: Form>(mut form: F, prompter: &mut impl Prompter) -> FormOutcome<F::Output> {
    while let Some(prompt) = form.prompt() {
        let Some(input) = prompter.ask(&prompt.label, &prompt.default) else {
            debug!("[Form] Cancelled at {:?}", prompt.label);
            return FormOutcome::Cancelled;
        };
        if let Err(err) = form.accept(&input) {
            debug!("[Form] Rejected {:?}: {}", input, err);
            prompter.notify(Notice::error(err.to_string()));
        }
    }

    if let Some(preview) = form.preview() {
        if !prompter.confirm(&preview) {
            prompter.notify(Notice::info("Cancelled"));
            return FormOutcome::Declined;
        }
    }

    match form.finish() {
        Some(output) => FormOutcome::Submitted(output),
        None => FormOutcome::Cancelled,
    }
}

fn required(field: &'static str, input: &str) -> Result<String, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(FieldError::Blank(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn number_in(field: &'static str, input: &str, min: usize, max: usize) -> Result<usize, FieldError> {
    let value = input
        .trim()
        .parse::<usize>()
        .map_err(|_| FieldError::NotANumber {
            field,
            input: input.to_string(),
        })?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange { min, max })
    }
}

/// First few characters of `text`, for previews.
pub fn excerpt(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TestStep {
    Title,
    Theory,
    Done,
}

#[derive(Debug)]
pub struct TestForm {
    step: TestStep,
    title: String,
    theory: String,
}

impl TestForm {
    pub const DEFAULT_TITLE: &'static str = "New test";

    pub fn new() -> Self {
        Self {
            step: TestStep::Title,
            title: String::new(),
            theory: String::new(),
        }
    }
}

impl Default for TestForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for TestForm {
    type Output = NewTest;

    fn prompt(&self) -> Option<Prompt> {
        match self.step {
            TestStep::Title => Some(Prompt::new("Test title:", Self::DEFAULT_TITLE)),
            TestStep::Theory => Some(Prompt::new("Theory (optional):", "")),
            TestStep::Done => None,
        }
    }

    fn accept(&mut self, input: &str) -> Result<(), FieldError> {
        match self.step {
            TestStep::Title => {
                self.title = required("Test title", input)?;
                self.step = TestStep::Theory;
            }
            TestStep::Theory => {
                self.theory = input.trim().to_string();
                self.step = TestStep::Done;
            }
            TestStep::Done => {}
        }
        Ok(())
    }

    fn preview(&self) -> Option<String> {
        let theory = if self.theory.is_empty() {
            "No theory".to_string()
        } else {
            format!("Theory: {}", excerpt(&self.theory))
        };
        Some(format!(
            "Title: {}\n{}\n\nCreate this test?",
            self.title, theory
        ))
    }

    fn finish(self) -> Option<NewTest> {
        (self.step == TestStep::Done).then(|| NewTest {
            title: self.title,
            theory: self.theory,
            questions: Vec::new(),
        })
    }
}

/// A question that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: Option<String>,
}

impl QuestionDraft {
    pub fn into_question(self, id: String) -> Question {
        Question {
            id,
            text: self.text,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionStep {
    Text,
    OptionCount,
    Option(usize),
    Correct,
    Explanation,
    Done,
}

#[derive(Debug)]
pub struct QuestionForm {
    step: QuestionStep,
    text: String,
    option_count: usize,
    options: Vec<String>,
    correct: usize,
    explanation: Option<String>,
}

impl QuestionForm {
    pub fn new() -> Self {
        Self {
            step: QuestionStep::Text,
            text: String::new(),
            option_count: 0,
            options: Vec::new(),
            correct: 0,
            explanation: None,
        }
    }
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for QuestionForm {
    type Output = QuestionDraft;

    fn prompt(&self) -> Option<Prompt> {
        match self.step {
            QuestionStep::Text => Some(Prompt::new("Question:", "")),
            QuestionStep::OptionCount => Some(Prompt::new(
                format!("How many answer options? (min {MIN_OPTIONS}, max {MAX_OPTIONS}):"),
                "4",
            )),
            QuestionStep::Option(idx) => Some(Prompt::new(
                format!("Answer option {}:", idx + 1),
                format!("Option {}", idx + 1),
            )),
            QuestionStep::Correct => Some(Prompt::new(
                format!("Number of the correct answer (1-{}):", self.option_count),
                "1",
            )),
            QuestionStep::Explanation => Some(Prompt::new("Explanation (optional):", "")),
            QuestionStep::Done => None,
        }
    }

    fn accept(&mut self, input: &str) -> Result<(), FieldError> {
        match self.step {
            QuestionStep::Text => {
                self.text = required("Question", input)?;
                self.step = QuestionStep::OptionCount;
            }
            QuestionStep::OptionCount => {
                self.option_count = number_in("Option count", input, MIN_OPTIONS, MAX_OPTIONS)?;
                self.options = Vec::with_capacity(self.option_count);
                self.step = QuestionStep::Option(0);
            }
            QuestionStep::Option(idx) => {
                self.options.push(required("Answer option", input)?);
                self.step = if idx + 1 < self.option_count {
                    QuestionStep::Option(idx + 1)
                } else {
                    QuestionStep::Correct
                };
            }
            QuestionStep::Correct => {
                self.correct = number_in("Correct answer", input, 1, self.options.len())? - 1;
                self.step = QuestionStep::Explanation;
            }
            QuestionStep::Explanation => {
                let trimmed = input.trim();
                self.explanation = (!trimmed.is_empty()).then(|| trimmed.to_string());
                self.step = QuestionStep::Done;
            }
            QuestionStep::Done => {}
        }
        Ok(())
    }

    fn preview(&self) -> Option<String> {
        let correct = self
            .options
            .get(self.correct)
            .map(String::as_str)
            .unwrap_or_default();
        let explanation = match &self.explanation {
            Some(text) => format!("Explanation: {text}"),
            None => String::new(),
        };
        Some(format!(
            "Question: {}\nOptions: {}\nCorrect: {}\n{}\n\nAdd this question?",
            self.text,
            self.options.join(", "),
            correct,
            explanation
        ))
    }

    fn finish(self) -> Option<QuestionDraft> {
        (self.step == QuestionStep::Done).then(|| QuestionDraft {
            text: self.text,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NewsStep {
    Title,
    Content,
    Date,
    Done,
}

#[derive(Debug)]
pub struct NewsForm {
    step: NewsStep,
    today: NaiveDate,
    title: String,
    content: String,
    date: String,
}

impl NewsForm {
    pub const DEFAULT_TITLE: &'static str = "New news item";
    pub const DEFAULT_CONTENT: &'static str = "News text";

    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: NewsStep::Title,
            today,
            title: String::new(),
            content: String::new(),
            date: String::new(),
        }
    }

    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

impl Form for NewsForm {
    type Output = NewNewsItem;

    fn prompt(&self) -> Option<Prompt> {
        match self.step {
            NewsStep::Title => Some(Prompt::new("News title:", Self::DEFAULT_TITLE)),
            NewsStep::Content => Some(Prompt::new("News content:", Self::DEFAULT_CONTENT)),
            NewsStep::Date => Some(Prompt::new(
                "Date (yyyy-mm-dd):",
                self.today.format(DATE_FORMAT).to_string(),
            )),
            NewsStep::Done => None,
        }
    }

    fn accept(&mut self, input: &str) -> Result<(), FieldError> {
        match self.step {
            NewsStep::Title => {
                self.title = required("Title", input)?;
                self.step = NewsStep::Content;
            }
            NewsStep::Content => {
                self.content = required("Content", input)?;
                self.step = NewsStep::Date;
            }
            NewsStep::Date => {
                let date = required("Date", input)?;
                validate_date(&date).map_err(|e| FieldError::BadDate(e.to_string()))?;
                self.date = date;
                self.step = NewsStep::Done;
            }
            NewsStep::Done => {}
        }
        Ok(())
    }

    fn preview(&self) -> Option<String> {
        Some(format!(
            "Title: {}\nDate: {}\nContent: {}\n\nPublish this news item?",
            self.title,
            self.date,
            excerpt(&self.content)
        ))
    }

    fn finish(self) -> Option<NewNewsItem> {
        (self.step == NewsStep::Done).then(|| NewNewsItem {
            title: self.title,
            content: self.content,
            date: self.date,
        })
    }
}

/// Single non-blank field with a suggested value and no confirmation.
#[derive(Debug)]
pub struct TitleForm {
    label: String,
    default: String,
    title: Option<String>,
}

impl TitleForm {
    pub fn new(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default: default.into(),
            title: None,
        }
    }
}

impl Form for TitleForm {
    type Output = String;

    fn prompt(&self) -> Option<Prompt> {
        match self.title {
            None => Some(Prompt::new(self.label.clone(), self.default.clone())),
            Some(_) => None,
        }
    }

    fn accept(&mut self, input: &str) -> Result<(), FieldError> {
        self.title = Some(required("Title", input)?);
        Ok(())
    }

    fn preview(&self) -> Option<String> {
        None
    }

    fn finish(self) -> Option<String> {
        self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libpanel::prompt::ScriptedPrompter;

    #[test]
    fn test_form_reprompts_blank_title() {
        let mut prompter = ScriptedPrompter::new()
            .answers(["   ", " Punctuation "])
            .accept_default()
            .confirm(true);
        let outcome = run_form(TestForm::new(), &mut prompter);
        assert_eq!(
            outcome,
            FormOutcome::Submitted(NewTest {
                title: "Punctuation".to_string(),
                theory: String::new(),
                questions: vec![],
            })
        );
        assert_eq!(prompter.asked, ["Test title:", "Test title:", "Theory (optional):"]);
        assert_eq!(prompter.errors(), ["Test title cannot be empty"]);
    }

    #[test]
    fn declined_preview_submits_nothing() {
        let mut prompter = ScriptedPrompter::new()
            .answers(["Syntax", "Clauses"])
            .confirm(false);
        assert_eq!(run_form(TestForm::new(), &mut prompter), FormOutcome::Declined);
        assert!(prompter.confirmations[0].contains("Theory: Clauses"));
    }

    #[test]
    fn cancel_stops_before_next_field() {
        let mut prompter = ScriptedPrompter::new().cancel();
        assert_eq!(run_form(QuestionForm::new(), &mut prompter), FormOutcome::Cancelled);
        assert_eq!(prompter.asked.len(), 1);
        assert!(prompter.confirmations.is_empty());
    }

    #[test]
    fn question_form_collects_options_in_order() {
        let mut prompter = ScriptedPrompter::new()
            .answers(["Which word has a spelling error?", "3", "first", "second", "third", "2", ""])
            .confirm(true);
        let FormOutcome::Submitted(draft) = run_form(QuestionForm::new(), &mut prompter) else {
            panic!("form did not complete");
        };
        assert_eq!(draft.options, ["first", "second", "third"]);
        assert_eq!(draft.correct, 1);
        assert_eq!(draft.explanation, None);
        assert!(prompter.confirmations[0].contains("Correct: second"));

        let question = draft.into_question("q1".to_string());
        assert!(question.validate().is_ok());
    }

    #[test]
    fn option_count_outside_bounds_is_rejected() {
        let mut form = QuestionForm::new();
        form.accept("text").unwrap();
        assert_eq!(form.accept("1"), Err(FieldError::OutOfRange { min: 2, max: 6 }));
        assert_eq!(form.accept("7"), Err(FieldError::OutOfRange { min: 2, max: 6 }));
        assert!(matches!(form.accept("four"), Err(FieldError::NotANumber { .. })));
        assert!(form.accept("2").is_ok());
    }

    #[test]
    fn correct_index_outside_options_is_rejected() {
        let mut form = QuestionForm::new();
        for input in ["text", "2", "a", "b"] {
            form.accept(input).unwrap();
        }
        assert_eq!(form.accept("0"), Err(FieldError::OutOfRange { min: 1, max: 2 }));
        assert_eq!(form.accept("3"), Err(FieldError::OutOfRange { min: 1, max: 2 }));
        assert_eq!(form.prompt().unwrap().label, "Number of the correct answer (1-2):");
        form.accept("2").unwrap();
        form.accept("  because  ").unwrap();
        let draft = form.finish().unwrap();
        assert_eq!(draft.correct, 1);
        assert_eq!(draft.explanation.as_deref(), Some("because"));
    }

    #[test]
    fn unfinished_form_yields_nothing() {
        let mut form = QuestionForm::new();
        form.accept("text").unwrap();
        assert!(form.finish().is_none());
    }

    #[test]
    fn news_form_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut prompter = ScriptedPrompter::new()
            .accept_default()
            .accept_default()
            .answer("14.03.2025")
            .accept_default()
            .confirm(true);
        let outcome = run_form(NewsForm::new(today), &mut prompter);
        assert_eq!(
            outcome,
            FormOutcome::Submitted(NewNewsItem {
                title: NewsForm::DEFAULT_TITLE.to_string(),
                content: NewsForm::DEFAULT_CONTENT.to_string(),
                date: "2025-03-14".to_string(),
            })
        );
        assert_eq!(prompter.errors().len(), 1);
    }

    #[test]
    fn excerpt_counts_characters() {
        let long = "ё".repeat(60);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), PREVIEW_CHARS + 3);
        assert_eq!(excerpt("short"), "short");
    }
}
