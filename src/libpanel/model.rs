use crate::libpanel::error::{Error, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Tests,
    News,
    Content,
}

impl ResourceKind {
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Tests => "test",
            ResourceKind::News => "news item",
            ResourceKind::Content => "content",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Tests => "Test",
            ResourceKind::News => "News item",
            ResourceKind::Content => "Content",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            ResourceKind::Tests => "No tests yet. Add the first one!",
            ResourceKind::News => "No news yet. Add the first one!",
            ResourceKind::Content => "No content yet.",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Tests => write!(f, "tests"),
            ResourceKind::News => write!(f, "news"),
            ResourceKind::Content => write!(f, "content"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn validate(&self) -> Result<()> {
        let count = self.options.len();
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
            return Err(Error::Validation(format!(
                "question {:?} has {} options, expected {}-{}",
                self.id, count, MIN_OPTIONS, MAX_OPTIONS
            )));
        }
        if self.correct >= count {
            return Err(Error::Validation(format!(
                "question {:?}: correct index {} is out of range (0-{})",
                self.id,
                self.correct,
                count - 1
            )));
        }
        Ok(())
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub theory: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Test {
    pub fn has_theory(&self) -> bool {
        !self.theory.is_empty()
    }
}

/// Body of `POST /api/tests`. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTest {
    pub title: String,
    pub theory: String,
    pub questions: Vec<Question>,
}

impl From<&Test> for NewTest {
    fn from(test: &Test) -> Self {
        NewTest {
            title: test.title.clone(),
            theory: test.theory.clone(),
            questions: test.questions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNewsItem {
    pub title: String,
    pub content: String,
    pub date: String,
}

impl From<&NewsItem> for NewNewsItem {
    fn from(item: &NewsItem) -> Self {
        NewNewsItem {
            title: item.title.clone(),
            content: item.content.clone(),
            date: item.date.clone(),
        }
    }
}

pub fn validate_date(date: &str) -> Result<()> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|e| Error::Validation(format!("date {date:?} is not YYYY-MM-DD: {e}")))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub about: Section,
    #[serde(default)]
    pub theory: Section,
}

impl ContentBlock {
    pub const ABOUT_TITLE: &'static str = "👥 About us";
    pub const THEORY_TITLE: &'static str = "📘 Theory";

    pub fn about_title(&self) -> &str {
        or_default(&self.about.title, Self::ABOUT_TITLE)
    }

    pub fn theory_title(&self) -> &str {
        or_default(&self.theory.title, Self::THEORY_TITLE)
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestsSnapshot {
    #[serde(default)]
    pub tests: Vec<Test>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSnapshot {
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

/// A list entity with its own id and a `{<kind>: [...]}` collection document.
pub trait Entity: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug {
    const KIND: ResourceKind;
    type Snapshot: Serialize + DeserializeOwned + Default + fmt::Debug;
    type Create: Serialize + for<'a> From<&'a Self>;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    /// Derived stats shown next to the title.
    fn stats(&self) -> String;
    fn validate(&self) -> Result<()>;
    fn into_items(snapshot: Self::Snapshot) -> Vec<Self>;
}

impl Entity for Test {
    const KIND: ResourceKind = ResourceKind::Tests;
    type Snapshot = TestsSnapshot;
    type Create = NewTest;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn stats(&self) -> String {
        format!(
            "Questions: {} | Theory: {}",
            self.questions.len(),
            if self.has_theory() { "yes" } else { "no" }
        )
    }

    fn validate(&self) -> Result<()> {
        self.questions.iter().try_for_each(Question::validate)
    }

    fn into_items(snapshot: TestsSnapshot) -> Vec<Self> {
        snapshot.tests
    }
}

impl Entity for NewsItem {
    const KIND: ResourceKind = ResourceKind::News;
    type Snapshot = NewsSnapshot;
    type Create = NewNewsItem;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn stats(&self) -> String {
        format!("Date: {}", self.date)
    }

    fn validate(&self) -> Result<()> {
        if self.date.is_empty() {
            Ok(())
        } else {
            validate_date(&self.date)
        }
    }

    fn into_items(snapshot: NewsSnapshot) -> Vec<Self> {
        snapshot.news
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> Question {
        Question {
            id: "q1".to_string(),
            text: "Where is the stress?".to_string(),
            options: (1..=options).map(|i| format!("Option {i}")).collect(),
            correct,
            explanation: None,
        }
    }

    #[test]
    fn question_option_bounds() {
        assert!(question(1, 0).validate().is_err());
        assert!(question(2, 1).validate().is_ok());
        assert!(question(6, 5).validate().is_ok());
        assert!(question(7, 0).validate().is_err());
    }

    #[test]
    fn question_correct_index_must_be_in_range() {
        let err = question(4, 4).validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_buffer_survives_serialization() {
        let test = Test {
            id: "t1".to_string(),
            title: "Orthoepy".to_string(),
            theory: "Stress rules".to_string(),
            questions: vec![
                question(3, 2),
                Question {
                    explanation: Some("Because.".to_string()),
                    ..question(2, 0)
                },
            ],
        };
        let buffer = serde_json::to_string_pretty(&test).unwrap();
        assert_eq!(serde_json::from_str::<Test>(&buffer).unwrap(), test);

        let item = NewsItem {
            id: "n1".to_string(),
            title: "Exam date".to_string(),
            content: "It moved.".to_string(),
            date: "2025-05-20".to_string(),
        };
        let buffer = serde_json::to_string_pretty(&item).unwrap();
        assert_eq!(serde_json::from_str::<NewsItem>(&buffer).unwrap(), item);

        let content = ContentBlock {
            about: Section {
                title: ContentBlock::ABOUT_TITLE.to_string(),
                content: "We prepare for the exam.".to_string(),
            },
            theory: Section {
                title: "Theory".to_string(),
                content: "## Syntax\n- commas".to_string(),
            },
        };
        let buffer = serde_json::to_string_pretty(&content).unwrap();
        assert_eq!(serde_json::from_str::<ContentBlock>(&buffer).unwrap(), content);
    }

    #[test]
    fn absent_explanation_is_not_serialized() {
        let json = serde_json::to_value(question(2, 0)).unwrap();
        assert!(json.get("explanation").is_none());
    }

    #[test]
    fn sparse_documents_fill_defaults() {
        let test: Test = serde_json::from_str(r#"{"id":"t","title":"T"}"#).unwrap();
        assert_eq!(test.theory, "");
        assert!(test.questions.is_empty());

        let content: ContentBlock = serde_json::from_str(r#"{"about":{},"theory":{}}"#).unwrap();
        assert_eq!(content, ContentBlock::default());
        assert_eq!(content.about_title(), ContentBlock::ABOUT_TITLE);
        assert_eq!(content.theory_title(), ContentBlock::THEORY_TITLE);
    }

    #[test]
    fn news_date_is_checked() {
        let mut item = NewsItem {
            id: "n1".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            date: String::new(),
        };
        assert!(item.validate().is_ok());
        item.date = "2025-13-01".to_string();
        assert!(item.validate().is_err());
        item.date = "2025-02-28".to_string();
        assert!(item.validate().is_ok());
    }

    #[test]
    fn stats_summarise_entities() {
        let test = Test {
            id: "t".to_string(),
            title: "T".to_string(),
            theory: String::new(),
            questions: vec![question(2, 0)],
        };
        assert_eq!(test.stats(), "Questions: 1 | Theory: no");
    }
}
