use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Input and feedback channel of a front-end.
///
/// Every call blocks until the user has answered, so flows built on top of it
/// run one step at a time.
pub trait Prompter {
    /// Asks for one value. `None` means the user gave up.
    fn ask(&mut self, label: &str, default: &str) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, notice: Notice);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Default,
    Cancel,
}

/// Replays canned answers. Runs out into "cancel" and "no".
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    confirms: VecDeque<bool>,
    pub asked: Vec<String>,
    pub confirmations: Vec<String>,
    pub notices: Vec<Notice>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: impl Into<String>) -> Self {
        self.answers.push_back(Answer::Text(text.into()));
        self
    }

    pub fn answers<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers
            .extend(texts.into_iter().map(|t| Answer::Text(t.into())));
        self
    }

    pub fn accept_default(mut self) -> Self {
        self.answers.push_back(Answer::Default);
        self
    }

    pub fn cancel(mut self) -> Self {
        self.answers.push_back(Answer::Cancel);
        self
    }

    pub fn confirm(mut self, yes: bool) -> Self {
        self.confirms.push_back(yes);
        self
    }

    pub fn errors(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message.as_str())
            .collect()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, label: &str, default: &str) -> Option<String> {
        self.asked.push(label.to_string());
        match self.answers.pop_front() {
            Some(Answer::Text(text)) => Some(text),
            Some(Answer::Default) => Some(default.to_string()),
            Some(Answer::Cancel) | None => None,
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
