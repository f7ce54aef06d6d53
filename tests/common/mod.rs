#![allow(dead_code)]

use oge_admin::config::ApiRoutes;
use oge_admin::libpanel::api::{ApiClient, ApiRequest, ApiResponse, Method, Transport};
use oge_admin::libpanel::model::{ContentBlock, NewsItem, Question, Test};
use oge_admin::{AdminPanel, Error, Result};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::io;

#[derive(Default)]
struct State {
    tests: Vec<Test>,
    news: Vec<NewsItem>,
    content: ContentBlock,
    next_id: usize,
    down: bool,
    fail_writes: bool,
}

/// In-memory stand-in for the REST backend that records every request.
#[derive(Default)]
pub struct FakeBackend {
    state: RefCell<State>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tests(tests: Vec<Test>) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().tests = tests;
        backend
    }

    pub fn panel(&self) -> AdminPanel<&FakeBackend> {
        AdminPanel::new(ApiClient::new(self, ApiRoutes::default()))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path()))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    pub fn tests(&self) -> Vec<Test> {
        self.state.borrow().tests.clone()
    }

    pub fn news(&self) -> Vec<NewsItem> {
        self.state.borrow().news.clone()
    }

    pub fn content(&self) -> ContentBlock {
        self.state.borrow().content.clone()
    }

    pub fn set_down(&self, down: bool) {
        self.state.borrow_mut().down = down;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    fn handle(&self, state: &mut State, request: &ApiRequest) -> (u16, Value) {
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let body = request.body.clone().unwrap_or(Value::Null);
        match (request.method, segments.as_slice()) {
            (Method::Get, ["api", "tests"]) => (200, json!({ "tests": state.tests })),
            (Method::Get, ["api", "news"]) => (200, json!({ "news": state.news })),
            (Method::Get, ["api", "content"]) => (200, json!(state.content)),
            (Method::Post, ["api", "tests"]) => {
                let Some(title) = body.get("title").and_then(Value::as_str) else {
                    return (400, json!({ "error": "bad request" }));
                };
                state.next_id += 1;
                let test = Test {
                    id: format!("srv-{}", state.next_id),
                    title: title.to_string(),
                    theory: body["theory"].as_str().unwrap_or_default().to_string(),
                    questions: serde_json::from_value(body["questions"].clone()).unwrap_or_default(),
                };
                state.tests.push(test.clone());
                (201, json!(test))
            }
            (Method::Post, ["api", "news"]) => {
                let (Some(title), Some(content)) = (body["title"].as_str(), body["content"].as_str())
                else {
                    return (400, json!({ "error": "bad request" }));
                };
                state.next_id += 1;
                let item = NewsItem {
                    id: format!("srv-{}", state.next_id),
                    title: title.to_string(),
                    content: content.to_string(),
                    date: body["date"].as_str().unwrap_or_default().to_string(),
                };
                state.news.push(item.clone());
                (201, json!(item))
            }
            (Method::Put, ["api", "tests", id]) => {
                let Some(test) = state.tests.iter_mut().find(|t| t.id == *id) else {
                    return (404, json!({ "error": "not found" }));
                };
                if let Some(title) = body["title"].as_str() {
                    test.title = title.to_string();
                }
                if let Some(theory) = body["theory"].as_str() {
                    test.theory = theory.to_string();
                }
                if let Ok(questions) = serde_json::from_value::<Vec<Question>>(body["questions"].clone()) {
                    test.questions = questions;
                }
                (200, json!(test))
            }
            (Method::Put, ["api", "news", id]) => {
                let Some(item) = state.news.iter_mut().find(|n| n.id == *id) else {
                    return (404, json!({ "error": "not found" }));
                };
                if let Ok(updated) = serde_json::from_value::<NewsItem>(body) {
                    item.title = updated.title;
                    item.content = updated.content;
                    item.date = updated.date;
                }
                (200, json!(item))
            }
            (Method::Put, ["api", "content"]) => {
                if let Ok(content) = serde_json::from_value(body) {
                    state.content = content;
                }
                (200, json!(state.content))
            }
            (Method::Delete, ["api", "tests", id]) => {
                let before = state.tests.len();
                state.tests.retain(|t| t.id != *id);
                (200, json!({ "deleted": before - state.tests.len() }))
            }
            (Method::Delete, ["api", "news", id]) => {
                let before = state.news.len();
                state.news.retain(|n| n.id != *id);
                (200, json!({ "deleted": before - state.news.len() }))
            }
            _ => (404, json!({ "error": "not found" })),
        }
    }
}

impl Transport for FakeBackend {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(request.clone());
        let mut state = self.state.borrow_mut();
        if state.down {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        if state.fail_writes && request.method != Method::Get {
            return Ok(ApiResponse {
                status: 500,
                body: String::new(),
            });
        }
        let (status, body) = self.handle(&mut state, request);
        Ok(ApiResponse {
            status,
            body: body.to_string(),
        })
    }
}

pub fn question(id: &str, text: &str) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: vec!["first".to_string(), "second".to_string()],
        correct: 0,
        explanation: None,
    }
}

pub fn test(id: &str, title: &str, questions: Vec<Question>) -> Test {
    Test {
        id: id.to_string(),
        title: title.to_string(),
        theory: String::new(),
        questions,
    }
}
