use crate::libpanel::model::{Question, Test};
use chrono::Utc;
use rand::{rng, Rng};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

fn millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn random_suffix() -> String {
    let mut rng = rng();
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

pub fn new_test_id() -> String {
    format!("test-{}-{}", millis(), random_suffix())
}

pub fn new_question_id() -> String {
    format!("q-{}-{}", millis(), random_suffix())
}

/// Id for a question appended as the `position`-th (1-based) of its test.
pub fn appended_question_id(position: usize) -> String {
    format!("q{}-{}", position, millis())
}

pub fn copy_title(title: &str) -> String {
    format!("{title} (copy)")
}

/// Deep copy of `source` with fresh ids for the test and every question.
/// Without a title override the copy keeps the source title.
pub fn duplicate_test(source: &Test, title: Option<&str>) -> Test {
    Test {
        id: new_test_id(),
        title: title.map_or_else(|| source.title.clone(), |t| t.trim().to_string()),
        theory: source.theory.clone(),
        questions: source
            .questions
            .iter()
            .map(|q| Question {
                id: new_question_id(),
                ..q.clone()
            })
            .collect(),
    }
}
