use serde::{Deserialize, Serialize};

/// Category identifier meaning "no category restriction".
pub const ALL_CATEGORIES: i32 = 0;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

/// A question as submitted by a caller, before the store has assigned it an id.
///
/// Every field is optional so that a missing field can be reported as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i32>,
    pub difficulty: Option<i32>,
}

/// A [`NewQuestion`] whose required fields are all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub category: i32,
    pub difficulty: i32,
}

impl NewQuestion {
    pub fn new(question: &str, answer: &str, category: i32, difficulty: i32) -> Self {
        Self {
            question: Some(question.to_string()),
            answer: Some(answer.to_string()),
            category: Some(category),
            difficulty: Some(difficulty),
        }
    }

    /// Returns the name of the first required field that is absent or blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        fn blank(text: &Option<String>) -> bool {
            text.as_deref().map_or(true, |t| t.trim().is_empty())
        }

        if blank(&self.question) {
            Some("question")
        } else if blank(&self.answer) {
            Some("answer")
        } else if self.category.is_none() {
            Some("category")
        } else if self.difficulty.is_none() {
            Some("difficulty")
        } else {
            None
        }
    }

    pub fn draft(&self) -> Option<QuestionDraft<'_>> {
        if self.missing_field().is_some() {
            return None;
        }
        Some(QuestionDraft {
            question: self.question.as_deref()?.trim(),
            answer: self.answer.as_deref()?.trim(),
            category: self.category?,
            difficulty: self.difficulty?,
        })
    }
}

pub fn difficulty_in_range(difficulty: i32) -> bool {
    (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty)
}
