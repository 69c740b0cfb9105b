//! Random question selection for a quiz round.
//!
//! A round is driven by the caller: it keeps a [`QuizState`] with the ids it
//! has already served and asks [`QuizPicker::pick`] for the next question.
//! The picker works out the unseen part of the pool before drawing, so a
//! pick costs one pass over the pool and at most one random draw. Once
//! every candidate has been served the picker answers
//! [`QuizOutcome::Exhausted`] instead of repeating a question.

use crate::libtrivia::error::TriviaError;
use crate::libtrivia::filter::filter_by_category;
use crate::libtrivia::model::{Question, ALL_CATEGORIES};
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCategory {
    pub id: i32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Quiz request as it arrives from a client. Both fields are required;
/// they are optional here so their absence can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub previous_questions: Option<Vec<i32>>,
    pub quiz_category: Option<QuizCategory>,
}

/// Per-round state held by the caller between picks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    pub category: i32,
    previous_questions: HashSet<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Next(Question),
    /// Every candidate in the pool has already been served.
    Exhausted,
}

impl QuizRequest {
    pub fn new(category: i32, previous_questions: Vec<i32>) -> Self {
        Self {
            previous_questions: Some(previous_questions),
            quiz_category: Some(QuizCategory {
                id: category,
                kind: None,
            }),
        }
    }
}

impl QuizState {
    pub fn new(category: i32) -> Self {
        Self {
            category,
            previous_questions: HashSet::new(),
        }
    }

    pub fn from_request(request: &QuizRequest) -> Result<Self, TriviaError> {
        let previous = request.previous_questions.as_ref().ok_or_else(|| {
            TriviaError::BadRequest("previous_questions is required".to_string())
        })?;
        let category = request
            .quiz_category
            .as_ref()
            .ok_or_else(|| TriviaError::BadRequest("quiz_category is required".to_string()))?;
        if category.id < ALL_CATEGORIES {
            return Err(TriviaError::BadRequest(format!(
                "invalid category id {}",
                category.id
            )));
        }

        Ok(Self {
            category: category.id,
            previous_questions: previous.iter().copied().collect(),
        })
    }

    pub fn has_seen(&self, id: i32) -> bool {
        self.previous_questions.contains(&id)
    }

    pub fn record(&mut self, id: i32) {
        self.previous_questions.insert(id);
    }

    pub fn served(&self) -> usize {
        self.previous_questions.len()
    }
}

impl QuizOutcome {
    pub fn question(self) -> Option<Question> {
        match self {
            QuizOutcome::Next(question) => Some(question),
            QuizOutcome::Exhausted => None,
        }
    }
}

/// Candidates from `questions` in the state's category that have not been served.
pub fn unseen(questions: &[Question], state: &QuizState) -> Vec<Question> {
    let mut candidates = filter_by_category(questions, state.category);
    candidates.retain(|q| !state.has_seen(q.id));
    candidates
}

pub struct QuizPicker<R: Rng> {
    rng: R,
}

impl QuizPicker<ThreadRng> {
    pub fn from_thread_rng() -> Self {
        Self::new(rng())
    }
}

impl<R: Rng> QuizPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn pick(&mut self, questions: &[Question], state: &QuizState) -> QuizOutcome {
        let pool = unseen(questions, state);
        debug!(
            "[Quiz] Category {}: {} questions offered, {} unseen, {} served.",
            state.category,
            questions.len(),
            pool.len(),
            state.served()
        );

        match pool.choose(&mut self.rng) {
            Some(question) => {
                debug!("[Quiz] Picked question {}", question.id);
                QuizOutcome::Next(question.clone())
            }
            None => {
                info!("[Quiz] No unseen questions left in category {}", state.category);
                QuizOutcome::Exhausted
            }
        }
    }
}
