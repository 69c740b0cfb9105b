use crate::libtrivia::error::TriviaError;
use crate::libtrivia::paginate::QUESTIONS_PER_PAGE;
use std::path::PathBuf;

/// Questions asked in one interactive round.
pub const QUESTIONS_PER_QUIZ: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub page_size: usize,
    pub quiz_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("trivia.db"),
            page_size: QUESTIONS_PER_PAGE,
            quiz_length: QUESTIONS_PER_QUIZ,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), TriviaError> {
        if self.page_size == 0 {
            return Err(TriviaError::BadRequest("page size must be positive".to_string()));
        }
        if self.quiz_length == 0 {
            return Err(TriviaError::BadRequest("quiz length must be positive".to_string()));
        }
        Ok(())
    }
}
