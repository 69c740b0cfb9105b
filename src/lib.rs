//! Trivia: a question store with category listing, paging, substring
//! search and a quiz picker that never serves the same question twice.
//!
//! The pure selection logic lives in [`libtrivia::paginate`],
//! [`libtrivia::search`], [`libtrivia::filter`] and [`libtrivia::quiz`].
//! [`libtrivia::service::TriviaService`] composes them over any
//! [`libtrivia::store::QuestionStore`]; [`libtrivia::db::SqliteStore`] is the
//! bundled SQLite backend.

pub mod libtrivia;

pub use libtrivia::config::Config;
pub use libtrivia::error::{ErrorKind, StoreError, TriviaError};
pub use libtrivia::model::{Category, NewQuestion, Question, ALL_CATEGORIES};
pub use libtrivia::quiz::{QuizOutcome, QuizPicker, QuizRequest, QuizState};
pub use libtrivia::service::TriviaService;
pub use libtrivia::store::QuestionStore;
