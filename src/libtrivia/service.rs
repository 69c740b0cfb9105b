//! Request-level operations over a [`QuestionStore`].
//!
//! This is where caller policy lives: an empty store is `NotFound` while
//! an empty page or an empty search result is a normal success, missing
//! input is `BadRequest`, and store faults during writes are
//! `Unprocessable`. Each operation returns a serializable response whose
//! field names match the JSON the trivia client expects.

use crate::libtrivia::config::Config;
use crate::libtrivia::error::TriviaError;
use crate::libtrivia::model::{
    difficulty_in_range, NewQuestion, Question, ALL_CATEGORIES, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
use crate::libtrivia::paginate::{page_number, paginate, QUESTIONS_PER_PAGE};
use crate::libtrivia::quiz::{QuizOutcome, QuizPicker, QuizRequest, QuizState};
use crate::libtrivia::store::QuestionStore;
use log::{debug, warn};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: BTreeMap<i32, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: BTreeMap<i32, String>,
    pub current_category: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateResponse {
    pub success: bool,
    pub created: Question,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    /// `None` once the round has run out of unseen questions.
    pub question: Option<Question>,
}

pub struct TriviaService<S: QuestionStore> {
    store: S,
    page_size: usize,
}

fn reject(err: TriviaError) -> TriviaError {
    warn!("[Service] {} {}", err.status(), err);
    err
}

impl<S: QuestionStore> TriviaService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            page_size: QUESTIONS_PER_PAGE,
        }
    }

    pub fn with_config(store: S, config: &Config) -> Result<Self, TriviaError> {
        config.validate()?;
        Ok(Self {
            store,
            page_size: config.page_size,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn category_map(&self) -> Result<BTreeMap<i32, String>, TriviaError> {
        Ok(self
            .store
            .list_all_categories()
            .map_err(|err| reject(err.into()))?
            .into_iter()
            .map(|category| (category.id, category.kind))
            .collect())
    }

    pub fn categories(&self) -> Result<CategoriesResponse, TriviaError> {
        let categories = self.category_map()?;
        if categories.is_empty() {
            return Err(reject(TriviaError::NotFound("no categories".to_string())));
        }
        Ok(CategoriesResponse {
            success: true,
            categories,
        })
    }

    /// One page of every question. `page` is raw caller input.
    pub fn questions(&self, page: Option<&str>) -> Result<QuestionsResponse, TriviaError> {
        let selection = self
            .store
            .list_all_questions()
            .map_err(|err| reject(err.into()))?;
        if selection.is_empty() {
            return Err(reject(TriviaError::NotFound("no questions".to_string())));
        }

        let page = page_number(page);
        let questions = paginate(&selection, page, self.page_size).to_vec();
        debug!(
            "[Service] Page {} holds {} of {} questions",
            page,
            questions.len(),
            selection.len()
        );

        Ok(QuestionsResponse {
            success: true,
            questions,
            total_questions: selection.len(),
            categories: self.category_map()?,
            current_category: None,
        })
    }

    pub fn search(&self, term: Option<&str>) -> Result<SearchResponse, TriviaError> {
        let term = match term.map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => {
                return Err(reject(TriviaError::BadRequest(
                    "searchTerm is required".to_string(),
                )))
            }
        };

        let questions = self
            .store
            .search_questions(term)
            .map_err(|err| reject(err.into()))?;
        debug!("[Service] '{}' matched {} questions", term, questions.len());

        Ok(SearchResponse {
            success: true,
            total_questions: questions.len(),
            questions,
            current_category: None,
        })
    }

    pub fn questions_in_category(
        &self,
        category_id: i32,
    ) -> Result<CategoryQuestionsResponse, TriviaError> {
        if category_id < ALL_CATEGORIES {
            return Err(reject(TriviaError::BadRequest(format!(
                "invalid category id {}",
                category_id
            ))));
        }
        if category_id != ALL_CATEGORIES
            && self
                .store
                .get_category_by_id(category_id)
                .map_err(|err| reject(err.into()))?
                .is_none()
        {
            return Err(reject(TriviaError::NotFound(format!(
                "category {} not found",
                category_id
            ))));
        }

        let questions = self
            .store
            .questions_in_category(category_id)
            .map_err(|err| reject(err.into()))?;

        Ok(CategoryQuestionsResponse {
            success: true,
            total_questions: questions.len(),
            questions,
            current_category: category_id,
        })
    }

    pub fn delete_question(&self, id: i32) -> Result<DeleteResponse, TriviaError> {
        let found = self
            .store
            .get_question_by_id(id)
            .map_err(|err| reject(err.into()))?;
        if found.is_none() {
            return Err(reject(TriviaError::NotFound(format!("question {} not found", id))));
        }

        self.store
            .delete_question_by_id(id)
            .map_err(|err| reject(TriviaError::unprocessable(err)))?;
        debug!("[Service] Deleted question {}", id);

        Ok(DeleteResponse {
            success: true,
            deleted: id,
        })
    }

    pub fn create_question(&self, new: &NewQuestion) -> Result<CreateResponse, TriviaError> {
        if let Some(field) = new.missing_field() {
            return Err(reject(TriviaError::BadRequest(format!("`{}` is required", field))));
        }
        if let Some(difficulty) = new.difficulty.filter(|d| !difficulty_in_range(*d)) {
            return Err(reject(TriviaError::BadRequest(format!(
                "difficulty {} is outside {}..={}",
                difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
            ))));
        }
        if let Some(category) = new.category {
            let known = self
                .store
                .get_category_by_id(category)
                .map_err(|err| reject(err.into()))?;
            if known.is_none() {
                return Err(reject(TriviaError::BadRequest(format!(
                    "category {} does not exist",
                    category
                ))));
            }
        }

        let created = self
            .store
            .insert_question(new)
            .map_err(|err| reject(TriviaError::unprocessable(err)))?;
        debug!("[Service] Created question {}", created.id);

        Ok(CreateResponse {
            success: true,
            created,
        })
    }

    /// Next unseen question for a round already in progress.
    pub fn next_question<R: Rng>(
        &self,
        state: &QuizState,
        picker: &mut QuizPicker<R>,
    ) -> Result<QuizOutcome, TriviaError> {
        let candidates = self
            .store
            .questions_in_category(state.category)
            .map_err(|err| reject(err.into()))?;
        Ok(picker.pick(&candidates, state))
    }

    pub fn play<R: Rng>(
        &self,
        request: &QuizRequest,
        picker: &mut QuizPicker<R>,
    ) -> Result<QuizResponse, TriviaError> {
        let state = QuizState::from_request(request).map_err(reject)?;
        let question = self.next_question(&state, picker)?.question();

        Ok(QuizResponse {
            success: true,
            question,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libtrivia::db::SqliteStore;
    use crate::libtrivia::error::{ErrorKind, StoreError};
    use crate::libtrivia::model::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(questions: usize) -> TriviaService<SqliteStore> {
        let store = SqliteStore::open_in_memory().unwrap();
        for (id, kind) in [(1, "Science"), (2, "Art"), (6, "Sports")] {
            store
                .add_category(&Category {
                    id,
                    kind: kind.to_string(),
                })
                .unwrap();
        }
        for n in 1..=questions {
            let category = [1, 2, 6][n % 3];
            store
                .insert_question(&NewQuestion::new(
                    &format!("Question number {}?", n),
                    &format!("Answer {}", n),
                    category,
                    (n % 5) as i32 + 1,
                ))
                .unwrap();
        }
        TriviaService::new(store)
    }

    fn picker() -> QuizPicker<StdRng> {
        QuizPicker::new(StdRng::seed_from_u64(7))
    }

    #[test]
    fn categories_are_keyed_by_id() {
        let response = seeded(0).categories().unwrap();
        assert_eq!(response.categories.get(&6).map(String::as_str), Some("Sports"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["categories"]["2"], "Art");
    }

    #[test]
    fn no_categories_is_not_found() {
        let service = TriviaService::new(SqliteStore::open_in_memory().unwrap());
        assert_eq!(service.categories().unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn questions_are_paged() {
        let service = seeded(25);
        let first = service.questions(None).unwrap();
        assert_eq!(first.questions.len(), 10);
        assert_eq!(first.total_questions, 25);
        assert_eq!(first.categories.len(), 3);
        assert_eq!(first.current_category, None);

        let third = service.questions(Some("3")).unwrap();
        let ids: Vec<i32> = third.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![21, 22, 23, 24, 25]);

        assert_eq!(service.questions(Some("junk")).unwrap(), first);
    }

    #[test]
    fn page_past_the_end_is_empty_success() {
        let response = seeded(25).questions(Some("9")).unwrap();
        assert!(response.questions.is_empty());
        assert_eq!(response.total_questions, 25);
    }

    #[test]
    fn empty_store_is_not_found() {
        let err = seeded(0).questions(None).unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn page_size_comes_from_config() {
        let store = seeded(12).into_store();
        let config = Config {
            page_size: 5,
            ..Config::default()
        };
        let service = TriviaService::with_config(store, &config).unwrap();
        assert_eq!(service.questions(Some("3")).unwrap().questions.len(), 2);
    }

    #[test]
    fn search_requires_a_term() {
        let service = seeded(3);
        for term in [None, Some(""), Some("   ")] {
            assert_eq!(service.search(term).unwrap_err().kind(), ErrorKind::BadRequest);
        }
    }

    #[test]
    fn search_is_case_insensitive() {
        let service = seeded(12);
        let response = service.search(Some("NUMBER 1")).unwrap();
        let ids: Vec<i32> = response.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 10, 11, 12]);
        assert_eq!(response.total_questions, 4);

        let none = service.search(Some("abc")).unwrap();
        assert!(none.success);
        assert!(none.questions.is_empty());
    }

    #[test]
    fn category_listing() {
        let service = seeded(9);
        let sports = service.questions_in_category(6).unwrap();
        assert_eq!(sports.total_questions, 3);
        assert!(sports.questions.iter().all(|q| q.category == 6));
        assert_eq!(sports.current_category, 6);

        assert_eq!(service.questions_in_category(0).unwrap().total_questions, 9);
        assert_eq!(service.questions_in_category(4).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(service.questions_in_category(-1).unwrap_err().kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn delete_echoes_id_then_reports_missing() {
        let service = seeded(3);
        let response = service.delete_question(2).unwrap();
        assert_eq!(response.deleted, 2);
        assert_eq!(service.delete_question(2).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(service.questions(None).unwrap().total_questions, 2);
    }

    #[test]
    fn create_validates_input() {
        let service = seeded(0);
        let missing = NewQuestion {
            difficulty: None,
            ..NewQuestion::new("Q?", "A", 1, 1)
        };
        assert_eq!(service.create_question(&missing).unwrap_err().status(), 400);
        assert_eq!(
            service.create_question(&NewQuestion::new("Q?", "A", 1, 9)).unwrap_err().status(),
            400
        );
        assert_eq!(
            service.create_question(&NewQuestion::new("Q?", "A", 42, 2)).unwrap_err().status(),
            400
        );

        let created = service.create_question(&NewQuestion::new("Q?", "A", 2, 2)).unwrap();
        assert_eq!(created.created.category, 2);
        assert_eq!(service.questions(None).unwrap().total_questions, 1);
    }

    #[test]
    fn quiz_serves_only_unseen_question() {
        let service = seeded(0);
        for n in [5, 6, 9] {
            service
                .create_question(&NewQuestion::new(&format!("Sports {}?", n), "A", 6, 1))
                .unwrap();
        }
        let response = service.play(&QuizRequest::new(6, vec![1, 3]), &mut picker()).unwrap();
        assert_eq!(response.question.map(|q| q.id), Some(2));

        let done = service
            .play(&QuizRequest::new(6, vec![1, 2, 3]), &mut picker())
            .unwrap();
        assert!(done.success);
        assert_eq!(done.question, None);
        assert_eq!(serde_json::to_value(&done).unwrap()["question"], serde_json::Value::Null);
    }

    #[test]
    fn quiz_without_fields_is_bad_request() {
        let service = seeded(3);
        let err = service.play(&QuizRequest::default(), &mut picker()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    struct FaultyStore;

    fn fault() -> StoreError {
        StoreError::Database(rusqlite::Error::InvalidQuery)
    }

    impl QuestionStore for FaultyStore {
        fn list_all_questions(&self) -> Result<Vec<Question>, StoreError> {
            Err(fault())
        }

        fn list_all_categories(&self) -> Result<Vec<Category>, StoreError> {
            Ok(vec![Category {
                id: 1,
                kind: "Science".to_string(),
            }])
        }

        fn get_question_by_id(&self, id: i32) -> Result<Option<Question>, StoreError> {
            Ok(Some(Question {
                id,
                question: "Q?".to_string(),
                answer: "A".to_string(),
                category: 1,
                difficulty: 1,
            }))
        }

        fn delete_question_by_id(&self, _id: i32) -> Result<(), StoreError> {
            Err(fault())
        }

        fn insert_question(&self, _new: &NewQuestion) -> Result<Question, StoreError> {
            Err(fault())
        }
    }

    #[test]
    fn store_faults_are_surfaced() {
        let service = TriviaService::new(FaultyStore);
        assert_eq!(service.questions(None).unwrap_err().kind(), ErrorKind::InternalError);
        assert_eq!(service.search(Some("q")).unwrap_err().kind(), ErrorKind::InternalError);
        assert_eq!(service.delete_question(1).unwrap_err().kind(), ErrorKind::Unprocessable);
        assert_eq!(
            service
                .create_question(&NewQuestion::new("Q?", "A", 1, 1))
                .unwrap_err()
                .kind(),
            ErrorKind::Unprocessable
        );
        assert_eq!(
            service
                .play(&QuizRequest::new(0, vec![]), &mut picker())
                .unwrap_err()
                .kind(),
            ErrorKind::InternalError
        );
    }

    struct RacyStore;

    impl QuestionStore for RacyStore {
        fn list_all_questions(&self) -> Result<Vec<Question>, StoreError> {
            Ok(Vec::new())
        }

        fn list_all_categories(&self) -> Result<Vec<Category>, StoreError> {
            Ok(Vec::new())
        }

        fn get_question_by_id(&self, id: i32) -> Result<Option<Question>, StoreError> {
            FaultyStore.get_question_by_id(id)
        }

        fn delete_question_by_id(&self, id: i32) -> Result<(), StoreError> {
            Err(StoreError::NotFound(id))
        }

        fn insert_question(&self, _new: &NewQuestion) -> Result<Question, StoreError> {
            Err(fault())
        }
    }

    #[test]
    fn question_vanishing_before_delete_is_not_found() {
        let err = TriviaService::new(RacyStore).delete_question(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status(), 404);
    }
}
