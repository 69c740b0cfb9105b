use crate::libtrivia::error::StoreError;
use crate::libtrivia::filter::filter_by_category;
use crate::libtrivia::model::{Category, NewQuestion, Question};
use crate::libtrivia::search::search;

/// Query interface the service needs from a question backend.
///
/// Listing methods return records ordered by id. Category filtering and
/// search have default implementations on top of
/// [`list_all_questions`](QuestionStore::list_all_questions); backends can
/// override them with a native query.
pub trait QuestionStore {
    fn list_all_questions(&self) -> Result<Vec<Question>, StoreError>;

    fn list_all_categories(&self) -> Result<Vec<Category>, StoreError>;

    fn get_question_by_id(&self, id: i32) -> Result<Option<Question>, StoreError>;

    fn get_category_by_id(&self, id: i32) -> Result<Option<Category>, StoreError> {
        Ok(self
            .list_all_categories()?
            .into_iter()
            .find(|category| category.id == id))
    }

    /// Fails with [`StoreError::NotFound`] when no question has this id.
    fn delete_question_by_id(&self, id: i32) -> Result<(), StoreError>;

    /// Fails with [`StoreError::Validation`] when a required field is absent.
    fn insert_question(&self, new: &NewQuestion) -> Result<Question, StoreError>;

    fn questions_in_category(&self, category_id: i32) -> Result<Vec<Question>, StoreError> {
        Ok(filter_by_category(&self.list_all_questions()?, category_id))
    }

    fn search_questions(&self, term: &str) -> Result<Vec<Question>, StoreError> {
        Ok(search(&self.list_all_questions()?, term))
    }
}
