use crate::libtrivia::model::{Question, ALL_CATEGORIES};

/// Questions in `category_id`, in order. [`ALL_CATEGORIES`] keeps everything.
pub fn filter_by_category(items: &[Question], category_id: i32) -> Vec<Question> {
    if category_id == ALL_CATEGORIES {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|q| q.category == category_id)
        .cloned()
        .collect()
}
