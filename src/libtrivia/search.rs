use crate::libtrivia::model::Question;

/// Questions whose text contains `term`, ignoring case. Answers are not
/// searched. Order is preserved.
pub fn search(items: &[Question], term: &str) -> Vec<Question> {
    let needle = term.trim().to_lowercase();
    items
        .iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
