pub const QUESTIONS_PER_PAGE: usize = 10;

/// Reads a page number from caller input. Absent, unparseable or zero
/// input falls back to the first page.
pub fn page_number(raw: Option<&str>) -> usize {
    raw.and_then(|text| text.trim().parse::<usize>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Returns page `page` (1-based) of `items`, `page_size` items at a time.
///
/// A page past the end is an empty slice, not an error.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
