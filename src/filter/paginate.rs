use serde::Serialize;

/// Directory page size; not configurable
pub const PAGE_SIZE: usize = 12;

/// `ceil(len / PAGE_SIZE)`; an empty list has zero pages
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Items `[12(page-1), min(12*page, len))` for a 1-based page. Pages past
/// the end (or page 0) are empty.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = page.saturating_mul(PAGE_SIZE).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

impl<T: Clone> Page<T> {
    pub fn of(items: &[T], page: usize) -> Self {
        Self {
            page,
            total_pages: total_pages(items.len()),
            total_items: items.len(),
            items: paginate(items, page).to_vec(),
        }
    }
}
