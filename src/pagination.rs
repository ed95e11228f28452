use serde::{Deserialize, Serialize};

use crate::models::TableRow;

/// Largest page the table will render at once
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Page number, never below 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TablePage {
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub rows: Vec<TableRow>,
}

/// Slice one page out of the table. Pages past the end come back empty.
pub fn paginate(rows: &[TableRow], params: &PaginationParams) -> TablePage {
    let page = params.page();
    let page_size = params.limit();
    let total_rows = rows.len();
    let total_pages = total_rows.div_ceil(page_size);

    let page_rows = rows
        .iter()
        .skip(params.offset())
        .take(page_size)
        .cloned()
        .collect();

    TablePage {
        total_rows,
        page,
        page_size,
        total_pages,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
        rows: page_rows,
    }
}
