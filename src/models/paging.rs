use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    6
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1) * self.limit
    }

    pub fn take(&self) -> usize {
        self.limit
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("Page must be greater than 0".to_string());
        }
        if self.limit < 1 || self.limit > 100 {
            return Err("Limit must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationMeta {
    pub fn new(current_page: usize, per_page: usize, total_items: usize) -> Self {
        let total_pages = if per_page > 0 {
            total_items.div_ceil(per_page)
        } else {
            0
        };

        Self {
            current_page,
            per_page,
            total_items,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }

    /// Clamp a requested page into `[1, total_pages]` (page 1 when there are no pages).
    pub fn clamp_page(page: usize, total_pages: usize) -> usize {
        page.clamp(1, total_pages.max(1))
    }
}

/// One page of the filtered catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> CatalogPage<T> {
    pub fn new(items: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { items, pagination }
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }

    pub fn total_count(&self) -> usize {
        self.pagination.total_items
    }

    pub fn is_no_results(&self) -> bool {
        self.pagination.total_items == 0
    }
}
