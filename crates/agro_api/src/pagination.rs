//! Page-number pagination for list endpoints.

use crate::error::{ApiError, ApiResult};
use agro_core::config::PaginationConfig;
use agro_core::{Page, PageRequest};
use serde::{Deserialize, Serialize};

/// Raw `?page=&page_size=` query values.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl PageParams {
    /// Resolves the requested page. A page that is not a positive integer is
    /// an error; an unusable page size falls back to the configured default.
    pub fn resolve(&self, config: &PaginationConfig) -> ApiResult<PageRequest> {
        let page = match self.page.as_deref() {
            None => 1,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(page) if page >= 1 => page,
                _ => return Err(ApiError::InvalidPage),
            },
        };
        let page_size = self
            .page_size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|size| *size >= 1)
            .map_or(config.page_size, |size| size.min(config.max_page_size));

        Ok(PageRequest::new(page, page_size))
    }
}

/// List response envelope. `next` and `previous` are page numbers.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wraps `page`, rejecting page numbers past the last page.
    pub fn from_page(page: Page<T>) -> ApiResult<Self> {
        if page.request.page > page.page_count() {
            return Err(ApiError::InvalidPage);
        }
        let current = page.request.page;
        let next = page.has_next().then_some(current + 1);
        let previous = page.has_previous().then(|| current - 1);
        Ok(Self {
            count: page.total,
            next,
            previous,
            results: page.items,
        })
    }
}
