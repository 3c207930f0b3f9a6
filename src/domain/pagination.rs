use serde::Deserialize;

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Raw paging parameters as they arrive on the query string.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1-based page index. Defaults to 1.
    pub page_number: Option<i64>,
    /// Items per page, at most 50. Defaults to 10.
    pub page_size: Option<i64>,
}

/// Paging parameters clamped to the supported ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationFilter {
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for PaginationFilter {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationFilter {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        let page_number = page_number.max(DEFAULT_PAGE_NUMBER);
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };
        Self {
            page_number,
            page_size,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl From<PaginationQuery> for PaginationFilter {
    fn from(query: PaginationQuery) -> Self {
        Self::new(
            query.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}
