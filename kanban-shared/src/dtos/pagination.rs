//! Page/limit parsing and page metadata

use serde::Serialize;
use serde_json::Value;

use super::fields;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDto {
    pub page: i64,
    pub limit: i64,
}

impl Default for PaginationDto {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PaginationDto {
    /// Reads `page` and `limit` from a query-string shaped object
    ///
    /// ```
    /// use kanban_shared::dtos::pagination::PaginationDto;
    /// use serde_json::json;
    ///
    /// let dto = PaginationDto::create(&json!({ "page": "2" })).unwrap();
    /// assert_eq!((dto.page, dto.limit), (2, 10));
    /// ```
    pub fn create(object: &Value) -> Result<Self, String> {
        let page = fields::integer(object, "page", DEFAULT_PAGE);
        let limit = fields::integer(object, "limit", DEFAULT_LIMIT);

        let (page, limit) = match (page, limit) {
            (Ok(page), Ok(limit)) => (page, limit),
            _ => return Err("Page and limit must be numbers".to_string()),
        };

        if page < 1 {
            return Err("Page must be greater than 0".to_string());
        }
        if limit < 1 {
            return Err("Limit must be greater than 0".to_string());
        }
        if limit > MAX_LIMIT {
            return Err(format!("Limit must be at most {}", MAX_LIMIT));
        }

        Ok(Self { page, limit })
    }

    /// Rows to skip for this page, clamped to `i64::MAX` for huge pages
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination block flattened into every list response
///
/// `next` / `prev` are relative links to the neighbouring pages, or `null`
/// at either end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub last_page: i64,
    pub limit: i64,
    pub page: i64,
    pub total: i64,
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PageMeta {
    /// Builds metadata for `total` rows
    ///
    /// `base_path` is the resource path with any fixed query parameters,
    /// e.g. `/api/tasks?boardId=...`.
    pub fn new(pagination: PaginationDto, total: i64, base_path: &str) -> Self {
        let PaginationDto { page, limit } = pagination;
        let total = total.max(0);
        let last_page = ((total + limit - 1) / limit).max(1);

        let link = |target: i64| {
            let (path, extra) = match base_path.split_once('?') {
                Some((path, query)) => (path, format!("&{}", query)),
                None => (base_path, String::new()),
            };
            format!("{}?page={}&limit={}{}", path, target, limit, extra)
        };

        let next = (page < last_page).then(|| link(page + 1));
        let prev = (page > 1).then(|| link((page - 1).min(last_page)));

        Self {
            last_page,
            limit,
            page,
            total,
            next,
            prev,
        }
    }
}
