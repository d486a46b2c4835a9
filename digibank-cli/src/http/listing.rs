//! Query-string parsing and the collection response body

use serde::{Deserialize, Serialize};

use digibank_core::{ListQuery, Page};

use super::error::{AppError, AppResult};

/// Raw listing parameters; numbers are parsed by hand so bad input is a 400
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn into_query(self, default_page_size: usize) -> AppResult<ListQuery> {
        let page_number = parse_positive(self.page_number.as_deref(), "page_number")?.unwrap_or(1);
        let page_size =
            parse_positive(self.page_size.as_deref(), "page_size")?.unwrap_or(default_page_size);
        let search = self.search.unwrap_or_default();
        let sort = self.sort.unwrap_or_else(|| "asc".to_string());

        Ok(ListQuery::new(page_number, page_size, &search, &sort)?)
    }
}

fn parse_positive(raw: Option<&str>, name: &str) -> AppResult<Option<usize>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => match value.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Some(n)),
            _ => Err(AppError::validation(format!(
                "{name} must be a positive integer"
            ))),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct CollectionBody<T> {
    pub page_number: usize,
    pub page_size: usize,
    pub count: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<T>,
}

impl<T> CollectionBody<T> {
    /// An empty page is reported as a failed operation with `empty_message`
    pub fn from_page(page: Page<T>, empty_message: &str) -> AppResult<Self> {
        if page.items.is_empty() {
            return Err(AppError::operation_failed(empty_message));
        }
        Ok(Self {
            page_number: page.page_number,
            page_size: page.page_size,
            count: page.count(),
            total_pages: page.total_pages,
            has_previous_page: page.has_previous_page,
            has_next_page: page.has_next_page,
            data: page.items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = ListParams::default().into_query(15).unwrap();
        assert_eq!(query.page_number, 1);
        assert_eq!(query.page_size, 15);
        assert!(query.search.is_none());
        assert!(query.sort.is_none());
    }

    #[test]
    fn test_rejects_bad_numbers() {
        for bad in ["0", "-1", "two"] {
            let params = ListParams {
                page_size: Some(bad.to_string()),
                ..ListParams::default()
            };
            let err = params.into_query(15).unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_empty_page_is_operation_failed() {
        let page: Page<u8> = Page {
            items: vec![],
            page_number: 2,
            page_size: 5,
            total_pages: 1,
            has_previous_page: true,
            has_next_page: false,
        };
        let err = CollectionBody::from_page(page, "User not found").unwrap_err();
        assert_eq!(err.message, "User not found");
        assert_eq!(err.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
