//! Listing query model: search, sort and pagination parameters

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;

use super::result::{Error, Result};

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// A value a record exposes for searching or sorting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(Decimal),
}

impl FieldValue<'_> {
    /// Three-way compare; values of different shapes compare equal
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Records that can be filtered and sorted by named field
pub trait Listable {
    /// Fields accepted by `field:substring` search expressions
    const SEARCHABLE: &'static [&'static str];

    /// Look up a field by its external (camelCase) name
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Parsed `field:substring` search expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub field: String,
    /// Lowercased needle
    pub needle: String,
}

impl SearchFilter {
    /// Parse a search expression; empty input means no filter
    ///
    /// Only the second `:`-separated segment is the needle, so `name:a:b`
    /// searches for `a`.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return None;
        }
        let mut parts = expr.split(':');
        let field = parts.next().unwrap_or_default();
        let needle = parts.next().unwrap_or_default();
        Some(Self {
            field: field.trim().to_string(),
            needle: needle.trim().to_lowercase(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Parsed `field:direction` sort expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            return None;
        }
        let (field, direction) = match expr.split_once(':') {
            Some((field, direction)) => (field, SortDirection::parse(direction)),
            None => (expr, SortDirection::Asc),
        };
        Some(Self {
            field: field.trim().to_string(),
            direction,
        })
    }
}

/// Full listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based
    pub page_number: usize,
    pub page_size: usize,
    pub search: Option<SearchFilter>,
    pub sort: Option<SortSpec>,
}

impl ListQuery {
    pub fn new(page_number: usize, page_size: usize, search: &str, sort: &str) -> Result<Self> {
        if page_number == 0 {
            return Err(Error::validation("page_number must be at least 1"));
        }
        if page_size == 0 {
            return Err(Error::validation("page_size must be at least 1"));
        }
        Ok(Self {
            page_number,
            page_size,
            search: SearchFilter::parse(search),
            sort: SortSpec::parse(sort),
        })
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort: None,
        }
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Convert items while keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_parse() {
        assert_eq!(SearchFilter::parse(""), None);
        let filter = SearchFilter::parse("name:ALI").unwrap();
        assert_eq!(filter.field, "name");
        assert_eq!(filter.needle, "ali");

        let bare = SearchFilter::parse("email").unwrap();
        assert_eq!(bare.field, "email");
        assert_eq!(bare.needle, "");

        let extra = SearchFilter::parse("name:Ali:ignored").unwrap();
        assert_eq!(extra.field, "name");
        assert_eq!(extra.needle, "ali");
    }

    #[test]
    fn test_sort_parse() {
        let spec = SortSpec::parse("email:desc").unwrap();
        assert_eq!(spec.field, "email");
        assert_eq!(spec.direction, SortDirection::Desc);

        assert_eq!(SortSpec::parse("name").unwrap().direction, SortDirection::Asc);
        assert_eq!(SortSpec::parse("name:sideways").unwrap().direction, SortDirection::Asc);
        assert_eq!(SortSpec::parse("   "), None);
    }

    #[test]
    fn test_list_query_rejects_zero() {
        assert!(ListQuery::new(0, 10, "", "").is_err());
        assert!(ListQuery::new(1, 0, "", "").is_err());
        assert!(ListQuery::new(1, 10, "", "asc").is_ok());
    }

    #[test]
    fn test_field_compare() {
        assert_eq!(FieldValue::Text("a").compare(&FieldValue::Text("b")), Ordering::Less);
        assert_eq!(
            FieldValue::Number(Decimal::new(10, 0)).compare(&FieldValue::Number(Decimal::new(9, 0))),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Text("a").compare(&FieldValue::Number(Decimal::ONE)),
            Ordering::Equal
        );
    }
}
