//! Search, sort and paginate over an unfiltered record list
//!
//! Used by both the account and the user listings.

use crate::domain::query::{
    FieldValue, ListQuery, Listable, Page, SearchFilter, SortDirection, SortSpec,
};

/// Filter, then sort, then slice out the requested page
pub fn query<T: Listable>(records: Vec<T>, query: &ListQuery) -> Page<T> {
    let mut records = match &query.search {
        Some(filter) => apply_filter(records, filter),
        None => records,
    };
    if let Some(sort) = &query.sort {
        apply_sort(&mut records, sort);
    }
    paginate(records, query.page_number, query.page_size)
}

fn apply_filter<T: Listable>(records: Vec<T>, filter: &SearchFilter) -> Vec<T> {
    if !T::SEARCHABLE.contains(&filter.field.as_str()) {
        return records;
    }
    records
        .into_iter()
        .filter(|record| match record.field(&filter.field) {
            Some(FieldValue::Text(text)) => {
                text.to_lowercase().contains(&filter.needle)
            }
            Some(FieldValue::Number(n)) => n.to_string().contains(&filter.needle),
            None => false,
        })
        .collect()
}

fn apply_sort<T: Listable>(records: &mut [T], sort: &SortSpec) {
    // Field unknown to this record type: leave the order alone
    if records.first().and_then(|r| r.field(&sort.field)).is_none() {
        return;
    }
    records.sort_by(|a, b| {
        let ordering = match (a.field(&sort.field), b.field(&sort.field)) {
            (Some(x), Some(y)) => x.compare(&y),
            _ => std::cmp::Ordering::Equal,
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn paginate<T>(records: Vec<T>, page_number: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let page_number = page_number.max(1);
    let total = records.len();
    let total_pages = total.div_ceil(page_size);

    let start = (page_number - 1).saturating_mul(page_size).min(total);
    let items: Vec<T> = records.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page_number,
        page_size,
        total_pages,
        has_previous_page: page_number > 1,
        has_next_page: page_number < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, User};
    use rust_decimal::Decimal;

    fn users() -> Vec<User> {
        vec![
            User::new("Alice", "carol.a@bank.example", "h"),
            User::new("Bob", "alice.b@bank.example", "h"),
            User::new("Malika", "zed@bank.example", "h"),
            User::new("Dan", "dan@bank.example", "h"),
            User::new("Eve", "eve@bank.example", "h"),
        ]
    }

    fn names(page: &Page<User>) -> Vec<&str> {
        page.items.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let q = ListQuery::new(1, 10, "name:ALI", "").unwrap();
        let page = query(users(), &q);
        assert_eq!(names(&page), vec!["Alice", "Malika"]);

        let q = ListQuery::new(1, 10, "email:alice", "").unwrap();
        assert_eq!(names(&query(users(), &q)), vec!["Bob"]);
    }

    #[test]
    fn test_unknown_search_field_passes_through() {
        let q = ListQuery::new(1, 10, "nickname:ali", "").unwrap();
        assert_eq!(query(users(), &q).count(), 5);
    }

    #[test]
    fn test_sort_email_desc() {
        let q = ListQuery::new(1, 10, "", "email:desc").unwrap();
        let page = query(users(), &q);
        let emails: Vec<&str> = page.items.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "zed@bank.example",
                "eve@bank.example",
                "dan@bank.example",
                "carol.a@bank.example",
                "alice.b@bank.example",
            ]
        );
    }

    #[test]
    fn test_unknown_sort_field_keeps_order() {
        let q = ListQuery::new(1, 10, "", "asc").unwrap();
        assert_eq!(
            names(&query(users(), &q)),
            vec!["Alice", "Bob", "Malika", "Dan", "Eve"]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let accounts = vec![
            Account::new("b", "111111111", "x", Decimal::new(5, 0), "h"),
            Account::new("a", "222222222", "x", Decimal::new(5, 0), "h"),
            Account::new("c", "333333333", "x", Decimal::new(1, 0), "h"),
        ];
        let q = ListQuery::new(1, 10, "", "balance:asc").unwrap();
        let page = query(accounts, &q);
        let numbers: Vec<&str> = page.items.iter().map(|a| a.account_number.as_str()).collect();
        assert_eq!(numbers, vec!["333333333", "111111111", "222222222"]);
    }

    #[test]
    fn test_pagination() {
        let sizes: Vec<usize> = (1..=3)
            .map(|p| query(users(), &ListQuery::new(p, 2, "", "").unwrap()).count())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        let first = query(users(), &ListQuery::new(1, 2, "", "").unwrap());
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous_page);
        assert!(first.has_next_page);

        let last = query(users(), &ListQuery::new(3, 2, "", "").unwrap());
        assert!(last.has_previous_page);
        assert!(!last.has_next_page);

        let beyond = query(users(), &ListQuery::new(9, 2, "", "").unwrap());
        assert_eq!(beyond.count(), 0);
        assert_eq!(beyond.total_pages, 3);
    }

    #[test]
    fn test_empty_input() {
        let page = query(Vec::<User>::new(), &ListQuery::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
    }
}
