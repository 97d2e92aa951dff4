//! In-memory search, sort and pagination for post-backed datasets
//!
//! Post datasets are small (hundreds to a few thousand rows) and their
//! fields live in serialized meta, so they are filtered after loading.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::domain::value_objects::{Direction, Page, PageRequest, SortOrder};

/// Comparable value extracted from a record for one sort property
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(Option<String>),
    Number(Option<f64>),
    Date(Option<NaiveDateTime>),
    Bool(bool),
}

impl SortKey {
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            SortKey::Text(None)
        } else {
            SortKey::Text(Some(trimmed.to_lowercase()))
        }
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        Self::text(value.unwrap_or_default())
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => match (a, b) {
                (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// A record that can be listed through [`paginate`]
pub trait Listable {
    fn record_id(&self) -> u64;

    /// Text fields searched by `q` (compared case-insensitively)
    fn search_fields(&self) -> Vec<String>;

    /// Sort value for a property, `None` when the property is unknown
    fn sort_key(&self, property: &str) -> Option<SortKey>;
}

/// Case-insensitive contains over the search fields; an all-digit needle
/// also matches the record id exactly.
pub fn matches<T: Listable>(item: &T, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if needle.chars().all(|c| c.is_ascii_digit()) && item.record_id().to_string() == needle {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Sort items by each order in turn; unknown properties are ignored
pub fn sort_items<T: Listable>(items: &mut [T], orders: &[SortOrder]) {
    if orders.is_empty() {
        return;
    }
    items.sort_by(|a, b| {
        for order in orders {
            let (Some(ka), Some(kb)) = (a.sort_key(&order.property), b.sort_key(&order.property))
            else {
                continue;
            };
            let ord = match order.direction {
                Direction::Asc => ka.compare(&kb),
                Direction::Desc => kb.compare(&ka),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Filter, sort and slice one page.
///
/// `allowed` maps UI sort keys to record sort properties; when the request
/// carries no usable sort, `default_sort` applies.
pub fn paginate<T: Listable>(
    items: Vec<T>,
    q: Option<&str>,
    request: &PageRequest,
    allowed: &[(&str, &str)],
    default_sort: SortOrder,
) -> Page<T> {
    let mut filtered: Vec<T> = match q.map(str::trim).filter(|q| !q.is_empty()) {
        Some(needle) => items.into_iter().filter(|i| matches(i, needle)).collect(),
        None => items,
    };

    let mut orders = request.remap_sort(allowed);
    if orders.is_empty() {
        orders.push(default_sort);
    }
    sort_items(&mut filtered, &orders);

    let total = filtered.len() as u64;
    let content = filtered
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.size as usize)
        .collect();

    Page::new(content, total, request)
}
