//! Paging - page requests, sort orders and result pages

use serde::{Deserialize, Serialize};

/// Hard upper bound for a requested page size
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One `property,direction` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Desc,
        }
    }

    /// Parse `prop` or `prop,asc|desc`. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(2, ',');
        let property = parts.next()?.trim();
        if property.is_empty() {
            return None;
        }
        let direction = match parts.next().map(|d| d.trim().to_lowercase()) {
            Some(d) if d == "desc" => Direction::Desc,
            _ => Direction::Asc,
        };
        Some(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// Zero-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Vec<SortOrder>) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    /// Keep only sort orders whose property is present in `allowed`,
    /// renaming them to the mapped property.
    pub fn remap_sort(&self, allowed: &[(&str, &str)]) -> Vec<SortOrder> {
        self.sort
            .iter()
            .filter_map(|order| {
                allowed
                    .iter()
                    .find(|(ui, _)| *ui == order.property)
                    .map(|(_, mapped)| SortOrder {
                        property: mapped.to_string(),
                        direction: order.direction,
                    })
            })
            .collect()
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            number: request.page,
            size: request.size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size as u64) as u32
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            number: self.number,
            size: self.size,
        }
    }
}
