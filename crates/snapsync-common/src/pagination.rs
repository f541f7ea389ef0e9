//! Page slicing for the list endpoints.
//!
//! Lists are unpaginated unless the client asks for a page; the dashboard tables
//! used to fetch everything and slice locally, and still can.

use serde::Deserialize;

use crate::config::LimitsConfig;

/// `?page=&per_page=` query parameters.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    pub size: u32,
}

impl PageQuery {
    /// Resolve against the configured limits. `None` means "return everything".
    pub fn resolve(&self, limits: &LimitsConfig) -> Option<Page> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        let size = self
            .per_page
            .unwrap_or(limits.default_page_size)
            .clamp(1, limits.max_page_size);
        Some(Page {
            number: self.page.unwrap_or(1).max(1),
            size,
        })
    }
}

impl Page {
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }
}
