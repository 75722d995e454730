//! Page/limit normalization for list endpoints.
//!
//! Out-of-range values are clamped, never rejected. A value is read as its
//! leading integer (`"1.5"` is 1, `"10abc"` is 10); values that are missing
//! or start with no digits at all fall back to the defaults.

use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

/// A normalized page request: `page >= 1` and `1 <= limit <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Normalize raw query values with the default bounds (limit 10, max 50).
    pub fn normalize(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::normalize_with(page, limit, DEFAULT_LIMIT, MAX_LIMIT)
    }

    pub fn normalize_with(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> Self {
        let max_limit = max_limit.max(1);
        let page = parse(page).unwrap_or(DEFAULT_PAGE as i64).max(1);
        let limit = parse(limit)
            .unwrap_or(default_limit as i64)
            .clamp(1, max_limit as i64);

        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            // clamped to max_limit above
            limit: limit as u32,
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// `ceil(total / limit)`; zero when there is nothing to page through.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A slice of a larger result set together with the size of the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages(self.total)
    }
}

/// Leading optionally-signed integer of `raw`, saturating on overflow.
fn parse(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(
            Pagination::normalize(None, None),
            Pagination { page: 1, limit: 10 }
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(
            Pagination::normalize(Some("-5"), Some("999")),
            Pagination { page: 1, limit: 50 }
        );
        assert_eq!(
            Pagination::normalize(Some("0"), Some("0")),
            Pagination { page: 1, limit: 1 }
        );
    }

    #[test]
    fn non_numeric_values_use_defaults() {
        assert_eq!(
            Pagination::normalize(Some("abc"), Some("ten")),
            Pagination { page: 1, limit: 10 }
        );
        assert_eq!(
            Pagination::normalize(Some(""), Some("-")),
            Pagination { page: 1, limit: 10 }
        );
    }

    #[test]
    fn numeric_prefix_is_used() {
        assert_eq!(
            Pagination::normalize(Some("2"), Some("1.5")),
            Pagination { page: 2, limit: 1 }
        );
        assert_eq!(
            Pagination::normalize(Some("3rd"), Some("10abc")),
            Pagination { page: 3, limit: 10 }
        );
        assert_eq!(
            Pagination::normalize(Some("+4"), Some("-2.5")),
            Pagination { page: 4, limit: 1 }
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            Pagination::normalize(Some(" 3 "), Some(" 20")),
            Pagination { page: 3, limit: 20 }
        );
    }

    #[test]
    fn custom_bounds() {
        assert_eq!(
            Pagination::normalize_with(None, Some("150"), 25, 100),
            Pagination { page: 1, limit: 100 }
        );
        assert_eq!(
            Pagination::normalize_with(None, None, 25, 100),
            Pagination { page: 1, limit: 25 }
        );
    }

    #[test]
    fn huge_page_saturates() {
        let p = Pagination::normalize(Some("99999999999"), None);
        assert_eq!(p.page, u32::MAX);
    }

    #[test]
    fn offset_and_total_pages() {
        let p = Pagination { page: 3, limit: 10 };
        assert_eq!(p.offset(), 20);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(21), 3);
    }
}
