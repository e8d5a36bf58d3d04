use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET, MAX_PAGE_LIMIT};

/// Requested window into a list: how many rows, starting where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSpec {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PaginationSpec {
    fn default() -> Self {
        Self { limit: DEFAULT_PAGE_LIMIT, offset: DEFAULT_PAGE_OFFSET }
    }
}

impl PaginationSpec {
    /// Parse raw `limit` / `offset` query values.
    ///
    /// Pagination is optional metadata: anything missing or unusable falls
    /// back to the default instead of failing the request. `limit` must be
    /// positive and is capped at [`MAX_PAGE_LIMIT`].
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|&l| l > 0)
            .map_or(DEFAULT_PAGE_LIMIT, |l| l.min(MAX_PAGE_LIMIT));
        let offset = offset
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_OFFSET);
        Self { limit, offset }
    }

    /// Attach the response-only figures to this window.
    pub fn details(self, count: u64, total: u64) -> PaginationDetails {
        PaginationDetails { limit: self.limit, offset: self.offset, count, total }
    }
}

/// Pagination block of a list response. `count` and `total` are never
/// accepted as request input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationDetails {
    pub limit: u32,
    pub offset: u32,
    pub count: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(
            PaginationSpec::from_query(None, None),
            PaginationSpec { limit: 50, offset: 0 }
        );
    }

    #[test]
    fn parses_valid_values() {
        assert_eq!(
            PaginationSpec::from_query(Some("20"), Some("100")),
            PaginationSpec { limit: 20, offset: 100 }
        );
    }

    #[test]
    fn garbage_falls_back_per_field() {
        assert_eq!(
            PaginationSpec::from_query(Some("abc"), Some("7")),
            PaginationSpec { limit: 50, offset: 7 }
        );
        assert_eq!(
            PaginationSpec::from_query(Some("10"), Some("-3")),
            PaginationSpec { limit: 10, offset: 0 }
        );
    }

    #[test]
    fn zero_limit_uses_default() {
        assert_eq!(PaginationSpec::from_query(Some("0"), None).limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(PaginationSpec::from_query(Some("999999"), None).limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn details_carry_window_and_counts() {
        let details = PaginationSpec { limit: 50, offset: 100 }.details(20, 120);
        assert_eq!(details, PaginationDetails { limit: 50, offset: 100, count: 20, total: 120 });
    }
}
