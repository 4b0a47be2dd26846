//! Domain primitives for the catalog with strong typing.
//!
//! Newtypes here keep show identifiers and pagination bounds from being mixed
//! up with arbitrary integers flowing through the API layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::pagination::{DEFAULT_PER_PAGE, MAX_OFFSET, MAX_PER_PAGE};

/// Internal (database generated) identifier of a show.
///
/// Not to be confused with the dataset's external `show_id` string.
///
/// # Examples
///
/// ```rust
/// use flixdex::domain::ShowId;
///
/// let id = ShowId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ShowId(i32);

impl ShowId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ShowId> for i32 {
    fn from(id: ShowId) -> Self {
        id.0
    }
}

impl From<i32> for ShowId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for ShowId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for ShowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Rejected pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    #[error("page must be >= 1 (got {0})")]
    PageOutOfRange(u64),

    #[error("per_page must be between 1 and {max} (got {0})", max = MAX_PER_PAGE)]
    PerPageOutOfRange(u64),
}

/// A validated `(page, per_page)` pair.
///
/// `page` is 1-based and `per_page` lies in `1..=MAX_PER_PAGE`; the only way
/// to build one is through [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub const fn new(page: u64, per_page: u64) -> Result<Self, PageRequestError> {
        if page < 1 {
            return Err(PageRequestError::PageOutOfRange(page));
        }
        if per_page < 1 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange(per_page));
        }
        Ok(Self { page, per_page })
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of rows to skip before this page, capped at [`MAX_OFFSET`].
    #[must_use]
    pub const fn offset(&self) -> u64 {
        let offset = (self.page - 1).saturating_mul(self.per_page);
        if offset > MAX_OFFSET { MAX_OFFSET } else { offset }
    }

    /// `ceil(total / per_page)`; zero when there is nothing to page through.
    #[must_use]
    pub const fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page)
    }

    /// How many items this page holds out of `total` matches.
    #[must_use]
    pub const fn items_on_page(&self, total: u64) -> u64 {
        let remaining = total.saturating_sub(self.offset());
        if remaining < self.per_page {
            remaining
        } else {
            self.per_page
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_id_conversions() {
        let id = ShowId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(ShowId::from(42), id);
    }

    #[test]
    fn show_id_serialization() {
        let id = ShowId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: ShowId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn page_request_bounds() {
        assert!(PageRequest::new(1, 1).is_ok());
        assert!(PageRequest::new(1, MAX_PER_PAGE).is_ok());
        assert_eq!(
            PageRequest::new(0, 20),
            Err(PageRequestError::PageOutOfRange(0))
        );
        assert_eq!(
            PageRequest::new(1, 0),
            Err(PageRequestError::PerPageOutOfRange(0))
        );
        assert_eq!(
            PageRequest::new(1, MAX_PER_PAGE + 1),
            Err(PageRequestError::PerPageOutOfRange(MAX_PER_PAGE + 1))
        );
    }

    #[test]
    fn page_request_default() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_count_is_ceiling() {
        let req = PageRequest::new(1, 20).unwrap();
        assert_eq!(req.page_count(0), 0);
        assert_eq!(req.page_count(1), 1);
        assert_eq!(req.page_count(20), 1);
        assert_eq!(req.page_count(21), 2);
        assert_eq!(req.page_count(100), 5);
    }

    #[test]
    fn items_on_page_matches_formula() {
        for total in [0_u64, 1, 19, 20, 21, 45, 100] {
            for page in 1..=7 {
                for per_page in [1_u64, 7, 20, 100] {
                    let req = PageRequest::new(page, per_page).unwrap();
                    let expected = per_page.min(total.saturating_sub((page - 1) * per_page));
                    assert_eq!(req.items_on_page(total), expected, "{total} {page} {per_page}");
                }
            }
        }
    }

    #[test]
    fn offset_past_the_end_yields_empty_page() {
        let req = PageRequest::new(10, 20).unwrap();
        assert_eq!(req.offset(), 180);
        assert_eq!(req.items_on_page(45), 0);
        assert_eq!(req.page_count(45), 3);
    }

    #[test]
    fn offset_stays_within_sql_range() {
        let req = PageRequest::new(u64::MAX, MAX_PER_PAGE).unwrap();
        assert_eq!(req.offset(), MAX_OFFSET);
        assert_eq!(req.items_on_page(1_000), 0);

        let req = PageRequest::new(u64::MAX / 2, 20).unwrap();
        assert_eq!(req.offset(), MAX_OFFSET);

        let req = PageRequest::new(i64::MAX.unsigned_abs(), 1).unwrap();
        assert_eq!(req.offset(), MAX_OFFSET - 1);
    }
}
