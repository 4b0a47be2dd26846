use super::ApiError;
use crate::constants::pagination::DEFAULT_PAGE;
use crate::domain::PageRequest;

/// Builds a page request from optional query values, defaulting page to the
/// first page and `per_page` to `default_per_page`.
pub fn validate_page(
    page: Option<u64>,
    per_page: Option<u64>,
    default_per_page: u64,
) -> Result<PageRequest, ApiError> {
    PageRequest::new(page.unwrap_or(DEFAULT_PAGE), per_page.unwrap_or(default_per_page))
        .map_err(|e| ApiError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page_defaults() {
        let page = validate_page(None, None, 20).unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), 20);
    }

    #[test]
    fn test_validate_page_bounds() {
        assert!(validate_page(Some(1), Some(100), 20).is_ok());
        assert!(validate_page(Some(0), None, 20).is_err());
        assert!(validate_page(None, Some(0), 20).is_err());
        assert!(validate_page(None, Some(101), 20).is_err());
    }
}
