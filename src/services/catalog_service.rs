//! Domain service for browsing the show catalog.
//!
//! Read-only: search with filters and pagination, detail lookup, and the facet
//! lists a client needs to build its filter controls.

use std::collections::BTreeSet;

use crate::domain::{PageRequest, ShowId};
use crate::models::show::{Page, ShowCriteria, ShowDetail, TagRef, YearRange};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Show not found: {0}")]
    NotFound(ShowId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for catalog queries.
///
/// # Examples
///
/// ```rust,ignore
/// use flixdex::domain::PageRequest;
/// use flixdex::models::show::ShowCriteria;
/// use flixdex::services::{CatalogError, CatalogService};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn CatalogService>) -> Result<(), CatalogError> {
///     let criteria = ShowCriteria {
///         search: Some("love".to_string()),
///         ..Default::default()
///     };
///     let page = service.search(&criteria, PageRequest::default()).await?;
///     println!("{} matches", page.total);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Runs a filtered search ordered by title then id.
    ///
    /// A page past the end yields no items but still reports the totals.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] on store failures.
    async fn search(
        &self,
        criteria: &ShowCriteria,
        page: PageRequest,
    ) -> Result<Page<ShowDetail>, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no show has this id
    /// - Returns [`CatalogError::Database`] on store failures
    async fn get_by_id(&self, id: ShowId) -> Result<ShowDetail, CatalogError>;

    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<TagRef>, CatalogError>;

    /// All ratings ordered by name.
    async fn list_ratings(&self) -> Result<Vec<TagRef>, CatalogError>;

    /// Distinct non-empty show types, sorted.
    async fn list_types(&self) -> Result<Vec<String>, CatalogError>;

    /// Individual countries, split out of the comma-separated country fields.
    async fn list_countries(&self) -> Result<Vec<String>, CatalogError>;

    async fn year_range(&self) -> Result<YearRange, CatalogError>;
}

/// Splits comma-separated country fields into a sorted, deduplicated list of
/// trimmed, non-empty country names.
pub fn split_countries<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut countries = BTreeSet::new();
    for field in fields {
        for part in field.as_ref().split(',') {
            let part = part.trim();
            if !part.is_empty() {
                countries.insert(part.to_string());
            }
        }
    }
    countries.into_iter().collect()
}
