//! `SeaORM` implementation of the `CatalogService` trait.

use crate::db::Store;
use crate::domain::{PageRequest, ShowId};
use crate::models::show::{Page, ShowCriteria, ShowDetail, TagRef, YearRange};
use crate::services::catalog_service::{CatalogError, CatalogService, split_countries};
use crate::services::show_filter::ShowPredicate;
use async_trait::async_trait;
use tracing::instrument;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    #[instrument(skip(self, page), fields(page = page.page(), per_page = page.per_page()))]
    async fn search(
        &self,
        criteria: &ShowCriteria,
        page: PageRequest,
    ) -> Result<Page<ShowDetail>, CatalogError> {
        let predicates = ShowPredicate::from_criteria(criteria);

        metrics::counter!("catalog_searches_total").increment(1);
        if !predicates.is_empty() {
            metrics::counter!("catalog_filtered_searches_total").increment(1);
        }

        Ok(self.store.search_shows(&predicates, page).await?)
    }

    async fn get_by_id(&self, id: ShowId) -> Result<ShowDetail, CatalogError> {
        self.store
            .get_show(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list_categories(&self) -> Result<Vec<TagRef>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    async fn list_ratings(&self) -> Result<Vec<TagRef>, CatalogError> {
        Ok(self.store.list_ratings().await?)
    }

    async fn list_types(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.distinct_show_types().await?)
    }

    async fn list_countries(&self) -> Result<Vec<String>, CatalogError> {
        let fields = self.store.distinct_country_fields().await?;
        Ok(split_countries(fields))
    }

    async fn year_range(&self) -> Result<YearRange, CatalogError> {
        Ok(self.store.release_year_range().await?)
    }
}
