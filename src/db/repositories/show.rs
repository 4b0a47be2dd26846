use std::collections::HashMap;

use crate::domain::{PageRequest, ShowId};
use crate::entities::{categories, prelude::*, ratings, show_categories, shows};
use crate::models::show::{Page, ShowDetail, TagRef, YearRange};
use crate::services::show_filter::{self, ShowPredicate};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::constants::ingest::INSERT_CHUNK_SIZE;

/// One show row as parsed by the ingestion job, before ids are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowRecord {
    pub show_id: String,
    pub show_type: String,
    pub title: String,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
    /// Deduplicated category names parsed from `listed_in`.
    pub categories: Vec<String>,
}

/// Everything the ingestion job writes in one transaction.
///
/// `ratings` and `categories` are the deduplicated dictionaries; every name a
/// record references must be present in them.
#[derive(Debug, Clone, Default)]
pub struct CatalogImport {
    pub ratings: Vec<String>,
    pub categories: Vec<String>,
    pub shows: Vec<ShowRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub shows: usize,
    pub categories: usize,
    pub ratings: usize,
}

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Count, page fetch and relation loads share one transaction so the page
    /// and its totals come from the same snapshot.
    pub async fn search(
        &self,
        predicates: &[ShowPredicate],
        page: PageRequest,
    ) -> Result<Page<ShowDetail>> {
        let txn = self.conn.begin().await?;

        let query = Shows::find().filter(show_filter::condition(predicates));

        let total = query
            .clone()
            .count(&txn)
            .await
            .context("Failed to count matching shows")?;

        let items = if page.items_on_page(total) == 0 {
            Vec::new()
        } else {
            let rows = query
                .order_by_asc(shows::Column::Title)
                .order_by_asc(shows::Column::Id)
                .offset(page.offset())
                .limit(page.per_page())
                .all(&txn)
                .await
                .context("Failed to fetch page of shows")?;

            load_details(&txn, rows).await?
        };

        txn.commit().await?;

        debug!(
            total,
            page = page.page(),
            returned = items.len(),
            "Show search executed"
        );

        Ok(Page {
            items,
            total,
            page: page.page(),
            per_page: page.per_page(),
            pages: page.page_count(total),
        })
    }

    pub async fn get(&self, id: ShowId) -> Result<Option<ShowDetail>> {
        let txn = self.conn.begin().await?;

        let Some(show) = Shows::find_by_id(id.value())
            .one(&txn)
            .await
            .context("Failed to query show by ID")?
        else {
            return Ok(None);
        };

        let mut details = load_details(&txn, vec![show]).await?;
        txn.commit().await?;

        Ok(details.pop())
    }

    pub async fn list_categories(&self) -> Result<Vec<TagRef>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(TagRef::from).collect())
    }

    pub async fn list_ratings(&self) -> Result<Vec<TagRef>> {
        let rows = Ratings::find()
            .order_by_asc(ratings::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(TagRef::from).collect())
    }

    /// Distinct non-empty show types, sorted.
    pub async fn distinct_types(&self) -> Result<Vec<String>> {
        let types: Vec<String> = Shows::find()
            .select_only()
            .column(shows::Column::ShowType)
            .distinct()
            .order_by_asc(shows::Column::ShowType)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(types.into_iter().filter(|t| !t.is_empty()).collect())
    }

    /// Distinct raw country fields; each may hold a comma-separated list.
    pub async fn distinct_country_fields(&self) -> Result<Vec<String>> {
        let fields: Vec<String> = Shows::find()
            .select_only()
            .column(shows::Column::Country)
            .filter(shows::Column::Country.is_not_null())
            .distinct()
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(fields)
    }

    pub async fn year_range(&self) -> Result<YearRange> {
        let row: Option<(Option<i32>, Option<i32>)> = Shows::find()
            .select_only()
            .column_as(shows::Column::ReleaseYear.min(), "min_year")
            .column_as(shows::Column::ReleaseYear.max(), "max_year")
            .into_tuple()
            .one(&self.conn)
            .await?;

        Ok(row.map_or_else(YearRange::default, |(min, max)| YearRange { min, max }))
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Shows::find().count(&self.conn).await?)
    }

    /// Writes dictionaries, shows and links atomically; any failure rolls back
    /// the whole import.
    pub async fn import(&self, import: &CatalogImport) -> Result<ImportSummary> {
        let txn = self.conn.begin().await?;

        let mut rating_ids = HashMap::with_capacity(import.ratings.len());
        for name in &import.ratings {
            let inserted = Ratings::insert(ratings::ActiveModel {
                name: Set(name.clone()),
                ..Default::default()
            })
            .exec(&txn)
            .await
            .with_context(|| format!("Failed to insert rating '{name}'"))?;
            rating_ids.insert(name.as_str(), inserted.last_insert_id);
        }

        let mut category_ids = HashMap::with_capacity(import.categories.len());
        for name in &import.categories {
            let inserted = Categories::insert(categories::ActiveModel {
                name: Set(name.clone()),
                ..Default::default()
            })
            .exec(&txn)
            .await
            .with_context(|| format!("Failed to insert category '{name}'"))?;
            category_ids.insert(name.as_str(), inserted.last_insert_id);
        }

        let mut links = Vec::new();
        for (idx, record) in import.shows.iter().enumerate() {
            let rating_id = match &record.rating {
                Some(name) => Some(
                    *rating_ids
                        .get(name.as_str())
                        .with_context(|| format!("Rating '{name}' missing from dictionary"))?,
                ),
                None => None,
            };

            let inserted = Shows::insert(shows::ActiveModel {
                show_id: Set(record.show_id.clone()),
                show_type: Set(record.show_type.clone()),
                title: Set(record.title.clone()),
                director: Set(record.director.clone()),
                cast: Set(record.cast.clone()),
                country: Set(record.country.clone()),
                date_added: Set(record.date_added.clone()),
                release_year: Set(record.release_year),
                rating_id: Set(rating_id),
                duration: Set(record.duration.clone()),
                listed_in: Set(record.listed_in.clone()),
                description: Set(record.description.clone()),
                ..Default::default()
            })
            .exec(&txn)
            .await
            .with_context(|| format!("Failed to insert show '{}'", record.show_id))?;

            for name in &record.categories {
                let category_id = *category_ids
                    .get(name.as_str())
                    .with_context(|| format!("Category '{name}' missing from dictionary"))?;
                links.push(show_categories::ActiveModel {
                    show_id: Set(inserted.last_insert_id),
                    category_id: Set(category_id),
                });
            }

            if (idx + 1) % 1000 == 0 {
                info!("Processed {} records...", idx + 1);
            }
        }

        for chunk in links.chunks(INSERT_CHUNK_SIZE) {
            ShowCategories::insert_many(chunk.to_vec())
                .exec_without_returning(&txn)
                .await
                .context("Failed to link shows to categories")?;
        }

        txn.commit().await?;

        Ok(ImportSummary {
            shows: import.shows.len(),
            categories: import.categories.len(),
            ratings: import.ratings.len(),
        })
    }
}

/// Attaches rating and categories to each show, preserving row order.
async fn load_details<C>(conn: &C, rows: Vec<shows::Model>) -> Result<Vec<ShowDetail>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let show_ratings = rows
        .load_one(Ratings, conn)
        .await
        .context("Failed to load show ratings")?;
    let show_categories = rows
        .load_many_to_many(Categories, ShowCategories, conn)
        .await
        .context("Failed to load show categories")?;

    Ok(rows
        .into_iter()
        .zip(show_ratings)
        .zip(show_categories)
        .map(|((show, rating), mut cats)| {
            cats.sort_by(|a, b| a.name.cmp(&b.name));
            ShowDetail::from_parts(show, rating, cats)
        })
        .collect())
}
