use serde::{Deserialize, Serialize};

use crate::domain::ShowId;
use crate::entities::{categories, ratings, shows};

/// Optional filter criteria for a catalog search.
///
/// Every field is independent; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShowCriteria {
    pub search: Option<String>,
    pub show_type: Option<String>,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub country: Option<String>,
}

impl ShowCriteria {
    /// Drops blank string filters; a blank value never constrains a search.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            search: non_blank(self.search),
            show_type: non_blank(self.show_type),
            category: non_blank(self.category),
            rating: non_blank(self.rating),
            year_from: self.year_from,
            year_to: self.year_to,
            country: non_blank(self.country),
        }
    }
}

/// An `{id, name}` pair for categories and ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRef {
    pub id: i32,
    pub name: String,
}

impl From<categories::Model> for TagRef {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<ratings::Model> for TagRef {
    fn from(model: ratings::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Full projection of a show as returned by search and detail lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowDetail {
    pub id: ShowId,
    pub show_id: String,
    #[serde(rename = "type")]
    pub show_type: String,
    pub title: String,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<i32>,
    /// Resolved rating name; `None` iff the show has no rating.
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<TagRef>,
}

impl ShowDetail {
    #[must_use]
    pub fn from_parts(
        show: shows::Model,
        rating: Option<ratings::Model>,
        categories: Vec<categories::Model>,
    ) -> Self {
        Self {
            id: ShowId::new(show.id),
            show_id: show.show_id,
            show_type: show.show_type,
            title: show.title,
            director: show.director,
            cast: show.cast,
            country: show.country,
            date_added: show.date_added,
            release_year: show.release_year,
            rating: rating.map(|r| r.name),
            duration: show.duration,
            listed_in: show.listed_in,
            description: show.description,
            categories: categories.into_iter().map(TagRef::from).collect(),
        }
    }
}

/// One page of results plus the totals needed to page through the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
}

/// Min/max release year across the catalog; both `None` when no show has a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}
