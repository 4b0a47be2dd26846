//! One-shot CSV loader for the catalog.
//!
//! [`parse_catalog`] is pure: it turns dataset rows into a [`CatalogImport`]
//! with deduplicated rating and category dictionaries. [`run_load`] wires it
//! to the store and skips the load when the catalog already has shows.

use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::ingest::UNKNOWN_SHOW_TYPE;
use crate::db::{CatalogImport, ImportSummary, ShowRecord, Store};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for IngestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// What a `load` run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The catalog already had this many shows; nothing was written.
    Skipped { existing: u64 },
    Loaded(ImportSummary),
}

/// Column positions resolved from the header row.
struct Columns {
    show_id: usize,
    show_type: Option<usize>,
    title: usize,
    director: Option<usize>,
    cast: Option<usize>,
    country: Option<usize>,
    date_added: Option<usize>,
    release_year: Option<usize>,
    rating: Option<usize>,
    duration: Option<usize>,
    listed_in: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        Ok(Self {
            show_id: find("show_id").ok_or(IngestError::MissingColumn("show_id"))?,
            show_type: find("type"),
            title: find("title").ok_or(IngestError::MissingColumn("title"))?,
            director: find("director"),
            cast: find("cast"),
            country: find("country"),
            date_added: find("date_added"),
            release_year: find("release_year"),
            rating: find("rating"),
            duration: find("duration"),
            listed_in: find("listed_in"),
            description: find("description"),
        })
    }
}

/// Trimmed cell value; empty and missing cells are `None`.
fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Accepts `2019` as well as the float form `2019.0` some exports produce.
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse()
        .ok()
        .or_else(|| raw.strip_suffix(".0").and_then(|int| int.parse().ok()))
}

/// Category names from a `listed_in` field, trimmed and deduplicated in order.
fn split_categories(listed_in: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    listed_in
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(ToString::to_string)
        .collect()
}

/// Parses the dataset into an import batch.
///
/// Rows without `show_id` or `title`, malformed rows and repeated `show_id`s
/// are skipped with a warning. The first occurrence of a `show_id` wins.
pub fn parse_catalog<R: Read>(reader: R) -> Result<CatalogImport, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut shows = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut ratings = BTreeSet::new();
    let mut categories = BTreeSet::new();

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed CSV row {}: {e}", idx + 1);
                continue;
            }
        };

        let (Some(show_id), Some(title)) = (
            cell(&record, Some(columns.show_id)),
            cell(&record, Some(columns.title)),
        ) else {
            continue;
        };

        if !seen_ids.insert(show_id.clone()) {
            warn!("Skipping duplicate show_id '{show_id}' on row {}", idx + 1);
            continue;
        }

        let rating = cell(&record, columns.rating);
        if let Some(name) = &rating {
            ratings.insert(name.clone());
        }

        let listed_in = cell(&record, columns.listed_in);
        let show_categories = listed_in.as_deref().map(split_categories).unwrap_or_default();
        categories.extend(show_categories.iter().cloned());

        shows.push(ShowRecord {
            show_id,
            show_type: cell(&record, columns.show_type)
                .unwrap_or_else(|| UNKNOWN_SHOW_TYPE.to_string()),
            title,
            director: cell(&record, columns.director),
            cast: cell(&record, columns.cast),
            country: cell(&record, columns.country),
            date_added: cell(&record, columns.date_added),
            release_year: cell(&record, columns.release_year).and_then(|y| parse_year(&y)),
            rating,
            duration: cell(&record, columns.duration),
            listed_in,
            description: cell(&record, columns.description),
            categories: show_categories,
        });
    }

    Ok(CatalogImport {
        ratings: ratings.into_iter().collect(),
        categories: categories.into_iter().collect(),
        shows,
    })
}

/// Loads `path` into an empty catalog; a populated catalog is left untouched.
pub async fn load_into(store: &Store, path: &Path) -> Result<LoadOutcome, IngestError> {
    let existing = store.show_count().await?;
    if existing > 0 {
        info!("Database already contains {existing} shows. Skipping data load.");
        return Ok(LoadOutcome::Skipped { existing });
    }

    info!("Reading CSV file: {}", path.display());
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    // csv parsing is synchronous; keep it off the async workers.
    let import = tokio::task::spawn_blocking(move || parse_catalog(file))
        .await
        .map_err(|e| IngestError::Database(format!("CSV parsing task failed: {e}")))??;

    info!("Found {} records in CSV", import.shows.len());

    let summary = store.import_catalog(&import).await?;

    info!("Successfully loaded {} shows!", summary.shows);
    info!("Created {} categories", summary.categories);
    info!("Created {} ratings", summary.ratings);

    Ok(LoadOutcome::Loaded(summary))
}

/// Entry point of `flixdex load`: waits for the database, migrates, loads.
pub async fn run_load(config: &Config, path: &Path) -> Result<LoadOutcome, IngestError> {
    let store = Store::connect_with_retry(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
        config.ingest.connect_attempts,
        Duration::from_secs(config.ingest.connect_delay_secs),
    )
    .await?;

    load_into(&store, path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description\n";

    fn parse(body: &str) -> CatalogImport {
        parse_catalog(format!("{HEADER}{body}").as_bytes()).unwrap()
    }

    #[test]
    fn parses_a_full_row() {
        let import = parse(
            "s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,A film.\n",
        );

        assert_eq!(import.shows.len(), 1);
        let show = &import.shows[0];
        assert_eq!(show.show_id, "s1");
        assert_eq!(show.show_type, "Movie");
        assert_eq!(show.cast, None);
        assert_eq!(show.date_added.as_deref(), Some("September 25, 2021"));
        assert_eq!(show.release_year, Some(2020));
        assert_eq!(show.rating.as_deref(), Some("PG-13"));
        assert_eq!(show.categories, vec!["Documentaries"]);
        assert_eq!(import.ratings, vec!["PG-13"]);
        assert_eq!(import.categories, vec!["Documentaries"]);
    }

    #[test]
    fn dictionaries_are_deduplicated_and_trimmed() {
        let import = parse(concat!(
            "s1,TV Show,A,,,,,2021, TV-MA ,2 Seasons,\"International TV Shows, TV Dramas, TV Dramas\",\n",
            "s2,Movie,B,,,,,2019,TV-MA,90 min,\"Dramas,International Movies\",\n",
            "s3,Movie,C,,,,,2019,,90 min,,\n",
        ));

        assert_eq!(import.ratings, vec!["TV-MA"]);
        assert_eq!(
            import.categories,
            vec![
                "Dramas",
                "International Movies",
                "International TV Shows",
                "TV Dramas"
            ]
        );
        assert_eq!(
            import.shows[0].categories,
            vec!["International TV Shows", "TV Dramas"]
        );
        assert_eq!(import.shows[2].rating, None);
        assert!(import.shows[2].categories.is_empty());
    }

    #[test]
    fn rows_without_id_or_title_are_skipped() {
        let import = parse(concat!(
            ",Movie,No Id,,,,,,,,,\n",
            "s2,Movie,,,,,,,,,,\n",
            "s3,Movie,Kept,,,,,,,,,\n",
        ));
        assert_eq!(import.shows.len(), 1);
        assert_eq!(import.shows[0].show_id, "s3");
    }

    #[test]
    fn first_duplicate_show_id_wins() {
        let import = parse(concat!(
            "s1,Movie,First,,,,,,,,,\n",
            "s1,Movie,Second,,,,,,,,,\n",
        ));
        assert_eq!(import.shows.len(), 1);
        assert_eq!(import.shows[0].title, "First");
    }

    #[test]
    fn missing_type_becomes_unknown() {
        let import = parse("s1,,Untyped,,,,,,,,,\n");
        assert_eq!(import.shows[0].show_type, UNKNOWN_SHOW_TYPE);
    }

    #[test]
    fn release_year_forms() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year("2019.0"), Some(2019));
        assert_eq!(parse_year(" 1999 "), Some(1999));
        assert_eq!(parse_year("2019.5"), None);
        assert_eq!(parse_year("soon"), None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let import = parse("s1,Movie,Short Row\n");
        assert_eq!(import.shows.len(), 1);
        assert_eq!(import.shows[0].description, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let result = parse_catalog("id,name\n1,x\n".as_bytes());
        assert!(matches!(result, Err(IngestError::MissingColumn("show_id"))));
    }
}
