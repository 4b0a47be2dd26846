//! Predicate composition for catalog searches.
//!
//! [`ShowPredicate::from_criteria`] is a pure translation from optional
//! criteria to a flat list of predicates. Each predicate renders to a single
//! SQL expression over the `shows` table and the list is AND-combined by
//! [`condition`]. Relation filters (category, rating) are semi-joins, so a
//! show linked to several matching categories is still a single row.

use sea_orm::sea_query::{Expr, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

use crate::entities::{categories, ratings, show_categories, shows};
use crate::models::show::ShowCriteria;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowPredicate {
    /// Case-insensitive substring over title, director, cast or description.
    Search(String),
    /// Exact, case-sensitive match on the show type.
    Type(String),
    /// Linked to a category with exactly this name.
    Category(String),
    /// Linked rating has exactly this name.
    Rating(String),
    /// `release_year >= n`; null years never match.
    YearFrom(i32),
    /// `release_year <= n`; null years never match.
    YearTo(i32),
    /// Case-insensitive substring over the raw country field.
    Country(String),
}

impl ShowPredicate {
    /// Translates criteria into predicates. Blank strings are ignored.
    #[must_use]
    pub fn from_criteria(criteria: &ShowCriteria) -> Vec<Self> {
        let criteria = criteria.clone().normalized();
        let mut predicates = Vec::new();

        if let Some(search) = criteria.search {
            predicates.push(Self::Search(search));
        }
        if let Some(show_type) = criteria.show_type {
            predicates.push(Self::Type(show_type));
        }
        if let Some(category) = criteria.category {
            predicates.push(Self::Category(category));
        }
        if let Some(rating) = criteria.rating {
            predicates.push(Self::Rating(rating));
        }
        if let Some(year) = criteria.year_from {
            predicates.push(Self::YearFrom(year));
        }
        if let Some(year) = criteria.year_to {
            predicates.push(Self::YearTo(year));
        }
        if let Some(country) = criteria.country {
            predicates.push(Self::Country(country));
        }

        predicates
    }

    #[must_use]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::Search(needle) => Condition::any()
                .add(contains_ci(shows::Column::Title, needle))
                .add(contains_ci(shows::Column::Director, needle))
                .add(contains_ci(shows::Column::Cast, needle))
                .add(contains_ci(shows::Column::Description, needle)),
            Self::Type(show_type) => {
                Condition::all().add(shows::Column::ShowType.eq(show_type.as_str()))
            }
            Self::Category(name) => Condition::all().add(
                shows::Column::Id.in_subquery(
                    Query::select()
                        .column((show_categories::Entity, show_categories::Column::ShowId))
                        .from(show_categories::Entity)
                        .inner_join(
                            categories::Entity,
                            Expr::col((categories::Entity, categories::Column::Id)).equals((
                                show_categories::Entity,
                                show_categories::Column::CategoryId,
                            )),
                        )
                        .and_where(
                            Expr::col((categories::Entity, categories::Column::Name))
                                .eq(name.as_str()),
                        )
                        .to_owned(),
                ),
            ),
            Self::Rating(name) => Condition::all().add(
                shows::Column::RatingId.in_subquery(
                    Query::select()
                        .column((ratings::Entity, ratings::Column::Id))
                        .from(ratings::Entity)
                        .and_where(
                            Expr::col((ratings::Entity, ratings::Column::Name))
                                .eq(name.as_str()),
                        )
                        .to_owned(),
                ),
            ),
            Self::YearFrom(year) => Condition::all().add(shows::Column::ReleaseYear.gte(*year)),
            Self::YearTo(year) => Condition::all().add(shows::Column::ReleaseYear.lte(*year)),
            Self::Country(needle) => Condition::all().add(contains_ci(shows::Column::Country, needle)),
        }
    }
}

/// AND-combines predicates; an empty list matches every show.
#[must_use]
pub fn condition(predicates: &[ShowPredicate]) -> Condition {
    predicates
        .iter()
        .fold(Condition::all(), |cond, p| cond.add(p.to_condition()))
}

/// `LOWER(shows.col) LIKE LOWER('%needle%')` with the needle matched
/// literally. Both sides go through SQLite's `LOWER` so they fold the same way.
fn contains_ci(column: shows::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(needle));
    Expr::cust_with_exprs(
        format!("LOWER($1) LIKE LOWER($2) ESCAPE '{LIKE_ESCAPE}'"),
        [Expr::col((shows::Entity, column)).into(), Expr::val(pattern).into()],
    )
}

const LIKE_ESCAPE: char = '!';

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn sql_for(predicates: &[ShowPredicate]) -> String {
        shows::Entity::find()
            .filter(condition(predicates))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn empty_criteria_yields_no_predicates() {
        assert!(ShowPredicate::from_criteria(&ShowCriteria::default()).is_empty());
    }

    #[test]
    fn criteria_map_one_to_one() {
        let criteria = ShowCriteria {
            search: Some("love".to_string()),
            show_type: Some("Movie".to_string()),
            category: Some("Dramas".to_string()),
            rating: Some("PG-13".to_string()),
            year_from: Some(2015),
            year_to: Some(2016),
            country: Some("india".to_string()),
        };

        assert_eq!(
            ShowPredicate::from_criteria(&criteria),
            vec![
                ShowPredicate::Search("love".to_string()),
                ShowPredicate::Type("Movie".to_string()),
                ShowPredicate::Category("Dramas".to_string()),
                ShowPredicate::Rating("PG-13".to_string()),
                ShowPredicate::YearFrom(2015),
                ShowPredicate::YearTo(2016),
                ShowPredicate::Country("india".to_string()),
            ]
        );
    }

    #[test]
    fn blank_strings_do_not_filter() {
        let criteria = ShowCriteria {
            search: Some("  ".to_string()),
            country: Some(String::new()),
            ..Default::default()
        };
        assert!(ShowPredicate::from_criteria(&criteria).is_empty());
    }

    #[test]
    fn search_spans_four_columns_with_or() {
        let sql = sql_for(&[ShowPredicate::Search("Love".to_string())]);
        assert!(
            sql.contains(r#"LOWER("shows"."title") LIKE LOWER('%Love%') ESCAPE '!'"#),
            "{sql}"
        );
        assert!(sql.contains(r#"LOWER("shows"."director")"#), "{sql}");
        assert!(sql.contains(r#"LOWER("shows"."cast")"#), "{sql}");
        assert!(sql.contains(r#"LOWER("shows"."description")"#), "{sql}");
        assert_eq!(sql.matches(" OR ").count(), 3, "{sql}");
    }

    #[test]
    fn category_filter_is_a_semi_join() {
        let sql = sql_for(&[ShowPredicate::Category("Dramas".to_string())]);
        assert!(sql.contains(r#""shows"."id" IN (SELECT"#), "{sql}");
        assert!(sql.contains(r#""categories"."name" = 'Dramas'"#), "{sql}");
        assert!(!sql.contains(r#"FROM "shows" INNER JOIN"#), "{sql}");
    }

    #[test]
    fn rating_filter_uses_subquery() {
        let sql = sql_for(&[ShowPredicate::Rating("TV-MA".to_string())]);
        assert!(sql.contains(r#""shows"."rating_id" IN (SELECT"#), "{sql}");
        assert!(sql.contains(r#""ratings"."name" = 'TV-MA'"#), "{sql}");
    }

    #[test]
    fn predicates_are_and_combined() {
        let sql = sql_for(&[
            ShowPredicate::Type("Movie".to_string()),
            ShowPredicate::YearFrom(2015),
            ShowPredicate::YearTo(2015),
        ]);
        assert!(sql.contains(r#""shows"."type" = 'Movie'"#), "{sql}");
        assert!(sql.contains(r#""shows"."release_year" >= 2015"#), "{sql}");
        assert!(sql.contains(r#""shows"."release_year" <= 2015"#), "{sql}");
        assert_eq!(sql.matches(" AND ").count(), 2, "{sql}");
    }

    #[test]
    fn needle_is_not_folded_before_binding() {
        let sql = sql_for(&[ShowPredicate::Country("ÉIRE".to_string())]);
        assert!(
            sql.contains(r#"LOWER("shows"."country") LIKE LOWER('%ÉIRE%')"#),
            "{sql}"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%"), "100!%");
        assert_eq!(escape_like("a_b"), "a!_b");
        assert_eq!(escape_like("wow!"), "wow!!");
        assert_eq!(escape_like(r"c:\x"), r"c:\x");
        assert_eq!(escape_like("plain"), "plain");
    }
}
