use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// External identifier from the source dataset (e.g. "s42").
    #[sea_orm(unique)]
    pub show_id: String,

    /// Open-ended kind, e.g. "Movie" or "TV Show".
    #[sea_orm(column_name = "type", indexed)]
    pub show_type: String,

    #[sea_orm(indexed)]
    pub title: String,

    pub director: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub cast: Option<String>,

    pub country: Option<String>,

    pub date_added: Option<String>,

    #[sea_orm(indexed)]
    pub release_year: Option<i32>,

    pub rating_id: Option<i32>,

    pub duration: Option<String>,

    /// Raw comma-separated category names, kept verbatim.
    #[sea_orm(column_type = "Text", nullable)]
    pub listed_in: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ratings::Entity",
        from = "Column::RatingId",
        to = "super::ratings::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Ratings,
    #[sea_orm(has_many = "super::show_categories::Entity")]
    ShowCategories,
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::show_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCategories.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::show_categories::Relation::Categories.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::show_categories::Relation::Shows.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
