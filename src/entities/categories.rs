use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show_categories::Entity")]
    ShowCategories,
}

impl Related<super::show_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowCategories.def()
    }
}

impl Related<super::shows::Entity> for Entity {
    fn to() -> RelationDef {
        super::show_categories::Relation::Shows.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::show_categories::Relation::Categories.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
