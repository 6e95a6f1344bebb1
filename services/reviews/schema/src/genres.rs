use sea_orm::entity::prelude::*;

/// Genre tag; linked to titles through `genre_titles`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::genre_titles::Entity")]
    GenreTitles,
}

impl Related<super::titles::Entity> for Entity {
    fn to() -> RelationDef {
        super::genre_titles::Relation::Title.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::genre_titles::Relation::Genre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
