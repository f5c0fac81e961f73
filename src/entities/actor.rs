use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Provider gender code (0 unknown, 1 female, 2 male, 3 non-binary).
    pub gender: i32,
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::casting::Entity")]
    Casting,
}

impl Related<super::casting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Casting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
