use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "hotel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: uuid::Uuid,

    #[sea_orm(column_type = "Text", unique, indexed)]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::parking::Entity")]
    Parking,
}

impl Related<super::parking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
