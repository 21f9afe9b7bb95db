use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "spot_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: uuid::Uuid,

    /// e.g. "PMR", "STANDARD"
    #[sea_orm(column_type = "Text", unique, indexed)]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::parking_spot_type::Entity")]
    ParkingSpotType,
}

impl Related<super::parking_spot_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpotType.def()
    }
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        super::parking_spot_type::Relation::ParkingSpot.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::parking_spot_type::Relation::SpotType.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
