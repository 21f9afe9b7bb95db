use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: uuid::Uuid,

    /// e.g. "personnel", "arrival_today"
    #[sea_orm(column_type = "Text", unique, indexed)]
    pub value: String,

    #[sea_orm(column_type = "Text")]
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::parking_spot_status::Entity")]
    ParkingSpotStatus,
}

impl Related<super::parking_spot_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpotStatus.def()
    }
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        super::parking_spot_status::Relation::ParkingSpot.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::parking_spot_status::Relation::Status.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
