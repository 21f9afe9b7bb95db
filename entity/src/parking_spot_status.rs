use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "parking_spot_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub spot_id: uuid::Uuid,

    #[sea_orm(primary_key, auto_increment = false)]
    pub status_id: uuid::Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parking_spot::Entity",
        from = "Column::SpotId",
        to = "super::parking_spot::Column::Id",
        on_delete = "Cascade"
    )]
    ParkingSpot,
    #[sea_orm(
        belongs_to = "super::status::Entity",
        from = "Column::StatusId",
        to = "super::status::Column::Id",
        on_delete = "Cascade"
    )]
    Status,
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpot.def()
    }
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
