use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "parking_spot_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub spot_id: uuid::Uuid,

    #[sea_orm(primary_key, auto_increment = false)]
    pub spot_type_id: uuid::Uuid,
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
        belongs_to = "super::spot_type::Entity",
        from = "Column::SpotTypeId",
        to = "super::spot_type::Column::Id",
        on_delete = "Cascade"
    )]
    SpotType,
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpot.def()
    }
}

impl Related<super::spot_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpotType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
