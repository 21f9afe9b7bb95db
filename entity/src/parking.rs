use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "parking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: uuid::Uuid,

    #[sea_orm(column_type = "Text", indexed)]
    pub name: String,

    #[sea_orm(column_type = "Uuid", indexed)]
    pub hotel_id: uuid::Uuid,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// e.g. "Sous-sol", "Extérieur"
    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,

    /// Number of spots currently attached to this parking. Maintained by the
    /// spot lifecycle, never written directly by clients.
    pub total_capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id",
        on_delete = "Cascade"
    )]
    Hotel,

    #[sea_orm(has_many = "super::parking_spot::Entity")]
    ParkingSpot,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
