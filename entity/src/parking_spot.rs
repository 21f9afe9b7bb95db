use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Ordered list of picture references, stored as a JSON array of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Pictures(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "parking_spot")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: uuid::Uuid,

    /// Unique within the owning parking only; see the composite index created
    /// by the migration.
    pub number: i32,

    #[sea_orm(column_type = "Uuid", indexed)]
    pub parking_id: uuid::Uuid,

    // dimensions
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub surface: f64,

    // location
    pub floor: i32,
    #[sea_orm(column_type = "Text")]
    pub section: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,

    // equipment
    pub electric_charging: bool,
    pub camera: bool,
    pub sensor: bool,

    // pricing
    pub hourly_rate: f64,
    pub daily_rate: f64,
    pub monthly_rate: f64,

    #[sea_orm(column_type = "Json")]
    pub pictures: Pictures,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parking::Entity",
        from = "Column::ParkingId",
        to = "super::parking::Column::Id",
        on_delete = "Cascade"
    )]
    Parking,

    #[sea_orm(has_many = "super::parking_spot_status::Entity")]
    ParkingSpotStatus,

    #[sea_orm(has_many = "super::parking_spot_type::Entity")]
    ParkingSpotType,
}

impl Related<super::parking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parking.def()
    }
}

impl Related<super::parking_spot_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpotStatus.def()
    }
}

impl Related<super::parking_spot_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpotType.def()
    }
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        super::parking_spot_status::Relation::Status.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::parking_spot_status::Relation::ParkingSpot.def().rev())
    }
}

impl Related<super::spot_type::Entity> for Entity {
    fn to() -> RelationDef {
        super::parking_spot_type::Relation::SpotType.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::parking_spot_type::Relation::ParkingSpot.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
