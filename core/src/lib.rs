//! Inventory services for hotels, their parkings and parking spots.
//!
//! Each service wraps a cloned [`DatabaseConnection`]; [`Inventory`] bundles
//! them over a single pool.

use sea_orm::DatabaseConnection;

pub mod config;
pub mod db;
pub mod error;
pub mod hotel;
pub mod pagination;
pub mod parking;
mod patch;
pub mod spot;
pub mod vocabulary;

#[cfg(test)]
mod test_support;

pub use error::{Result, ServiceError};

use config::Settings;
use hotel::HotelService;
use parking::ParkingService;
use spot::SpotService;
use vocabulary::{SpotTypeService, StatusService};

#[derive(Debug, Clone)]
pub struct Inventory {
    pub hotels: HotelService,
    pub parkings: ParkingService,
    pub spots: SpotService,
    pub statuses: StatusService,
    pub spot_types: SpotTypeService,
    connection: DatabaseConnection,
}

impl Inventory {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self {
            hotels: HotelService::new(connection.clone()),
            parkings: ParkingService::new(connection.clone()),
            spots: SpotService::new(connection.clone()),
            statuses: StatusService::new(connection.clone()),
            spot_types: SpotTypeService::new(connection.clone()),
            connection,
        }
    }

    /// Connects with `settings`, applies pending migrations and builds the
    /// services on top of the resulting pool.
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let connection = db::connect(&settings.database).await?;
        Ok(Self::new(connection))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
