//! Fixtures shared by the service tests.

use sea_orm::DatabaseConnection;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use entity::parking_spot::{self, Pictures};
use entity::{hotel, parking};

use crate::config::DatabaseSettings;
use crate::hotel::NewHotel;
use crate::parking::NewParking;
use crate::spot::NewSpot;
use crate::vocabulary::NewStatus;
use crate::{db, Inventory};

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .finish();
    // every test after the first finds a subscriber already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Fresh, migrated in-memory database.
pub(crate) async fn database() -> DatabaseConnection {
    init_tracing();
    db::connect(&DatabaseSettings::in_memory()).await.unwrap()
}

pub(crate) async fn inventory() -> Inventory {
    Inventory::new(database().await)
}

pub(crate) async fn hotel(inventory: &Inventory, name: &str) -> hotel::Model {
    inventory
        .hotels
        .create(NewHotel {
            name: name.to_string(),
            address: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn parking(inventory: &Inventory, hotel_id: Uuid, name: &str) -> parking::Model {
    inventory
        .parkings
        .create(
            hotel_id,
            NewParking {
                name: name.to_string(),
                description: None,
                location: Some("Sous-sol".to_string()),
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn hotel_with_parking() -> (Inventory, hotel::Model, parking::Model) {
    let inventory = inventory().await;
    let hotel = hotel(&inventory, "Hôtel Example").await;
    let parking = parking(&inventory, hotel.id, "Parking Principal").await;
    (inventory, hotel, parking)
}

pub(crate) fn new_spot(number: i32, types: &[&str]) -> NewSpot {
    NewSpot {
        number,
        length: 5.0,
        width: 2.5,
        height: 2.1,
        surface: 12.5,
        floor: -1,
        section: "A".to_string(),
        address: String::new(),
        electric_charging: false,
        camera: false,
        sensor: false,
        hourly_rate: 3.0,
        daily_rate: 20.0,
        monthly_rate: 250.0,
        pictures: Vec::new(),
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

pub(crate) fn status(value: &str, color: &str) -> NewStatus {
    NewStatus {
        value: value.to_string(),
        color: color.to_string(),
    }
}

/// Detached spot row, for tests that never touch the database.
pub(crate) fn spot_model(parking_id: Uuid, number: i32) -> parking_spot::Model {
    parking_spot::Model {
        id: Uuid::now_v7(),
        number,
        parking_id,
        length: 5.0,
        width: 2.5,
        height: 2.1,
        surface: 12.5,
        floor: 0,
        section: "B".to_string(),
        address: "Entrée rue Lafayette".to_string(),
        electric_charging: true,
        camera: false,
        sensor: false,
        hourly_rate: 3.0,
        daily_rate: 20.0,
        monthly_rate: 250.0,
        pictures: Pictures(vec!["front.jpg".to_string()]),
    }
}
