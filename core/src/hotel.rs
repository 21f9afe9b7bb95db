use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use entity::{hotel, parking};

use crate::error::{Result, ServiceError};
use crate::pagination::Pagination;
use crate::parking::{load_details, spot_ids, ParkingDetails};
use crate::spot::delete_spots;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHotel {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the address.
    #[serde(deserialize_with = "crate::patch::nullable")]
    pub address: Option<Option<String>>,
}

/// A hotel with its whole subtree: parkings and their spots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelDetails {
    #[serde(flatten)]
    pub hotel: hotel::Model,
    pub parkings: Vec<ParkingDetails>,
}

#[derive(Debug, Clone)]
pub struct HotelService {
    connection: DatabaseConnection,
}

impl HotelService {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<hotel::Model>> {
        let (skip, limit) = page.window();
        let hotels = hotel::Entity::find()
            .order_by_asc(hotel::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.connection)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch hotels: {}", e);
                e
            })?;
        debug!("Fetched {} hotels", hotels.len());
        Ok(hotels)
    }

    pub async fn get(&self, id: Uuid) -> Result<HotelDetails> {
        let hotel = find_hotel(&self.connection, id).await?;
        let parkings = parking::Entity::find()
            .filter(parking::Column::HotelId.eq(id))
            .order_by_asc(parking::Column::Id)
            .all(&self.connection)
            .await?;
        let parkings = load_details(&self.connection, parkings).await?;
        Ok(HotelDetails { hotel, parkings })
    }

    pub async fn create(&self, new_hotel: NewHotel) -> Result<hotel::Model> {
        ensure_name_free(&self.connection, &new_hotel.name, None).await?;

        let name = new_hotel.name.clone();
        let hotel = hotel::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(new_hotel.name),
            address: Set(new_hotel.address),
        }
        .insert(&self.connection)
        .await
        .map_err(|e| ServiceError::from_write(e, || name_taken(&name)))?;

        info!("Created hotel {} ({:?})", hotel.id, hotel.name);
        Ok(hotel)
    }

    pub async fn update(&self, id: Uuid, changes: HotelChanges) -> Result<hotel::Model> {
        let hotel = find_hotel(&self.connection, id).await?;
        if changes == HotelChanges::default() {
            return Ok(hotel);
        }

        let requested = changes.name.clone().unwrap_or_else(|| hotel.name.clone());
        let mut record: hotel::ActiveModel = hotel.into();
        if let Some(name) = changes.name {
            ensure_name_free(&self.connection, &name, Some(id)).await?;
            record.name = Set(name);
        }
        if let Some(address) = changes.address {
            record.address = Set(address);
        }

        let hotel = record
            .update(&self.connection)
            .await
            .map_err(|e| ServiceError::from_write(e, || name_taken(&requested)))?;
        debug!("Hotel record updated: {:?}", hotel);
        Ok(hotel)
    }

    /// Removes the hotel with every parking and spot beneath it.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let txn = self.connection.begin().await?;

        find_hotel(&txn, id).await?;
        let parking_ids: Vec<Uuid> = parking::Entity::find()
            .select_only()
            .column(parking::Column::Id)
            .filter(parking::Column::HotelId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        let spots = delete_spots(&txn, spot_ids(&txn, parking_ids.clone()).await?).await?;
        parking::Entity::delete_many()
            .filter(parking::Column::Id.is_in(parking_ids.clone()))
            .exec(&txn)
            .await?;
        let result = hotel::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            "Deleted hotel {} with {} parkings and {} spots",
            id,
            parking_ids.len(),
            spots
        );
        Ok(result.rows_affected > 0)
    }
}

pub(crate) async fn find_hotel<C>(db: &C, id: Uuid) -> Result<hotel::Model>
where
    C: ConnectionTrait,
{
    hotel::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Hotel", id))
}

fn name_taken(name: &str) -> String {
    format!("a hotel named {:?} already exists", name)
}

async fn ensure_name_free<C>(db: &C, name: &str, except: Option<Uuid>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = hotel::Entity::find().filter(hotel::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(hotel::Column::Id.ne(id));
    }

    if query.one(db).await?.is_some() {
        return Err(ServiceError::conflict(name_taken(name)));
    }
    Ok(())
}
