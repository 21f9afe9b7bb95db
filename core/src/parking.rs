use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use entity::{parking, parking_spot};

use crate::error::{Result, ServiceError};
use crate::hotel::find_hotel;
use crate::pagination::Pagination;
use crate::spot::{count_spots, delete_spots, load_views, SpotView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParking {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Partial update of a parking. `total_capacity` is derived and cannot be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(deserialize_with = "crate::patch::nullable")]
    pub description: Option<Option<String>>,
    /// `Some(None)` clears the location.
    #[serde(deserialize_with = "crate::patch::nullable")]
    pub location: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingDetails {
    #[serde(flatten)]
    pub parking: parking::Model,
    pub spots: Vec<SpotView>,
}

#[derive(Debug, Clone)]
pub struct ParkingService {
    connection: DatabaseConnection,
}

impl ParkingService {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Lists parkings, restricted to one hotel when `hotel_id` is given.
    pub async fn list(
        &self,
        hotel_id: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<parking::Model>> {
        let mut query = parking::Entity::find();
        if let Some(hotel_id) = hotel_id {
            find_hotel(&self.connection, hotel_id).await?;
            query = query.filter(parking::Column::HotelId.eq(hotel_id));
        }

        let (skip, limit) = page.window();
        let parkings = query
            .order_by_asc(parking::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.connection)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch parkings: {}", e);
                e
            })?;
        debug!("Fetched {} parkings", parkings.len());
        Ok(parkings)
    }

    pub async fn get(&self, id: Uuid) -> Result<ParkingDetails> {
        let parking = find_parking(&self.connection, id).await?;
        let mut details = load_details(&self.connection, vec![parking]).await?;
        details
            .pop()
            .ok_or_else(|| ServiceError::not_found("Parking", id))
    }

    pub async fn create(&self, hotel_id: Uuid, new_parking: NewParking) -> Result<parking::Model> {
        find_hotel(&self.connection, hotel_id).await?;

        let parking = parking::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(new_parking.name),
            hotel_id: Set(hotel_id),
            description: Set(new_parking.description),
            location: Set(new_parking.location),
            total_capacity: Set(0),
        }
        .insert(&self.connection)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert parking record: {}", e);
            e
        })?;

        info!("Created parking {} ({:?}) for hotel {}", parking.id, parking.name, hotel_id);
        Ok(parking)
    }

    pub async fn update(&self, id: Uuid, changes: ParkingChanges) -> Result<parking::Model> {
        let parking = find_parking(&self.connection, id).await?;
        if changes == ParkingChanges::default() {
            return Ok(parking);
        }

        let mut record: parking::ActiveModel = parking.into();
        if let Some(name) = changes.name {
            record.name = Set(name);
        }
        if let Some(description) = changes.description {
            record.description = Set(description);
        }
        if let Some(location) = changes.location {
            record.location = Set(location);
        }

        let parking = record.update(&self.connection).await.map_err(|e| {
            tracing::error!("Failed to update parking record: {}", e);
            e
        })?;
        debug!("Parking record updated: {:?}", parking);
        Ok(parking)
    }

    /// Removes the parking together with its spots and their tag links.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let txn = self.connection.begin().await?;

        find_parking(&txn, id).await?;
        let spot_ids = spot_ids(&txn, vec![id]).await?;
        let spots = delete_spots(&txn, spot_ids).await?;
        let result = parking::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!("Deleted parking {} and {} spots", id, spots);
        Ok(result.rows_affected > 0)
    }

    /// Recomputes `total_capacity` from the spots actually stored and writes it
    /// back, repairing a counter that drifted.
    pub async fn reconcile_capacity(&self, id: Uuid) -> Result<parking::Model> {
        let txn = self.connection.begin().await?;

        let parking = find_parking(&txn, id).await?;
        let count = count_spots(&txn, id).await?;
        let count = i32::try_from(count).map_err(|_| {
            DbErr::Custom(format!("parking {} holds too many spots: {}", id, count))
        })?;

        let parking = if parking.total_capacity != count {
            warn!(
                "Parking {} capacity drifted: stored {}, counted {}",
                id, parking.total_capacity, count
            );
            parking::ActiveModel {
                total_capacity: Set(count),
                ..parking.into()
            }
            .update(&txn)
            .await?
        } else {
            parking
        };

        txn.commit().await?;
        Ok(parking)
    }
}

pub(crate) async fn find_parking<C>(db: &C, id: Uuid) -> Result<parking::Model>
where
    C: ConnectionTrait,
{
    parking::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Parking", id))
}

/// Ids of every spot owned by the given parkings.
pub(crate) async fn spot_ids<C>(db: &C, parking_ids: Vec<Uuid>) -> Result<Vec<Uuid>, DbErr>
where
    C: ConnectionTrait,
{
    parking_spot::Entity::find()
        .select_only()
        .column(parking_spot::Column::Id)
        .filter(parking_spot::Column::ParkingId.is_in(parking_ids))
        .into_tuple::<Uuid>()
        .all(db)
        .await
}

/// Attaches every spot to its parking, keeping the order of `parkings` and
/// ordering spots by id.
pub(crate) async fn load_details<C>(
    db: &C,
    parkings: Vec<parking::Model>,
) -> Result<Vec<ParkingDetails>, DbErr>
where
    C: ConnectionTrait,
{
    if parkings.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = parkings.iter().map(|parking| parking.id).collect();

    let spots = parking_spot::Entity::find()
        .filter(parking_spot::Column::ParkingId.is_in(ids))
        .order_by_asc(parking_spot::Column::Id)
        .all(db)
        .await?;

    let mut by_parking: HashMap<Uuid, Vec<SpotView>> = HashMap::new();
    for view in load_views(db, spots).await? {
        by_parking.entry(view.spot.parking_id).or_default().push(view);
    }

    Ok(parkings
        .into_iter()
        .map(|parking| {
            let spots = by_parking.remove(&parking.id).unwrap_or_default();
            ParkingDetails { parking, spots }
        })
        .collect())
}
