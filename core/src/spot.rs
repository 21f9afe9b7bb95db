//! Parking spot lifecycle.
//!
//! Every write that touches the parent's `total_capacity` or a spot's tag sets
//! runs in a single transaction: the spot row, its links and the counter move
//! together or not at all.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use entity::parking_spot::Pictures;
use entity::{parking, parking_spot, parking_spot_status, parking_spot_type, spot_type, status};

use crate::error::{Result, ServiceError};
use crate::pagination::Pagination;
use crate::parking::find_parking;
use crate::vocabulary::{
    find_status_by_value, get_or_create_spot_type, get_or_create_status, NewStatus,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpot {
    pub number: i32,

    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub surface: f64,

    pub floor: i32,
    pub section: String,
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub electric_charging: bool,
    #[serde(default)]
    pub camera: bool,
    #[serde(default)]
    pub sensor: bool,

    pub hourly_rate: f64,
    pub daily_rate: f64,
    pub monthly_rate: f64,

    #[serde(default)]
    pub pictures: Vec<String>,

    /// Spot type values, created on first use.
    #[serde(default)]
    pub types: Vec<String>,
}

/// Partial update of a spot. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotChanges {
    pub number: Option<i32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub surface: Option<f64>,
    pub floor: Option<i32>,
    pub section: Option<String>,
    pub address: Option<String>,
    pub electric_charging: Option<bool>,
    pub camera: Option<bool>,
    pub sensor: Option<bool>,
    pub hourly_rate: Option<f64>,
    pub daily_rate: Option<f64>,
    pub monthly_rate: Option<f64>,
    pub pictures: Option<Vec<String>>,
    /// Replaces the whole type set; unknown values are created.
    pub types: Option<Vec<String>>,
    /// Replaces the whole status set; unknown values are skipped.
    pub statuses: Option<Vec<String>>,
}

/// A spot together with its resolved type and status sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotView {
    #[serde(flatten)]
    pub spot: parking_spot::Model,
    /// Type values, sorted.
    pub types: Vec<String>,
    /// Attached statuses, sorted by value.
    pub statuses: Vec<status::Model>,
}

#[derive(Debug, Clone)]
pub struct SpotService {
    connection: DatabaseConnection,
}

impl SpotService {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Lists spots, restricted to one parking when `parking_id` is given.
    pub async fn list(&self, parking_id: Option<Uuid>, page: Pagination) -> Result<Vec<SpotView>> {
        let mut query = parking_spot::Entity::find();
        if let Some(parking_id) = parking_id {
            find_parking(&self.connection, parking_id).await?;
            query = query.filter(parking_spot::Column::ParkingId.eq(parking_id));
        }

        let (skip, limit) = page.window();
        let spots = query
            .order_by_asc(parking_spot::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.connection)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch spots: {}", e);
                e
            })?;
        debug!("Fetched {} spots", spots.len());

        Ok(load_views(&self.connection, spots).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<SpotView> {
        let spot = find_spot(&self.connection, id).await?;
        Ok(load_view(&self.connection, spot).await?)
    }

    pub async fn create(&self, parking_id: Uuid, new_spot: NewSpot) -> Result<SpotView> {
        debug!("Creating spot {} in parking {}", new_spot.number, parking_id);
        let txn = self.connection.begin().await?;

        find_parking(&txn, parking_id).await?;
        ensure_number_free(&txn, parking_id, new_spot.number, None).await?;

        let NewSpot {
            number,
            length,
            width,
            height,
            surface,
            floor,
            section,
            address,
            electric_charging,
            camera,
            sensor,
            hourly_rate,
            daily_rate,
            monthly_rate,
            pictures,
            types,
        } = new_spot;

        let spot = parking_spot::ActiveModel {
            id: Set(Uuid::now_v7()),
            number: Set(number),
            parking_id: Set(parking_id),
            length: Set(length),
            width: Set(width),
            height: Set(height),
            surface: Set(surface),
            floor: Set(floor),
            section: Set(section),
            address: Set(address),
            electric_charging: Set(electric_charging),
            camera: Set(camera),
            sensor: Set(sensor),
            hourly_rate: Set(hourly_rate),
            daily_rate: Set(daily_rate),
            monthly_rate: Set(monthly_rate),
            pictures: Set(Pictures(pictures)),
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::from_write(e, || number_taken(number)))?;

        attach_types(&txn, spot.id, &types).await?;
        increment_capacity(&txn, parking_id).await?;

        let view = load_view(&txn, spot).await?;
        txn.commit().await?;

        info!(
            "Created spot {} (number {}) in parking {}",
            view.spot.id, number, parking_id
        );
        Ok(view)
    }

    pub async fn update(&self, id: Uuid, changes: SpotChanges) -> Result<SpotView> {
        debug!("Updating spot {}: {:?}", id, changes);
        let txn = self.connection.begin().await?;

        let spot = find_spot(&txn, id).await?;
        if let Some(number) = changes.number {
            if number != spot.number {
                ensure_number_free(&txn, spot.parking_id, number, Some(id)).await?;
            }
        }

        let SpotChanges {
            number,
            length,
            width,
            height,
            surface,
            floor,
            section,
            address,
            electric_charging,
            camera,
            sensor,
            hourly_rate,
            daily_rate,
            monthly_rate,
            pictures,
            types,
            statuses,
        } = changes;

        let mut active = spot.clone().into_active_model();
        if let Some(number) = number {
            active.number = Set(number);
        }
        if let Some(length) = length {
            active.length = Set(length);
        }
        if let Some(width) = width {
            active.width = Set(width);
        }
        if let Some(height) = height {
            active.height = Set(height);
        }
        if let Some(surface) = surface {
            active.surface = Set(surface);
        }
        if let Some(floor) = floor {
            active.floor = Set(floor);
        }
        if let Some(section) = section {
            active.section = Set(section);
        }
        if let Some(address) = address {
            active.address = Set(address);
        }
        if let Some(electric_charging) = electric_charging {
            active.electric_charging = Set(electric_charging);
        }
        if let Some(camera) = camera {
            active.camera = Set(camera);
        }
        if let Some(sensor) = sensor {
            active.sensor = Set(sensor);
        }
        if let Some(hourly_rate) = hourly_rate {
            active.hourly_rate = Set(hourly_rate);
        }
        if let Some(daily_rate) = daily_rate {
            active.daily_rate = Set(daily_rate);
        }
        if let Some(monthly_rate) = monthly_rate {
            active.monthly_rate = Set(monthly_rate);
        }
        if let Some(pictures) = pictures {
            active.pictures = Set(Pictures(pictures));
        }

        let spot = if active.is_changed() {
            let attempted = number.unwrap_or(spot.number);
            active
                .update(&txn)
                .await
                .map_err(|e| ServiceError::from_write(e, || number_taken(attempted)))?
        } else {
            spot
        };

        if let Some(types) = types {
            parking_spot_type::Entity::delete_many()
                .filter(parking_spot_type::Column::SpotId.eq(id))
                .exec(&txn)
                .await?;
            attach_types(&txn, id, &types).await?;
        }

        if let Some(statuses) = statuses {
            parking_spot_status::Entity::delete_many()
                .filter(parking_spot_status::Column::SpotId.eq(id))
                .exec(&txn)
                .await?;
            for value in &statuses {
                match find_status_by_value(&txn, value).await? {
                    Some(status) => link_status(&txn, id, status.id).await?,
                    None => debug!("Skipping unknown status {:?} for spot {}", value, id),
                }
            }
        }

        let view = load_view(&txn, spot).await?;
        txn.commit().await?;
        Ok(view)
    }

    /// Removes the spot and its tag links and releases one unit of the
    /// parent's capacity.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let txn = self.connection.begin().await?;

        let spot = find_spot(&txn, id).await?;
        let removed = delete_spots(&txn, vec![id]).await?;
        decrement_capacity(&txn, spot.parking_id).await?;

        txn.commit().await?;
        info!("Deleted spot {} from parking {}", id, spot.parking_id);
        Ok(removed > 0)
    }

    /// Attaches the status with `new_status.value`, creating it if needed.
    /// Attaching a status the spot already carries is a no-op.
    pub async fn attach_status(&self, id: Uuid, new_status: NewStatus) -> Result<SpotView> {
        let txn = self.connection.begin().await?;

        let spot = find_spot(&txn, id).await?;
        let status = get_or_create_status(&txn, &new_status).await?;
        link_status(&txn, id, status.id).await?;

        let view = load_view(&txn, spot).await?;
        txn.commit().await?;
        debug!("Attached status {:?} to spot {}", status.value, id);
        Ok(view)
    }

    /// Detaches a status. Unknown or unattached status ids are ignored.
    pub async fn detach_status(&self, id: Uuid, status_id: Uuid) -> Result<SpotView> {
        let spot = find_spot(&self.connection, id).await?;

        let result = parking_spot_status::Entity::delete_many()
            .filter(parking_spot_status::Column::SpotId.eq(id))
            .filter(parking_spot_status::Column::StatusId.eq(status_id))
            .exec(&self.connection)
            .await?;
        if result.rows_affected == 0 {
            debug!("Status {} was not attached to spot {}", status_id, id);
        }

        Ok(load_view(&self.connection, spot).await?)
    }
}

pub(crate) async fn find_spot<C>(db: &C, id: Uuid) -> Result<parking_spot::Model>
where
    C: ConnectionTrait,
{
    parking_spot::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("ParkingSpot", id))
}

pub(crate) async fn count_spots<C>(db: &C, parking_id: Uuid) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    parking_spot::Entity::find()
        .filter(parking_spot::Column::ParkingId.eq(parking_id))
        .count(db)
        .await
}

fn number_taken(number: i32) -> String {
    format!("a spot with number {} already exists in this parking", number)
}

async fn ensure_number_free<C>(
    db: &C,
    parking_id: Uuid,
    number: i32,
    except: Option<Uuid>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = parking_spot::Entity::find()
        .filter(parking_spot::Column::ParkingId.eq(parking_id))
        .filter(parking_spot::Column::Number.eq(number));
    if let Some(id) = except {
        query = query.filter(parking_spot::Column::Id.ne(id));
    }

    match query.one(db).await? {
        Some(existing) => {
            debug!("Spot number {} already taken by {}", number, existing.id);
            Err(ServiceError::conflict(number_taken(number)))
        }
        None => Ok(()),
    }
}

async fn increment_capacity<C>(db: &C, parking_id: Uuid) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = parking::Entity::update_many()
        .col_expr(
            parking::Column::TotalCapacity,
            Expr::col(parking::Column::TotalCapacity).add(1),
        )
        .filter(parking::Column::Id.eq(parking_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::not_found("Parking", parking_id));
    }
    Ok(())
}

/// Never takes the counter below zero.
async fn decrement_capacity<C>(db: &C, parking_id: Uuid) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    parking::Entity::update_many()
        .col_expr(
            parking::Column::TotalCapacity,
            Expr::col(parking::Column::TotalCapacity).sub(1),
        )
        .filter(parking::Column::Id.eq(parking_id))
        .filter(parking::Column::TotalCapacity.gt(0))
        .exec(db)
        .await?;
    Ok(())
}

/// Deletes the given spots with their tag links. Parent counters are left
/// alone; callers removing a single spot adjust them separately.
pub(crate) async fn delete_spots<C>(db: &C, spot_ids: Vec<Uuid>) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    if spot_ids.is_empty() {
        return Ok(0);
    }

    parking_spot_status::Entity::delete_many()
        .filter(parking_spot_status::Column::SpotId.is_in(spot_ids.clone()))
        .exec(db)
        .await?;
    parking_spot_type::Entity::delete_many()
        .filter(parking_spot_type::Column::SpotId.is_in(spot_ids.clone()))
        .exec(db)
        .await?;
    let result = parking_spot::Entity::delete_many()
        .filter(parking_spot::Column::Id.is_in(spot_ids))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

async fn attach_types<C>(db: &C, spot_id: Uuid, values: &[String]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    for value in values {
        let spot_type = get_or_create_spot_type(db, value).await?;
        parking_spot_type::Entity::insert(parking_spot_type::ActiveModel {
            spot_id: Set(spot_id),
            spot_type_id: Set(spot_type.id),
        })
        .on_conflict(
            OnConflict::columns([
                parking_spot_type::Column::SpotId,
                parking_spot_type::Column::SpotTypeId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    }
    Ok(())
}

async fn link_status<C>(db: &C, spot_id: Uuid, status_id: Uuid) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    parking_spot_status::Entity::insert(parking_spot_status::ActiveModel {
        spot_id: Set(spot_id),
        status_id: Set(status_id),
    })
    .on_conflict(
        OnConflict::columns([
            parking_spot_status::Column::SpotId,
            parking_spot_status::Column::StatusId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// Resolves type and status sets for a batch of spots with two queries,
/// preserving the order of `spots`.
pub(crate) async fn load_views<C>(
    db: &C,
    spots: Vec<parking_spot::Model>,
) -> Result<Vec<SpotView>, DbErr>
where
    C: ConnectionTrait,
{
    if spots.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = spots.iter().map(|spot| spot.id).collect();

    let mut types: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (link, spot_type) in parking_spot_type::Entity::find()
        .filter(parking_spot_type::Column::SpotId.is_in(ids.clone()))
        .find_also_related(spot_type::Entity)
        .all(db)
        .await?
    {
        if let Some(spot_type) = spot_type {
            types.entry(link.spot_id).or_default().push(spot_type.value);
        }
    }

    let mut statuses: HashMap<Uuid, Vec<status::Model>> = HashMap::new();
    for (link, status) in parking_spot_status::Entity::find()
        .filter(parking_spot_status::Column::SpotId.is_in(ids))
        .find_also_related(status::Entity)
        .all(db)
        .await?
    {
        if let Some(status) = status {
            statuses.entry(link.spot_id).or_default().push(status);
        }
    }

    Ok(spots
        .into_iter()
        .map(|spot| {
            let mut types = types.remove(&spot.id).unwrap_or_default();
            types.sort();
            let mut statuses = statuses.remove(&spot.id).unwrap_or_default();
            statuses.sort_by(|a, b| a.value.cmp(&b.value));
            SpotView {
                spot,
                types,
                statuses,
            }
        })
        .collect())
}

pub(crate) async fn load_view<C>(db: &C, spot: parking_spot::Model) -> Result<SpotView, DbErr>
where
    C: ConnectionTrait,
{
    let id = spot.id;
    load_views(db, vec![spot])
        .await?
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound(format!("parking spot {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, new_spot};
    use crate::Inventory;

    async fn capacity(inventory: &Inventory, parking_id: Uuid) -> i32 {
        inventory.parkings.get(parking_id).await.unwrap().parking.total_capacity
    }

    #[tokio::test]
    async fn test_create_spot_increments_capacity_and_attaches_types() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;

        let spot = inventory
            .spots
            .create(parking.id, new_spot(1, &["STANDARD"]))
            .await
            .unwrap();

        assert_eq!(spot.spot.number, 1);
        assert_eq!(spot.spot.parking_id, parking.id);
        assert_eq!(spot.types, vec!["STANDARD"]);
        assert!(spot.statuses.is_empty());
        assert_eq!(capacity(&inventory, parking.id).await, 1);
    }

    #[tokio::test]
    async fn test_create_spot_with_taken_number_conflicts() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        inventory
            .spots
            .create(parking.id, new_spot(1, &["STANDARD"]))
            .await
            .unwrap();

        let err = inventory
            .spots
            .create(parking.id, new_spot(1, &["PMR"]))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(capacity(&inventory, parking.id).await, 1);
        // the rejected request must not leak its types into the vocabulary
        let types = inventory.spot_types.list(Pagination::default()).await.unwrap();
        assert_eq!(types.len(), 1);
    }

    #[tokio::test]
    async fn test_same_number_is_allowed_in_another_parking() {
        let (inventory, hotel, parking) = test_support::hotel_with_parking().await;
        let other = test_support::parking(&inventory, hotel.id, "Parking Extérieur").await;

        inventory.spots.create(parking.id, new_spot(7, &[])).await.unwrap();
        inventory.spots.create(other.id, new_spot(7, &[])).await.unwrap();

        assert_eq!(capacity(&inventory, parking.id).await, 1);
        assert_eq!(capacity(&inventory, other.id).await, 1);
    }

    #[tokio::test]
    async fn test_create_spot_in_missing_parking_is_not_found() {
        let inventory = test_support::inventory().await;

        let err = inventory
            .spots
            .create(Uuid::now_v7(), new_spot(1, &["STANDARD"]))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(inventory
            .spots
            .list(None, Pagination::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_spot_dedupes_repeated_types() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;

        let spot = inventory
            .spots
            .create(parking.id, new_spot(1, &["PMR", "STANDARD", "PMR"]))
            .await
            .unwrap();

        assert_eq!(spot.types, vec!["PMR", "STANDARD"]);
    }

    #[tokio::test]
    async fn test_delete_spot_decrements_capacity() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory
            .spots
            .create(parking.id, new_spot(1, &["STANDARD"]))
            .await
            .unwrap();

        assert!(inventory.spots.delete(spot.spot.id).await.unwrap());

        assert_eq!(capacity(&inventory, parking.id).await, 0);
        assert!(inventory.spots.get(spot.spot.id).await.unwrap_err().is_not_found());
        assert!(inventory.spots.delete(spot.spot.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_capacity_never_goes_negative() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory.spots.create(parking.id, new_spot(1, &[])).await.unwrap();

        // simulate a drifted counter
        parking::Entity::update_many()
            .col_expr(parking::Column::TotalCapacity, Expr::value(0))
            .filter(parking::Column::Id.eq(parking.id))
            .exec(&inventory.connection)
            .await
            .unwrap();

        assert!(inventory.spots.delete(spot.spot.id).await.unwrap());
        assert_eq!(capacity(&inventory, parking.id).await, 0);
    }

    #[tokio::test]
    async fn test_capacity_tracks_spot_count_over_mixed_operations() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;

        let mut live = Vec::new();
        for number in 1..=6 {
            let spot = inventory.spots.create(parking.id, new_spot(number, &[])).await.unwrap();
            live.push(spot.spot.id);
        }
        // a rejected duplicate must not move the counter
        assert!(inventory.spots.create(parking.id, new_spot(3, &[])).await.is_err());

        for id in [live.remove(4), live.remove(1), live.remove(0)] {
            inventory.spots.delete(id).await.unwrap();
        }
        inventory.spots.create(parking.id, new_spot(10, &[])).await.unwrap();

        let spots = inventory
            .spots
            .list(Some(parking.id), Pagination::default())
            .await
            .unwrap();
        assert_eq!(spots.len(), 4);
        assert_eq!(capacity(&inventory, parking.id).await, 4);
        assert_eq!(count_spots(&inventory.connection, parking.id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory
            .spots
            .create(parking.id, new_spot(1, &["STANDARD"]))
            .await
            .unwrap();

        let updated = inventory
            .spots
            .update(
                spot.spot.id,
                SpotChanges {
                    hourly_rate: Some(4.5),
                    camera: Some(true),
                    pictures: Some(vec!["a.jpg".to_string(), "b.jpg".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.spot.hourly_rate, 4.5);
        assert!(updated.spot.camera);
        assert_eq!(updated.spot.pictures, Pictures(vec!["a.jpg".into(), "b.jpg".into()]));
        assert_eq!(updated.spot.number, 1);
        assert_eq!(updated.spot.section, spot.spot.section);
        assert_eq!(updated.spot.daily_rate, spot.spot.daily_rate);
        assert_eq!(updated.types, vec!["STANDARD"]);

        let reloaded = inventory.spots.get(spot.spot.id).await.unwrap();
        assert_eq!(reloaded, updated);
    }

    #[tokio::test]
    async fn test_empty_update_returns_spot_unchanged() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory
            .spots
            .create(parking.id, new_spot(1, &["STANDARD"]))
            .await
            .unwrap();

        let updated = inventory
            .spots
            .update(spot.spot.id, SpotChanges::default())
            .await
            .unwrap();

        assert_eq!(updated, spot);
    }

    #[tokio::test]
    async fn test_update_number_conflicts_only_with_other_spots() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let first = inventory.spots.create(parking.id, new_spot(1, &[])).await.unwrap();
        inventory.spots.create(parking.id, new_spot(2, &[])).await.unwrap();

        let err = inventory
            .spots
            .update(
                first.spot.id,
                SpotChanges {
                    number: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // keeping its own number is fine
        let same = inventory
            .spots
            .update(
                first.spot.id,
                SpotChanges {
                    number: Some(1),
                    floor: Some(-2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.spot.number, 1);
        assert_eq!(same.spot.floor, -2);

        let moved = inventory
            .spots
            .update(
                first.spot.id,
                SpotChanges {
                    number: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.spot.number, 3);
    }

    #[tokio::test]
    async fn test_update_missing_spot_is_not_found() {
        let inventory = test_support::inventory().await;

        let err = inventory
            .spots
            .update(Uuid::now_v7(), SpotChanges::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_replaces_types_creating_new_values() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory
            .spots
            .create(parking.id, new_spot(1, &["STANDARD"]))
            .await
            .unwrap();

        let updated = inventory
            .spots
            .update(
                spot.spot.id,
                SpotChanges {
                    types: Some(vec!["PMR".to_string(), "ELECTRIC".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.types, vec!["ELECTRIC", "PMR"]);
        // the old type stays in the vocabulary
        let vocabulary: Vec<_> = inventory
            .spot_types
            .list(Pagination::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(vocabulary, vec!["ELECTRIC", "PMR", "STANDARD"]);
    }

    #[tokio::test]
    async fn test_update_replaces_statuses_skipping_unknown_values() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory.spots.create(parking.id, new_spot(1, &[])).await.unwrap();
        let other = inventory.spots.create(parking.id, new_spot(2, &[])).await.unwrap();

        inventory
            .spots
            .attach_status(spot.spot.id, test_support::status("personnel", "#F4CCCC"))
            .await
            .unwrap();
        // registers "late_checkout" in the vocabulary
        inventory
            .spots
            .attach_status(other.spot.id, test_support::status("late_checkout", "#FF9900"))
            .await
            .unwrap();

        let updated = inventory
            .spots
            .update(
                spot.spot.id,
                SpotChanges {
                    statuses: Some(vec!["late_checkout".to_string(), "nonexistent".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let values: Vec<_> = updated.statuses.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["late_checkout"]);
        let vocabulary = inventory.statuses.list(Pagination::default()).await.unwrap();
        assert_eq!(vocabulary.len(), 2);
    }

    #[tokio::test]
    async fn test_attach_status_twice_is_idempotent() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory.spots.create(parking.id, new_spot(1, &[])).await.unwrap();

        inventory
            .spots
            .attach_status(spot.spot.id, test_support::status("personnel", "#F4CCCC"))
            .await
            .unwrap();
        let view = inventory
            .spots
            .attach_status(spot.spot.id, test_support::status("personnel", "#F4CCCC"))
            .await
            .unwrap();

        assert_eq!(view.statuses.len(), 1);
        assert_eq!(view.statuses[0].value, "personnel");
        assert_eq!(view.statuses[0].color, "#F4CCCC");
        assert_eq!(
            inventory.statuses.list(Pagination::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_attach_status_to_missing_spot_is_not_found() {
        let inventory = test_support::inventory().await;

        let err = inventory
            .spots
            .attach_status(Uuid::now_v7(), test_support::status("personnel", "#F4CCCC"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        // nothing was created on the way
        assert!(inventory
            .statuses
            .list(Pagination::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_detach_status() {
        let (inventory, _hotel, parking) = test_support::hotel_with_parking().await;
        let spot = inventory.spots.create(parking.id, new_spot(1, &[])).await.unwrap();
        let view = inventory
            .spots
            .attach_status(spot.spot.id, test_support::status("arrival_today", "#00FF00"))
            .await
            .unwrap();
        let status_id = view.statuses[0].id;

        let view = inventory.spots.detach_status(spot.spot.id, status_id).await.unwrap();
        assert!(view.statuses.is_empty());

        // detaching again, or detaching an id that never existed, is a no-op
        let view = inventory.spots.detach_status(spot.spot.id, status_id).await.unwrap();
        assert!(view.statuses.is_empty());
        inventory
            .spots
            .detach_status(spot.spot.id, Uuid::now_v7())
            .await
            .unwrap();

        // the status itself survives
        assert_eq!(inventory.statuses.get(status_id).await.unwrap().value, "arrival_today");

        let err = inventory
            .spots
            .detach_status(Uuid::now_v7(), status_id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_spots_by_parking() {
        let (inventory, hotel, parking) = test_support::hotel_with_parking().await;
        let other = test_support::parking(&inventory, hotel.id, "Parking Extérieur").await;
        for number in 1..=3 {
            inventory.spots.create(parking.id, new_spot(number, &[])).await.unwrap();
        }
        inventory.spots.create(other.id, new_spot(1, &[])).await.unwrap();

        let all = inventory.spots.list(None, Pagination::default()).await.unwrap();
        assert_eq!(all.len(), 4);

        let page = inventory
            .spots
            .list(Some(parking.id), Pagination::new(1, 5))
            .await
            .unwrap();
        let numbers: Vec<_> = page.iter().map(|s| s.spot.number).collect();
        assert_eq!(numbers, vec![2, 3]);

        let err = inventory
            .spots
            .list(Some(Uuid::now_v7()), Pagination::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let everything = inventory
            .spots
            .list(Some(parking.id), Pagination::new(0, u64::MAX))
            .await
            .unwrap();
        assert_eq!(everything.len(), 3);
        assert!(inventory
            .spots
            .list(None, Pagination::new(u64::MAX, u64::MAX))
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_spot_view_serializes_flat() {
        let view = SpotView {
            spot: test_support::spot_model(Uuid::nil(), 4),
            types: vec!["PMR".to_string()],
            statuses: Vec::new(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["number"], 4);
        assert_eq!(json["types"], serde_json::json!(["PMR"]));
        assert_eq!(json["pictures"], serde_json::json!(["front.jpg"]));
        assert!(json.get("spot").is_none());
    }

    #[test]
    fn test_spot_changes_ignore_absent_fields() {
        let changes: SpotChanges =
            serde_json::from_str(r#"{"number": 5, "statuses": []}"#).unwrap();

        assert_eq!(changes.number, Some(5));
        assert_eq!(changes.statuses, Some(Vec::new()));
        assert_eq!(changes.types, None);
        assert_eq!(changes.section, None);
    }
}
