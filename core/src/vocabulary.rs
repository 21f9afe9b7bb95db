//! Shared status and spot type vocabularies.
//!
//! Rows are only ever created implicitly, through [`get_or_create_status`] and
//! [`get_or_create_spot_type`], when a spot first references a new value.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use entity::{spot_type, status};

use crate::error::{Result, ServiceError};
use crate::pagination::Pagination;

/// Status tag as supplied by a client attaching it to a spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStatus {
    pub value: String,
    pub color: String,
}

/// Returns the status with `value`, inserting it with `color` if absent.
///
/// An existing status keeps its stored color.
pub(crate) async fn get_or_create_status<C>(
    db: &C,
    new_status: &NewStatus,
) -> Result<status::Model, DbErr>
where
    C: ConnectionTrait,
{
    let inserted = status::Entity::insert(status::ActiveModel {
        id: Set(Uuid::now_v7()),
        value: Set(new_status.value.clone()),
        color: Set(new_status.color.clone()),
    })
    .on_conflict(
        OnConflict::column(status::Column::Value)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    if inserted > 0 {
        debug!("Created status {:?}", new_status.value);
    }

    find_status_by_value(db, &new_status.value)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("status {:?}", new_status.value)))
}

pub(crate) async fn find_status_by_value<C>(
    db: &C,
    value: &str,
) -> Result<Option<status::Model>, DbErr>
where
    C: ConnectionTrait,
{
    status::Entity::find()
        .filter(status::Column::Value.eq(value))
        .one(db)
        .await
}

/// Returns the spot type with `value`, inserting it if absent.
pub(crate) async fn get_or_create_spot_type<C>(
    db: &C,
    value: &str,
) -> Result<spot_type::Model, DbErr>
where
    C: ConnectionTrait,
{
    let inserted = spot_type::Entity::insert(spot_type::ActiveModel {
        id: Set(Uuid::now_v7()),
        value: Set(value.to_string()),
    })
    .on_conflict(
        OnConflict::column(spot_type::Column::Value)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    if inserted > 0 {
        debug!("Created spot type {:?}", value);
    }

    spot_type::Entity::find()
        .filter(spot_type::Column::Value.eq(value))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("spot type {:?}", value)))
}

#[derive(Debug, Clone)]
pub struct StatusService {
    connection: DatabaseConnection,
}

impl StatusService {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<status::Model>> {
        let (skip, limit) = page.window();
        let statuses = status::Entity::find()
            .order_by_asc(status::Column::Value)
            .offset(skip)
            .limit(limit)
            .all(&self.connection)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch statuses: {}", e);
                e
            })?;
        debug!("Fetched {} statuses", statuses.len());
        Ok(statuses)
    }

    pub async fn get(&self, id: Uuid) -> Result<status::Model> {
        status::Entity::find_by_id(id)
            .one(&self.connection)
            .await?
            .ok_or_else(|| ServiceError::not_found("Status", id))
    }
}

#[derive(Debug, Clone)]
pub struct SpotTypeService {
    connection: DatabaseConnection,
}

impl SpotTypeService {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<spot_type::Model>> {
        let (skip, limit) = page.window();
        let types = spot_type::Entity::find()
            .order_by_asc(spot_type::Column::Value)
            .offset(skip)
            .limit(limit)
            .all(&self.connection)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch spot types: {}", e);
                e
            })?;
        debug!("Fetched {} spot types", types.len());
        Ok(types)
    }

    pub async fn get(&self, id: Uuid) -> Result<spot_type::Model> {
        spot_type::Entity::find_by_id(id)
            .one(&self.connection)
            .await?
            .ok_or_else(|| ServiceError::not_found("SpotType", id))
    }
}
