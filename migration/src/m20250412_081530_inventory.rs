use sea_orm_migration::{prelude::*, sea_orm::Schema};

use entity::hotel::Entity as Hotel;
use entity::parking::Entity as Parking;
use entity::parking_spot::Entity as ParkingSpot;
use entity::parking_spot_status::Entity as ParkingSpotStatus;
use entity::parking_spot_type::Entity as ParkingSpotType;
use entity::spot_type::Entity as SpotType;
use entity::status::Entity as Status;

use entity::parking_spot;

/// Backs the per-parking spot number rule. The service checks it first, this
/// index is what actually holds under concurrent writers.
const SPOT_NUMBER_INDEX: &str = "idx_parking_spot_parking_id_number";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let builder = manager.get_database_backend();
        let schema = Schema::new(builder);

        // parents before children, foreign keys are declared on the entities
        manager
            .create_table(schema.create_table_from_entity(Hotel))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(Parking))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(ParkingSpot))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(Status))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(SpotType))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(ParkingSpotStatus))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(ParkingSpotType))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(SPOT_NUMBER_INDEX)
                    .table(ParkingSpot)
                    .col(parking_spot::Column::ParkingId)
                    .col(parking_spot::Column::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // the spot number index goes away with its table
        manager
            .drop_table(Table::drop().table(ParkingSpotType).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ParkingSpotStatus).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SpotType).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Status).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ParkingSpot).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Parking).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Hotel).to_owned())
            .await?;

        Ok(())
    }
}
