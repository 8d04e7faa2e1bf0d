//! Migration: Create sensor_data table.

use domain::{MAX_LOCATION_LENGTH, MAX_SENSOR_ID_LENGTH, MAX_SENSOR_NAME_LENGTH};
use sea_orm_migration::prelude::*;

use super::m20250801_000003_create_devices_table::Devices;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SensorData::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SensorData::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SensorData::DeviceId).uuid().not_null())
                    .col(
                        ColumnDef::new(SensorData::SensorId)
                            .string_len(MAX_SENSOR_ID_LENGTH)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SensorData::SensorName)
                            .string_len(MAX_SENSOR_NAME_LENGTH)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SensorData::Location)
                            .string_len(MAX_LOCATION_LENGTH)
                            .null(),
                    )
                    .col(ColumnDef::new(SensorData::Temperature).double().null())
                    .col(ColumnDef::new(SensorData::Humidity).double().null())
                    .col(
                        ColumnDef::new(SensorData::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SensorData::Metadata).text().null())
                    .col(
                        ColumnDef::new(SensorData::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SensorData::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensor_data_device_id")
                            .from(SensorData::Table, SensorData::DeviceId)
                            .to(Devices::Table, Devices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, columns) in [
            ("idx_sensor_data_device_id", vec![SensorData::DeviceId]),
            ("idx_sensor_data_timestamp", vec![SensorData::Timestamp]),
            ("idx_sensor_data_sensor_id", vec![SensorData::SensorId]),
            (
                "idx_sensor_data_device_id_timestamp",
                vec![SensorData::DeviceId, SensorData::Timestamp],
            ),
        ] {
            let mut index = Index::create();
            index.name(name).table(SensorData::Table);
            for column in columns {
                index.col(column);
            }
            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SensorData::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SensorData {
    Table,
    Id,
    DeviceId,
    SensorId,
    SensorName,
    Location,
    Temperature,
    Humidity,
    Timestamp,
    Metadata,
    CreatedAt,
    UpdatedAt,
}
