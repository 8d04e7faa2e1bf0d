//! Migration: Create devices table.

use domain::MAX_DEVICE_FIELD_LENGTH;
use sea_orm_migration::prelude::*;

use super::m20250801_000002_create_rooms_table::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Devices::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Devices::Name)
                            .string_len(MAX_DEVICE_FIELD_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Devices::RoomId).uuid().null())
                    .col(ColumnDef::new(Devices::DeviceType).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Devices::Manufacturer)
                            .string_len(MAX_DEVICE_FIELD_LENGTH)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Devices::Model)
                            .string_len(MAX_DEVICE_FIELD_LENGTH)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Devices::SerialNumber)
                            .string_len(MAX_DEVICE_FIELD_LENGTH)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Devices::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Devices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Devices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_room_id")
                            .from(Devices::Table, Devices::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_serial_number")
                    .table(Devices::Table)
                    .col(Devices::SerialNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_room_id")
                    .table(Devices::Table)
                    .col(Devices::RoomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Devices {
    Table,
    Id,
    Name,
    RoomId,
    DeviceType,
    Manufacturer,
    Model,
    SerialNumber,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
