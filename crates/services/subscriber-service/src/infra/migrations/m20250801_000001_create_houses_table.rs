//! Migration: Create houses table.

use domain::{MAX_HOUSE_ADDRESS_LENGTH, MAX_HOUSE_NAME_LENGTH};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Houses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Houses::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Houses::Name)
                            .string_len(MAX_HOUSE_NAME_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Houses::Address)
                            .string_len(MAX_HOUSE_ADDRESS_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Houses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Houses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Auto-provisioning looks the default house up by name
        manager
            .create_index(
                Index::create()
                    .name("idx_houses_name")
                    .table(Houses::Table)
                    .col(Houses::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Houses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Houses {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
    UpdatedAt,
}
