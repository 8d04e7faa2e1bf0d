//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250801_000001_create_houses_table;
mod m20250801_000002_create_rooms_table;
mod m20250801_000003_create_devices_table;
mod m20250801_000004_create_sensor_data_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_houses_table::Migration),
            Box::new(m20250801_000002_create_rooms_table::Migration),
            Box::new(m20250801_000003_create_devices_table::Migration),
            Box::new(m20250801_000004_create_sensor_data_table::Migration),
        ]
    }
}
