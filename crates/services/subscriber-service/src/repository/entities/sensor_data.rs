//! Sensor reading database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::SensorData;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sensor_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub device_id: Uuid,
    pub sensor_id: Option<String>,
    pub sensor_name: Option<String>,
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id",
        on_delete = "Cascade"
    )]
    Device,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SensorData {
    fn from(model: Model) -> Self {
        SensorData {
            id: model.id,
            device_id: model.device_id,
            sensor_id: model.sensor_id,
            sensor_name: model.sensor_name,
            location: model.location,
            temperature: model.temperature,
            humidity: model.humidity,
            timestamp: model.timestamp,
            metadata: model.metadata,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<SensorData> for ActiveModel {
    fn from(data: SensorData) -> Self {
        ActiveModel {
            id: Set(data.id),
            device_id: Set(data.device_id),
            sensor_id: Set(data.sensor_id),
            sensor_name: Set(data.sensor_name),
            location: Set(data.location),
            temperature: Set(data.temperature),
            humidity: Set(data.humidity),
            timestamp: Set(data.timestamp),
            metadata: Set(data.metadata),
            created_at: Set(data.created_at),
            updated_at: Set(data.updated_at),
        }
    }
}
