//! Device database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Device, DeviceType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub room_id: Option<Uuid>,
    /// `DeviceType` variant name
    pub device_type: String,
    pub manufacturer: Option<String>,
    #[sea_orm(column_name = "model")]
    pub model_name: Option<String>,
    #[sea_orm(unique)]
    pub serial_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id",
        on_delete = "Cascade"
    )]
    Room,
    #[sea_orm(has_many = "super::sensor_data::Entity")]
    SensorData,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::sensor_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Device {
    fn from(model: Model) -> Self {
        let device_type = model.device_type.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Device {} has unknown type '{}'",
                model.id,
                model.device_type
            );
            DeviceType::CombinedSensor
        });

        Device {
            id: model.id,
            name: model.name,
            room_id: model.room_id,
            device_type,
            manufacturer: model.manufacturer,
            model: model.model_name,
            serial_number: model.serial_number,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Device> for ActiveModel {
    fn from(device: Device) -> Self {
        ActiveModel {
            id: Set(device.id),
            name: Set(device.name),
            room_id: Set(device.room_id),
            device_type: Set(device.device_type.as_str().to_string()),
            manufacturer: Set(device.manufacturer),
            model_name: Set(device.model),
            serial_number: Set(device.serial_number),
            is_active: Set(device.is_active),
            created_at: Set(device.created_at),
            updated_at: Set(device.updated_at),
        }
    }
}
