//! Room database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Room;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub house_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::house::Entity",
        from = "Column::HouseId",
        to = "super::house::Column::Id",
        on_delete = "Cascade"
    )]
    House,
    #[sea_orm(has_many = "super::device::Entity")]
    Devices,
}

impl Related<super::house::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::House.def()
    }
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Room {
    fn from(model: Model) -> Self {
        Room {
            id: model.id,
            name: model.name,
            house_id: model.house_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Room> for ActiveModel {
    fn from(room: Room) -> Self {
        ActiveModel {
            id: Set(room.id),
            name: Set(room.name),
            house_id: Set(room.house_id),
            created_at: Set(room.created_at),
            updated_at: Set(room.updated_at),
        }
    }
}
