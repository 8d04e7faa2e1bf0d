//! House database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::House;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "houses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for House {
    fn from(model: Model) -> Self {
        House {
            id: model.id,
            name: model.name,
            address: model.address,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<House> for ActiveModel {
    fn from(house: House) -> Self {
        ActiveModel {
            id: Set(house.id),
            name: Set(house.name),
            address: Set(house.address),
            created_at: Set(house.created_at),
            updated_at: Set(house.updated_at),
        }
    }
}
