//! SeaORM Entity for the whale (wallet identity) table

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "whale")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub whale_id: i32,
    pub blockchain: String,
    pub address: String,
    /// Explorer label, refreshed on every run
    #[sea_orm(nullable)]
    pub owner: Option<String>,
    /// Fixed at first insert
    pub owner_type: String,
    pub is_contract: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::balance::Entity")]
    Balance,
}

impl Related<super::balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
