//! SeaORM Entity for the balance (snapshot) table

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "balance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub balance_id: i64,
    pub whale_id: i32,
    #[sea_orm(column_type = "Double")]
    pub value: f64,
    pub symbol: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::whale::Entity",
        from = "Column::WhaleId",
        to = "super::whale::Column::WhaleId",
        on_delete = "Restrict"
    )]
    Whale,
}

impl Related<super::whale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Whale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
