use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the one counter row.
pub const COUNTER_ID: i32 = 1;

/// Last issued proposal number. Exactly one row exists (`id = 1`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "num_last_proposal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub num_last_prop: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
