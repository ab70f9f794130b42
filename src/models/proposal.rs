use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status codes a proposal may carry, in list-filter priority order.
pub const STATUS_CODES: [&str; 5] = ["c", "elab", "p", "co", "a"];

/// Status given to new proposals.
pub const DEFAULT_STATUS: &str = "c";

/// `type_prop` given to proposals promoted from an entry.
pub const PROMOTED_TYPE: &str = "R";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub num_prop: i32,
    pub type_prop: String,
    pub status: String, // 'c', 'elab', 'p', 'co', 'a'
    pub category_id: i32,
    pub description: Option<String>,
    pub work_id: i32,
    pub person_id: i32,
    pub employee_id: i32,
    pub seller_id: i32,
    #[sea_orm(unique)]
    pub entry_id: Option<i32>,
    pub price: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::work::Entity",
        from = "Column::WorkId",
        to = "super::work::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Work,
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Person,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::SellerId",
        to = "super::employee::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Seller,
    #[sea_orm(
        belongs_to = "super::entry::Entity",
        from = "Column::EntryId",
        to = "super::entry::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Entry,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::work::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Work.def()
    }
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
