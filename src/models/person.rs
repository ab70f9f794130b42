use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::domain::fold_case;

/// `person_type` value for plain contacts.
pub const PERSON_TYPE_PERSON: &str = "p";
/// `person_type` value for customers.
pub const PERSON_TYPE_CUSTOMER: &str = "c";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "people")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub person_type: String, // 'p' or 'c'
    #[serde(skip)]
    pub first_name_folded: String,
    #[serde(skip)]
    pub company_folded: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work::Entity")]
    Works,
}

impl Related<super::work::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Works.def()
    }
}

/// Keeps the folded search keys in step with the names they index.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(first_name) = &self.first_name {
            self.first_name_folded = ActiveValue::Set(fold_case(first_name));
        }
        if let ActiveValue::Set(company) = &self.company {
            self.company_folded = ActiveValue::Set(company.as_deref().map(fold_case));
        }
        Ok(self)
    }
}
