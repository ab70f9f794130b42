//! Works (jobs/sites), each owned by a customer

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, QuerySelect, Select, Set,
};
use serde::Serialize;

use super::resource::ResourceModel;
use super::search::{SearchField, aliased, left_join_as, qualified};
use crate::domain::forms::{self, CleanedForm, FieldSpec, Reference};
use crate::domain::{DomainError, FormValues, ResourceDescriptor};
use crate::models::person;
use crate::models::work::{self, ActiveModel, Entity as WorkEntity};

pub const WORK_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name_work", "Obra").required(),
    FieldSpec::text("address", "Endereço"),
    FieldSpec::reference("customer", "Cliente", Reference::Customer).required(),
];

pub static WORK: ResourceDescriptor = ResourceDescriptor {
    name: "work",
    base_path: "/works",
    fields: WORK_FIELDS,
    created_message: "Obra criada!",
    updated_message: "Obra atualizada!",
    status_filter: false,
};

#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct WorkRow {
    pub id: i32,
    pub name_work: String,
    pub address: Option<String>,
    pub customer_id: i32,
    pub customer_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct WorkResource;

#[async_trait]
impl ResourceModel for WorkResource {
    type Entity = WorkEntity;
    type Row = WorkRow;

    const DESCRIPTOR: &'static ResourceDescriptor = &WORK;

    fn select() -> Select<WorkEntity> {
        let select = WorkEntity::find()
            .select_only()
            .columns([
                work::Column::Id,
                work::Column::NameWork,
                work::Column::Address,
                work::Column::CustomerId,
                work::Column::CreatedAt,
                work::Column::UpdatedAt,
            ])
            .column_as(aliased("customer", person::Column::FirstName), "customer_name");

        left_join_as(
            select,
            person::Entity,
            "customer",
            person::Column::Id,
            (WorkEntity, work::Column::CustomerId),
        )
    }

    fn id_column() -> work::Column {
        work::Column::Id
    }

    fn search_fields() -> Vec<SearchField> {
        vec![
            SearchField::contains(qualified(WorkEntity, work::Column::NameWorkFolded)),
            SearchField::contains(aliased("customer", person::Column::FirstNameFolded)),
        ]
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
        let Some(w) = WorkEntity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut values = FormValues::new();
        forms::put(&mut values, "name_work", w.name_work);
        forms::put_opt(&mut values, "address", w.address);
        forms::put(&mut values, "customer", w.customer_id);
        Ok(Some(values))
    }

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let work = ActiveModel {
            name_work: Set(form.required_text("name_work")?),
            address: Set(form.text("address")),
            customer_id: Set(form.required_id("customer")?),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = work.insert(db).await?;
        Ok(result.id)
    }

    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
        let existing = WorkEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut work: ActiveModel = existing.into();
        work.name_work = Set(form.required_text("name_work")?);
        work.address = Set(form.text("address"));
        work.customer_id = Set(form.required_id("customer")?);
        work.updated_at = Set(chrono::Utc::now().to_rfc3339());

        work.update(db).await?;
        Ok(())
    }
}
