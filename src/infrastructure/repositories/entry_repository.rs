//! Intake entries
//!
//! Lists only entries that have not been promoted to a proposal yet.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    QuerySelect, Select, Set,
};
use serde::Serialize;

use super::resource::ResourceModel;
use super::search::{SearchField, aliased, left_join_as, left_join_employee};
use crate::domain::forms::{self, CleanedForm, FieldSpec, Reference};
use crate::domain::{DomainError, FormValues, ResourceDescriptor};
use crate::models::entry::{self, ActiveModel, Entity as EntryEntity};
use crate::models::{category, person, user, work};

pub const ENTRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("category", "Categoria", Reference::Category).required(),
    FieldSpec::text("description", "Descrição"),
    FieldSpec::reference("work", "Obra", Reference::Work).required(),
    FieldSpec::reference("person", "Contato", Reference::Person).required(),
    FieldSpec::reference("seller", "Vendedor", Reference::Employee).required(),
    FieldSpec::checkbox("is_entry", "Convertida em proposta"),
];

pub static ENTRY: ResourceDescriptor = ResourceDescriptor {
    name: "entry",
    base_path: "/entries",
    fields: ENTRY_FIELDS,
    created_message: "Entrada criada!",
    updated_message: "Entrada atualizada!",
    status_filter: false,
};

#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct EntryRow {
    pub id: i32,
    pub category_id: i32,
    pub category: Option<String>,
    pub description: Option<String>,
    pub work_id: i32,
    pub work_name: Option<String>,
    pub customer_name: Option<String>,
    pub person_id: i32,
    pub person_name: Option<String>,
    pub seller_id: i32,
    pub seller_name: Option<String>,
    pub is_entry: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct EntryResource;

#[async_trait]
impl ResourceModel for EntryResource {
    type Entity = EntryEntity;
    type Row = EntryRow;

    const DESCRIPTOR: &'static ResourceDescriptor = &ENTRY;

    fn select() -> Select<EntryEntity> {
        let select = EntryEntity::find()
            .select_only()
            .columns([
                entry::Column::Id,
                entry::Column::CategoryId,
                entry::Column::Description,
                entry::Column::WorkId,
                entry::Column::PersonId,
                entry::Column::SellerId,
                entry::Column::IsEntry,
                entry::Column::CreatedAt,
                entry::Column::UpdatedAt,
            ])
            .column_as(aliased("category", category::Column::Category), "category")
            .column_as(aliased("work", work::Column::NameWork), "work_name")
            .column_as(aliased("customer", person::Column::FirstName), "customer_name")
            .column_as(aliased("person", person::Column::FirstName), "person_name")
            .column_as(aliased("seller_user", user::Column::FirstName), "seller_name");

        let select = left_join_as(
            select,
            category::Entity,
            "category",
            category::Column::Id,
            (EntryEntity, entry::Column::CategoryId),
        );
        let select = left_join_as(
            select,
            work::Entity,
            "work",
            work::Column::Id,
            (EntryEntity, entry::Column::WorkId),
        );
        let select = left_join_as(
            select,
            person::Entity,
            "customer",
            person::Column::Id,
            (Alias::new("work"), work::Column::CustomerId),
        );
        let select = left_join_as(
            select,
            person::Entity,
            "person",
            person::Column::Id,
            (EntryEntity, entry::Column::PersonId),
        );
        left_join_employee(select, "seller", (EntryEntity, entry::Column::SellerId))
    }

    fn id_column() -> entry::Column {
        entry::Column::Id
    }

    /// Promoted entries drop off the list but stay reachable by id
    fn list_scope() -> Option<SimpleExpr> {
        Some(entry::Column::IsEntry.eq(false))
    }

    fn search_fields() -> Vec<SearchField> {
        vec![
            SearchField::contains(aliased("work", work::Column::NameWorkFolded)),
            SearchField::contains(aliased("customer", person::Column::FirstNameFolded)),
        ]
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
        let Some(e) = EntryEntity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut values = FormValues::new();
        forms::put(&mut values, "category", e.category_id);
        forms::put_opt(&mut values, "description", e.description);
        forms::put(&mut values, "work", e.work_id);
        forms::put(&mut values, "person", e.person_id);
        forms::put(&mut values, "seller", e.seller_id);
        forms::put_flag(&mut values, "is_entry", e.is_entry);
        Ok(Some(values))
    }

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let entry = ActiveModel {
            category_id: Set(form.required_id("category")?),
            description: Set(form.text("description")),
            work_id: Set(form.required_id("work")?),
            person_id: Set(form.required_id("person")?),
            seller_id: Set(form.required_id("seller")?),
            is_entry: Set(form.flag("is_entry")),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = entry.insert(db).await?;
        Ok(result.id)
    }

    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
        let existing = EntryEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut entry: ActiveModel = existing.into();
        entry.category_id = Set(form.required_id("category")?);
        entry.description = Set(form.text("description"));
        entry.work_id = Set(form.required_id("work")?);
        entry.person_id = Set(form.required_id("person")?);
        entry.seller_id = Set(form.required_id("seller")?);
        entry.is_entry = Set(form.flag("is_entry"));
        entry.updated_at = Set(chrono::Utc::now().to_rfc3339());

        entry.update(db).await?;
        Ok(())
    }
}
