//! Sales proposals
//!
//! Numbers are allocated from the shared counter in the same transaction as
//! the insert; the list supports the status flags.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QuerySelect,
    Select, Set, TransactionTrait,
};
use serde::Serialize;

use super::counter;
use super::resource::ResourceModel;
use super::search::{SearchField, aliased, as_text, left_join_as, left_join_employee, qualified};
use crate::domain::forms::{self, CleanedForm, FieldSpec, Reference};
use crate::domain::{DomainError, FormValues, ResourceDescriptor};
use crate::models::proposal::{self, ActiveModel, Entity as ProposalEntity, STATUS_CODES};
use crate::models::{category, person, user, work};

pub const PROPOSAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("type_prop", "Tipo").required(),
    FieldSpec::choice("status", "Status", &STATUS_CODES).required(),
    FieldSpec::reference("category", "Categoria", Reference::Category).required(),
    FieldSpec::text("description", "Descrição"),
    FieldSpec::reference("work", "Obra", Reference::Work).required(),
    FieldSpec::reference("person", "Contato", Reference::Person).required(),
    FieldSpec::reference("employee", "Responsável", Reference::Employee).required(),
    FieldSpec::reference("seller", "Vendedor", Reference::Employee).required(),
    FieldSpec::decimal("price", "Valor"),
];

pub static PROPOSAL: ResourceDescriptor = ResourceDescriptor {
    name: "proposal",
    base_path: "/proposals",
    fields: PROPOSAL_FIELDS,
    created_message: "Proposta criada!",
    updated_message: "Proposta atualizada!",
    status_filter: true,
};

#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct ProposalRow {
    pub id: i32,
    pub num_prop: i32,
    pub type_prop: String,
    pub status: String,
    pub category_id: i32,
    pub category: Option<String>,
    pub description: Option<String>,
    pub work_id: i32,
    pub work_name: Option<String>,
    pub customer_name: Option<String>,
    pub person_id: i32,
    pub person_name: Option<String>,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub seller_id: i32,
    pub seller_name: Option<String>,
    pub entry_id: Option<i32>,
    pub price: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct ProposalResource;

#[async_trait]
impl ResourceModel for ProposalResource {
    type Entity = ProposalEntity;
    type Row = ProposalRow;

    const DESCRIPTOR: &'static ResourceDescriptor = &PROPOSAL;

    fn select() -> Select<ProposalEntity> {
        let select = ProposalEntity::find()
            .select_only()
            .columns([
                proposal::Column::Id,
                proposal::Column::NumProp,
                proposal::Column::TypeProp,
                proposal::Column::Status,
                proposal::Column::CategoryId,
                proposal::Column::Description,
                proposal::Column::WorkId,
                proposal::Column::PersonId,
                proposal::Column::EmployeeId,
                proposal::Column::SellerId,
                proposal::Column::EntryId,
                proposal::Column::Price,
                proposal::Column::CreatedAt,
                proposal::Column::UpdatedAt,
            ])
            .column_as(aliased("category", category::Column::Category), "category")
            .column_as(aliased("work", work::Column::NameWork), "work_name")
            .column_as(aliased("customer", person::Column::FirstName), "customer_name")
            .column_as(aliased("person", person::Column::FirstName), "person_name")
            .column_as(aliased("employee_user", user::Column::FirstName), "employee_name")
            .column_as(aliased("seller_user", user::Column::FirstName), "seller_name");

        let select = left_join_as(
            select,
            category::Entity,
            "category",
            category::Column::Id,
            (ProposalEntity, proposal::Column::CategoryId),
        );
        let select = left_join_as(
            select,
            work::Entity,
            "work",
            work::Column::Id,
            (ProposalEntity, proposal::Column::WorkId),
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
            (ProposalEntity, proposal::Column::PersonId),
        );
        let select = left_join_employee(
            select,
            "employee",
            (ProposalEntity, proposal::Column::EmployeeId),
        );
        left_join_employee(select, "seller", (ProposalEntity, proposal::Column::SellerId))
    }

    fn id_column() -> proposal::Column {
        proposal::Column::Id
    }

    fn search_fields() -> Vec<SearchField> {
        vec![
            SearchField::contains(as_text(qualified(ProposalEntity, proposal::Column::Id))),
            SearchField::contains(aliased("work", work::Column::NameWorkFolded)),
            SearchField::contains(aliased("customer", person::Column::FirstNameFolded)),
            SearchField::prefix(aliased("category", category::Column::Category)),
            SearchField::prefix(aliased("employee_user", user::Column::FirstName)),
            SearchField::prefix(aliased("seller_user", user::Column::FirstName)),
        ]
    }

    fn status_condition(code: &'static str) -> Option<SimpleExpr> {
        Some(proposal::Column::Status.eq(code))
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
        let Some(p) = ProposalEntity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut values = FormValues::new();
        forms::put(&mut values, "type_prop", p.type_prop);
        forms::put(&mut values, "status", p.status);
        forms::put(&mut values, "category", p.category_id);
        forms::put_opt(&mut values, "description", p.description);
        forms::put(&mut values, "work", p.work_id);
        forms::put(&mut values, "person", p.person_id);
        forms::put(&mut values, "employee", p.employee_id);
        forms::put(&mut values, "seller", p.seller_id);
        forms::put_opt(&mut values, "price", p.price);
        Ok(Some(values))
    }

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = db.begin().await?;

        let num_prop = counter::allocate_next(&txn).await?;
        let proposal = ActiveModel {
            num_prop: Set(num_prop),
            type_prop: Set(form.required_text("type_prop")?),
            status: Set(form.required_text("status")?),
            category_id: Set(form.required_id("category")?),
            description: Set(form.text("description")),
            work_id: Set(form.required_id("work")?),
            person_id: Set(form.required_id("person")?),
            employee_id: Set(form.required_id("employee")?),
            seller_id: Set(form.required_id("seller")?),
            entry_id: Set(None),
            price: Set(form.decimal("price")),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = proposal.insert(&txn).await?;
        txn.commit().await?;

        tracing::debug!("Allocated proposal number {}", num_prop);
        Ok(result.id)
    }

    // num_prop and the entry link are never rewritten from the form
    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
        let existing = ProposalEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut proposal: ActiveModel = existing.into();
        proposal.type_prop = Set(form.required_text("type_prop")?);
        proposal.status = Set(form.required_text("status")?);
        proposal.category_id = Set(form.required_id("category")?);
        proposal.description = Set(form.text("description"));
        proposal.work_id = Set(form.required_id("work")?);
        proposal.person_id = Set(form.required_id("person")?);
        proposal.employee_id = Set(form.required_id("employee")?);
        proposal.seller_id = Set(form.required_id("seller")?);
        proposal.price = Set(form.decimal("price"));
        proposal.updated_at = Set(chrono::Utc::now().to_rfc3339());

        proposal.update(db).await?;
        Ok(())
    }
}
