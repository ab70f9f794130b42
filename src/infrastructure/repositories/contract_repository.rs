//! Contracts; at most one per proposal

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, Select, Set,
};
use serde::Serialize;

use super::resource::ResourceModel;
use super::search::{aliased, left_join_as};
use crate::domain::forms::{self, CleanedForm, FieldSpec, Reference};
use crate::domain::{DomainError, FieldErrors, FormValues, ResourceDescriptor};
use crate::models::contract::{self, ActiveModel, Entity as ContractEntity};
use crate::models::{person, proposal};

pub const MSG_DUPLICATE_CONTRACT: &str = "Já existe um contrato para esta proposta.";

pub const CONTRACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::reference("proposal", "Proposta", Reference::Proposal).required(),
    FieldSpec::reference("contractor", "Contratante", Reference::Person),
    FieldSpec::decimal("contract_value", "Valor do contrato"),
    FieldSpec::checkbox("is_canceled", "Cancelado"),
    FieldSpec::text("description", "Descrição"),
];

pub static CONTRACT: ResourceDescriptor = ResourceDescriptor {
    name: "contract",
    base_path: "/contracts",
    fields: CONTRACT_FIELDS,
    created_message: "Contrato criado!",
    updated_message: "Contrato atualizado!",
    status_filter: false,
};

#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct ContractRow {
    pub id: i32,
    pub proposal_id: i32,
    pub num_prop: Option<i32>,
    pub contractor_id: Option<i32>,
    pub contractor_name: Option<String>,
    pub contract_value: Option<f64>,
    pub is_canceled: bool,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct ContractResource;

#[async_trait]
impl ResourceModel for ContractResource {
    type Entity = ContractEntity;
    type Row = ContractRow;

    const DESCRIPTOR: &'static ResourceDescriptor = &CONTRACT;

    fn select() -> Select<ContractEntity> {
        let select = ContractEntity::find()
            .select_only()
            .columns([
                contract::Column::Id,
                contract::Column::ProposalId,
                contract::Column::ContractorId,
                contract::Column::ContractValue,
                contract::Column::IsCanceled,
                contract::Column::Description,
                contract::Column::CreatedAt,
                contract::Column::UpdatedAt,
            ])
            .column_as(aliased("proposal", proposal::Column::NumProp), "num_prop")
            .column_as(aliased("contractor", person::Column::FirstName), "contractor_name");

        let select = left_join_as(
            select,
            proposal::Entity,
            "proposal",
            proposal::Column::Id,
            (ContractEntity, contract::Column::ProposalId),
        );
        left_join_as(
            select,
            person::Entity,
            "contractor",
            person::Column::Id,
            (ContractEntity, contract::Column::ContractorId),
        )
    }

    fn id_column() -> contract::Column {
        contract::Column::Id
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
        let Some(c) = ContractEntity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut values = FormValues::new();
        forms::put(&mut values, "proposal", c.proposal_id);
        forms::put_opt(&mut values, "contractor", c.contractor_id);
        forms::put_opt(&mut values, "contract_value", c.contract_value);
        forms::put_flag(&mut values, "is_canceled", c.is_canceled);
        forms::put_opt(&mut values, "description", c.description);
        Ok(Some(values))
    }

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let contract = ActiveModel {
            proposal_id: Set(form.required_id("proposal")?),
            contractor_id: Set(form.id("contractor")),
            contract_value: Set(form.decimal("contract_value")),
            is_canceled: Set(form.flag("is_canceled")),
            description: Set(form.text("description")),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = contract.insert(db).await?;
        Ok(result.id)
    }

    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
        let existing = ContractEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut contract: ActiveModel = existing.into();
        contract.proposal_id = Set(form.required_id("proposal")?);
        contract.contractor_id = Set(form.id("contractor"));
        contract.contract_value = Set(form.decimal("contract_value"));
        contract.is_canceled = Set(form.flag("is_canceled"));
        contract.description = Set(form.text("description"));
        contract.updated_at = Set(chrono::Utc::now().to_rfc3339());

        contract.update(db).await?;
        Ok(())
    }

    async fn check_unique(
        db: &DatabaseConnection,
        id: Option<i32>,
        form: &CleanedForm,
        errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        let Some(proposal_id) = form.id("proposal") else {
            return Ok(());
        };

        let mut query = ContractEntity::find().filter(contract::Column::ProposalId.eq(proposal_id));
        if let Some(id) = id {
            query = query.filter(contract::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            forms::add_error(errors, "proposal", MSG_DUPLICATE_CONTRACT);
        }
        Ok(())
    }
}
