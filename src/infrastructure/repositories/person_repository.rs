//! People and customers
//!
//! Both screens share the `people` table and the same restricted form; the
//! customer screen is scoped to `person_type = 'c'`.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select, Set,
};

use super::resource::ResourceModel;
use super::search::{SearchField, qualified};
use crate::domain::forms::{self, CleanedForm, FieldSpec};
use crate::domain::{DomainError, FormValues, ResourceDescriptor};
use crate::models::person::{
    self, ActiveModel, Entity as PersonEntity, PERSON_TYPE_CUSTOMER, PERSON_TYPE_PERSON,
};

pub const PERSON_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("first_name", "Nome").required(),
    FieldSpec::text("last_name", "Sobrenome"),
    FieldSpec::text("company", "Empresa"),
    FieldSpec::email("email", "E-mail"),
    FieldSpec::text("phone", "Telefone"),
];

pub static PERSON: ResourceDescriptor = ResourceDescriptor {
    name: "person",
    base_path: "/people",
    fields: PERSON_FIELDS,
    created_message: "Pessoa criada!",
    updated_message: "Pessoa atualizada!",
    status_filter: false,
};

pub static CUSTOMER: ResourceDescriptor = ResourceDescriptor {
    name: "customer",
    base_path: "/customers",
    fields: PERSON_FIELDS,
    created_message: "Cliente criado!",
    updated_message: "Cliente atualizado!",
    status_filter: false,
};

pub struct PersonResource;

pub struct CustomerResource;

#[async_trait]
impl ResourceModel for PersonResource {
    type Entity = PersonEntity;
    type Row = person::Model;

    const DESCRIPTOR: &'static ResourceDescriptor = &PERSON;

    fn select() -> Select<PersonEntity> {
        PersonEntity::find()
    }

    fn id_column() -> person::Column {
        person::Column::Id
    }

    fn search_fields() -> Vec<SearchField> {
        person_search_fields()
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
        load_person_form(db, id).await
    }

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError> {
        insert_person(db, form, PERSON_TYPE_PERSON).await
    }

    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
        update_person(db, id, form).await
    }
}

#[async_trait]
impl ResourceModel for CustomerResource {
    type Entity = PersonEntity;
    type Row = person::Model;

    const DESCRIPTOR: &'static ResourceDescriptor = &CUSTOMER;

    fn select() -> Select<PersonEntity> {
        PersonEntity::find().filter(person::Column::PersonType.eq(PERSON_TYPE_CUSTOMER))
    }

    fn id_column() -> person::Column {
        person::Column::Id
    }

    fn search_fields() -> Vec<SearchField> {
        person_search_fields()
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
        load_person_form(db, id).await
    }

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError> {
        insert_person(db, form, PERSON_TYPE_CUSTOMER).await
    }

    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
        update_person(db, id, form).await
    }
}

fn person_search_fields() -> Vec<SearchField> {
    vec![
        SearchField::contains(qualified(PersonEntity, person::Column::FirstNameFolded)),
        SearchField::contains(qualified(PersonEntity, person::Column::CompanyFolded)),
    ]
}

async fn load_person_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError> {
    let Some(p) = PersonEntity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut values = FormValues::new();
    forms::put(&mut values, "first_name", p.first_name);
    forms::put_opt(&mut values, "last_name", p.last_name);
    forms::put_opt(&mut values, "company", p.company);
    forms::put_opt(&mut values, "email", p.email);
    forms::put_opt(&mut values, "phone", p.phone);
    Ok(Some(values))
}

async fn insert_person(
    db: &DatabaseConnection,
    form: &CleanedForm,
    person_type: &str,
) -> Result<i32, DomainError> {
    let now = chrono::Utc::now().to_rfc3339();

    let person = ActiveModel {
        first_name: Set(form.required_text("first_name")?),
        last_name: Set(form.text("last_name")),
        company: Set(form.text("company")),
        email: Set(form.text("email")),
        phone: Set(form.text("phone")),
        person_type: Set(person_type.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = person.insert(db).await?;
    Ok(result.id)
}

// person_type is never editable through the form
async fn update_person(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError> {
    let existing = PersonEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut person: ActiveModel = existing.into();
    person.first_name = Set(form.required_text("first_name")?);
    person.last_name = Set(form.text("last_name"));
    person.company = Set(form.text("company"));
    person.email = Set(form.text("email"));
    person.phone = Set(form.text("phone"));
    person.updated_at = Set(chrono::Utc::now().to_rfc3339());

    person.update(db).await?;
    Ok(())
}
