//! Foreign-key validation and select options for form fields

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::domain::forms::{self, FieldKind, FieldSpec, MSG_INVALID_CHOICE, Reference};
use crate::domain::{Choice, Choices, DomainError, FieldErrors};
use crate::models::person::PERSON_TYPE_CUSTOMER;
use crate::models::{category, employee, person, proposal, user, work};

/// Whether `id` names an existing row of the referenced table.
pub async fn exists(
    db: &DatabaseConnection,
    target: Reference,
    id: i32,
) -> Result<bool, DomainError> {
    let count = match target {
        Reference::Category => category::Entity::find_by_id(id).count(db).await?,
        Reference::Work => work::Entity::find_by_id(id).count(db).await?,
        Reference::Person => person::Entity::find_by_id(id).count(db).await?,
        Reference::Customer => {
            person::Entity::find_by_id(id)
                .filter(person::Column::PersonType.eq(PERSON_TYPE_CUSTOMER))
                .count(db)
                .await?
        }
        Reference::Employee => employee::Entity::find_by_id(id).count(db).await?,
        Reference::Proposal => proposal::Entity::find_by_id(id).count(db).await?,
    };
    Ok(count > 0)
}

/// Flag every reference that points at a missing row.
pub async fn check(
    db: &DatabaseConnection,
    references: &[(&'static str, Reference, i32)],
    errors: &mut FieldErrors,
) -> Result<(), DomainError> {
    for (field, target, id) in references {
        if !exists(db, *target, *id).await? {
            forms::add_error(errors, field, MSG_INVALID_CHOICE);
        }
    }
    Ok(())
}

/// Selectable rows of the referenced table
pub async fn options(db: &DatabaseConnection, target: Reference) -> Result<Vec<Choice>, DomainError> {
    let choices = match target {
        Reference::Category => category::Entity::find()
            .order_by_asc(category::Column::Category)
            .all(db)
            .await?
            .into_iter()
            .map(|c| choice(c.id, c.category))
            .collect(),
        Reference::Work => work::Entity::find()
            .order_by_asc(work::Column::NameWork)
            .all(db)
            .await?
            .into_iter()
            .map(|w| choice(w.id, w.name_work))
            .collect(),
        Reference::Person | Reference::Customer => {
            let mut query = person::Entity::find();
            if target == Reference::Customer {
                query = query.filter(person::Column::PersonType.eq(PERSON_TYPE_CUSTOMER));
            }
            query
                .order_by_asc(person::Column::FirstName)
                .all(db)
                .await?
                .into_iter()
                .map(|p| choice(p.id, person_label(&p)))
                .collect()
        }
        Reference::Employee => employee::Entity::find()
            .find_also_related(user::Entity)
            .order_by_asc(employee::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|(e, u)| {
                let label = u
                    .map(|u| {
                        if u.first_name.is_empty() {
                            u.username
                        } else {
                            u.first_name
                        }
                    })
                    .unwrap_or_else(|| format!("#{}", e.id));
                choice(e.id, label)
            })
            .collect(),
        Reference::Proposal => proposal::Entity::find()
            .order_by_desc(proposal::Column::NumProp)
            .all(db)
            .await?
            .into_iter()
            .map(|p| choice(p.id, format!("Proposta {} ({})", p.num_prop, p.type_prop)))
            .collect(),
    };
    Ok(choices)
}

/// Options for every reference and code field of a form schema
pub async fn choices(db: &DatabaseConnection, fields: &[FieldSpec]) -> Result<Choices, DomainError> {
    let mut choices = Choices::new();
    for field in fields {
        match field.kind {
            FieldKind::Reference { target } => {
                choices.insert(field.name, options(db, target).await?);
            }
            FieldKind::Choice { options } => {
                let codes = options
                    .iter()
                    .map(|code| Choice {
                        value: code.to_string(),
                        label: code.to_string(),
                    })
                    .collect();
                choices.insert(field.name, codes);
            }
            _ => {}
        }
    }
    Ok(choices)
}

fn choice(id: i32, label: String) -> Choice {
    Choice {
        value: id.to_string(),
        label,
    }
}

fn person_label(p: &person::Model) -> String {
    match (&p.last_name, &p.company) {
        (Some(last), Some(company)) => format!("{} {} ({})", p.first_name, last, company),
        (Some(last), None) => format!("{} {}", p.first_name, last),
        (None, Some(company)) => format!("{} ({})", p.first_name, company),
        (None, None) => p.first_name.clone(),
    }
}
