//! Proposal Service - promotes intake entries into numbered proposals

use sea_orm::*;

use crate::domain::DomainError;
use crate::infrastructure::repositories::counter;
use crate::models::entry::{self, Entity as Entry};
use crate::models::proposal::{self, DEFAULT_STATUS, PROMOTED_TYPE};
use crate::models::{employee, user};

/// Turn an entry into a proposal owned by the logged-in employee.
///
/// Runs in one transaction: counter increment, proposal insert and the
/// entry's `is_entry` flag commit together or not at all.
pub async fn promote_entry(
    db: &DatabaseConnection,
    entry_id: i32,
    username: &str,
) -> Result<proposal::Model, DomainError> {
    let txn = db.begin().await?;

    let entry = Entry::find_by_id(entry_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound)?;

    if entry.is_entry {
        return Err(DomainError::Conflict(format!(
            "entry {} was already promoted",
            entry_id
        )));
    }

    let employee_id = employee_for(&txn, username).await?.ok_or_else(|| {
        DomainError::Forbidden(format!("user '{}' has no employee record", username))
    })?;

    let num_prop = counter::allocate_next(&txn).await?;
    let now = chrono::Utc::now().to_rfc3339();

    let proposal = proposal::ActiveModel {
        num_prop: Set(num_prop),
        type_prop: Set(PROMOTED_TYPE.to_string()),
        status: Set(DEFAULT_STATUS.to_string()),
        category_id: Set(entry.category_id),
        description: Set(entry.description.clone()),
        work_id: Set(entry.work_id),
        person_id: Set(entry.person_id),
        employee_id: Set(employee_id),
        seller_id: Set(entry.seller_id),
        entry_id: Set(Some(entry.id)),
        price: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut promoted: entry::ActiveModel = entry.into();
    promoted.is_entry = Set(true);
    promoted.updated_at = Set(now);
    promoted.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Entry #{} promoted to proposal {} by {}",
        entry_id,
        num_prop,
        username
    );
    Ok(proposal)
}

async fn employee_for<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> Result<Option<i32>, DomainError> {
    let Some(user) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let employee = employee::Entity::find()
        .filter(employee::Column::UserId.eq(user.id))
        .one(conn)
        .await?;

    Ok(employee.map(|e| e.id))
}
