//! Proposal number allocation

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::domain::DomainError;
use crate::models::num_last_proposal::{self, COUNTER_ID};

/// Issue the next proposal number.
///
/// Must run inside the transaction that inserts the proposal consuming the
/// number. The increment is written before the value is read back, so the
/// store's write lock serialises concurrent allocators.
pub async fn allocate_next<C: ConnectionTrait>(conn: &C) -> Result<i32, DomainError> {
    let result = num_last_proposal::Entity::update_many()
        .col_expr(
            num_last_proposal::Column::NumLastProp,
            Expr::col(num_last_proposal::Column::NumLastProp).add(1),
        )
        .filter(num_last_proposal::Column::Id.eq(COUNTER_ID))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::Internal(
            "proposal counter row is missing".to_string(),
        ));
    }

    let counter = num_last_proposal::Entity::find_by_id(COUNTER_ID)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::Internal("proposal counter row is missing".to_string()))?;

    Ok(counter.num_last_prop)
}
