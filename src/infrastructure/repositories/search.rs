//! Free-text search conditions and aliased joins shared by the resource
//! repositories.

use sea_orm::sea_query::{
    Alias, Expr, Func, IntoColumnRef, IntoIden, IntoTableRef, JoinType, LikeExpr, SimpleExpr,
};
use sea_orm::{Condition, EntityTrait, QueryTrait, Select};

use crate::domain::fold_case;
use crate::models::{employee, user};

const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring; the expression must already hold
    /// `fold_case`d text
    Contains,
    /// Starts with the query
    Prefix,
}

/// A searchable expression and how the query is matched against it
#[derive(Debug, Clone)]
pub struct SearchField {
    pub expr: SimpleExpr,
    pub mode: MatchMode,
}

impl SearchField {
    pub fn contains(expr: SimpleExpr) -> Self {
        Self {
            expr,
            mode: MatchMode::Contains,
        }
    }

    pub fn prefix(expr: SimpleExpr) -> Self {
        Self {
            expr,
            mode: MatchMode::Prefix,
        }
    }
}

/// OR of every field matched against `query`.
pub fn search_condition(fields: &[SearchField], query: &str) -> Condition {
    let escaped = escape_like(query);
    let folded = escape_like(&fold_case(query));

    fields.iter().fold(Condition::any(), |cond, field| {
        let matcher = match field.mode {
            MatchMode::Contains => Expr::expr(field.expr.clone())
                .like(LikeExpr::new(format!("%{}%", folded)).escape(LIKE_ESCAPE)),
            MatchMode::Prefix => Expr::expr(field.expr.clone())
                .like(LikeExpr::new(format!("{}%", escaped)).escape(LIKE_ESCAPE)),
        };
        cond.add(matcher)
    })
}

/// Escape LIKE wildcards so user input only ever matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `table.column`
pub fn qualified<T, C>(table: T, column: C) -> SimpleExpr
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Expr::col((table, column)).into()
}

/// Column of a table joined under `alias`
pub fn aliased<C: IntoIden + 'static>(alias: &str, column: C) -> SimpleExpr {
    qualified(Alias::new(alias), column)
}

/// `CAST(expr AS TEXT)`, for substring search over numeric columns
pub fn as_text(expr: SimpleExpr) -> SimpleExpr {
    Func::cast_as(expr, Alias::new("TEXT")).into()
}

/// `LEFT JOIN table AS alias ON alias.key = from`
pub fn left_join_as<E, T, K, F>(mut select: Select<E>, table: T, alias: &str, key: K, from: F) -> Select<E>
where
    E: EntityTrait,
    T: IntoTableRef,
    K: IntoIden + 'static,
    F: IntoColumnRef,
{
    let on = Expr::col((Alias::new(alias), key)).equals(from);
    QueryTrait::query(&mut select).join_as(JoinType::LeftJoin, table, Alias::new(alias), on);
    select
}

/// Join an employee under `alias` and its user under `<alias>_user`, so the
/// employee's display name is `<alias>_user.first_name`.
pub fn left_join_employee<E, F>(select: Select<E>, alias: &str, from: F) -> Select<E>
where
    E: EntityTrait,
    F: IntoColumnRef,
{
    let select = left_join_as(select, employee::Entity, alias, employee::Column::Id, from);
    left_join_as(
        select,
        user::Entity,
        &format!("{}_user", alias),
        user::Column::Id,
        (Alias::new(alias), employee::Column::UserId),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::person;
    use sea_orm::sea_query::{QueryStatementWriter, SqliteQueryBuilder};
    use sea_orm::{DbBackend, QueryFilter};

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_search_condition_ors_every_field() {
        let fields = vec![
            SearchField::contains(qualified(person::Entity, person::Column::FirstNameFolded)),
            SearchField::prefix(qualified(person::Entity, person::Column::Company)),
        ];

        let sql = person::Entity::find()
            .filter(search_condition(&fields, "ANA"))
            .into_query()
            .to_string(SqliteQueryBuilder);

        assert!(sql.contains("\"people\".\"first_name_folded\" LIKE '%ana%'"), "{sql}");
        assert!(sql.contains("\"people\".\"company\" LIKE 'ANA%'"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(!sql.contains("LOWER("), "{sql}");
    }

    #[test]
    fn test_left_join_as_uses_alias() {
        let select = left_join_as(
            crate::models::work::Entity::find(),
            person::Entity,
            "customer",
            person::Column::Id,
            (crate::models::work::Entity, crate::models::work::Column::CustomerId),
        );

        let sql = select.build(DbBackend::Sqlite).to_string();
        assert!(
            sql.contains("LEFT JOIN \"people\" AS \"customer\" ON \"customer\".\"id\" = \"works\".\"customer_id\""),
            "{sql}"
        );
    }

    #[test]
    fn test_left_join_employee_chains_user() {
        let select = left_join_employee(
            crate::models::entry::Entity::find(),
            "seller",
            (crate::models::entry::Entity, crate::models::entry::Column::SellerId),
        );

        let sql = select.build(DbBackend::Sqlite).to_string();
        assert!(sql.contains("LEFT JOIN \"employees\" AS \"seller\""), "{sql}");
        assert!(
            sql.contains("LEFT JOIN \"users\" AS \"seller_user\" ON \"seller_user\".\"id\" = \"seller\".\"user_id\""),
            "{sql}"
        );
    }
}
