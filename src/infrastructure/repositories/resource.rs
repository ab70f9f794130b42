//! Generic SeaORM repository shared by every CRUD resource
//!
//! A resource plugs in through `ResourceModel`: its joined select, search
//! fields and the typed insert/update. Listing, lookup, validation and
//! choices are implemented once here.

use async_trait::async_trait;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

use super::references;
use super::search::{SearchField, search_condition};
use crate::domain::forms::{self, CleanedForm};
use crate::domain::{
    Choices, DomainError, FieldErrors, FormValues, ListPage, ListParams, PAGE_SIZE, PageInfo,
    ResourceDescriptor, STATUS_FLAGS, ResourceRepository,
};

/// Per-resource persistence hooks
#[async_trait]
pub trait ResourceModel: Send + Sync + 'static {
    type Entity: EntityTrait;
    /// Display row produced by `select`
    type Row: FromQueryResult + Serialize + Send + Sync + 'static;

    const DESCRIPTOR: &'static ResourceDescriptor;

    /// Base query: joins needed for display and search, plus any scope
    fn select() -> Select<Self::Entity>;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// Extra condition for the list screen only. Detail and edit still reach
    /// every row `select` returns.
    fn list_scope() -> Option<SimpleExpr> {
        None
    }

    fn search_fields() -> Vec<SearchField> {
        Vec::new()
    }

    /// Condition selected by a list status flag; `None` when the resource
    /// has no status filter.
    fn status_condition(_code: &'static str) -> Option<SimpleExpr> {
        None
    }

    async fn load_form(db: &DatabaseConnection, id: i32) -> Result<Option<FormValues>, DomainError>;

    async fn insert(db: &DatabaseConnection, form: &CleanedForm) -> Result<i32, DomainError>;

    async fn update(db: &DatabaseConnection, id: i32, form: &CleanedForm) -> Result<(), DomainError>;

    /// Uniqueness rules that need the store; `id` is `None` on create.
    async fn check_unique(
        _db: &DatabaseConnection,
        _id: Option<i32>,
        _form: &CleanedForm,
        _errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// SeaORM-based implementation of ResourceRepository for any `ResourceModel`
pub struct SeaOrmResourceRepository<R> {
    db: DatabaseConnection,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ResourceModel> SeaOrmResourceRepository<R> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _resource: PhantomData,
        }
    }

    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = R::select()
            .filter(R::id_column().eq(id))
            .into_model::<R::Row>()
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn validate(&self, id: Option<i32>, values: &FormValues) -> Result<CleanedForm, DomainError> {
        let (cleaned, mut errors) = forms::clean(R::DESCRIPTOR.fields, values);
        references::check(&self.db, cleaned.references(), &mut errors).await?;
        R::check_unique(&self.db, id, &cleaned, &mut errors).await?;

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            tracing::debug!(
                "Rejected {} form: {:?}",
                R::DESCRIPTOR.name,
                errors.keys().collect::<Vec<_>>()
            );
            Err(DomainError::Validation(errors))
        }
    }
}

#[async_trait]
impl<R: ResourceModel> ResourceRepository for SeaOrmResourceRepository<R> {
    fn descriptor(&self) -> &'static ResourceDescriptor {
        R::DESCRIPTOR
    }

    async fn list(&self, params: &ListParams) -> Result<ListPage, DomainError> {
        let mut query = R::select();
        if let Some(scope) = R::list_scope() {
            query = query.filter(scope);
        }
        let mut active_status = None;

        // A status flag replaces the free-text search for this request
        let status = params
            .status_flag()
            .filter(|_| R::DESCRIPTOR.status_filter)
            .and_then(|code| R::status_condition(code).map(|cond| (code, cond)));

        if let Some((code, cond)) = status {
            query = query.filter(cond);
            active_status = Some(code);
        } else if let Some(q) = params.search() {
            let fields = R::search_fields();
            if !fields.is_empty() {
                query = query.filter(search_condition(&fields, q));
            }
        }

        let paginator = query
            .order_by_asc(R::id_column())
            .into_model::<R::Row>()
            .paginate(&self.db, PAGE_SIZE);
        let count = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.page_index()).await?;

        tracing::debug!(
            "Listed {} page {} ({} of {} rows)",
            R::DESCRIPTOR.name,
            params.page,
            rows.len(),
            count
        );

        let object_list = rows
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;

        Ok(ListPage {
            object_list,
            count,
            page: PageInfo::new(params.page, count),
            search_box: params.search().map(str::to_string),
            active_status,
            status_list: R::DESCRIPTOR
                .status_filter
                .then(|| STATUS_FLAGS.iter().map(|(_, code)| *code).collect()),
        })
    }

    async fn find(&self, id: i32) -> Result<Option<Value>, DomainError> {
        let row = R::select()
            .filter(R::id_column().eq(id))
            .into_model::<R::Row>()
            .one(&self.db)
            .await?;

        Ok(row.map(serde_json::to_value).transpose()?)
    }

    async fn form_values(&self, id: i32) -> Result<Option<FormValues>, DomainError> {
        if !self.exists(id).await? {
            return Ok(None);
        }
        R::load_form(&self.db, id).await
    }

    async fn choices(&self) -> Result<Choices, DomainError> {
        references::choices(&self.db, R::DESCRIPTOR.fields).await
    }

    async fn create(&self, values: &FormValues) -> Result<i32, DomainError> {
        let cleaned = self.validate(None, values).await?;
        let id = R::insert(&self.db, &cleaned).await?;
        tracing::info!("Created {} #{}", R::DESCRIPTOR.name, id);
        Ok(id)
    }

    async fn update(&self, id: i32, values: &FormValues) -> Result<(), DomainError> {
        if !self.exists(id).await? {
            return Err(DomainError::NotFound);
        }
        let cleaned = self.validate(Some(id), values).await?;
        R::update(&self.db, id, &cleaned).await?;
        tracing::info!("Updated {} #{}", R::DESCRIPTOR.name, id);
        Ok(())
    }
}
