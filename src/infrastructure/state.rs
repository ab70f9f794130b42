//! Application state containing repositories and shared resources

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::ResourceRepository;
use crate::infrastructure::auth::SessionKeys;
use crate::infrastructure::repositories::{
    ContractResource, CustomerResource, EntryResource, PersonResource, ProposalResource,
    ResourceModel, SeaOrmResourceRepository, WorkResource,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub keys: SessionKeys,
    pub people: Arc<dyn ResourceRepository>,
    pub customers: Arc<dyn ResourceRepository>,
    pub works: Arc<dyn ResourceRepository>,
    pub entries: Arc<dyn ResourceRepository>,
    pub proposals: Arc<dyn ResourceRepository>,
    pub contracts: Arc<dyn ResourceRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, keys: SessionKeys) -> Self {
        Self {
            people: repository::<PersonResource>(&db),
            customers: repository::<CustomerResource>(&db),
            works: repository::<WorkResource>(&db),
            entries: repository::<EntryResource>(&db),
            proposals: repository::<ProposalResource>(&db),
            contracts: repository::<ContractResource>(&db),
            keys,
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Every CRUD resource, in menu order
    pub fn resources(&self) -> [Arc<dyn ResourceRepository>; 6] {
        [
            self.entries.clone(),
            self.people.clone(),
            self.customers.clone(),
            self.works.clone(),
            self.proposals.clone(),
            self.contracts.clone(),
        ]
    }
}

fn repository<R: ResourceModel>(db: &DatabaseConnection) -> Arc<dyn ResourceRepository> {
    Arc::new(SeaOrmResourceRepository::<R>::new(db.clone()))
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
