//! Repository implementations using SeaORM

pub mod contract_repository;
pub mod counter;
pub mod entry_repository;
pub mod person_repository;
pub mod proposal_repository;
pub mod references;
pub mod resource;
pub mod search;
pub mod work_repository;

pub use contract_repository::ContractResource;
pub use entry_repository::EntryResource;
pub use person_repository::{CustomerResource, PersonResource};
pub use proposal_repository::ProposalResource;
pub use resource::{ResourceModel, SeaOrmResourceRepository};
pub use work_repository::WorkResource;
