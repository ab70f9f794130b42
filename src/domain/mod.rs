//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only trait definitions, resource descriptors, list/form rules and
//! domain error types.

pub mod errors;
pub mod forms;
pub mod listing;
pub mod repositories;

pub use errors::DomainError;
pub use forms::{CleanedForm, FieldErrors, FieldKind, FieldSpec, FormValues, Reference};
pub use listing::{ListParams, PAGE_SIZE, PageInfo, STATUS_FLAGS, fold_case};
pub use repositories::*;
