//! Services Layer
//!
//! Business operations that span more than one record and so do not fit the
//! generic CRUD repositories.

pub mod proposal_service;

pub use proposal_service::promote_entry;
