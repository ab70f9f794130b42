//! Repository trait definitions
//!
//! One dyn-compatible contract serves every CRUD screen. A resource is
//! described by a static `ResourceDescriptor`; implementations live in the
//! infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::forms::{FieldSpec, FormValues};
use super::listing::{ListParams, PageInfo};
use super::DomainError;

/// Static description of a CRUD resource: routes, form schema and the
/// notifications shown after a successful write.
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Singular machine name, e.g. `"person"`
    pub name: &'static str,
    /// Route prefix without trailing slash, e.g. `"/people"`
    pub base_path: &'static str,
    pub fields: &'static [FieldSpec],
    pub created_message: &'static str,
    pub updated_message: &'static str,
    /// Whether the list understands the status flags
    pub status_filter: bool,
}

impl ResourceDescriptor {
    pub fn list_path(&self) -> String {
        format!("{}/", self.base_path)
    }

    pub fn detail_path(&self, id: i32) -> String {
        format!("{}/{}/", self.base_path, id)
    }

    pub fn new_path(&self) -> String {
        format!("{}/new/", self.base_path)
    }

    pub fn edit_path(&self, id: i32) -> String {
        format!("{}/{}/edit/", self.base_path, id)
    }
}

/// One page of a list screen
#[derive(Debug, Serialize)]
pub struct ListPage {
    pub object_list: Vec<Value>,
    /// Rows in the filtered set, across all pages
    pub count: u64,
    pub page: PageInfo,
    pub search_box: Option<String>,
    /// Status code applied from a list flag, if any
    pub active_status: Option<&'static str>,
    /// Codes selectable as list flags, in priority order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_list: Option<Vec<&'static str>>,
}

/// Selectable option for a reference or code field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// Options per field name
pub type Choices = BTreeMap<&'static str, Vec<Choice>>;

/// Repository contract shared by every CRUD resource
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    fn descriptor(&self) -> &'static ResourceDescriptor;

    /// Filtered, paginated listing
    async fn list(&self, params: &ListParams) -> Result<ListPage, DomainError>;

    /// Find a single record by ID, with its related display data
    async fn find(&self, id: i32) -> Result<Option<Value>, DomainError>;

    /// Current values of a record, shaped as form input
    async fn form_values(&self, id: i32) -> Result<Option<FormValues>, DomainError>;

    /// Options for the reference and code fields of the form
    async fn choices(&self) -> Result<Choices, DomainError>;

    /// Validate and insert; returns the new ID
    async fn create(&self, values: &FormValues) -> Result<i32, DomainError>;

    /// Validate and update in place
    async fn update(&self, id: i32, values: &FormValues) -> Result<(), DomainError>;
}
