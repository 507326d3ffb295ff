//! Boundary between the sweep engine and a provisioning API.
//!
//! A [`ResourceApi`] binds one resource type to an already-configured
//! regional client. The engine only ever lists, describes, and deletes
//! through it, so every resource type shares the same enumeration,
//! filtering, and orchestration code.

mod errors;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

pub use errors::{ApiError, ApiErrorKind};

/// One listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Opaque continuation cursor from the previous page; `None` for the first page.
    pub cursor: Option<String>,
    pub page_size: u32,
}

/// One page of raw identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub identifiers: Vec<String>,
    /// `None` (or an empty cursor) marks the last page.
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn new(identifiers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            next_cursor: None,
        }
    }

    pub fn with_next_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }
}

/// Who controls the resource's lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagedBy {
    /// Created by an account principal, e.g. a test run.
    #[default]
    Customer,
    /// Owned by the platform itself; never ours to delete.
    Platform,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Active,
    /// Teardown is already in progress.
    PendingDeletion,
    /// Any other provider-specific state, kept verbatim.
    Other(String),
}

/// A described resource that has not yet been qualified for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    id: String,
    managed_by: ManagedBy,
    lifecycle: LifecycleState,
    attributes: BTreeMap<String, String>,
}

impl Candidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            managed_by: ManagedBy::default(),
            lifecycle: LifecycleState::default(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_managed_by(mut self, managed_by: ManagedBy) -> Self {
        self.managed_by = managed_by;
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: LifecycleState) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn managed_by(&self) -> ManagedBy {
        self.managed_by
    }

    pub fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

/// The minimal state a delete call needs: the identifier plus any fields the
/// provider insists on (for example a deletion window).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceData {
    id: String,
    fields: BTreeMap<String, FieldValue>,
}

impl ResourceData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(FieldValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }
}

/// Resource-type specific list/describe/delete logic bound to a regional client.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Registry name of the resource type, e.g. `aws_kms_key`.
    fn resource_type(&self) -> &str;

    /// Largest page size the listing call accepts.
    fn max_page_size(&self) -> u32;

    async fn list_page(&self, request: PageRequest) -> Result<Page, ApiError>;

    /// Fetch the current state of one resource. Must report a vanished
    /// resource as [`ApiErrorKind::NotFound`].
    async fn describe(&self, id: &str) -> Result<Candidate, ApiError>;

    /// Populate fields the delete call requires beyond the identifier.
    fn fill_defaults(&self, _candidate: &Candidate, _data: &mut ResourceData) {}

    async fn delete(&self, data: &ResourceData) -> Result<(), ApiError>;
}
