//! In-memory [`ResourceApi`] with scripted responses.
//!
//! Pages are addressed by position: the cursor handed out after page `n` is
//! `page-{n+1}`. Identifiers without a scripted describe result describe as a
//! plain customer-managed, active candidate. Deletes succeed unless scripted
//! to fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, Candidate, FieldValue, Page, PageRequest, ResourceApi, ResourceData};

pub struct FakeResourceApi {
    resource_type: String,
    max_page_size: u32,
    pages: Vec<Result<Vec<String>, ApiError>>,
    describes: HashMap<String, Result<Candidate, ApiError>>,
    delete_errors: HashMap<String, ApiError>,
    defaults: Vec<(String, FieldValue)>,
    describe_delay: Option<Duration>,
    delete_delay: Option<Duration>,
    list_calls: AtomicUsize,
    describe_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    deletes_in_flight: AtomicUsize,
    max_deletes_in_flight: AtomicUsize,
    last_page_size: AtomicU32,
    deleted: Mutex<Vec<ResourceData>>,
}

impl FakeResourceApi {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            max_page_size: 1000,
            pages: Vec::new(),
            describes: HashMap::new(),
            delete_errors: HashMap::new(),
            defaults: Vec::new(),
            describe_delay: None,
            delete_delay: None,
            list_calls: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            deletes_in_flight: AtomicUsize::new(0),
            max_deletes_in_flight: AtomicUsize::new(0),
            last_page_size: AtomicU32::new(0),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn with_page(mut self, identifiers: &[&str]) -> Self {
        let identifiers = identifiers.iter().map(|id| id.to_string()).collect();
        self.pages.push(Ok(identifiers));
        self
    }

    pub fn with_page_error(mut self, error: ApiError) -> Self {
        self.pages.push(Err(error));
        self
    }

    pub fn with_describe(mut self, id: &str, result: Result<Candidate, ApiError>) -> Self {
        self.describes.insert(id.to_string(), result);
        self
    }

    pub fn with_delete_error(mut self, id: &str, error: ApiError) -> Self {
        self.delete_errors.insert(id.to_string(), error);
        self
    }

    pub fn with_default(mut self, key: &str, value: FieldValue) -> Self {
        self.defaults.push((key.to_string(), value));
        self
    }

    pub fn with_describe_delay(mut self, delay: Duration) -> Self {
        self.describe_delay = Some(delay);
        self
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Highest number of deletes that were running at the same time.
    pub fn max_in_flight_deletes(&self) -> usize {
        self.max_deletes_in_flight.load(Ordering::SeqCst)
    }

    /// Page size passed to the most recent `list_page`.
    pub fn last_page_size(&self) -> u32 {
        self.last_page_size.load(Ordering::SeqCst)
    }

    /// Resource data of every successful delete, sorted by identifier.
    pub fn deleted(&self) -> Vec<ResourceData> {
        let mut deleted = self
            .deleted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        deleted.sort_by(|a, b| a.id().cmp(b.id()));
        deleted
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted().iter().map(|d| d.id().to_string()).collect()
    }
}

#[async_trait]
impl ResourceApi for FakeResourceApi {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    async fn list_page(&self, request: PageRequest) -> Result<Page, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.last_page_size.store(request.page_size, Ordering::SeqCst);

        let index = match request.cursor.as_deref() {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ApiError::other("ListPage", format!("bad cursor {}", cursor)))?,
        };

        let Some(scripted) = self.pages.get(index) else {
            return Ok(Page::default());
        };
        let identifiers = scripted.clone()?;

        let mut page = Page {
            identifiers,
            next_cursor: None,
        };
        if index + 1 < self.pages.len() {
            page = page.with_next_cursor(format!("page-{}", index + 1));
        }
        Ok(page)
    }

    async fn describe(&self, id: &str) -> Result<Candidate, ApiError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.describe_delay {
            tokio::time::sleep(delay).await;
        }
        match self.describes.get(id) {
            Some(result) => result.clone(),
            None => Ok(Candidate::new(id)),
        }
    }

    fn fill_defaults(&self, _candidate: &Candidate, data: &mut ResourceData) {
        for (key, value) in &self.defaults {
            data.set(key.clone(), value.clone());
        }
    }

    async fn delete(&self, data: &ResourceData) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.deletes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_deletes_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        self.deletes_in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(error) = self.delete_errors.get(data.id()) {
            return Err(error.clone());
        }
        self.deleted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(data.clone());
        Ok(())
    }
}
