use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, Candidate, ResourceApi, ResourceData};

/// A resource that survived filtering, reduced to the one thing the
/// orchestrator does with it.
#[async_trait]
pub trait Sweepable: Send + Sync {
    fn resource_type(&self) -> &str;
    fn id(&self) -> &str;
    async fn delete(&self) -> Result<(), ApiError>;
}

/// Generic [`Sweepable`]: delete-ready resource data plus the API that deletes it.
pub struct SweepResource {
    api: Arc<dyn ResourceApi>,
    data: ResourceData,
}

impl SweepResource {
    pub fn new(api: Arc<dyn ResourceApi>, data: ResourceData) -> Self {
        Self { api, data }
    }

    pub fn data(&self) -> &ResourceData {
        &self.data
    }
}

#[async_trait]
impl Sweepable for SweepResource {
    fn resource_type(&self) -> &str {
        self.api.resource_type()
    }

    fn id(&self) -> &str {
        self.data.id()
    }

    async fn delete(&self) -> Result<(), ApiError> {
        self.api.delete(&self.data).await
    }
}

/// Wrap a candidate, letting the resource type fill the fields its delete needs.
pub fn adapt(api: &Arc<dyn ResourceApi>, candidate: Candidate) -> Box<dyn Sweepable> {
    let mut data = ResourceData::new(candidate.id());
    api.fill_defaults(&candidate, &mut data);
    Box::new(SweepResource::new(Arc::clone(api), data))
}
