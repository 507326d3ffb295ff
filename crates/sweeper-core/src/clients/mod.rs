//! Process-wide cache of one API client per region.
//!
//! The first `get` for a region starts creation; concurrent callers for the
//! same region join that attempt instead of starting their own. Successful
//! clients are kept for the life of the cache. Failures are handed to every
//! waiting caller and then forgotten, so the next `get` retries.

mod errors;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

pub use errors::ClientError;

/// Builds a ready-to-use client for one region (configuration, credentials).
#[async_trait]
pub trait ClientFactory<C>: Send + Sync {
    async fn create(&self, region: &str) -> Result<C, ClientError>;
}

type PendingClient<C> = Shared<BoxFuture<'static, Result<Arc<C>, ClientError>>>;

enum Slot<C> {
    Ready(Arc<C>),
    Pending(PendingClient<C>),
}

pub struct RegionalClientCache<C> {
    factory: Arc<dyn ClientFactory<C>>,
    slots: Mutex<HashMap<String, Slot<C>>>,
}

impl<C: Send + Sync + 'static> RegionalClientCache<C> {
    pub fn new(factory: impl ClientFactory<C> + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the client for `region`, creating it on first use.
    pub async fn get(&self, region: &str) -> Result<Arc<C>, ClientError> {
        if region.trim().is_empty() {
            return Err(ClientError::InvalidRegion {
                region: region.to_string(),
                message: "region must not be empty".to_string(),
            });
        }

        let pending = {
            let mut slots = self.lock_slots();
            match slots.get(region) {
                Some(Slot::Ready(client)) => return Ok(Arc::clone(client)),
                Some(Slot::Pending(pending)) => {
                    debug!(event = "core.clients.creation_joined", region = region);
                    pending.clone()
                }
                None => {
                    let pending = self.start_creation(region);
                    slots.insert(region.to_string(), Slot::Pending(pending.clone()));
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut slots = self.lock_slots();
        // Only the slot for this attempt is settled; a newer attempt is left alone.
        if let Some(Slot::Pending(current)) = slots.get(region)
            && current.ptr_eq(&pending)
        {
            match &result {
                Ok(client) => {
                    slots.insert(region.to_string(), Slot::Ready(Arc::clone(client)));
                }
                Err(_) => {
                    slots.remove(region);
                }
            }
        }

        result
    }

    /// Regions with a ready client.
    pub fn cached_regions(&self) -> Vec<String> {
        let slots = self.lock_slots();
        let mut regions: Vec<String> = slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Ready(_)))
            .map(|(region, _)| region.clone())
            .collect();
        regions.sort();
        regions
    }

    fn start_creation(&self, region: &str) -> PendingClient<C> {
        let factory = Arc::clone(&self.factory);
        let region = region.to_string();

        async move {
            info!(event = "core.clients.create_started", region = %region);
            match factory.create(&region).await {
                Ok(client) => {
                    info!(event = "core.clients.create_completed", region = %region);
                    Ok(Arc::new(client))
                }
                Err(e) => {
                    warn!(
                        event = "core.clients.create_failed",
                        region = %region,
                        error = %e
                    );
                    Err(e)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Slot<C>>> {
        // Slots are never left half-written, so a poisoned lock is still usable.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
