//! `aws_kms_key`: customer-managed KMS keys.
//!
//! Keys cannot be deleted outright; deletion is scheduled with a pending
//! window. Keys managed by AWS and keys already scheduled for deletion are
//! skipped.

use async_trait::async_trait;
use aws_sdk_kms::operation::list_keys::ListKeysOutput;
use aws_sdk_kms::types::{KeyManagerType, KeyState};
use sweeper_config::DEFAULT_DELETION_WINDOW_DAYS;
use sweeper_core::{
    ApiError, Candidate, FieldValue, LifecycleState, ManagedBy, Page, PageRequest, ResourceApi,
    ResourceData,
};

use crate::errors::api_error;

pub const RESOURCE_TYPE: &str = "aws_kms_key";

/// `ListKeys` accepts at most 1000 keys per page.
pub const MAX_PAGE_SIZE: u32 = 1000;

pub const KEY_ID_FIELD: &str = "key_id";
pub const DELETION_WINDOW_FIELD: &str = "deletion_window_in_days";

pub struct KmsKeys {
    client: aws_sdk_kms::Client,
    deletion_window_in_days: i64,
}

impl KmsKeys {
    pub fn new(client: aws_sdk_kms::Client, deletion_window_in_days: i64) -> Self {
        Self {
            client,
            deletion_window_in_days,
        }
    }
}

#[async_trait]
impl ResourceApi for KmsKeys {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn max_page_size(&self) -> u32 {
        MAX_PAGE_SIZE
    }

    async fn list_page(&self, request: PageRequest) -> Result<Page, ApiError> {
        let output = self
            .client
            .list_keys()
            .limit(i32::try_from(request.page_size).unwrap_or(i32::MAX))
            .set_marker(request.cursor)
            .send()
            .await
            .map_err(|e| api_error("ListKeys", e))?;

        Ok(keys_page(&output))
    }

    async fn describe(&self, id: &str) -> Result<Candidate, ApiError> {
        let output = self
            .client
            .describe_key()
            .key_id(id)
            .send()
            .await
            .map_err(|e| api_error("DescribeKey", e))?;

        let metadata = output.key_metadata().ok_or_else(|| {
            ApiError::not_found("DescribeKey", format!("KMS Key ({}) has no metadata", id))
        })?;

        Ok(key_candidate(id, metadata.key_manager(), metadata.key_state()))
    }

    fn fill_defaults(&self, _candidate: &Candidate, data: &mut ResourceData) {
        fill_key_defaults(data, self.deletion_window_in_days);
    }

    async fn delete(&self, data: &ResourceData) -> Result<(), ApiError> {
        let key_id = data.text(KEY_ID_FIELD).unwrap_or(data.id());
        let window = deletion_window(data)?;

        let result = self
            .client
            .schedule_key_deletion()
            .key_id(key_id)
            .pending_window_in_days(window)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => tolerate_pending_deletion(api_error("ScheduleKeyDeletion", e)),
        }
    }
}

fn keys_page(output: &ListKeysOutput) -> Page {
    let identifiers = output
        .keys()
        .iter()
        .filter_map(|key| key.key_id())
        .map(str::to_string)
        .collect();

    Page {
        identifiers,
        next_cursor: output.next_marker().map(str::to_string),
    }
}

/// Build the candidate for a described key.
pub fn key_candidate(
    id: &str,
    key_manager: Option<&KeyManagerType>,
    key_state: Option<&KeyState>,
) -> Candidate {
    let managed_by = match key_manager {
        Some(KeyManagerType::Aws) => ManagedBy::Platform,
        _ => ManagedBy::Customer,
    };

    let lifecycle = match key_state {
        None | Some(KeyState::Enabled) => LifecycleState::Active,
        Some(KeyState::PendingDeletion | KeyState::PendingReplicaDeletion) => {
            LifecycleState::PendingDeletion
        }
        Some(state) => LifecycleState::Other(state.as_str().to_string()),
    };

    let mut candidate = Candidate::new(id)
        .with_managed_by(managed_by)
        .with_lifecycle(lifecycle);
    if let Some(state) = key_state {
        candidate = candidate.with_attribute("key_state", state.as_str());
    }
    candidate
}

fn fill_key_defaults(data: &mut ResourceData, deletion_window_in_days: i64) {
    data.set(KEY_ID_FIELD, FieldValue::Text(data.id().to_string()));
    data.set(DELETION_WINDOW_FIELD, FieldValue::Int(deletion_window_in_days));
}

fn deletion_window(data: &ResourceData) -> Result<i32, ApiError> {
    let days = data
        .int(DELETION_WINDOW_FIELD)
        .unwrap_or(DEFAULT_DELETION_WINDOW_DAYS);
    i32::try_from(days).map_err(|_| {
        ApiError::other(
            "ScheduleKeyDeletion",
            format!("deletion window of {} days is out of range", days),
        )
    })
}

fn is_already_pending_deletion(error: &ApiError) -> bool {
    error.code() == Some("KMSInvalidStateException")
        && error.message().to_lowercase().contains("pending deletion")
}

/// A key scheduled by someone else since it was described counts as deleted.
fn tolerate_pending_deletion(error: ApiError) -> Result<(), ApiError> {
    if is_already_pending_deletion(&error) {
        Ok(())
    } else {
        Err(error)
    }
}
