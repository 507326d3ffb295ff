//! `aws_api_gateway_vpc_link`: API Gateway (REST) VPC links.

use async_trait::async_trait;
use aws_sdk_apigateway::operation::get_vpc_links::GetVpcLinksOutput;
use aws_sdk_apigateway::types::VpcLinkStatus;
use sweeper_core::{
    ApiError, Candidate, LifecycleState, Page, PageRequest, ResourceApi, ResourceData,
};

use crate::errors::api_error;

pub const RESOURCE_TYPE: &str = "aws_api_gateway_vpc_link";

/// `GetVpcLinks` accepts at most 500 items per page.
pub const MAX_PAGE_SIZE: u32 = 500;

pub struct VpcLinks {
    client: aws_sdk_apigateway::Client,
}

impl VpcLinks {
    pub fn new(client: aws_sdk_apigateway::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceApi for VpcLinks {
    fn resource_type(&self) -> &str {
        RESOURCE_TYPE
    }

    fn max_page_size(&self) -> u32 {
        MAX_PAGE_SIZE
    }

    async fn list_page(&self, request: PageRequest) -> Result<Page, ApiError> {
        let output = self
            .client
            .get_vpc_links()
            .limit(i32::try_from(request.page_size).unwrap_or(i32::MAX))
            .set_position(request.cursor)
            .send()
            .await
            .map_err(|e| api_error("GetVpcLinks", e))?;

        Ok(links_page(&output))
    }

    async fn describe(&self, id: &str) -> Result<Candidate, ApiError> {
        let output = self
            .client
            .get_vpc_link()
            .vpc_link_id(id)
            .send()
            .await
            .map_err(|e| api_error("GetVpcLink", e))?;

        let mut candidate = link_candidate(id, output.status());
        if let Some(name) = output.name() {
            candidate = candidate.with_attribute("name", name);
        }
        Ok(candidate)
    }

    async fn delete(&self, data: &ResourceData) -> Result<(), ApiError> {
        self.client
            .delete_vpc_link()
            .vpc_link_id(data.id())
            .send()
            .await
            .map_err(|e| api_error("DeleteVpcLink", e))?;
        Ok(())
    }
}

fn links_page(output: &GetVpcLinksOutput) -> Page {
    let identifiers = output
        .items()
        .iter()
        .filter_map(|link| link.id())
        .map(str::to_string)
        .collect();

    Page {
        identifiers,
        next_cursor: output.position().map(str::to_string),
    }
}

/// VPC links have no management marker; only their status matters.
pub fn link_candidate(id: &str, status: Option<&VpcLinkStatus>) -> Candidate {
    let lifecycle = match status {
        None | Some(VpcLinkStatus::Available) => LifecycleState::Active,
        Some(VpcLinkStatus::Deleting) => LifecycleState::PendingDeletion,
        Some(status) => LifecycleState::Other(status.as_str().to_string()),
    };
    Candidate::new(id).with_lifecycle(lifecycle)
}
