use std::sync::Arc;

use async_trait::async_trait;
use poolsweep_domain::{Page, PageToken, Region, ResourceHandle};

use crate::error::ClientError;

/// Region-scoped handle on the user-directory service.
///
/// Every method issues exactly one remote call; retries are the caller's
/// business.
#[async_trait]
pub trait DirectoryClient: Send + Sync + 'static {
    fn region(&self) -> &Region;

    /// Fetch one page of user pools. `token` is `None` for the first page.
    async fn list_resources(
        &self,
        max_results: u32,
        token: Option<&PageToken>,
    ) -> Result<Page, ClientError>;

    async fn delete_resource(&self, id: &str) -> Result<(), ClientError>;

    /// Read a single user pool. Missing pools surface as an error that
    /// [`classify`](crate::classify) maps to `NotFound`.
    async fn describe_resource(&self, id: &str) -> Result<ResourceHandle, ClientError>;
}

/// Builds a [`DirectoryClient`] for a region.
#[async_trait]
pub trait ClientFactory: Send + Sync + 'static {
    async fn client_for(&self, region: &Region) -> Result<Arc<dyn DirectoryClient>, ClientError>;
}
