//! Acceptance-test checks run around a scenario: can the service be reached
//! at all, does the created pool exist, and is every pool gone afterwards.

use poolsweep_domain::{ErrorClass, ResourceHandle};
use poolsweep_driver::{classify, DirectoryClient};
use tracing::{debug, warn};

use crate::error::CheckError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreCheck {
    Ready,
    /// The service is not usable with these credentials or in this region.
    Skip(String),
}

/// One-item list call. Skip-class errors mean the scenario should be skipped.
pub async fn precheck(client: &dyn DirectoryClient) -> Result<PreCheck, CheckError> {
    match client.list_resources(1, None).await {
        Ok(_) => Ok(PreCheck::Ready),
        Err(e) if classify(&e) == ErrorClass::Skip => {
            warn!(region = %client.region(), error = %e, "skipping acceptance testing");
            Ok(PreCheck::Skip(e.to_string()))
        }
        Err(e) => Err(CheckError::PreCheck(e)),
    }
}

pub async fn check_exists(client: &dyn DirectoryClient, id: &str) -> Result<ResourceHandle, CheckError> {
    if id.is_empty() {
        return Err(CheckError::MissingId);
    }
    client
        .describe_resource(id)
        .await
        .map_err(|source| CheckError::Describe { id: id.to_string(), source })
}

/// Every id must describe as not-found. Stops at the first pool still present.
pub async fn check_destroyed(client: &dyn DirectoryClient, ids: &[String]) -> Result<(), CheckError> {
    for id in ids {
        match client.describe_resource(id).await {
            Ok(_) => return Err(CheckError::StillExists { id: id.clone() }),
            Err(e) if classify(&e) == ErrorClass::NotFound => {
                debug!(pool_id = %id, "user pool destroyed");
            }
            Err(source) => return Err(CheckError::Describe { id: id.clone(), source }),
        }
    }
    Ok(())
}
