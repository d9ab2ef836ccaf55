use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use poolsweep_domain::{Page, PageToken, Region, ResourceHandle};
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::{ClientFactory, DirectoryClient};
use crate::error::ClientError;

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { max_results: u32, token: Option<String> },
    Delete(String),
    Describe(String),
}

impl Call {
    pub fn list(max_results: u32, token: Option<&str>) -> Self {
        Call::List { max_results, token: token.map(str::to_string) }
    }

    pub fn delete(id: &str) -> Self {
        Call::Delete(id.to_string())
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Pools keyed by id; listing walks them in id order.
    pools: BTreeMap<String, String>,
    /// Keyed by 1-based list call number.
    list_failures: HashMap<usize, ClientError>,
    list_count: usize,
    delete_failures: HashMap<String, ClientError>,
    calls: Vec<Call>,
}

/// A [`DirectoryClient`] backed by process memory.
///
/// - Page tokens are the id of the first pool on the next page, so deleting
///   pools between list calls never skips or repeats an entry.
/// - Failures can be scripted per call; every call is recorded.
#[derive(Debug, Clone)]
pub struct InMemoryDirectory {
    region: Region,
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryDirectory {
    pub fn new(region: Region) -> Self {
        Self { region, inner: Arc::new(Mutex::new(Inner::default())) }
    }

    pub async fn insert(&self, id: impl Into<String>, name: impl Into<String>) {
        self.inner.lock().await.pools.insert(id.into(), name.into());
    }

    /// The next list call fails with `err`.
    pub async fn fail_next_list(&self, err: ClientError) {
        let mut guard = self.inner.lock().await;
        let n = guard.list_count + 1;
        guard.list_failures.insert(n, err);
    }

    /// The `n`th list call from now (1-based) fails with `err`.
    pub async fn fail_list_call(&self, n: usize, err: ClientError) {
        let mut guard = self.inner.lock().await;
        let at = guard.list_count + n;
        guard.list_failures.insert(at, err);
    }

    /// Every delete of `id` fails with `err`.
    pub async fn fail_delete(&self, id: impl Into<String>, err: ClientError) {
        self.inner.lock().await.delete_failures.insert(id.into(), err);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn remaining(&self) -> Vec<ResourceHandle> {
        self.inner
            .lock()
            .await
            .pools
            .iter()
            .map(|(id, name)| ResourceHandle::new(id.as_str(), name.as_str()))
            .collect()
    }
}

fn not_found(id: &str) -> ClientError {
    ClientError::api("ResourceNotFoundException", format!("User pool {} does not exist.", id))
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    fn region(&self) -> &Region {
        &self.region
    }

    async fn list_resources(
        &self,
        max_results: u32,
        token: Option<&PageToken>,
    ) -> Result<Page, ClientError> {
        let mut guard = self.inner.lock().await;
        guard.calls.push(Call::list(max_results, token.map(PageToken::as_str)));
        guard.list_count += 1;
        let n = guard.list_count;
        if let Some(err) = guard.list_failures.remove(&n) {
            return Err(err);
        }

        let start = token.map(|t| t.as_str().to_string()).unwrap_or_default();
        let mut remaining = guard.pools.range(start..);
        let items: Vec<ResourceHandle> = remaining
            .by_ref()
            .take(max_results as usize)
            .map(|(id, name)| ResourceHandle::new(id.as_str(), name.as_str()))
            .collect();
        let next = remaining
            .next()
            .and_then(|(id, _)| PageToken::from_remote(Some(id)));

        debug!(region = %self.region, count = items.len(), "InMemoryDirectory: list");
        Ok(Page { items, next })
    }

    async fn delete_resource(&self, id: &str) -> Result<(), ClientError> {
        let mut guard = self.inner.lock().await;
        guard.calls.push(Call::delete(id));
        if let Some(err) = guard.delete_failures.get(id) {
            return Err(err.clone());
        }
        guard.pools.remove(id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn describe_resource(&self, id: &str) -> Result<ResourceHandle, ClientError> {
        let mut guard = self.inner.lock().await;
        guard.calls.push(Call::Describe(id.to_string()));
        guard
            .pools
            .get(id)
            .map(|name| ResourceHandle::new(id, name.as_str()))
            .ok_or_else(|| not_found(id))
    }
}

/// [`ClientFactory`] handing out pre-registered [`InMemoryDirectory`]s.
/// Regions without a directory fail with [`ClientError::Setup`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryFactory {
    directories: HashMap<Region, InMemoryDirectory>,
}

impl InMemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory for its region. Returns `&mut self` for chaining.
    pub fn register(&mut self, directory: InMemoryDirectory) -> &mut Self {
        self.directories.insert(directory.region.clone(), directory);
        self
    }
}

#[async_trait]
impl ClientFactory for InMemoryFactory {
    async fn client_for(&self, region: &Region) -> Result<Arc<dyn DirectoryClient>, ClientError> {
        self.directories
            .get(region)
            .cloned()
            .map(|d| Arc::new(d) as Arc<dyn DirectoryClient>)
            .ok_or_else(|| ClientError::Setup(format!("no directory configured for region {}", region)))
    }
}
