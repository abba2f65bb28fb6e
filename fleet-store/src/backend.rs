//! Backend seam for tenant-partitioned row storage.

use anyhow::Result;
use async_trait::async_trait;

use fleet_core::{RecordValue, TenantId};

/// Row storage partitioned by tenant.
///
/// Every method takes the owning `TenantId`; backends key their data by
/// `(tenant, collection, id)` so a row written under one tenant is
/// structurally unreachable from another. Callers normally do not use
/// this trait directly — they go through a
/// [`TenantHandle`](crate::TenantHandle), which pins the tenant.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// All rows of a collection, up to `limit`.
    async fn find(
        &self,
        tenant: &TenantId,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<RecordValue>>;

    async fn get(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<RecordValue>>;

    /// Insert a row under `id`. Fails if the id is already taken within
    /// the tenant's collection.
    async fn insert(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
        row: RecordValue,
    ) -> Result<RecordValue>;

    /// Replace an existing row. `None` if the id does not exist.
    async fn update(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
        row: RecordValue,
    ) -> Result<Option<RecordValue>>;

    /// Remove a row, returning it. `None` if the id does not exist.
    async fn remove(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<RecordValue>>;
}
