//! In-memory backend and directory, for development and tests.

use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::RwLock;

use fleet_core::{RecordValue, TenantId};

use crate::backend::StoreBackend;
use crate::directory::{Directory, Organization, Role};

/// rows: (tenant, collection) -> id -> row
type TenantRows = HashMap<(TenantId, String), BTreeMap<String, RecordValue>>;

/// In-memory row storage, partitioned by tenant key.
#[derive(Default)]
pub struct MemoryBackend {
    rows: RwLock<TenantRows>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn find(
        &self,
        tenant: &TenantId,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<RecordValue>> {
        let rows = self.rows.read();
        Ok(rows
            .get(&(tenant.clone(), collection.to_string()))
            .map(|c| c.values().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<RecordValue>> {
        let rows = self.rows.read();
        Ok(rows
            .get(&(tenant.clone(), collection.to_string()))
            .and_then(|c| c.get(id).cloned()))
    }

    async fn insert(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
        row: RecordValue,
    ) -> Result<RecordValue> {
        let mut rows = self.rows.write();
        let bucket = rows
            .entry((tenant.clone(), collection.to_string()))
            .or_default();
        if bucket.contains_key(id) {
            return Err(anyhow!("duplicate id in {collection}: {id}"));
        }
        bucket.insert(id.to_string(), row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
        row: RecordValue,
    ) -> Result<Option<RecordValue>> {
        let mut rows = self.rows.write();
        let Some(bucket) = rows.get_mut(&(tenant.clone(), collection.to_string())) else {
            return Ok(None);
        };
        if !bucket.contains_key(id) {
            return Ok(None);
        }
        bucket.insert(id.to_string(), row.clone());
        Ok(Some(row))
    }

    async fn remove(
        &self,
        tenant: &TenantId,
        collection: &str,
        id: &str,
    ) -> Result<Option<RecordValue>> {
        let mut rows = self.rows.write();
        Ok(rows
            .get_mut(&(tenant.clone(), collection.to_string()))
            .and_then(|c| c.remove(id)))
    }
}

/// In-memory organization/membership directory, seedable for tests.
#[derive(Default)]
pub struct MemoryDirectory {
    organizations: RwLock<HashMap<TenantId, Organization>>,
    /// (user_id, tenant) -> role
    memberships: RwLock<HashMap<(String, TenantId), Role>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_organization(&self, org: Organization) {
        self.organizations.write().insert(org.id.clone(), org);
    }

    pub fn add_membership(&self, user_id: impl Into<String>, tenant: TenantId, role: Role) {
        self.memberships
            .write()
            .insert((user_id.into(), tenant), role);
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn organization(&self, id: &TenantId) -> Result<Option<Organization>> {
        Ok(self.organizations.read().get(id).cloned())
    }

    async fn membership_role(&self, user_id: &str, tenant: &TenantId) -> Result<Option<Role>> {
        Ok(self
            .memberships
            .read()
            .get(&(user_id.to_string(), tenant.clone()))
            .copied())
    }

    async fn has_elevated_membership(&self, user_id: &str) -> Result<bool> {
        Ok(self
            .memberships
            .read()
            .iter()
            .any(|((u, _), role)| u == user_id && role.is_elevated()))
    }
}
