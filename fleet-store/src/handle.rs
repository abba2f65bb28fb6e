//! Tenant-scoped data handle.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use fleet_core::{FleetConfigSnapshot, RecordValue, TenantId};
use uuid::Uuid;

use crate::backend::StoreBackend;

const DEFAULT_FIND_LIMIT: usize = 100;

/// Result caps for `find`, read once from configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FindLimits {
    pub default: usize,
    pub max: usize,
}

impl FindLimits {
    pub(crate) fn from_config(config: &FleetConfigSnapshot) -> Self {
        let default = config
            .get_usize("find.limit.default")
            .unwrap_or(DEFAULT_FIND_LIMIT);
        let max = config.get_usize("find.limit.max").unwrap_or(default);
        Self {
            default,
            max: max.max(default),
        }
    }

    fn effective(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default).min(self.max)
    }
}

/// A database handle bound to exactly one tenant.
///
/// The tenant id is fixed at construction and forwarded into every
/// backend call; there is no way to issue a query against another
/// tenant's partition through a handle. Cloning is cheap, and a handle
/// is read-only configuration once built.
#[derive(Clone)]
pub struct TenantHandle {
    tenant_id: TenantId,
    backend: Arc<dyn StoreBackend>,
    limits: FindLimits,
}

impl TenantHandle {
    pub(crate) fn new(
        tenant_id: TenantId,
        backend: Arc<dyn StoreBackend>,
        config: &FleetConfigSnapshot,
    ) -> Self {
        Self {
            tenant_id,
            backend,
            limits: FindLimits::from_config(config),
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// List rows of a collection. `limit` is capped at the configured
    /// maximum; `None` uses the configured default.
    pub async fn find(&self, collection: &str, limit: Option<usize>) -> Result<Vec<RecordValue>> {
        let limit = self.limits.effective(limit);
        self.backend.find(&self.tenant_id, collection, limit).await
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<RecordValue>> {
        self.backend.get(&self.tenant_id, collection, id).await
    }

    /// Insert a row. If the row map carries no "id" text field, a fresh
    /// UUID is assigned and written into the stored row.
    pub async fn create(&self, collection: &str, row: RecordValue) -> Result<RecordValue> {
        let (id, row) = match row.get("id").and_then(|v| v.as_text()) {
            Some(id) => (id.to_string(), row),
            None => {
                let id = Uuid::new_v4().to_string();
                let row = match row {
                    RecordValue::Map(mut m) => {
                        m.insert("id".to_string(), RecordValue::Text(id.clone()));
                        RecordValue::Map(m)
                    }
                    other => other,
                };
                (id, row)
            }
        };
        self.backend
            .insert(&self.tenant_id, collection, &id, row)
            .await
    }

    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        row: RecordValue,
    ) -> Result<Option<RecordValue>> {
        self.backend
            .update(&self.tenant_id, collection, id, row)
            .await
    }

    pub async fn remove(&self, collection: &str, id: &str) -> Result<Option<RecordValue>> {
        self.backend.remove(&self.tenant_id, collection, id).await
    }
}

impl fmt::Debug for TenantHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantHandle")
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}
