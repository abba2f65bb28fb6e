//! Memoizing factory for tenant-scoped handles.

use std::sync::Arc;

use dashmap::DashMap;
use fleet_core::{FleetConfigSnapshot, TenantId};

use crate::backend::StoreBackend;
use crate::handle::TenantHandle;

/// Hands out [`TenantHandle`]s, one per tenant.
///
/// Handles are memoized: the same tenant id always yields a handle with
/// identical scoping, and a cached handle can never be re-pointed at a
/// different tenant because the id is baked in at construction.
pub struct StoreRouter {
    backend: Arc<dyn StoreBackend>,
    config: FleetConfigSnapshot,
    handles: DashMap<TenantId, TenantHandle>,
}

impl StoreRouter {
    pub fn new(backend: Arc<dyn StoreBackend>, config: FleetConfigSnapshot) -> Self {
        Self {
            backend,
            config,
            handles: DashMap::new(),
        }
    }

    pub fn handle(&self, tenant: &TenantId) -> TenantHandle {
        self.handles
            .entry(tenant.clone())
            .or_insert_with(|| {
                tracing::debug!(tenant = %tenant, "building tenant handle");
                TenantHandle::new(tenant.clone(), self.backend.clone(), &self.config)
            })
            .clone()
    }
}
