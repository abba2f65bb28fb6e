//! Tenant resolution: session → tenant context.

use std::sync::Arc;

use fleet_core::{Headers, Session, SessionProvider, TenantContext, TenantFault, TenantId};
use fleet_store::{Directory, StoreRouter, TenantHandle};

/// Derives the active tenant for a request.
///
/// Resolution failures are fatal [`TenantFault`]s, not action results: a
/// session that points at a missing or deactivated organization means the
/// session/tenant state is inconsistent, and the request must stop at the
/// outer error boundary.
pub struct TenantResolver {
    sessions: Arc<dyn SessionProvider>,
    directory: Arc<dyn Directory>,
    router: Arc<StoreRouter>,
}

impl TenantResolver {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        directory: Arc<dyn Directory>,
        router: Arc<StoreRouter>,
    ) -> Self {
        Self {
            sessions,
            directory,
            router,
        }
    }

    /// Resolve the tenant context for the current request headers.
    ///
    /// A missing session is `TenantFault::Unauthenticated`: callers are
    /// expected to have passed `require_auth` before touching tenant
    /// data, so hitting this is a broken precondition, not a user error.
    pub async fn context(&self, headers: &Headers) -> Result<TenantContext<TenantHandle>, TenantFault> {
        let session = self
            .sessions
            .current(headers)
            .await
            .map_err(TenantFault::Store)?
            .ok_or(TenantFault::Unauthenticated)?;
        self.resolve(&session).await
    }

    /// Resolve the tenant context for an already-established session.
    ///
    /// One organization read, no mutation. A session without a selected
    /// organization resolves to `TenantContext::None` and never fails.
    pub async fn resolve(&self, session: &Session) -> Result<TenantContext<TenantHandle>, TenantFault> {
        let Some(org_id) = session.organization_id.as_deref() else {
            return Ok(TenantContext::None);
        };
        let tenant_id = TenantId::from(org_id);

        let org = self
            .directory
            .organization(&tenant_id)
            .await
            .map_err(TenantFault::Store)?
            .ok_or_else(|| TenantFault::NotFound(tenant_id.clone()))?;

        if !org.is_active {
            tracing::warn!(tenant = %tenant_id, "session points at a deactivated organization");
            return Err(TenantFault::Deactivated(tenant_id));
        }

        let db = self.router.handle(&tenant_id);
        Ok(TenantContext::Active { tenant_id, db })
    }
}
