//! Core multi-tenant types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of an isolated customer organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Per-request tenant context, derived from the authenticated session.
///
/// This is a sum type on purpose: either there is no active organization,
/// or there is one together with its scoped data handle. A partially
/// populated state cannot be expressed. `H` is the handle type bound to
/// the tenant (see `fleet-store`).
#[derive(Debug, Clone)]
pub enum TenantContext<H> {
    /// Authenticated, but no organization is currently selected.
    None,
    /// An active organization with its tenant-scoped data handle.
    Active { tenant_id: TenantId, db: H },
}

impl<H> TenantContext<H> {
    pub fn has_tenant(&self) -> bool {
        matches!(self, TenantContext::Active { .. })
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        match self {
            TenantContext::None => None,
            TenantContext::Active { tenant_id, .. } => Some(tenant_id),
        }
    }

    pub fn db(&self) -> Option<&H> {
        match self {
            TenantContext::None => None,
            TenantContext::Active { db, .. } => Some(db),
        }
    }
}

/// Fatal tenant-resolution faults.
///
/// These are deliberately *not* `ActionError`s: a session pointing at a
/// missing or deactivated organization means the session/tenant state is
/// corrupted, and calling code cannot recover from that. The fault stops
/// the request at the outer boundary instead of travelling as a result.
#[derive(Error, Debug)]
pub enum TenantFault {
    #[error("no authenticated session")]
    Unauthenticated,

    #[error("organization not found: {0}")]
    NotFound(TenantId),

    #[error("organization is deactivated: {0}")]
    Deactivated(TenantId),

    #[error("organization lookup failed: {0}")]
    Store(#[source] anyhow::Error),
}
