//! Global directory surface: organizations and memberships.
//!
//! This is the one untenanted query surface in the layer. It exists so
//! the resolver and the gate can look up tenants and roles; it never
//! mutates membership data.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fleet_core::TenantId;

/// A customer organization (tenant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: TenantId,
    pub name: String,
    /// Deactivated organizations must never resolve into a usable
    /// tenant context.
    pub is_active: bool,
}

/// Membership role of a user within one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Member,
    Viewer,
}

impl Role {
    /// Elevated roles carry administrative capability within a tenant.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Member => "member",
            Role::Viewer => "viewer",
        }
    }
}

/// Read-only lookups against the organization/membership store.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Look up an organization by id.
    async fn organization(&self, id: &TenantId) -> Result<Option<Organization>>;

    /// The role `user_id` holds within exactly `tenant` — roles held in
    /// other organizations never show up here.
    async fn membership_role(&self, user_id: &str, tenant: &TenantId) -> Result<Option<Role>>;

    /// Whether `user_id` holds an elevated role in *any* organization.
    async fn has_elevated_membership(&self, user_id: &str) -> Result<bool>;
}
