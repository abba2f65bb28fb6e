//! fleet-guard: who is calling, and which tenant are they in.
//!
//! Two pieces sit in front of every data access:
//! - the [`TenantResolver`] turns the authenticated session into a
//!   [`TenantContext`](fleet_core::TenantContext) with its scoped handle;
//! - the [`Gate`] answers the authorization questions (`require_auth`,
//!   `is_tenant_admin`, `require_admin`).
//!
//! Ordering contract: authentication is always decided before any tenant
//! or role check runs. A caller is never told "forbidden" while also
//! being unauthenticated.

pub mod gate;
pub mod resolver;

pub use gate::Gate;
pub use resolver::TenantResolver;
