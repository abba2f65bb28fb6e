//! Authorization gate: authentication and privilege checks.

use std::sync::Arc;

use anyhow::Result;
use fleet_core::{ActionError, ActionResult, Headers, SessionCtx, SessionProvider, TenantId};
use fleet_store::Directory;

/// Answers the authorization questions every gated operation asks, in
/// order: is there a session at all, and does it carry enough privilege.
pub struct Gate {
    sessions: Arc<dyn SessionProvider>,
    directory: Arc<dyn Directory>,
}

impl Gate {
    pub fn new(sessions: Arc<dyn SessionProvider>, directory: Arc<dyn Directory>) -> Self {
        Self {
            sessions,
            directory,
        }
    }

    /// Authentication check. No session → `UNAUTHORIZED`; a failing
    /// session provider is an infrastructure fault and surfaces as a
    /// generic `INTERNAL`.
    pub async fn require_auth(&self, headers: &Headers) -> ActionResult<SessionCtx> {
        match self.sessions.current(headers).await {
            Ok(Some(session)) => ActionResult::Success(SessionCtx::from(session)),
            Ok(None) => ActionError::unauthorized("Not signed in").into(),
            Err(e) => ActionError::internal_from(&e, "require_auth", None, None).into(),
        }
    }

    /// Whether `ctx` holds an elevated role within exactly `tenant`.
    /// Roles held in other organizations never count.
    pub async fn is_tenant_admin(&self, ctx: &SessionCtx, tenant: &TenantId) -> Result<bool> {
        let role = self.directory.membership_role(&ctx.user_id, tenant).await?;
        Ok(role.is_some_and(|r| r.is_elevated()))
    }

    /// Global administrative check, for cross-tenant surfaces.
    ///
    /// Authentication is decided first: an unauthenticated caller gets
    /// `UNAUTHORIZED` and the membership lookup never runs. A valid
    /// session without an elevated membership anywhere gets `FORBIDDEN`.
    /// The two codes are never interchangeable.
    pub async fn require_admin(&self, headers: &Headers) -> ActionResult<SessionCtx> {
        let ctx = match self.require_auth(headers).await {
            ActionResult::Success(ctx) => ctx,
            failure => return failure,
        };

        match self.directory.has_elevated_membership(&ctx.user_id).await {
            Ok(true) => ActionResult::Success(ctx),
            Ok(false) => ActionError::forbidden("Administrator access required").into(),
            Err(e) => {
                ActionError::internal_from(&e, "require_admin", Some(&ctx.user_id), None).into()
            }
        }
    }
}
