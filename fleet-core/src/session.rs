//! Session types and the provider seam to the external auth subsystem.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request headers, as handed over by the transport layer.
pub type Headers = HashMap<String, String>;

/// An authenticated principal, owned by the external auth subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    /// The organization the user currently has selected, if any.
    pub organization_id: Option<String>,
}

/// What `require_auth` hands to a gated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCtx {
    pub user_id: String,
    pub organization_id: Option<String>,
}

impl From<Session> for SessionCtx {
    fn from(s: Session) -> Self {
        Self {
            user_id: s.user_id,
            organization_id: s.organization_id,
        }
    }
}

/// Provider of "the current session for these request headers".
///
/// Implemented by the external auth subsystem; the fleet layer only ever
/// reads through this trait.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current(&self, headers: &Headers) -> Result<Option<Session>>;
}
