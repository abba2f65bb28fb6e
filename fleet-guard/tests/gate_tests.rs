//! Gate and resolver behavior, driven through the in-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fleet_core::{
    ActionResult, ErrorCode, FleetConfig, Headers, Session, SessionProvider, TenantContext,
    TenantFault, TenantId,
};
use fleet_guard::{Gate, TenantResolver};
use fleet_store::{Directory, MemoryBackend, MemoryDirectory, Organization, Role, StoreRouter};

/// Token-keyed session provider: the "authorization" header selects a
/// seeded session.
#[derive(Default)]
struct StaticSessions {
    by_token: HashMap<String, Session>,
}

impl StaticSessions {
    fn with(mut self, token: &str, session: Session) -> Self {
        self.by_token.insert(token.to_string(), session);
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSessions {
    async fn current(&self, headers: &Headers) -> Result<Option<Session>> {
        Ok(headers
            .get("authorization")
            .and_then(|t| self.by_token.get(t))
            .cloned())
    }
}

/// A session provider that always fails, for the INTERNAL path.
struct BrokenSessions;

#[async_trait]
impl SessionProvider for BrokenSessions {
    async fn current(&self, _headers: &Headers) -> Result<Option<Session>> {
        Err(anyhow::anyhow!("session store unreachable"))
    }
}

/// Counts membership lookups so tests can assert the ordering contract.
struct CountingDirectory {
    inner: MemoryDirectory,
    role_lookups: AtomicUsize,
}

impl CountingDirectory {
    fn new(inner: MemoryDirectory) -> Self {
        Self {
            inner,
            role_lookups: AtomicUsize::new(0),
        }
    }

    fn lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directory for CountingDirectory {
    async fn organization(&self, id: &TenantId) -> Result<Option<Organization>> {
        self.inner.organization(id).await
    }

    async fn membership_role(&self, user_id: &str, tenant: &TenantId) -> Result<Option<Role>> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.membership_role(user_id, tenant).await
    }

    async fn has_elevated_membership(&self, user_id: &str) -> Result<bool> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.has_elevated_membership(user_id).await
    }
}

fn org(id: &str, active: bool) -> Organization {
    Organization {
        id: TenantId::from(id),
        name: format!("Org {id}"),
        is_active: active,
    }
}

fn seeded_directory() -> MemoryDirectory {
    let dir = MemoryDirectory::new();
    dir.add_organization(org("org_1", true));
    dir.add_organization(org("org_2", true));
    dir.add_organization(org("org_frozen", false));

    dir.add_membership("user_owner", TenantId::from("org_1"), Role::Owner);
    dir.add_membership("user_member", TenantId::from("org_1"), Role::Member);
    dir.add_membership("user_other_admin", TenantId::from("org_2"), Role::Admin);
    dir
}

fn headers(token: &str) -> Headers {
    HashMap::from([("authorization".to_string(), token.to_string())])
}

fn session(user: &str, org: Option<&str>) -> Session {
    Session {
        user_id: user.to_string(),
        organization_id: org.map(|s| s.to_string()),
    }
}

fn router() -> Arc<StoreRouter> {
    Arc::new(StoreRouter::new(
        Arc::new(MemoryBackend::new()),
        FleetConfig::new().snapshot(),
    ))
}

fn assert_code<T: std::fmt::Debug>(result: &ActionResult<T>, code: ErrorCode) {
    match result {
        ActionResult::Failure(e) => assert_eq!(e.code, code),
        ActionResult::Success(v) => panic!("expected {code:?} failure, got success: {v:?}"),
    }
}

// ---- require_auth ----

#[tokio::test]
async fn require_auth_without_session_is_unauthorized() {
    let sessions = Arc::new(StaticSessions::default());
    let gate = Gate::new(sessions, Arc::new(seeded_directory()));

    let result = gate.require_auth(&headers("nope")).await;
    assert_code(&result, ErrorCode::Unauthorized);
}

#[tokio::test]
async fn require_auth_yields_the_session_context() {
    let sessions =
        Arc::new(StaticSessions::default().with("tok", session("user_member", Some("org_1"))));
    let gate = Gate::new(sessions, Arc::new(seeded_directory()));

    match gate.require_auth(&headers("tok")).await {
        ActionResult::Success(ctx) => {
            assert_eq!(ctx.user_id, "user_member");
            assert_eq!(ctx.organization_id.as_deref(), Some("org_1"));
        }
        ActionResult::Failure(e) => panic!("unexpected failure: {e:?}"),
    }
}

#[tokio::test]
async fn broken_session_provider_surfaces_as_internal() {
    let gate = Gate::new(Arc::new(BrokenSessions), Arc::new(seeded_directory()));

    let result = gate.require_auth(&headers("tok")).await;
    match &result {
        ActionResult::Failure(e) => {
            assert_eq!(e.code, ErrorCode::Internal);
            assert!(!e.message.contains("unreachable"));
        }
        ActionResult::Success(_) => panic!("expected failure"),
    }
}

// ---- require_admin ----

#[tokio::test]
async fn unauthenticated_admin_check_never_reaches_the_directory() {
    let directory = Arc::new(CountingDirectory::new(seeded_directory()));
    let gate = Gate::new(Arc::new(StaticSessions::default()), directory.clone());

    let result = gate.require_admin(&headers("nope")).await;

    // UNAUTHORIZED, never FORBIDDEN, and no role lookup ran
    assert_code(&result, ErrorCode::Unauthorized);
    assert_eq!(directory.lookups(), 0);
}

#[tokio::test]
async fn non_admin_gets_forbidden_not_unauthorized() {
    let sessions =
        Arc::new(StaticSessions::default().with("tok", session("user_member", Some("org_1"))));
    let gate = Gate::new(sessions, Arc::new(seeded_directory()));

    let result = gate.require_admin(&headers("tok")).await;
    assert_code(&result, ErrorCode::Forbidden);
}

#[tokio::test]
async fn elevated_role_in_any_org_passes_the_global_check() {
    let sessions = Arc::new(
        StaticSessions::default().with("tok", session("user_other_admin", Some("org_2"))),
    );
    let gate = Gate::new(sessions, Arc::new(seeded_directory()));

    assert!(gate.require_admin(&headers("tok")).await.is_success());
}

// ---- is_tenant_admin ----

#[tokio::test]
async fn owner_is_tenant_admin_member_is_not() {
    let sessions = Arc::new(StaticSessions::default());
    let gate = Gate::new(sessions, Arc::new(seeded_directory()));
    let org_1 = TenantId::from("org_1");

    let owner = fleet_core::SessionCtx {
        user_id: "user_owner".to_string(),
        organization_id: Some("org_1".to_string()),
    };
    let member = fleet_core::SessionCtx {
        user_id: "user_member".to_string(),
        organization_id: Some("org_1".to_string()),
    };

    assert!(gate.is_tenant_admin(&owner, &org_1).await.unwrap());
    assert!(!gate.is_tenant_admin(&member, &org_1).await.unwrap());
}

#[tokio::test]
async fn roles_in_other_tenants_never_count() {
    let gate = Gate::new(
        Arc::new(StaticSessions::default()),
        Arc::new(seeded_directory()),
    );

    // admin of org_2, nothing in org_1
    let ctx = fleet_core::SessionCtx {
        user_id: "user_other_admin".to_string(),
        organization_id: Some("org_2".to_string()),
    };
    assert!(!gate.is_tenant_admin(&ctx, &TenantId::from("org_1")).await.unwrap());
}

// ---- tenant resolution ----

fn resolver(sessions: Arc<dyn fleet_core::SessionProvider>) -> TenantResolver {
    TenantResolver::new(sessions, Arc::new(seeded_directory()), router())
}

#[tokio::test]
async fn session_without_org_resolves_to_no_tenant() {
    let r = resolver(Arc::new(StaticSessions::default()));

    let ctx = r.resolve(&session("user_member", None)).await.unwrap();
    assert!(!ctx.has_tenant());
    assert!(ctx.tenant_id().is_none());
    assert!(ctx.db().is_none());
}

#[tokio::test]
async fn active_org_resolves_to_a_scoped_handle() {
    let r = resolver(Arc::new(StaticSessions::default()));

    let ctx = r.resolve(&session("user_member", Some("org_1"))).await.unwrap();
    match &ctx {
        TenantContext::Active { tenant_id, db } => {
            assert_eq!(tenant_id.as_str(), "org_1");
            assert_eq!(db.tenant_id().as_str(), "org_1");
        }
        TenantContext::None => panic!("expected an active tenant"),
    }
    assert!(ctx.has_tenant());
}

#[tokio::test]
async fn unknown_org_is_a_not_found_fault() {
    let r = resolver(Arc::new(StaticSessions::default()));

    let fault = r
        .resolve(&session("user_member", Some("org_ghost")))
        .await
        .unwrap_err();
    assert!(matches!(fault, TenantFault::NotFound(id) if id.as_str() == "org_ghost"));
}

#[tokio::test]
async fn deactivated_org_faults_regardless_of_role() {
    let dir = seeded_directory();
    dir.add_membership("user_owner", TenantId::from("org_frozen"), Role::Owner);
    let r = TenantResolver::new(Arc::new(StaticSessions::default()), Arc::new(dir), router());

    let fault = r
        .resolve(&session("user_owner", Some("org_frozen")))
        .await
        .unwrap_err();
    assert!(matches!(fault, TenantFault::Deactivated(id) if id.as_str() == "org_frozen"));
}

#[tokio::test]
async fn missing_session_is_an_unauthenticated_fault() {
    let r = resolver(Arc::new(StaticSessions::default()));

    let fault = r.context(&headers("nope")).await.unwrap_err();
    assert!(matches!(fault, TenantFault::Unauthenticated));
}

#[tokio::test]
async fn context_resolves_end_to_end_from_headers() {
    let sessions =
        Arc::new(StaticSessions::default().with("tok", session("user_owner", Some("org_1"))));
    let r = resolver(sessions);

    let ctx = r.context(&headers("tok")).await.unwrap();
    assert_eq!(ctx.tenant_id().map(|t| t.as_str()), Some("org_1"));
}
