//! Session and tenant lifecycle against the mock gateway backend.
//!
//! Covers the teardown contract (any 401 clears persisted credentials) and
//! tenant-selection persistence across restarts, including fallback when a
//! persisted selection is no longer accessible.

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use atrium_client::mock::{TENANT_ACME, TENANT_GLOBEX};
use atrium_client::MockBackend;
use atrium_core::defaults::{KEY_AUTH_TOKEN, KEY_TENANT_ID};
use atrium_core::{Error, TenantApi};
use atrium_session::{shared, Claims, Navigation, SessionContext, SharedStore, StateStore, TenantContext};

fn store_in(dir: &TempDir) -> SharedStore {
    shared(StateStore::open(dir.path()).unwrap())
}

fn claims(exp_offset_secs: i64) -> Claims {
    Claims {
        sub: Uuid::new_v4(),
        email: "operator@acme.test".to_string(),
        role: "admin".to_string(),
        tenant_id: Some(TENANT_ACME),
        exp: Utc::now().timestamp() + exp_offset_secs,
        iat: Utc::now().timestamp(),
    }
}

#[test]
fn restore_without_token_is_anonymous() {
    let dir = TempDir::new().unwrap();
    let session = SessionContext::restore(store_in(&dir));
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[test]
fn login_persists_token_across_restart() {
    let dir = TempDir::new().unwrap();
    let token = claims(3600).to_unsigned_token();

    let mut session = SessionContext::restore(store_in(&dir));
    let user = session.login(&token).unwrap();
    assert_eq!(user.email, "operator@acme.test");

    // A fresh context over the same directory picks the session back up.
    let restored = SessionContext::restore(store_in(&dir));
    assert!(restored.is_authenticated());
    assert_eq!(restored.token().as_deref(), Some(token.as_str()));
}

#[test]
fn login_rejects_expired_token() {
    let dir = TempDir::new().unwrap();
    let mut session = SessionContext::restore(store_in(&dir));
    let result = session.login(&claims(-60).to_unsigned_token());
    assert!(matches!(result, Err(Error::Unauthorized(_))));
    assert!(!session.is_authenticated());
}

#[test]
fn restore_clears_expired_token() {
    let dir = TempDir::new().unwrap();
    {
        let store = store_in(&dir);
        let mut guard = store.lock().unwrap();
        guard
            .set(KEY_AUTH_TOKEN, &claims(-60).to_unsigned_token())
            .unwrap();
        guard.set(KEY_TENANT_ID, &TENANT_ACME.to_string()).unwrap();
    }

    let session = SessionContext::restore(store_in(&dir));
    assert!(!session.is_authenticated());

    let store = StateStore::open(dir.path()).unwrap();
    assert!(!store.contains(KEY_AUTH_TOKEN));
    assert!(!store.contains(KEY_TENANT_ID));
}

#[test]
fn unauthorized_error_tears_down_session() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut session = SessionContext::restore(store.clone());
    session.login(&claims(3600).to_unsigned_token()).unwrap();
    {
        let mut guard = store.lock().unwrap();
        guard.set(KEY_TENANT_ID, &TENANT_ACME.to_string()).unwrap();
    }

    let nav = session.absorb_error(&Error::Unauthorized("token revoked".to_string()));
    assert_eq!(nav, Some(Navigation::Login));
    assert!(!session.is_authenticated());

    // Both credential keys are gone from disk, not just from memory.
    let fresh = StateStore::open(dir.path()).unwrap();
    assert!(!fresh.contains(KEY_AUTH_TOKEN));
    assert!(!fresh.contains(KEY_TENANT_ID));
}

#[test]
fn non_auth_errors_pass_through() {
    let dir = TempDir::new().unwrap();
    let mut session = SessionContext::restore(store_in(&dir));
    session.login(&claims(3600).to_unsigned_token()).unwrap();

    assert_eq!(
        session.absorb_error(&Error::RateLimited("slow down".to_string())),
        None
    );
    assert_eq!(
        session.absorb_error(&Error::Server("boom".to_string())),
        None
    );
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn first_tenant_selected_by_default() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new().with_seed_data();
    let tenants = TenantContext::load(&backend, store_in(&dir)).await.unwrap();

    assert_eq!(tenants.tenants().len(), 2);
    assert_eq!(tenants.current_id(), Some(TENANT_ACME));
}

#[tokio::test]
async fn switch_persists_across_restart() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new().with_seed_data();

    let mut tenants = TenantContext::load(&backend, store_in(&dir)).await.unwrap();
    tenants.switch(TENANT_GLOBEX).unwrap();
    drop(tenants);

    let reloaded = TenantContext::load(&backend, store_in(&dir)).await.unwrap();
    assert_eq!(reloaded.current_id(), Some(TENANT_GLOBEX));
    assert_eq!(reloaded.current().unwrap().name, "Globex Labs");
}

#[tokio::test]
async fn switch_to_unknown_tenant_is_rejected() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new().with_seed_data();
    let mut tenants = TenantContext::load(&backend, store_in(&dir)).await.unwrap();

    let result = tenants.switch(Uuid::new_v4());
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert_eq!(tenants.current_id(), Some(TENANT_ACME));
}

#[tokio::test]
async fn stale_persisted_selection_falls_back_to_first() {
    let dir = TempDir::new().unwrap();
    {
        let store = store_in(&dir);
        let mut guard = store.lock().unwrap();
        guard
            .set(KEY_TENANT_ID, &Uuid::new_v4().to_string())
            .unwrap();
    }

    let backend = MockBackend::new().with_seed_data();
    let tenants = TenantContext::load(&backend, store_in(&dir)).await.unwrap();
    assert_eq!(tenants.current_id(), Some(TENANT_ACME));

    // The repaired selection is persisted over the stale one.
    let fresh = StateStore::open(dir.path()).unwrap();
    assert_eq!(
        fresh.get_string(KEY_TENANT_ID).as_deref(),
        Some(TENANT_ACME.to_string().as_str())
    );
}

#[tokio::test]
async fn reload_repairs_selection_after_tenant_removal() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new().with_seed_data();
    let store = store_in(&dir);

    let mut tenants = TenantContext::load(&backend, store.clone()).await.unwrap();
    tenants.switch(TENANT_GLOBEX).unwrap();

    TenantApi::delete(&backend, TENANT_GLOBEX).await.unwrap();
    tenants.reload(&backend).await.unwrap();

    assert_eq!(tenants.current_id(), Some(TENANT_ACME));
}

#[tokio::test]
async fn load_propagates_backend_errors() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new().with_seed_data();
    backend.fail_next(Error::Server("gateway down".to_string()));

    let result = TenantContext::load(&backend, store_in(&dir)).await;
    assert!(matches!(result, Err(Error::Server(_))));
}
