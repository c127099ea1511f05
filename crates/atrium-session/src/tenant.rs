//! Tenant selection context.
//!
//! Tracks the tenant list the user may access and which one is current.
//! Switching tenants is a pure local-state change persisted to the store;
//! subsequent API calls simply carry the new tenant id. There is no
//! dedicated backend call for switching.

use tracing::{debug, info, warn};
use uuid::Uuid;

use atrium_core::defaults::KEY_TENANT_ID;
use atrium_core::{Error, Result, Tenant, TenantApi};

use crate::session::SharedStore;

/// Holds the accessible tenants and the current selection.
///
/// Invariant: whenever the tenant list is non-empty, exactly one tenant is
/// current. A persisted selection that no longer appears in the fetched
/// list falls back to the first available tenant.
pub struct TenantContext {
    store: SharedStore,
    tenants: Vec<Tenant>,
    current: Option<Uuid>,
}

impl TenantContext {
    /// Fetch the tenant list and restore (or repair) the persisted
    /// selection.
    pub async fn load(api: &dyn TenantApi, store: SharedStore) -> Result<Self> {
        let tenants = api.list().await?;
        let mut ctx = Self {
            store,
            tenants,
            current: None,
        };
        ctx.reconcile_selection();
        Ok(ctx)
    }

    /// Re-fetch the tenant list, preserving the selection when still valid.
    pub async fn reload(&mut self, api: &dyn TenantApi) -> Result<()> {
        self.tenants = api.list().await?;
        self.reconcile_selection();
        Ok(())
    }

    /// All tenants the user may switch between.
    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    /// The current tenant, when any exists.
    pub fn current(&self) -> Option<&Tenant> {
        self.current
            .and_then(|id| self.tenants.iter().find(|t| t.id == id))
    }

    /// Id of the current tenant, for stamping outgoing requests.
    pub fn current_id(&self) -> Option<Uuid> {
        self.current
    }

    /// Switch to another tenant from the list. Pure local-state change:
    /// persists the id and nothing else.
    pub fn switch(&mut self, id: Uuid) -> Result<()> {
        if !self.tenants.iter().any(|t| t.id == id) {
            return Err(Error::NotFound(format!("tenant {}", id)));
        }
        self.current = Some(id);
        self.persist_selection(id);
        info!(tenant_id = %id, "switched tenant");
        Ok(())
    }

    // Restore the persisted selection; fall back to the first available
    // tenant when the persisted id is missing or no longer accessible.
    fn reconcile_selection(&mut self) {
        let persisted: Option<Uuid> = {
            let store = self.store.lock().expect("state store poisoned");
            store
                .get_string(KEY_TENANT_ID)
                .and_then(|s| s.parse().ok())
        };

        let selected = match persisted {
            Some(id) if self.tenants.iter().any(|t| t.id == id) => Some(id),
            Some(stale) => {
                let fallback = self.tenants.first().map(|t| t.id);
                warn!(
                    stale_tenant_id = %stale,
                    fallback = ?fallback,
                    "persisted tenant no longer accessible"
                );
                fallback
            }
            None => self.tenants.first().map(|t| t.id),
        };

        self.current = selected;
        if let Some(id) = selected {
            self.persist_selection(id);
        }
        debug!(tenant_count = self.tenants.len(), current = ?self.current, "tenant selection reconciled");
    }

    fn persist_selection(&self, id: Uuid) {
        let mut store = self.store.lock().expect("state store poisoned");
        if let Err(e) = store.set(KEY_TENANT_ID, &id.to_string()) {
            warn!(error = %e, "failed to persist tenant selection");
        }
    }
}
