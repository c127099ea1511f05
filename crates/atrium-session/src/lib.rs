//! # atrium-session
//!
//! Session, tenant, and local-persistence contexts for the Atrium console.
//!
//! Lifecycle: open the [`store::StateStore`] → [`session::SessionContext::restore`]
//! → login → [`tenant::TenantContext::load`] → active tenant selected →
//! teardown on logout or on any 401.

pub mod claims;
pub mod preferences;
pub mod prompts;
pub mod session;
pub mod store;
pub mod tenant;

pub use claims::Claims;
pub use preferences::{Density, Preferences, Theme};
pub use prompts::PromptLibrary;
pub use session::{Navigation, SessionContext, SessionState, SharedStore};
pub use store::StateStore;
pub use tenant::TenantContext;

use std::sync::{Arc, Mutex};

/// Wrap a store for sharing between contexts.
pub fn shared(store: StateStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}
