//! Session lifecycle context.
//!
//! Explicit context object (no module-level globals): `restore` on startup,
//! `login`/`logout` on user action, `absorb_error` wherever an API call
//! fails. Any 401 tears the session down and asks the caller to navigate to
//! the login boundary, no matter which screen triggered the call.

use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use atrium_core::defaults::{KEY_AUTH_TOKEN, KEY_TENANT_ID};
use atrium_core::{Error, Result};

use crate::claims::Claims;
use crate::store::StateStore;

/// Store handle shared between the session and tenant contexts.
pub type SharedStore = Arc<Mutex<StateStore>>;

/// Where the shell should navigate after an auth event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Login,
}

/// Authentication state of the console.
#[derive(Debug, Clone)]
pub enum SessionState {
    Anonymous,
    Authenticated { user: Claims },
}

/// Holds the authenticated user and gates every protected view.
pub struct SessionContext {
    store: SharedStore,
    state: SessionState,
}

impl SessionContext {
    /// Restore the session from the persisted token.
    ///
    /// A present, unexpired token yields `Authenticated`. An expired or
    /// undecodable token clears all stored credentials and yields
    /// `Anonymous`.
    pub fn restore(store: SharedStore) -> Self {
        let token = {
            let store = store.lock().expect("state store poisoned");
            store.get_string(KEY_AUTH_TOKEN)
        };

        let state = match token {
            None => SessionState::Anonymous,
            Some(token) => match Claims::decode(&token) {
                Ok(user) if !user.is_expired() => {
                    info!(email = %user.email, "session restored");
                    SessionState::Authenticated { user }
                }
                Ok(user) => {
                    warn!(email = %user.email, "persisted token expired, clearing session");
                    Self::clear_credentials(&store);
                    SessionState::Anonymous
                }
                Err(e) => {
                    warn!(error = %e, "persisted token invalid, clearing session");
                    Self::clear_credentials(&store);
                    SessionState::Anonymous
                }
            },
        };

        Self { store, state }
    }

    /// Log in with a gateway-issued token. Rejects expired tokens.
    pub fn login(&mut self, token: &str) -> Result<Claims> {
        let user = Claims::decode(token)?;
        if user.is_expired() {
            return Err(Error::Unauthorized("token already expired".to_string()));
        }

        {
            let mut store = self.store.lock().expect("state store poisoned");
            store.set(KEY_AUTH_TOKEN, &token)?;
        }

        info!(email = %user.email, role = %user.role, "logged in");
        self.state = SessionState::Authenticated { user: user.clone() };
        Ok(user)
    }

    /// Log out: clear persisted credentials and return to `Anonymous`.
    pub fn logout(&mut self) {
        if let SessionState::Authenticated { user } = &self.state {
            info!(email = %user.email, "logged out");
        }
        Self::clear_credentials(&self.store);
        self.state = SessionState::Anonymous;
    }

    /// Inspect an API error; a 401 clears the session (token and tenant id
    /// removed from persistence) and requests navigation to login. All
    /// other errors pass through untouched for the caller to report.
    pub fn absorb_error(&mut self, err: &Error) -> Option<Navigation> {
        if err.is_auth_failure() {
            warn!(error = %err, "authentication failure, tearing down session");
            Self::clear_credentials(&self.store);
            self.state = SessionState::Anonymous;
            Some(Navigation::Login)
        } else {
            None
        }
    }

    /// The decoded user, when authenticated.
    pub fn user(&self) -> Option<&Claims> {
        match &self.state {
            SessionState::Authenticated { user } => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// The persisted bearer token, for wiring into the API client.
    pub fn token(&self) -> Option<String> {
        let store = self.store.lock().expect("state store poisoned");
        store.get_string(KEY_AUTH_TOKEN)
    }

    fn clear_credentials(store: &SharedStore) {
        let mut store = store.lock().expect("state store poisoned");
        // Best-effort: a failed disk write must not keep a dead session alive.
        if let Err(e) = store.remove(KEY_AUTH_TOKEN) {
            warn!(error = %e, "failed to clear auth token");
        }
        if let Err(e) = store.remove(KEY_TENANT_ID) {
            warn!(error = %e, "failed to clear tenant id");
        }
    }
}
