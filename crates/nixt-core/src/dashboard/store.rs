//! Dashboard session store.
//!
//! Owns the role grants, the single dashboard session and the shared
//! controller snapshot. Every mutation is written through to the durable
//! key-value store before the call returns.

use super::shared::{SharedControllerData, SharedDataUpdate};
use super::types::{
    AllowedUser, AllowedUserUpdate, DashboardSession, GrantRole, LoginOutcome, NewAllowedUser,
    same_email,
};
use chrono::{Duration, Utc};
use nixt_storage::keys;
use nixt_traits::{KeyValueStore, KeyValueStoreExt, StoreResult};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default lifetime of a dashboard session.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy)]
pub struct SessionStoreConfig {
    pub session_ttl: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }
}

#[derive(Default)]
struct DashboardState {
    grants: Vec<AllowedUser>,
    shared: SharedControllerData,
}

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    config: SessionStoreConfig,
    state: RwLock<DashboardState>,
    session: watch::Sender<Option<DashboardSession>>,
}

impl SessionStore {
    /// Restore persisted state from `store`.
    ///
    /// Unreadable blobs are logged and treated as absent. An expired session
    /// is discarded and its durable copy removed.
    pub fn load(store: Arc<dyn KeyValueStore>, config: SessionStoreConfig) -> Self {
        let grants = read_grants(store.as_ref());
        let shared: SharedControllerData =
            read_or_default(store.as_ref(), keys::SHARED_DATA).unwrap_or_default();

        let mut session: Option<DashboardSession> =
            read_or_default(store.as_ref(), keys::DASHBOARD_SESSION);
        if let Some(existing) = &session
            && existing.is_expired_at(Utc::now(), config.session_ttl)
        {
            info!(email = %existing.email, "Dashboard session expired, discarding");
            if let Err(e) = store.remove(keys::DASHBOARD_SESSION) {
                warn!(error = %e, "Failed to remove expired dashboard session");
            }
            session = None;
        }

        debug!(
            grants = grants.len(),
            has_session = session.is_some(),
            "Restored dashboard state"
        );

        let (session_tx, _) = watch::channel(session);
        Self {
            store,
            config,
            state: RwLock::new(DashboardState { grants, shared }),
            session: session_tx,
        }
    }

    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }

    // ---- grants ----

    pub fn allowed_users(&self) -> Vec<AllowedUser> {
        self.state.read().grants.clone()
    }

    /// Add a grant, replacing any existing grant with the same email
    /// (case-insensitive) and role. The new grant is appended last.
    pub fn add_allowed_user(&self, user: NewAllowedUser) -> StoreResult<AllowedUser> {
        let grant = user.stamp(Utc::now());
        let grants = {
            let mut state = self.state.write();
            state
                .grants
                .retain(|g| !(same_email(&g.email, &grant.email) && g.role == grant.role));
            state.grants.push(grant.clone());
            state.grants.clone()
        };
        self.store.set_json(keys::ALLOWED_USERS, &grants)?;
        info!(email = %grant.email, role = %grant.role, "Added dashboard grant");
        Ok(grant)
    }

    /// Remove grants for `email`, optionally limited to one role.
    ///
    /// The active session ends whenever its email matches, even if the
    /// removed role is not the session's role. Returns the number removed.
    pub fn remove_allowed_user(&self, email: &str, role: Option<GrantRole>) -> StoreResult<usize> {
        let (removed, grants) = {
            let mut state = self.state.write();
            let before = state.grants.len();
            state
                .grants
                .retain(|g| !(same_email(&g.email, email) && role.is_none_or(|r| g.role == r)));
            (before - state.grants.len(), state.grants.clone())
        };
        self.store.set_json(keys::ALLOWED_USERS, &grants)?;
        debug!(email, ?role, removed, "Removed dashboard grants");

        let session_matches = self
            .session
            .borrow()
            .as_ref()
            .is_some_and(|s| same_email(&s.email, email));
        if session_matches {
            info!(email, "Grant revoked for active session, logging out");
            self.logout_from_dashboard()?;
        }
        Ok(removed)
    }

    /// Apply `update` to every grant whose email equals `email` exactly.
    /// Returns the number of grants touched.
    pub fn update_allowed_user(&self, email: &str, update: &AllowedUserUpdate) -> StoreResult<usize> {
        let (updated, grants) = {
            let mut state = self.state.write();
            let mut updated = 0;
            for grant in state.grants.iter_mut().filter(|g| g.email == email) {
                update.apply(grant);
                updated += 1;
            }
            (updated, state.grants.clone())
        };
        self.store.set_json(keys::ALLOWED_USERS, &grants)?;
        debug!(email, updated, "Updated dashboard grants");
        Ok(updated)
    }

    /// True if an active grant exists for `email`.
    pub fn is_email_allowed(&self, email: &str) -> bool {
        self.state
            .read()
            .grants
            .iter()
            .any(|g| g.is_active && same_email(&g.email, email))
    }

    /// First grant for `email`, active or not.
    pub fn get_allowed_user(&self, email: &str) -> Option<AllowedUser> {
        self.state
            .read()
            .grants
            .iter()
            .find(|g| same_email(&g.email, email))
            .cloned()
    }

    /// All active grants for `email`, in stored order.
    pub fn get_user_roles(&self, email: &str) -> Vec<AllowedUser> {
        self.state
            .read()
            .grants
            .iter()
            .filter(|g| g.is_active && same_email(&g.email, email))
            .cloned()
            .collect()
    }

    // ---- session ----

    pub fn login_to_dashboard(&self, email: &str) -> StoreResult<LoginOutcome> {
        let grants: Vec<AllowedUser> = {
            let state = self.state.read();
            state
                .grants
                .iter()
                .filter(|g| same_email(&g.email, email))
                .cloned()
                .collect()
        };

        if grants.is_empty() {
            debug!(email, "Dashboard login rejected: no grant");
            return Ok(LoginOutcome::EmailNotFound);
        }

        let mut active: Vec<AllowedUser> = grants.into_iter().filter(|g| g.is_active).collect();
        match active.len() {
            0 => {
                debug!(email, "Dashboard login rejected: all grants inactive");
                Ok(LoginOutcome::AccountDisabled)
            }
            1 => {
                let grant = active.remove(0);
                self.start_session(&grant)
            }
            _ => Ok(LoginOutcome::MultipleRoles(active)),
        }
    }

    pub fn login_to_dashboard_with_role(
        &self,
        email: &str,
        role: GrantRole,
    ) -> StoreResult<LoginOutcome> {
        let grant = {
            let state = self.state.read();
            state
                .grants
                .iter()
                .find(|g| same_email(&g.email, email) && g.role == role && g.is_active)
                .cloned()
        };
        match grant {
            Some(grant) => self.start_session(&grant),
            None => {
                debug!(email, %role, "Dashboard login rejected: no active grant for role");
                Ok(LoginOutcome::EmailNotFound)
            }
        }
    }

    fn start_session(&self, grant: &AllowedUser) -> StoreResult<LoginOutcome> {
        let session = DashboardSession::from_grant(grant, Utc::now());
        self.store.set_json(keys::DASHBOARD_SESSION, &session)?;
        self.session.send_replace(Some(session.clone()));
        info!(email = %session.email, role = %session.role, "Dashboard session started");
        Ok(LoginOutcome::Success(session))
    }

    pub fn logout_from_dashboard(&self) -> StoreResult<()> {
        self.session.send_replace(None);
        self.store.remove(keys::DASHBOARD_SESSION)?;
        debug!("Dashboard session cleared");
        Ok(())
    }

    pub fn session(&self) -> Option<DashboardSession> {
        self.session.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Watch session changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSession>> {
        self.session.subscribe()
    }

    // ---- shared controller data ----

    pub fn shared_data(&self) -> SharedControllerData {
        self.state.read().shared.clone()
    }

    /// Merge `update` into the snapshot, stamp it and persist it.
    pub fn update_shared_data(&self, update: SharedDataUpdate) -> StoreResult<SharedControllerData> {
        let snapshot = {
            let mut state = self.state.write();
            state.shared.merge(update, Utc::now());
            state.shared.clone()
        };
        self.store.set_json(keys::SHARED_DATA, &snapshot)?;
        debug!("Shared controller data updated");
        Ok(snapshot)
    }
}

/// Decode grants row by row so one malformed entry does not wipe the rest
/// on the next write.
fn read_grants(store: &dyn KeyValueStore) -> Vec<AllowedUser> {
    let rows: Vec<serde_json::Value> =
        read_or_default(store, keys::ALLOWED_USERS).unwrap_or_default();
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(grant) => Some(grant),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed dashboard grant");
                None
            }
        })
        .collect()
}

fn read_or_default<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get_json::<T>(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Ignoring unreadable dashboard state");
            None
        }
    }
}
