pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod http_client;
pub mod preferences;

pub use config::NixtConfig;

use anyhow::Context;
use api::ApiClient;
use auth::AuthClient;
use dashboard::{SessionStore, SessionStoreConfig};
use nixt_storage::{KeyValueStore, RedbKeyValueStore};
use preferences::Preferences;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Core application state shared by every front end
///
/// Wires one durable store into the services that read it:
/// - Session store for dashboard grants and the dashboard session
/// - Auth client for the remote identity
/// - REST API client for projects, users, admins and subscriptions
/// - Display preferences
pub struct AppCore {
    pub config: NixtConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub sessions: SessionStore,
    pub auth: AuthClient,
    pub api: ApiClient,
    pub preferences: Preferences,
}

impl AppCore {
    /// Open the redb store named by the config (or the default data
    /// directory) and build the services on top of it.
    pub async fn new(config: NixtConfig) -> anyhow::Result<Self> {
        let db_path = match &config.storage.db_path {
            Some(path) => PathBuf::from(path),
            None => nixt_storage::paths::database_path()?,
        };
        let store = RedbKeyValueStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

        info!(db_path = %db_path.display(), "Initializing Nixt");
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: NixtConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let http = http_client::build_http_client()?;
        let sessions = SessionStore::load(
            store.clone(),
            SessionStoreConfig {
                session_ttl: config.session_ttl(),
            },
        );
        let auth = AuthClient::new(http.clone(), config.api.base_url.clone(), store.clone());
        let api = ApiClient::new(http, config.api.base_url.clone(), store.clone());
        let preferences = Preferences::new(store.clone());

        Ok(Self {
            config,
            store,
            sessions,
            auth,
            api,
            preferences,
        })
    }
}
