//! Global auth client
//!
//! Talks to the remote auth service and caches the signed-in identity.
//! The access and refresh tokens live in the durable store so a later
//! process can pick the session up through [`AuthClient::initialize`].

use super::error::AuthError;
use super::refresh::{HttpTokenRefresher, TokenRefresher};
use super::types::{
    AccessGrants, AuthUser, MeResponse, RegisterData, SubscriptionInfo, TokenResponse,
    TokenValidationResponse,
};
use nixt_storage::keys;
use nixt_traits::KeyValueStore;
use parking_lot::RwLock;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug)]
struct AuthState {
    user: Option<AuthUser>,
    token: Option<String>,
    loading: bool,
}

pub struct AuthClient {
    http: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
    refresher: Arc<dyn TokenRefresher>,
    state: RwLock<AuthState>,
}

impl AuthClient {
    pub fn new(http: Client, base_url: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let refresher = Arc::new(HttpTokenRefresher::new(
            http.clone(),
            format!("{}/auth/refresh-token", base_url),
        ));
        Self {
            http,
            base_url,
            store,
            refresher,
            state: RwLock::new(AuthState {
                user: None,
                token: None,
                loading: true,
            }),
        }
    }

    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Pick up a stored token and fetch the identity behind it.
    ///
    /// Returns whether an identity was loaded.
    pub async fn initialize(&self) -> Result<bool, AuthError> {
        match self.store.get(keys::ACCESS_TOKEN)? {
            Some(token) => {
                self.state.write().token = Some(token.clone());
                self.load_identity(&token).await
            }
            None => {
                self.state.write().loading = false;
                Ok(false)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let (status, payload) = self
            .post_json("auth/login/email", &body)
            .await
            .map_err(AuthError::connection)?;

        if !status.is_success() {
            debug!(email, %status, "Login rejected");
            return Err(AuthError::rejected(&payload, "Login failed"));
        }

        let tokens: TokenResponse =
            serde_json::from_value(payload).map_err(AuthError::connection)?;
        self.sign_in(tokens, true).await
    }

    pub async fn login_with_google(&self, credential: &str) -> Result<AuthUser, AuthError> {
        let body = serde_json::json!({ "credential": credential });
        let (status, payload) = self
            .post_json("auth/google", &body)
            .await
            .map_err(|_| AuthError::connection_bare())?;

        if !status.is_success() {
            debug!(%status, "Google login rejected");
            return Err(AuthError::rejected(&payload, "Google login failed"));
        }

        let tokens: TokenResponse =
            serde_json::from_value(payload).map_err(|_| AuthError::connection_bare())?;
        self.sign_in(tokens, true).await
    }

    /// Create an account. The identity starts as a plain `user` with no
    /// permissions; no validation round trip is made.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthUser, AuthError> {
        let body = serde_json::to_value(data).map_err(|_| AuthError::connection_bare())?;
        let (status, payload) = self
            .post_json("auth/register", &body)
            .await
            .map_err(|_| AuthError::connection_bare())?;

        if !status.is_success() {
            debug!(email = %data.email, %status, "Registration rejected");
            return Err(AuthError::rejected(&payload, "Registration failed"));
        }

        let tokens: TokenResponse =
            serde_json::from_value(payload).map_err(|_| AuthError::connection_bare())?;
        self.sign_in(tokens, false).await
    }

    async fn sign_in(&self, tokens: TokenResponse, validate: bool) -> Result<AuthUser, AuthError> {
        self.store.set(keys::ACCESS_TOKEN, &tokens.token)?;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.store.set(keys::REFRESH_TOKEN, refresh_token)?;
        }

        let grants = if validate {
            self.fetch_access_grants(&tokens.token).await
        } else {
            AccessGrants::default()
        };
        let user = AuthUser::from_parts(tokens.user, grants);

        {
            let mut state = self.state.write();
            state.token = Some(tokens.token);
            state.user = Some(user.clone());
        }
        info!(email = %user.user.email, role = %user.role, "Signed in");
        Ok(user)
    }

    /// Re-fetch the identity with the held token. No-op without a token.
    pub async fn refresh_user(&self) -> Result<bool, AuthError> {
        let token = self.state.read().token.clone();
        match token {
            Some(token) => self.load_identity(&token).await,
            None => Ok(false),
        }
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        {
            let mut state = self.state.write();
            state.user = None;
            state.token = None;
        }
        self.store.remove(keys::ACCESS_TOKEN)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        debug!("Auth state cleared");
        Ok(())
    }

    async fn load_identity(&self, token: &str) -> Result<bool, AuthError> {
        let result = self.fetch_identity(token).await;
        self.state.write().loading = false;
        result
    }

    async fn fetch_identity(&self, token: &str) -> Result<bool, AuthError> {
        let (me, grants) = tokio::join!(self.fetch_me(token), self.fetch_access_grants(token));
        let response = match me {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Error fetching user");
                return Ok(false);
            }
        };

        match response.status() {
            status if status.is_success() => Ok(self.apply_identity(response, grants).await),
            StatusCode::UNAUTHORIZED => match self.store.get(keys::REFRESH_TOKEN)? {
                Some(refresh_token) => self.refresh_access_token(&refresh_token).await,
                None => {
                    info!("Access token rejected without refresh token, logging out");
                    self.logout()?;
                    Ok(false)
                }
            },
            StatusCode::NOT_FOUND => {
                info!("Account not found, logging out");
                self.logout()?;
                Ok(false)
            }
            status => {
                debug!(%status, "Identity fetch failed, keeping cached state");
                Ok(false)
            }
        }
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<bool, AuthError> {
        let tokens = match self.refresher.refresh(refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Error refreshing token");
                self.logout()?;
                return Ok(false);
            }
        };

        self.state.write().token = Some(tokens.token.clone());
        self.store.set(keys::ACCESS_TOKEN, &tokens.token)?;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.store.set(keys::REFRESH_TOKEN, refresh_token)?;
        }
        info!("Access token refreshed");

        let (me, grants) = tokio::join!(
            self.fetch_me(&tokens.token),
            self.fetch_access_grants(&tokens.token)
        );
        match me {
            Ok(response) if response.status().is_success() => {
                Ok(self.apply_identity(response, grants).await)
            }
            Ok(response) => {
                debug!(status = %response.status(), "Identity fetch after refresh failed");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Error fetching user after refresh");
                Ok(false)
            }
        }
    }

    async fn apply_identity(&self, response: Response, grants: AccessGrants) -> bool {
        match response.json::<MeResponse>().await {
            Ok(me) => {
                self.state.write().user = Some(AuthUser::from_parts(me.user, grants));
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse user response");
                false
            }
        }
    }

    async fn fetch_me(&self, token: &str) -> reqwest::Result<Response> {
        self.http
            .get(self.endpoint("auth/me"))
            .bearer_auth(token)
            .send()
            .await
    }

    /// Role, permissions and subscriptions for `token`. Any failure yields
    /// the `user` defaults.
    async fn fetch_access_grants(&self, token: &str) -> AccessGrants {
        let mut url = match Url::parse(&self.endpoint("auth/validate")) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Invalid validate endpoint");
                return AccessGrants::default();
            }
        };
        url.query_pairs_mut().append_pair("token", token);

        let response = match self.http.get(url).bearer_auth(token).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "Token validation rejected");
                return AccessGrants::default();
            }
            Err(e) => {
                debug!(error = %e, "Token validation failed");
                return AccessGrants::default();
            }
        };

        response
            .json::<TokenValidationResponse>()
            .await
            .map(AccessGrants::from)
            .unwrap_or_default()
    }

    /// POST a JSON body and decode the JSON reply before looking at the status.
    async fn post_json(&self, path: &str, body: &Value) -> reqwest::Result<(StatusCode, Value)> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        let status = response.status();
        let payload = response.json::<Value>().await?;
        Ok((status, payload))
    }

    // ---- derived state ----

    pub fn user(&self) -> Option<AuthUser> {
        self.state.read().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().user.is_some()
    }

    pub fn is_owner(&self) -> bool {
        self.state.read().user.as_ref().is_some_and(AuthUser::is_owner)
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().user.as_ref().is_some_and(AuthUser::is_admin)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.state
            .read()
            .user
            .as_ref()
            .is_some_and(|u| u.has_permission(permission))
    }

    pub fn has_active_subscription(&self) -> bool {
        self.state
            .read()
            .user
            .as_ref()
            .is_some_and(AuthUser::has_active_subscription)
    }

    pub fn has_subscription(&self, plan_name: &str) -> bool {
        self.state
            .read()
            .user
            .as_ref()
            .is_some_and(|u| u.has_subscription(plan_name))
    }

    pub fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        self.state
            .read()
            .user
            .as_ref()
            .map(|u| u.subscriptions.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserRole;
    use nixt_storage::MemoryKeyValueStore;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn account(email: &str) -> Value {
        json!({
            "id": "u-1",
            "email": email,
            "first_name": "Sara",
            "auth_provider": "local"
        })
    }

    fn client_for(server: &MockServer) -> (Arc<MemoryKeyValueStore>, AuthClient) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let client = AuthClient::new(
            Client::new(),
            format!("{}/api/v1/", server.uri()),
            kv.clone(),
        );
        (kv, client)
    }

    async fn mount_validate(server: &MockServer, token: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/validate"))
            .and(query_param("token", token))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_me(server: &MockServer, token: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_stores_tokens_and_grants() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login/email"))
            .and(body_json(json!({ "email": "a@x.com", "password": "secret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": account("a@x.com"),
                "token": "t1",
                "refreshToken": "r1"
            })))
            .mount(&server)
            .await;
        mount_validate(
            &server,
            "t1",
            json!({ "message": "ok", "userID": "u-1", "role": "admin", "permissions": ["view_users"] }),
        )
        .await;

        let (kv, client) = client_for(&server);
        let user = client.login("a@x.com", "secret").await.unwrap();

        assert_eq!(user.role, UserRole::Admin);
        assert!(client.has_permission("view_users"));
        assert!(!client.has_permission("delete_cars"));
        assert!(client.is_admin());
        assert_eq!(client.token().as_deref(), Some("t1"));
        assert_eq!(kv.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("t1"));
        assert_eq!(kv.get(keys::REFRESH_TOKEN).unwrap().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_login_rejection_uses_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login/email"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;

        let (kv, client) = client_for(&server);
        let err = client.login("a@x.com", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(kv.get(keys::ACCESS_TOKEN).unwrap().is_none());
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejection_without_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login/email"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
            .mount(&server)
            .await;

        let (_kv, client) = client_for(&server);
        let err = client.login("a@x.com", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[tokio::test]
    async fn test_non_json_body_is_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login/email"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let (_kv, client) = client_for(&server);
        let err = client.login("a@x.com", "x").await.unwrap_err();
        assert!(err.to_string().starts_with("Server connection error: "));

        let data = RegisterData {
            email: "a@x.com".to_string(),
            password: "x".to_string(),
            ..Default::default()
        };
        let err = client.register(&data).await.unwrap_err();
        assert_eq!(err.to_string(), "Server connection error");
    }

    #[tokio::test]
    async fn test_validation_failure_defaults_to_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/google"))
            .and(body_json(json!({ "credential": "google-jwt" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": account("g@x.com"),
                "token": "t1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/validate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (kv, client) = client_for(&server);
        let user = client.login_with_google("google-jwt").await.unwrap();

        assert_eq!(user.role, UserRole::User);
        assert!(user.permissions.is_empty());
        assert!(kv.get(keys::REFRESH_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_skips_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .and(body_json(json!({ "email": "n@x.com", "password": "pw", "first_name": "Nour" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "user": account("n@x.com"),
                "token": "t1",
                "refreshToken": "r1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "owner" })))
            .expect(0)
            .mount(&server)
            .await;

        let (_kv, client) = client_for(&server);
        let data = RegisterData {
            email: "n@x.com".to_string(),
            password: "pw".to_string(),
            first_name: Some("Nour".to_string()),
            ..Default::default()
        };
        let user = client.register(&data).await.unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!client.is_owner());
    }

    #[tokio::test]
    async fn test_initialize_without_token() {
        let server = MockServer::start().await;
        let (_kv, client) = client_for(&server);
        assert!(client.is_loading());
        assert!(!client.initialize().await.unwrap());
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_initialize_loads_identity() {
        let server = MockServer::start().await;
        mount_me(&server, "t1", 200, json!({ "user": account("a@x.com") })).await;
        mount_validate(
            &server,
            "t1",
            json!({
                "role": "owner",
                "subscriptions": [{ "hasActiveSubscription": true, "planName": "Pro", "cancelAtPeriodEnd": false }]
            }),
        )
        .await;

        let (kv, client) = client_for(&server);
        kv.set(keys::ACCESS_TOKEN, "t1").unwrap();

        assert!(client.initialize().await.unwrap());
        assert!(client.is_owner());
        assert!(client.has_permission("anything"));
        assert!(client.has_subscription("Pro"));
        assert!(client.has_active_subscription());
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let server = MockServer::start().await;
        mount_me(&server, "old", 401, json!({ "error": "expired" })).await;
        mount_me(&server, "new", 200, json!({ "user": account("a@x.com") })).await;
        mount_validate(&server, "new", json!({ "role": "admin" })).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/validate"))
            .and(query_param("token", "old"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh-token"))
            .and(body_json(json!({ "refreshToken": "r1" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "token": "new", "refreshToken": "r2" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (kv, client) = client_for(&server);
        kv.set(keys::ACCESS_TOKEN, "old").unwrap();
        kv.set(keys::REFRESH_TOKEN, "r1").unwrap();

        assert!(client.initialize().await.unwrap());
        assert_eq!(client.user().unwrap().user.email, "a@x.com");
        assert!(client.is_admin());
        assert_eq!(client.token().as_deref(), Some("new"));
        assert_eq!(kv.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("new"));
        assert_eq!(kv.get(keys::REFRESH_TOKEN).unwrap().as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_refresh_failure_logs_out() {
        let server = MockServer::start().await;
        mount_me(&server, "old", 401, json!({})).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "revoked" })))
            .mount(&server)
            .await;

        let (kv, client) = client_for(&server);
        kv.set(keys::ACCESS_TOKEN, "old").unwrap();
        kv.set(keys::REFRESH_TOKEN, "r1").unwrap();

        assert!(!client.initialize().await.unwrap());
        assert!(client.user().is_none());
        assert!(client.token().is_none());
        assert!(kv.get(keys::ACCESS_TOKEN).unwrap().is_none());
        assert!(kv.get(keys::REFRESH_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_without_refresh_token_logs_out() {
        let server = MockServer::start().await;
        mount_me(&server, "old", 401, json!({})).await;

        let (kv, client) = client_for(&server);
        kv.set(keys::ACCESS_TOKEN, "old").unwrap();

        assert!(!client.initialize().await.unwrap());
        assert!(kv.get(keys::ACCESS_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_account_logs_out() {
        let server = MockServer::start().await;
        mount_me(&server, "t1", 404, json!({ "error": "not found" })).await;

        let (kv, client) = client_for(&server);
        kv.set(keys::ACCESS_TOKEN, "t1").unwrap();
        kv.set(keys::REFRESH_TOKEN, "r1").unwrap();

        assert!(!client.initialize().await.unwrap());
        assert!(kv.get(keys::REFRESH_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_keeps_token() {
        let server = MockServer::start().await;
        mount_me(&server, "t1", 500, json!({})).await;

        let (kv, client) = client_for(&server);
        kv.set(keys::ACCESS_TOKEN, "t1").unwrap();

        assert!(!client.initialize().await.unwrap());
        assert_eq!(client.token().as_deref(), Some("t1"));
        assert_eq!(kv.get(keys::ACCESS_TOKEN).unwrap().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_refresh_user_without_token_is_noop() {
        let server = MockServer::start().await;
        let (_kv, client) = client_for(&server);
        assert!(!client.refresh_user().await.unwrap());
        assert!(!client.has_permission("view_users"));
        assert!(client.subscriptions().is_empty());
    }
}
