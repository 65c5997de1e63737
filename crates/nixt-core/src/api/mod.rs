//! Dashboard REST API client
//!
//! Thin typed wrappers over the backend's versioned REST endpoints. The
//! bearer token is read from the local store on every call so a login in
//! another process is picked up without restarting.

pub mod admins;
pub mod error;
pub mod projects;
pub mod subscriptions;
pub mod types;
pub mod users;

pub use error::ApiError;
pub use types::*;

use nixt_storage::keys;
use nixt_traits::KeyValueStore;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub type Result<T> = std::result::Result<T, ApiError>;

pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Each segment is appended percent-encoded, so ids cannot change the route.
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        self.send::<T, ()>(Method::GET, segments, query, None).await
    }

    pub(crate) async fn send<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(segments, query)?;
        let token = self.store.get(keys::ACCESS_TOKEN)?.unwrap_or_default();
        let path = url.path().to_string();

        debug!(%method, %path, "API request");
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::Connection)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<serde_json::Value>().await.ok();
            debug!(%status, %path, "API request failed");
            return Err(ApiError::status(status.as_u16(), body.as_ref()));
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use nixt_storage::MemoryKeyValueStore;
    use wiremock::MockServer;

    pub fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
        let kv = Arc::new(MemoryKeyValueStore::new());
        if let Some(token) = token {
            kv.set(keys::ACCESS_TOKEN, token).unwrap();
        }
        ApiClient::new(Client::new(), format!("{}/api/v1", server.uri()), kv)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::client_for;
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_path_segments_are_escaped() {
        let kv = Arc::new(nixt_storage::MemoryKeyValueStore::new());
        let client = ApiClient::new(Client::new(), "http://localhost:3003/api/v1/", kv);

        let url = client
            .url(&["users", "u1/../admins?x=1"], &[("limit", "5".to_string())])
            .unwrap();
        assert_eq!(url.path(), "/api/v1/users/u1%2F..%2Fadmins%3Fx=1");
        assert_eq!(url.query(), Some("limit=5"));
    }

    #[tokio::test]
    async fn test_bearer_token_from_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects/statistics"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "total": 3, "byStatus": { "active": 2, "pending": 1, "completed": 0, "onhold": 0 } }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t1"));
        let stats = client.project_statistics().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.active, 2);
    }

    #[tokio::test]
    async fn test_error_status_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects/statistics"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.project_statistics().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 503");
        assert_eq!(err.status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.project_statistics().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
