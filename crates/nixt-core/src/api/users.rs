use super::types::{ManagedUser, Paginated, Single, UserQuery};
use super::{ApiClient, Result};

impl ApiClient {
    /// One page of accounts. `left > 0` on the envelope means more pages.
    pub async fn list_users(&self, params: &UserQuery) -> Result<Paginated<ManagedUser>> {
        let mut query = Vec::new();
        if let Some(limit) = params.limit.filter(|l| *l > 0) {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = params.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(provider) = params.auth_provider {
            query.push(("auth_provider", provider.to_string()));
        }
        self.get(&["users"], &query).await
    }

    pub async fn get_user(&self, id: &str) -> Result<ManagedUser> {
        let envelope: Single<ManagedUser> = self.get(&["users", id], &[]).await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::client_for;
    use crate::api::*;
    use crate::auth::AuthProviderKind;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_users_by_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users"))
            .and(query_param("limit", "20"))
            .and(query_param("offset", "20"))
            .and(query_param("auth_provider", "google"))
            .and(query_param_is_missing("search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "id": "u2", "email": "g@x.com", "auth_provider": "google", "email_verified": true }],
                "count": 21,
                "nextOffset": 40,
                "left": 0
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t1"));
        let page = client
            .list_users(&UserQuery {
                limit: Some(20),
                offset: Some(20),
                search: None,
                auth_provider: Some(AuthProviderKind::Google),
            })
            .await
            .unwrap();

        assert_eq!(page.count, 21);
        assert_eq!(page.data[0].email_verified, Some(true));
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_forbidden_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t1"));
        let err = client.list_users(&UserQuery::default()).await.unwrap_err();
        assert!(err.is_access_denied());
        assert_eq!(err.to_string(), "Forbidden");
    }
}
