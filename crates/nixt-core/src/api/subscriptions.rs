use super::types::{Listing, Subscription};
use super::{ApiClient, Result};
use reqwest::Method;
use serde_json::Value;

impl ApiClient {
    pub async fn subscriptions_for_user(&self, user_id: &str) -> Result<Vec<Subscription>> {
        let listing: Listing<Subscription> =
            self.get(&["subscriptions", "user", user_id], &[]).await?;
        Ok(listing.data)
    }

    /// Cancel a subscription immediately (owner action).
    pub async fn cancel_subscription(&self, subscription_id: &str) -> Result<Value> {
        self.send::<_, ()>(
            Method::POST,
            &["subscriptions", subscription_id, "cancel"],
            &[],
            None,
        )
        .await
    }

    /// Cancel the signed-in account's own subscription.
    pub async fn cancel_my_subscription(&self) -> Result<Value> {
        self.send::<_, ()>(Method::POST, &["subscriptions", "me", "cancel"], &[], None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::client_for;
    use crate::api::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_subscriptions_for_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/subscriptions/user/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{
                    "id": "s1",
                    "user_id": "u1",
                    "plan_name": "Pro",
                    "status": "active",
                    "billing_interval": "year",
                    "amount": 9900
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t1"));
        let subs = client.subscriptions_for_user("u1").await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].billing_interval, BillingInterval::Year);
    }

    #[tokio::test]
    async fn test_cancel_mine_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/subscriptions/me/cancel"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "No active subscription" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Some("t1"));
        let err = client.cancel_my_subscription().await.unwrap_err();
        assert_eq!(err.to_string(), "No active subscription");
    }
}
