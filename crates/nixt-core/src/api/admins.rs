use super::types::{Listing, ProjectAdmin};
use super::{ApiClient, Result};
use futures::future::join_all;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::debug;

const BASE: &str = "project-admins";

impl ApiClient {
    pub async fn list_project_admins(&self) -> Result<Vec<ProjectAdmin>> {
        let listing: Listing<ProjectAdmin> = self.get(&[BASE], &[]).await?;
        Ok(listing.data)
    }

    /// Admins with their account attached. A failed account lookup leaves
    /// `user` empty instead of failing the listing.
    pub async fn list_project_admins_with_users(&self) -> Result<Vec<ProjectAdmin>> {
        let admins = self.list_project_admins().await?;
        let lookups = admins.into_iter().map(|mut admin| async move {
            match self.get_user(&admin.user_id).await {
                Ok(user) => admin.user = Some(user),
                Err(e) => debug!(user_id = %admin.user_id, error = %e, "Admin account lookup failed"),
            }
            admin
        });
        Ok(join_all(lookups).await)
    }

    /// New admins start without permissions unless given some.
    pub async fn create_project_admin(&self, user_id: &str, permissions: &[String]) -> Result<Value> {
        let body = json!({ "user_id": user_id, "permissions": permissions });
        self.send(Method::POST, &[BASE], &[], Some(&body)).await
    }

    pub async fn update_admin_permissions(
        &self,
        admin_id: &str,
        permissions: &[String],
    ) -> Result<Value> {
        let body = json!({ "permissions": permissions });
        self.send(Method::PUT, &[BASE, admin_id], &[], Some(&body))
            .await
    }

    pub async fn delete_project_admin(&self, admin_id: &str) -> Result<Value> {
        self.send::<_, ()>(Method::DELETE, &[BASE, admin_id], &[], None)
            .await
    }
}
