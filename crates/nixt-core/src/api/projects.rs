//! Project endpoints, including progress items and team membership.

use super::types::{
    CreateProjectPayload, MutationResponse, PageParams, Paginated, ProgressItem,
    ProgressUpdate, Project, ProjectQuery, ProjectStatistics, Single, UpdateProjectPayload,
};
use super::{ApiClient, Result};
use reqwest::Method;
use serde_json::json;

const BASE: &str = "projects";

impl ApiClient {
    pub async fn list_projects(&self, params: &ProjectQuery) -> Result<Paginated<Project>> {
        let mut query = Vec::new();
        params.page.append_to(&mut query);
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(status) = params.status {
            query.push(("status", status.to_string()));
        }
        if let Some(priority) = params.priority {
            query.push(("priority", priority.to_string()));
        }
        if let Some(user_id) = params.user_id.as_deref().filter(|s| !s.is_empty()) {
            query.push(("user_id", user_id.to_string()));
        }
        self.get(&[BASE], &query).await
    }

    pub async fn project_statistics(&self) -> Result<ProjectStatistics> {
        let envelope: Single<ProjectStatistics> =
            self.get(&[BASE, "statistics"], &[]).await?;
        Ok(envelope.data)
    }

    pub async fn list_projects_by_user(
        &self,
        user_id: &str,
        page: &PageParams,
    ) -> Result<Paginated<Project>> {
        let mut query = Vec::new();
        page.append_to(&mut query);
        self.get(&[BASE, "user", user_id], &query).await
    }

    pub async fn list_projects_by_team_member(
        &self,
        admin_id: &str,
        page: &PageParams,
    ) -> Result<Paginated<Project>> {
        let mut query = Vec::new();
        page.append_to(&mut query);
        self.get(&[BASE, "team", admin_id], &query).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project> {
        let envelope: Single<Project> = self.get(&[BASE, id], &[]).await?;
        Ok(envelope.data)
    }

    pub async fn create_project(&self, payload: &CreateProjectPayload) -> Result<Project> {
        let envelope: Single<Project> = self
            .send(Method::POST, &[BASE], &[], Some(payload))
            .await?;
        Ok(envelope.data)
    }

    pub async fn update_project(
        &self,
        id: &str,
        payload: &UpdateProjectPayload,
    ) -> Result<MutationResponse> {
        self.send(Method::PUT, &[BASE, id], &[], Some(payload))
            .await
    }

    pub async fn delete_project(&self, id: &str) -> Result<MutationResponse> {
        self.send::<_, ()>(Method::DELETE, &[BASE, id], &[], None)
            .await
    }

    // ---- progress ----

    pub async fn add_progress_item(
        &self,
        project_id: &str,
        item: &ProgressItem,
    ) -> Result<MutationResponse> {
        let body = json!({ "item": item });
        self.send(
            Method::POST,
            &[BASE, project_id, "progress"],
            &[],
            Some(&body),
        )
        .await
    }

    pub async fn update_progress_item(
        &self,
        project_id: &str,
        item_id: &str,
        update: &ProgressUpdate,
    ) -> Result<MutationResponse> {
        self.send(
            Method::PUT,
            &[BASE, project_id, "progress", item_id],
            &[],
            Some(update),
        )
        .await
    }

    pub async fn remove_progress_item(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> Result<MutationResponse> {
        self.send::<_, ()>(
            Method::DELETE,
            &[BASE, project_id, "progress", item_id],
            &[],
            None,
        )
        .await
    }

    pub async fn mark_progress_completed(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> Result<MutationResponse> {
        let body = json!({ "itemId": item_id });
        self.send(
            Method::POST,
            &[BASE, project_id, "progress", "complete"],
            &[],
            Some(&body),
        )
        .await
    }

    pub async fn unmark_progress_completed(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> Result<MutationResponse> {
        let body = json!({ "itemId": item_id });
        self.send(
            Method::POST,
            &[BASE, project_id, "progress", "uncomplete"],
            &[],
            Some(&body),
        )
        .await
    }

    // ---- team ----

    pub async fn add_team_member(&self, project_id: &str, admin_id: &str) -> Result<MutationResponse> {
        let body = json!({ "admin_id": admin_id });
        self.send(
            Method::POST,
            &[BASE, project_id, "team"],
            &[],
            Some(&body),
        )
        .await
    }

    /// DELETE with a JSON body.
    pub async fn remove_team_member(
        &self,
        project_id: &str,
        admin_id: &str,
    ) -> Result<MutationResponse> {
        let body = json!({ "admin_id": admin_id });
        self.send(
            Method::DELETE,
            &[BASE, project_id, "team"],
            &[],
            Some(&body),
        )
        .await
    }
}
