//! Dashboard REST resources and response envelopes.

use crate::auth::AuthProviderKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Envelopes ───────────────────────────────────────────────────────

/// `{ success, data, count, nextOffset, left }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next_offset: u64,
    #[serde(default)]
    pub left: u64,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.left > 0
    }
}

/// `{ success, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Single<T> {
    #[serde(default)]
    pub success: bool,
    pub data: T,
}

/// `{ success, data }` where `data` is a plain list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedRows {
    pub changed_rows: u64,
}

/// `{ success, data: { changedRows } | null }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ChangedRows>,
}

impl MutationResponse {
    pub fn changed_rows(&self) -> u64 {
        self.data.map(|d| d.changed_rows).unwrap_or(0)
    }
}

// ── Query parameters ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    /// Zero means "server default" and is not sent.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
}

impl PageParams {
    pub(crate) fn append_to(&self, query: &mut Vec<(&'static str, String)>) {
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(order) = self.order.as_deref().filter(|o| !o.is_empty()) {
            query.push(("order", order.to_string()));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub page: PageParams,
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search: Option<String>,
    /// `None` lists every provider.
    pub auth_provider: Option<AuthProviderKind>,
}

// ── Projects ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Pending,
    Completed,
    Onhold,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Pending => "pending",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Onhold => "onhold",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressItem {
    pub id: String,
    pub title: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub user_id: String,
    #[serde(default)]
    pub progress: Vec<ProgressItem>,
    #[serde(default)]
    pub progress_completed: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Project {
    /// Share of progress items marked completed, in percent.
    pub fn completion(&self) -> f64 {
        if self.progress.is_empty() {
            return 0.0;
        }
        let done = self
            .progress
            .iter()
            .filter(|item| self.progress_completed.contains(&item.id))
            .count();
        done as f64 * 100.0 / self.progress.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectPayload {
    pub name: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Vec<ProgressItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_completed: Option<Vec<String>>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    pub deadline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProjectPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Vec<ProgressItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_completed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub onhold: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_status: StatusCounts,
}

// ── Users and admins ────────────────────────────────────────────────

/// Account as listed by the user management endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedUser {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub auth_provider: AuthProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ManagedUser {
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                let full = [self.first_name.as_deref(), self.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                (!full.trim().is_empty()).then_some(full)
            })
            .unwrap_or_else(|| self.email.clone())
    }
}

/// Permission keys an owner may hand to a project admin.
pub const ADMIN_PERMISSIONS: &[(&str, &str)] = &[
    ("view_users", "Allow viewing user list"),
    ("view_cars", "Allow viewing car list"),
    ("create_cars", "Allow adding new cars"),
    ("update_cars", "Allow editing car data"),
    ("delete_cars", "Allow deleting cars"),
];

pub fn is_known_permission(key: &str) -> bool {
    ADMIN_PERMISSIONS.iter().any(|(k, _)| *k == key)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAdmin {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Filled in client-side from `users/{user_id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ManagedUser>,
}

// ── Subscriptions ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Incomplete,
    IncompleteExpired,
    PastDue,
    Trialing,
    Unpaid,
    Paused,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Paused => "paused",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BillingInterval::Day => "day",
            BillingInterval::Week => "week",
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<String>,
    pub plan_name: String,
    pub status: SubscriptionStatus,
    pub billing_interval: BillingInterval,
    /// Minor currency units.
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Subscription {
    /// Amount in major units with the upper-cased currency, e.g. `19.99 USD`.
    pub fn display_amount(&self) -> String {
        let currency = self.currency.as_deref().unwrap_or("usd").to_uppercase();
        format!("{:.2} {}", self.amount as f64 / 100.0, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_envelope() {
        let page: Paginated<ManagedUser> = serde_json::from_value(json!({
            "success": true,
            "data": [{ "id": "1", "email": "a@x.com", "auth_provider": "google" }],
            "count": 41,
            "nextOffset": 20,
            "left": 21
        }))
        .unwrap();
        assert!(page.has_more());
        assert_eq!(page.next_offset, 20);
        assert_eq!(page.data[0].auth_provider, AuthProviderKind::Google);
    }

    #[test]
    fn test_mutation_with_null_data() {
        let mutation: MutationResponse =
            serde_json::from_value(json!({ "success": false, "data": null })).unwrap();
        assert_eq!(mutation.changed_rows(), 0);
    }

    #[test]
    fn test_project_completion() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "name": "Fleet tracker",
            "user_id": "u1",
            "progress": [
                { "id": "a", "title": "Design", "percent": 30 },
                { "id": "b", "title": "Build", "percent": 70 }
            ],
            "progress_completed": ["a"],
            "price": 1500,
            "spent": 200.5,
            "priority": "urgent",
            "status": "onhold",
            "deadline": "2026-12-01"
        }))
        .unwrap();
        assert_eq!(project.priority, Priority::Urgent);
        assert_eq!(project.completion(), 50.0);
    }

    #[test]
    fn test_subscription_amount() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": "s1",
            "user_id": "u1",
            "plan_name": "Pro",
            "status": "past_due",
            "billing_interval": "month",
            "amount": 1999,
            "currency": "usd"
        }))
        .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::PastDue);
        assert_eq!(sub.display_amount(), "19.99 USD");
    }

    #[test]
    fn test_known_permissions() {
        assert!(is_known_permission("view_users"));
        assert!(!is_known_permission("drop_tables"));
    }

    #[test]
    fn test_page_params_skip_zero_limit() {
        let mut query = Vec::new();
        PageParams {
            limit: Some(0),
            offset: Some(0),
            order: None,
        }
        .append_to(&mut query);
        assert_eq!(query, vec![("offset", "0".to_string())]);
    }
}
