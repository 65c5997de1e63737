//! Authentication types
//!
//! Wire shapes of the remote auth service and the cached identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role assigned by the auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    #[default]
    User,
    Guest,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Owner => write!(f, "owner"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
            UserRole::Guest => write!(f, "guest"),
        }
    }
}

/// How the account signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderKind {
    #[default]
    Local,
    Google,
}

impl fmt::Display for AuthProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthProviderKind::Local => write!(f, "local"),
            AuthProviderKind::Google => write!(f, "google"),
        }
    }
}

impl FromStr for AuthProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(AuthProviderKind::Local),
            "google" => Ok(AuthProviderKind::Google),
            other => Err(format!("Unknown auth provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    #[serde(default)]
    pub has_active_subscription: bool,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_period_end: Option<String>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub billing_interval: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
}

/// Account as returned by `auth/me` and the login endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
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
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// Best human-readable name for the account.
    pub fn label(&self) -> String {
        if let Some(display) = self.display_name.as_deref().filter(|s| !s.is_empty()) {
            return display.to_string();
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}

/// Role, permissions and subscriptions reported by `auth/validate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessGrants {
    pub role: UserRole,
    pub permissions: Vec<String>,
    pub subscriptions: Vec<SubscriptionInfo>,
}

/// The cached identity: account plus grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(flatten)]
    pub user: User,
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionInfo>,
}

impl AuthUser {
    pub fn from_parts(user: User, grants: AccessGrants) -> Self {
        Self {
            user,
            role: grants.role,
            permissions: grants.permissions,
            subscriptions: grants.subscriptions,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }

    /// Owners count as admins.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Owner | UserRole::Admin)
    }

    /// Owners hold every permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_owner() || self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_active_subscription(&self) -> bool {
        self.subscriptions.iter().any(|s| s.has_active_subscription)
    }

    pub fn has_subscription(&self, plan_name: &str) -> bool {
        self.subscriptions
            .iter()
            .any(|s| s.has_active_subscription && s.plan_name.as_deref() == Some(plan_name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Success body of the login, register and google endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub user: User,
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MeResponse {
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TokenValidationResponse {
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub subscriptions: Option<Vec<SubscriptionInfo>>,
}

impl From<TokenValidationResponse> for AccessGrants {
    fn from(value: TokenValidationResponse) -> Self {
        Self {
            role: value.role.unwrap_or_default(),
            permissions: value.permissions.unwrap_or_default(),
            subscriptions: value.subscriptions.unwrap_or_default(),
        }
    }
}

/// `{ success, error? }` result shape used for machine-readable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn from_result<T, E: fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                error: None,
            },
            Err(e) => Self {
                success: false,
                error: Some(e.to_string()),
            },
        }
    }
}
