//! Core types for dashboard access control
//!
//! Defines role grants, the dashboard session and login outcomes.

use chrono::{DateTime, Duration, Utc};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Role a grant gives on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantRole {
    Client,
    Manager,
    Viewer,
}

impl GrantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantRole::Client => "client",
            GrantRole::Manager => "manager",
            GrantRole::Viewer => "viewer",
        }
    }
}

impl fmt::Display for GrantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(GrantRole::Client),
            "manager" => Ok(GrantRole::Manager),
            "viewer" => Ok(GrantRole::Viewer),
            other => Err(format!(
                "Unknown role '{}', expected client, manager or viewer",
                other
            )),
        }
    }
}

/// Email comparison used for every grant lookup except updates.
pub(crate) fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A role grant ("allowed user").
///
/// Several grants may share an email as long as their roles differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedUser {
    pub email: String,
    pub name: String,
    pub role: GrantRole,
    pub added_at: DateTime<Utc>,
    pub added_by: String,
    #[serde(default)]
    pub dashboard_sections: BTreeSet<String>,
    pub is_active: bool,
}

/// A grant as submitted by an administrator, before it is stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllowedUser {
    pub email: String,
    pub name: String,
    pub role: GrantRole,
    pub added_by: String,
    #[serde(default)]
    pub dashboard_sections: BTreeSet<String>,
    pub is_active: bool,
}

impl NewAllowedUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: GrantRole) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
            added_by: String::new(),
            dashboard_sections: BTreeSet::new(),
            is_active: true,
        }
    }

    pub fn with_added_by(mut self, added_by: impl Into<String>) -> Self {
        self.added_by = added_by.into();
        self
    }

    pub fn with_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dashboard_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub(crate) fn stamp(self, added_at: DateTime<Utc>) -> AllowedUser {
        AllowedUser {
            email: self.email,
            name: self.name,
            role: self.role,
            added_at,
            added_by: self.added_by,
            dashboard_sections: self.dashboard_sections,
            is_active: self.is_active,
        }
    }
}

/// Partial grant update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedUserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<GrantRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_sections: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl AllowedUserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(&self, grant: &mut AllowedUser) {
        if let Some(email) = &self.email {
            grant.email = email.clone();
        }
        if let Some(name) = &self.name {
            grant.name = name.clone();
        }
        if let Some(role) = self.role {
            grant.role = role;
        }
        if let Some(added_at) = self.added_at {
            grant.added_at = added_at;
        }
        if let Some(added_by) = &self.added_by {
            grant.added_by = added_by.clone();
        }
        if let Some(sections) = &self.dashboard_sections {
            grant.dashboard_sections = sections.clone();
        }
        if let Some(is_active) = self.is_active {
            grant.is_active = is_active;
        }
    }
}

/// The single active dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSession {
    pub email: String,
    pub name: String,
    pub role: GrantRole,
    pub login_at: DateTime<Utc>,
    #[serde(default)]
    pub dashboard_sections: BTreeSet<String>,
}

impl DashboardSession {
    pub(crate) fn from_grant(grant: &AllowedUser, login_at: DateTime<Utc>) -> Self {
        Self {
            email: grant.email.clone(),
            name: grant.name.clone(),
            role: grant.role,
            login_at,
            dashboard_sections: grant.dashboard_sections.clone(),
        }
    }

    /// True once `ttl` has fully elapsed since login.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.login_at >= ttl
    }

    pub fn can_see(&self, section: &str) -> bool {
        self.dashboard_sections.contains(section)
    }
}

/// Result of a dashboard login attempt.
///
/// Failures are ordinary values; callers map `message()` to localized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(DashboardSession),
    EmailNotFound,
    AccountDisabled,
    /// More than one active grant; the caller must pick a role.
    MultipleRoles(Vec<AllowedUser>),
}

impl LoginOutcome {
    pub const SUCCESS: &'static str = "LOGIN_SUCCESS";
    pub const EMAIL_NOT_FOUND: &'static str = "EMAIL_NOT_FOUND";
    pub const ACCOUNT_DISABLED: &'static str = "ACCOUNT_DISABLED";
    pub const MULTIPLE_ROLES: &'static str = "MULTIPLE_ROLES";

    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoginOutcome::Success(_) => Self::SUCCESS,
            LoginOutcome::EmailNotFound => Self::EMAIL_NOT_FOUND,
            LoginOutcome::AccountDisabled => Self::ACCOUNT_DISABLED,
            LoginOutcome::MultipleRoles(_) => Self::MULTIPLE_ROLES,
        }
    }

    pub fn session(&self) -> Option<&DashboardSession> {
        match self {
            LoginOutcome::Success(session) => Some(session),
            _ => None,
        }
    }

    pub fn roles(&self) -> Option<&[AllowedUser]> {
        match self {
            LoginOutcome::MultipleRoles(roles) => Some(roles),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct LoginReport<'a> {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<&'a [AllowedUser]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<&'a DashboardSession>,
}

impl Serialize for LoginOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LoginReport {
            success: self.is_success(),
            message: self.message(),
            roles: self.roles(),
            session: self.session(),
        }
        .serialize(serializer)
    }
}
