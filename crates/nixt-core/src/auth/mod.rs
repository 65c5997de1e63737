//! Remote authentication
//!
//! This module provides the global auth client for Nixt:
//! - Email, registration and Google sign-in against the auth service
//! - Cached identity with role, permissions and subscriptions
//! - Access token refresh on expiry

pub mod client;
pub mod error;
pub mod refresh;
pub mod types;

pub use client::AuthClient;
pub use error::AuthError;
pub use refresh::{HttpTokenRefresher, RefreshedTokens, TokenRefresher};
pub use types::{
    AccessGrants, AuthProviderKind, AuthResponse, AuthUser, RegisterData, SubscriptionInfo, User,
    UserRole,
};
