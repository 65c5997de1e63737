//! Durable storage key names.
//!
//! These match the keys the browser application writes, so a store exported
//! from a browser profile can be loaded unchanged.

/// JSON list of role grants.
pub const ALLOWED_USERS: &str = "nixt-allowed-users";
/// JSON dashboard session.
pub const DASHBOARD_SESSION: &str = "nixt-dashboard-session";
/// JSON shared controller-data snapshot.
pub const SHARED_DATA: &str = "nixt-shared-controller-data";
/// Raw access token.
pub const ACCESS_TOKEN: &str = "token";
/// Raw refresh token.
pub const REFRESH_TOKEN: &str = "refreshToken";
/// Raw language code (`ar` or `en`).
pub const LANGUAGE: &str = "nixt-lang";
/// Raw theme index.
pub const THEME: &str = "nixt-theme";
