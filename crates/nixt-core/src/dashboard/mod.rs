//! Dashboard access control
//!
//! Role grants ("allowed users"), the single dashboard session and the
//! shared controller snapshot, all persisted in the local key-value store.

pub mod shared;
pub mod store;
pub mod types;

pub use shared::{SharedControllerData, SharedDataUpdate};
pub use store::{DEFAULT_SESSION_TTL_HOURS, SessionStore, SessionStoreConfig};
pub use types::{
    AllowedUser, AllowedUserUpdate, DashboardSession, GrantRole, LoginOutcome, NewAllowedUser,
};
