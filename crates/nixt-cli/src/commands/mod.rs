pub mod admins;
pub mod auth;
pub mod dashboard;
pub mod grant;
pub mod prefs;
pub mod projects;
pub mod shared;
pub mod subscriptions;
pub mod users;
pub mod utils;
