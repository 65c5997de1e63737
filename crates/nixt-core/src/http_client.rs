use anyhow::{Context, Result};
use reqwest::Client;

const DISABLE_SYSTEM_PROXY_ENV: &str = "NIXT_DISABLE_SYSTEM_PROXY";

/// Shared HTTP client for the auth and REST API clients.
pub fn build_http_client() -> Result<Client> {
    let builder = Client::builder().user_agent(concat!("nixt/", env!("CARGO_PKG_VERSION")));
    let builder = if should_disable_system_proxy() {
        builder.no_proxy()
    } else {
        builder
    };
    builder.build().context("Failed to build HTTP client")
}

fn should_disable_system_proxy() -> bool {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
        return true;
    }

    cfg!(test)
}
