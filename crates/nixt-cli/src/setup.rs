//! CLI setup module
//!
//! Handles initialization of the Nixt core for CLI usage.

use anyhow::Result;
use nixt_core::{AppCore, NixtConfig};
use tracing::debug;

use crate::cli::Cli;

/// Resolve configuration with command-line overrides applied last.
pub fn resolve_config(cli: &Cli) -> NixtConfig {
    let mut config = NixtConfig::load();
    if let Some(db_path) = &cli.db_path {
        config.storage.db_path = Some(db_path.clone());
    }
    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.clone();
    }
    config
}

/// Build the embedded Nixt core
pub async fn prepare_core(config: NixtConfig) -> Result<AppCore> {
    debug!(api_url = %config.api.base_url, "Preparing core");
    AppCore::new(config).await
}
