// =============================================================================
// Application State — shared, read-only after startup
// =============================================================================
//
// Each request renders from scratch, so the state only carries what every
// render needs: the loaded configuration and a reusable HTTP client.
// =============================================================================

use std::time::Duration;

use anyhow::Result;

use crate::config::DashboardConfig;
use crate::okx::OkxClient;

pub struct AppState {
    pub config: DashboardConfig,
    pub okx: OkxClient,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let okx = OkxClient::new(
            config.okx_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self { config, okx })
    }
}
