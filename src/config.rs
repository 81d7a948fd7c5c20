// =============================================================================
// Dashboard Configuration
// =============================================================================
//
// Every tunable lives here: where to fetch from, what to offer in the pickers,
// the indicator windows, and the signal thresholds.
//
// All fields carry `#[serde(default)]` so that a partial (or older) config
// file still loads.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorParams;
use crate::okx::client::{DEFAULT_BASE_URL, MAX_CANDLE_LIMIT};
use crate::signals::SignalThresholds;
use crate::types::BarInterval;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_okx_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_trading_pairs() -> Vec<String> {
    [
        "PI-USDT", "BTC-USDT", "ETH-USDT", "BNB-USDT", "XRP-USDT", "SOL-USDT", "ADA-USDT",
        "AVAX-USDT", "MATIC-USDT", "LINK-USDT", "DOT-USDT",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_symbol() -> String {
    "BTC-USDT".to_string()
}

fn default_limit() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// DashboardConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Public REST host of the exchange.
    #[serde(default = "default_okx_base_url")]
    pub okx_base_url: String,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Instruments offered in the pair picker.
    #[serde(default = "default_trading_pairs")]
    pub trading_pairs: Vec<String>,

    /// Instrument used when a request names none.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    #[serde(default)]
    pub default_interval: BarInterval,

    /// Bars fetched when a request names no limit (1..=300).
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub thresholds: SignalThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            okx_base_url: default_okx_base_url(),
            bind_addr: default_bind_addr(),
            trading_pairs: default_trading_pairs(),
            default_symbol: default_symbol(),
            default_interval: BarInterval::default(),
            default_limit: default_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dashboard config from {}", path.display()))?;

        config.validate()?;

        info!(
            path = %path.display(),
            default_symbol = %config.default_symbol,
            default_interval = %config.default_interval,
            "dashboard config loaded"
        );

        Ok(config)
    }

    /// Reject values the candles endpoint would refuse or that break the
    /// indicator and signal math.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CANDLE_LIMIT).contains(&self.default_limit) {
            anyhow::bail!(
                "default_limit must be between 1 and {MAX_CANDLE_LIMIT}, got {}",
                self.default_limit
            );
        }
        if self.default_symbol.trim().is_empty() {
            anyhow::bail!("default_symbol must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }

        let bb_std = self.indicators.bb_std;
        if !bb_std.is_finite() || bb_std < 0.0 {
            anyhow::bail!("indicators.bb_std must be a non-negative number, got {bb_std}");
        }

        let t = &self.thresholds;
        if t.rsi_oversold >= t.rsi_overbought {
            anyhow::bail!(
                "thresholds.rsi_oversold ({}) must be below rsi_overbought ({})",
                t.rsi_oversold,
                t.rsi_overbought
            );
        }
        if t.stoch_oversold >= t.stoch_overbought {
            anyhow::bail!(
                "thresholds.stoch_oversold ({}) must be below stoch_overbought ({})",
                t.stoch_oversold,
                t.stoch_overbought
            );
        }
        Ok(())
    }

    /// Apply `TA_DASHBOARD_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("TA_DASHBOARD_BIND_ADDR") {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var("TA_DASHBOARD_OKX_URL") {
            if !url.trim().is_empty() {
                self.okx_base_url = url.trim().to_string();
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.okx_base_url, "https://www.okx.com");
        assert_eq!(cfg.trading_pairs.len(), 11);
        assert_eq!(cfg.trading_pairs[0], "PI-USDT");
        assert_eq!(cfg.trading_pairs[10], "DOT-USDT");
        assert_eq!(cfg.default_limit, 100);
        assert_eq!(cfg.default_interval, BarInterval::OneHour);
        assert_eq!(cfg.indicators.rsi_period, 14);
        assert!((cfg.thresholds.rsi_overbought - 70.0).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.default_symbol, "BTC-USDT");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.indicators, IndicatorParams::default());
        assert_eq!(cfg.thresholds, SignalThresholds::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "default_interval": "15m",
            "trading_pairs": ["ETH-USDT"],
            "thresholds": { "stoch_oversold": 10.0 }
        }"#;
        let cfg: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.default_interval, BarInterval::FifteenMinutes);
        assert_eq!(cfg.trading_pairs, vec!["ETH-USDT"]);
        assert!((cfg.thresholds.stoch_oversold - 10.0).abs() < f64::EPSILON);
        assert!((cfg.thresholds.stoch_overbought - 80.0).abs() < f64::EPSILON);
        assert_eq!(cfg.default_limit, 100);
    }

    #[test]
    fn validate_rejects_out_of_range_limit() {
        let mut cfg = DashboardConfig::default();
        cfg.default_limit = 0;
        assert!(cfg.validate().is_err());
        cfg.default_limit = 301;
        assert!(cfg.validate().is_err());
        cfg.default_limit = 300;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_broken_indicator_and_signal_settings() {
        let mut cfg = DashboardConfig::default();
        cfg.request_timeout_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = DashboardConfig::default();
        cfg.indicators.bb_std = -1.0;
        assert!(cfg.validate().is_err());
        cfg.indicators.bb_std = f64::NAN;
        assert!(cfg.validate().is_err());
        cfg.indicators.bb_std = 0.0;
        assert!(cfg.validate().is_ok());

        let mut cfg = DashboardConfig::default();
        cfg.thresholds.rsi_oversold = 70.0;
        assert!(cfg.validate().is_err());
        cfg.thresholds.rsi_oversold = 80.0;
        assert!(cfg.validate().is_err());

        let mut cfg = DashboardConfig::default();
        cfg.thresholds.stoch_oversold = 85.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = std::env::temp_dir().join(format!("ta-dashboard-bad-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dashboard_config.json");
        std::fs::write(&path, r#"{ "indicators": { "bb_std": -2.0 } }"#).unwrap();

        assert!(DashboardConfig::load(&path).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let dir = std::env::temp_dir().join(format!("ta-dashboard-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dashboard_config.json");
        std::fs::write(&path, r#"{ "default_symbol": "ETH-USDT", "default_limit": 50 }"#).unwrap();

        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.default_symbol, "ETH-USDT");
        assert_eq!(cfg.default_limit, 50);

        assert!(DashboardConfig::load(dir.join("missing.json")).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
