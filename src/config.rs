//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy`, then builds one [`AppConfig`] and
//! hands it to `AppState`. Nothing else reads the environment.

use std::path::PathBuf;

use genogram::LayoutConfig;

use crate::llm::config::{LlmConfig, env_parse_u64};
use crate::llm::types::LlmError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_GENERATE_MAX_TOKENS: u32 = 4096;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Root of the document store.
    pub data_dir: PathBuf,
    pub llm: LlmConfig,
    pub generate_max_tokens: u32,
    pub layout: LayoutConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            llm: LlmConfig::default(),
            generate_max_tokens: DEFAULT_GENERATE_MAX_TOKENS,
            layout: LayoutConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build the server config from environment variables.
    ///
    /// - `PORT`: listen port, default 3000
    /// - `DATA_DIR`: document store root, default `./data`
    /// - `GENERATE_MAX_TOKENS`: reply budget for generation, default 4096
    /// - `LAYOUT_ORIGIN_X`, `LAYOUT_ORIGIN_Y`, `LAYOUT_SLOT_WIDTH`,
    ///   `LAYOUT_BAND_SPACING`, `LAYOUT_BAND_STAGGER`: layout geometry,
    ///   defaults from [`LayoutConfig::default`]
    /// - `LLM_*`: see [`LlmConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unparseable port or LLM setting.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let generate_max_tokens = u32::try_from(env_parse_u64("GENERATE_MAX_TOKENS", u64::from(DEFAULT_GENERATE_MAX_TOKENS)))
            .unwrap_or(DEFAULT_GENERATE_MAX_TOKENS);

        Ok(Self { port, data_dir, llm: LlmConfig::from_env()?, generate_max_tokens, layout: layout_from_env() })
    }
}

fn layout_from_env() -> LayoutConfig {
    let defaults = LayoutConfig::default();
    LayoutConfig {
        origin_x: env_parse_f64("LAYOUT_ORIGIN_X", defaults.origin_x),
        origin_y: env_parse_f64("LAYOUT_ORIGIN_Y", defaults.origin_y),
        slot_width: env_parse_positive_f64("LAYOUT_SLOT_WIDTH", defaults.slot_width),
        band_spacing: env_parse_positive_f64("LAYOUT_BAND_SPACING", defaults.band_spacing),
        band_stagger: env_parse_f64("LAYOUT_BAND_STAGGER", defaults.band_stagger),
    }
}

/// Unset, unparseable and non-finite values fall back to `default`.
fn env_parse_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Spacings must stay positive or nodes would stack on one point.
fn env_parse_positive_f64(key: &str, default: f64) -> f64 {
    Some(env_parse_f64(key, default)).filter(|v| *v > 0.0).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
