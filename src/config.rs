//! Runtime configuration.
//!
//! Defaults reproduce the fixed-path, single-page deployment. Each value can be
//! overridden from the environment (or a `.env` file loaded by the binary).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ENV_MODEL_PATH: &str = "HF_MODEL_PATH";
pub const ENV_BIND_ADDR: &str = "HF_BIND_ADDR";
pub const ENV_THEME: &str = "HF_THEME";

pub const DEFAULT_MODEL_PATH: &str = "DeathEventPrediction.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8501";

/// Page styling. Both themes render the same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Theme::Classic),
            "modern" => Ok(Theme::Modern),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Serialized classifier, read once at startup
    pub model_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8501)),
            theme: Theme::Classic,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_MODEL_PATH).filter(|p| !p.trim().is_empty()) {
            config.model_path = PathBuf::from(path.trim());
        }

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            match addr.trim().parse::<SocketAddr>() {
                Ok(parsed) => config.bind_addr = parsed,
                Err(e) => warn!(
                    "Ignoring {}='{}' ({}), using {}",
                    ENV_BIND_ADDR, addr, e, DEFAULT_BIND_ADDR
                ),
            }
        }

        if let Some(theme) = lookup(ENV_THEME) {
            match theme.parse::<Theme>() {
                Ok(parsed) => config.theme = parsed,
                Err(e) => warn!("Ignoring {}: {}", ENV_THEME, e),
            }
        }

        config
    }
}
