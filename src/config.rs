use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Endpoint returning the JSON record list. `FINVIEWER_API_URL`, or the
    /// older `API_URL`.
    pub api_url: Option<String>,
    /// Local file loaded at startup when no URL is configured.
    pub data_file: Option<PathBuf>,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            data_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get("FINVIEWER_API_URL").or_else(|| get("API_URL"));
        let data_file = get("FINVIEWER_DATA_FILE").map(PathBuf::from);

        let timeout = match get("FINVIEWER_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: "FINVIEWER_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            api_url,
            data_file,
            timeout,
        })
    }
}
