use std::env;
use std::time::Duration;

use chat_relay_inference::client::{DEFAULT_MAX_NEW_TOKENS, GenerationSettings};

pub const GENERATION_URL_VAR: &str = "RELAY_GENERATION_URL";
pub const MAX_NEW_TOKENS_VAR: &str = "RELAY_MAX_NEW_TOKENS";
pub const REQUEST_TIMEOUT_VAR: &str = "RELAY_REQUEST_TIMEOUT_SECS";

/// Function configuration, read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub generation_url: String,
    pub max_new_tokens: u32,
    pub request_timeout: Option<Duration>,
}

impl RelayConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let generation_url =
            get(GENERATION_URL_VAR).ok_or_else(|| eyre::eyre!("{GENERATION_URL_VAR} is not set"))?;

        let max_new_tokens = match get(MAX_NEW_TOKENS_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| eyre::eyre!("invalid {MAX_NEW_TOKENS_VAR} {raw:?}: {e}"))?,
            None => DEFAULT_MAX_NEW_TOKENS,
        };

        let request_timeout = match get(REQUEST_TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| eyre::eyre!("invalid {REQUEST_TIMEOUT_VAR} {raw:?}: {e}"))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            generation_url,
            max_new_tokens,
            request_timeout,
        })
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            endpoint: self.generation_url.clone(),
            max_new_tokens: self.max_new_tokens,
            timeout: self.request_timeout,
        }
    }
}
