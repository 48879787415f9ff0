//! Environment Configuration
//!
//! Loads environment variables from a dotenv file and builds the
//! [`AgentConfig`] the assistant is constructed from.
//!
//! ## Usage
//!
//! Call `load_environment()` early in main() before reading any config:
//!
//! ```no_run
//! use ra_core::config::{load_environment, AgentConfig};
//!
//! load_environment();
//! let config = AgentConfig::from_env().expect("OPENAI_API_KEY and VECTOR_STORE_ID must be set");
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! OPENAI_API_KEY=sk-xxx          # required
//! VECTOR_STORE_ID=vs_xxx         # required
//! BING_SEARCH_API_KEY=xxx        # optional, enables web search
//! RA_ENABLE_WEB_SEARCH=true
//! RA_MODEL=gpt-4o
//! RA_POLL_INTERVAL_MS=1000
//! RA_MAX_POLL_ITERATIONS=10
//! ```

use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Default path for the environment file
pub const DEFAULT_ENV_FILE: &str = "/etc/research-assistant/environment";

/// Paths checked in order of priority
pub const ENV_FILE_PATHS: &[&str] = &[DEFAULT_ENV_FILE, ".env"];

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_POLL_ITERATIONS: u32 = 10;

/// Load environment variables from the first dotenv file found.
///
/// Checks `RA_ENV_FILE`, then `/etc/research-assistant/environment`, then
/// `.env` in the current directory. Variables that are already set are left
/// untouched.
///
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("RA_ENV_FILE") {
        if let Some(path) = try_load_env_file(&custom_path) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded) = try_load_env_file(path) {
            return Some(loaded);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

/// Try to load an environment file from the given path.
pub fn try_load_env_file(path: &str) -> Option<String> {
    if !Path::new(path).exists() {
        return None;
    }

    match dotenvy::from_path(path) {
        Ok(()) => {
            info!("Loaded environment from {}", path);
            Some(path.to_string())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path, e);
            None
        }
    }
}

/// Get a configuration value with a default.
pub fn get_config(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Settings the assistant and its orchestrator are built from.
#[derive(Clone)]
pub struct AgentConfig {
    /// Credential for the hosted assistant backend
    pub api_key: String,
    /// Retrieval store the assistant searches with `file_search`
    pub vector_store_id: String,
    /// Credential for the web search provider
    pub search_api_key: Option<String>,
    /// Offer the `web_search` function to the assistant
    pub enable_web_search: bool,
    pub model: String,
    /// Sleep between two run status polls
    pub poll_interval: Duration,
    /// Polls allowed before a run is abandoned
    pub max_poll_iterations: u32,
    pub api_base_url: String,
    pub search_endpoint: String,
}

impl AgentConfig {
    /// Create a config with the two required settings and defaults for the rest.
    pub fn new(api_key: impl Into<String>, vector_store_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            vector_store_id: vector_store_id.into(),
            search_api_key: None,
            enable_web_search: true,
            model: DEFAULT_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_iterations: DEFAULT_MAX_POLL_ITERATIONS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
        }
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or_else(|| Error::missing_config("OPENAI_API_KEY"))?;
        let vector_store_id =
            get("VECTOR_STORE_ID").ok_or_else(|| Error::missing_config("VECTOR_STORE_ID"))?;

        let mut config = Self::new(api_key, vector_store_id);
        config.search_api_key = get("BING_SEARCH_API_KEY");

        if let Some(v) = get("RA_ENABLE_WEB_SEARCH") {
            config.enable_web_search = parse_bool(&v);
        }
        if let Some(v) = get("RA_MODEL") {
            config.model = v;
        }
        if let Some(v) = get("RA_POLL_INTERVAL_MS") {
            let ms: u64 = v
                .parse()
                .map_err(|_| Error::invalid_config("RA_POLL_INTERVAL_MS", format!("not a number: {}", v)))?;
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(v) = get("RA_MAX_POLL_ITERATIONS") {
            let n: u32 = v
                .parse()
                .map_err(|_| Error::invalid_config("RA_MAX_POLL_ITERATIONS", format!("not a number: {}", v)))?;
            if n == 0 {
                return Err(Error::invalid_config("RA_MAX_POLL_ITERATIONS", "must be at least 1"));
            }
            config.max_poll_iterations = n;
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            config.api_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("BING_SEARCH_ENDPOINT") {
            config.search_endpoint = v;
        }

        Ok(config)
    }

    /// Web search is offered only when enabled and a credential exists.
    pub fn web_search_available(&self) -> bool {
        self.enable_web_search && self.search_api_key.is_some()
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &"***")
            .field("vector_store_id", &self.vector_store_id)
            .field("search_api_key", &self.search_api_key.as_ref().map(|_| "***"))
            .field("enable_web_search", &self.enable_web_search)
            .field("model", &self.model)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_iterations", &self.max_poll_iterations)
            .field("api_base_url", &self.api_base_url)
            .field("search_endpoint", &self.search_endpoint)
            .finish()
    }
}
