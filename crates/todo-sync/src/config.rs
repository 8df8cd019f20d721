//! Client Configuration
//!
//! Where the todo resource lives and how much of it the view shows.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Collection endpoint used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/todos";

/// Owner stamped on every todo this client creates
pub const DEFAULT_USER_ID: u32 = 1;

/// Number of rows the view renders
pub const DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Collection URL; items are addressed as `{base_url}/{id}`
    pub base_url: String,
    pub user_id: u32,
    pub display_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID,
            display_limit: DISPLAY_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Defaults, with `TODO_API_BASE_URL` taken from the build environment when set.
    ///
    /// A browser bundle has no runtime environment, so the override is baked in at compile time.
    pub fn from_build_env() -> Self {
        let config = Self::default();
        match option_env!("TODO_API_BASE_URL") {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_id(mut self, user_id: u32) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_display_limit(mut self, display_limit: usize) -> Self {
        self.display_limit = display_limit;
        self
    }

    /// Parse and check the base URL
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.display_limit == 0 {
            return Err(ConfigError::ZeroDisplayLimit);
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::invalid_url(&self.base_url, e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::invalid_url(
                &self.base_url,
                format!("unsupported scheme `{other}`"),
            )),
        }
    }
}
