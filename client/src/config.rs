use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::Result;

/// Where the board generation and hint services live.
///
/// Loaded from TOML; every key is optional:
///
/// ```toml
/// base_url = "https://example.com/dev"
/// generate_path = "/genboard"
/// hint_path = "/hint"
/// timeout_secs = 10
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub generate_path: String,
    pub hint_path: String,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub const BASE_URL_ENV: &'static str = "SWEEPHINT_BASE_URL";

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading client config from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Applies `SWEEPHINT_BASE_URL` when it is set.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(Self::BASE_URL_ENV).ok())
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url;
        }
        self
    }

    pub fn generate_url(&self) -> String {
        join_url(&self.base_url, &self.generate_path)
    }

    pub fn hint_url(&self) -> String {
        join_url(&self.base_url, &self.hint_path)
    }

    /// `None` when `timeout_secs` is 0, which disables the request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            generate_path: "/genboard".to_string(),
            hint_path: "/hint".to_string(),
            timeout_secs: 10,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
