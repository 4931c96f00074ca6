use std::collections::HashMap;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::fetcher;
use crate::parser::Heuristic;

pub const DEFAULT_BASE_URL: &str = "https://country-leaders.onrender.com";
const DEFAULT_CONCURRENCY: usize = 32;
const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "LEADERS";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub concurrency: usize,
    pub page_timeout_secs: u64,
    pub user_agent: String,
    pub heuristic: Heuristic,
}

impl Settings {
    /// Defaults overlaid with `LEADERS_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Same as `load`, reading variables from `source` instead of the process environment.
    pub fn load_from(source: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("concurrency", DEFAULT_CONCURRENCY as u64)?
            .set_default("page_timeout_secs", DEFAULT_PAGE_TIMEOUT_SECS)?
            .set_default("user_agent", default_user_agent())?
            .set_default("heuristic", "language")?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(source),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings.normalized())
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    fn normalized(mut self) -> Self {
        self.concurrency = fetcher::clamp_concurrency(self.concurrency);
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
