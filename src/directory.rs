use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::leaders::{Country, Leader, LeadersIndex};
use crate::settings::Settings;

const COOKIE_ENDPOINT: &str = "/cookie";
const COUNTRIES_ENDPOINT: &str = "/countries";
const LEADERS_ENDPOINT: &str = "/leaders";

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory session could not be initialised (cookie endpoint returned {status})")]
    UninitializedSession { status: StatusCode },
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("directory request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
}

/// Unauthenticated handle on the directory API. The only thing it can do is
/// [`open`](DirectoryClient::open) a [`Session`].
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(settings: &Settings) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(&settings.user_agent)
            .timeout(settings.page_timeout())
            .pool_max_idle_per_host(settings.concurrency)
            .build()
            .map_err(DirectoryError::Client)?;
        Ok(Self::with_http(http, &settings.base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        DirectoryClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the API for a session cookie. Failure here is fatal for a run.
    pub async fn open(self) -> Result<Session, DirectoryError> {
        let url = format!("{}{}", self.base_url, COOKIE_ENDPOINT);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UninitializedSession { status });
        }
        info!("Session created against {}", self.base_url);
        Ok(Session {
            http: self.http,
            base_url: self.base_url,
        })
    }
}

/// Authenticated directory session. Holding one is proof the cookie step
/// succeeded; the pooled connections go away when it is dropped.
pub struct Session {
    http: reqwest::Client,
    base_url: String,
}

impl Session {
    /// Pooled client carrying the session cookie.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// All country codes, or an empty list if the directory can't be reached.
    pub async fn countries(&self) -> Vec<Country> {
        match self.get_json::<Vec<Country>>(COUNTRIES_ENDPOINT, &[]).await {
            Ok(countries) => {
                info!("Directory lists {} countries", countries.len());
                countries
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch country list");
                Vec::new()
            }
        }
    }

    /// Leaders of one country, or an empty list if that request fails.
    pub async fn leaders(&self, country: &str) -> Vec<Leader> {
        match self
            .get_json::<Vec<Leader>>(LEADERS_ENDPOINT, &[("country", country)])
            .await
        {
            Ok(leaders) => {
                debug!(country, count = leaders.len(), "leaders fetched");
                leaders
            }
            Err(e) => {
                warn!(country, error = %e, "Failed to fetch leaders");
                Vec::new()
            }
        }
    }

    /// Build the index country by country. Every requested country gets an
    /// entry, empty when its request failed.
    pub async fn collect_leaders(&self, countries: &[Country]) -> LeadersIndex {
        let mut index = LeadersIndex::new();
        for country in countries {
            let leaders = self.leaders(country).await;
            index.insert(country.clone(), leaders);
        }
        info!(
            "Collected {} leaders across {} countries",
            index.leader_count(),
            index.country_count()
        );
        index
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DirectoryError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status { url, status });
        }
        Ok(response.json::<T>().await?)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("Session against {} closed", self.base_url);
    }
}
