pub mod clean;
pub mod paragraph;

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::directory::Session;
use crate::leaders::Biography;

/// How the lead paragraph is located on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// Direct `<p>` children of the first `div` tagged with the page's language.
    #[default]
    Language,
    /// First `<p>` that opens with a `<b>` element.
    Bold,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("cannot derive a language code from the page url")]
    NoLanguage,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("page returned {0}")]
    Status(StatusCode),
    #[error("no content container with lang=\"{lang}\"")]
    MissingContainer { lang: String },
    #[error("no lead paragraph found")]
    NoParagraph,
    #[error("paragraph empty after cleaning")]
    Empty,
}

/// Language code carried by the page's subdomain: `en.wikipedia.org` gives `en`.
pub fn page_language(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 {
        return None;
    }
    let first = labels[0];
    if first.is_empty() || first.eq_ignore_ascii_case("www") {
        return None;
    }
    Some(first.to_ascii_lowercase())
}

/// Fetches encyclopedia pages over the session's pooled client and turns
/// each into a [`Biography`].
#[derive(Clone)]
pub struct Extractor {
    http: reqwest::Client,
    timeout: Duration,
    heuristic: Heuristic,
}

impl Extractor {
    pub fn new(session: &Session, timeout: Duration, heuristic: Heuristic) -> Self {
        Extractor {
            http: session.http().clone(),
            timeout,
            heuristic,
        }
    }

    /// One attempt at the page; every failure becomes `Biography::Unavailable`.
    pub async fn first_paragraph(&self, url: &str) -> Biography {
        match self.try_first_paragraph(url).await {
            Ok(text) => {
                debug!(url, chars = text.chars().count(), "paragraph extracted");
                Biography::Paragraph(text)
            }
            Err(e) => {
                warn!(url, error = %e, "no biography extracted");
                Biography::Unavailable
            }
        }
    }

    async fn try_first_paragraph(&self, url: &str) -> Result<String, ExtractError> {
        let parsed = Url::parse(url)?;
        let lang = page_language(&parsed);

        let response = self.http.get(parsed).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status(status));
        }
        let html = response.text().await?;

        paragraph::extract_lead(&html, lang.as_deref(), self.heuristic)
    }
}
