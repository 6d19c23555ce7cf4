//! Page retrieval boundary.
//!
//! The lookup pipeline only needs "markup for this search query" and
//! "markup for this detail locator". [`PageFetcher`] is that seam; the
//! built-in [`HttpFetcher`] implements it with `reqwest`.

use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::error::FetchError;

/// Source of rendered search and detail pages.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use movie_finder::error::FetchError;
/// use movie_finder::fetch::PageFetcher;
///
/// struct Offline;
///
/// #[async_trait]
/// impl PageFetcher for Offline {
///     async fn fetch_search_page(&self, _query: &str) -> Result<String, FetchError> {
///         Err(FetchError::Transport("offline".to_string()))
///     }
///     async fn fetch_detail_page(&self, _locator: &str) -> Result<String, FetchError> {
///         Err(FetchError::Transport("offline".to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Markup of the search-results page for `query`.
    async fn fetch_search_page(&self, query: &str) -> Result<String, FetchError>;

    /// Markup of the detail page at `locator` (an absolute URL).
    async fn fetch_detail_page(&self, locator: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher for the configured source site.
pub struct HttpFetcher {
    client: reqwest::Client,
    search_url: Url,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let search_url = config.base()?.join(&config.search_path)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_str(&config.accept_language)?,
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            search_url,
            max_retries: config.max_retries,
        })
    }

    /// Search URL for `query` (`?q=` URL-encoded).
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().clear().append_pair("q", query);
        url
    }

    /// GET `url` and return the body text.
    ///
    /// Retry strategy:
    /// - HTTP 429 or 5xx → retry with exponential backoff
    /// - other non-2xx → fail immediately
    /// - network error → retry
    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    let err = FetchError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    };
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| FetchError::Transport("request failed".to_string())))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_search_page(&self, query: &str) -> Result<String, FetchError> {
        self.get_text(self.search_url(query)).await
    }

    async fn fetch_detail_page(&self, locator: &str) -> Result<String, FetchError> {
        let url =
            Url::parse(locator).map_err(|_| FetchError::InvalidLocator(locator.to_string()))?;
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        let fetcher = HttpFetcher::new(&SourceConfig::default()).unwrap();
        let url = fetcher.search_url("Amélie & Nino");
        assert_eq!(url.path(), "/find/");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("q".to_string(), "Amélie & Nino".to_string())]);
    }

    #[test]
    fn new_rejects_unusable_accept_language() {
        let config = SourceConfig {
            accept_language: "en\r\nX-Extra: 1".to_string(),
            ..SourceConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_err());
    }

    #[tokio::test]
    async fn detail_rejects_relative_locator() {
        let fetcher = HttpFetcher::new(&SourceConfig::default()).unwrap();
        let err = fetcher.fetch_detail_page("/title/tt1/").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidLocator(_)));
    }
}
