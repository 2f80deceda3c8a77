use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::category::Category;
use crate::config::ArxivConfig;
use crate::error::FetchError;

/// Reads category listings from the arXiv query API.
///
/// One outbound request per call. Nothing is retried or cached; the caller
/// sees the first failure.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    api_url: String,
}

impl Fetcher {
    pub fn new(config: &ArxivConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches the newest `max_results` submissions in `category` as raw feed text.
    pub async fn fetch(&self, category: Category, max_results: usize) -> Result<String, FetchError> {
        info!("Fetching {} listing ({} max)", category, max_results);

        let response = self
            .client
            .get(&self.api_url)
            .query(&Self::query_params(category, max_results))
            .send()
            .await
            .map_err(|source| FetchError::Transport { category, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { category, status });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Transport { category, source })
    }

    pub fn query_params(category: Category, max_results: usize) -> [(&'static str, String); 5] {
        [
            ("search_query", category.search_query()),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ]
    }
}
