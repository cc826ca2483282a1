//! Read-only client for the Sanity query API.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use site_core::config::SanitySettings;

const API_VERSION: &str = "v2025-01-01";

#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("cms request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cms responded with HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub company_info: u64,
    pub divisions: u64,
    pub news_posts: u64,
    pub pages: u64,
    pub last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Clone)]
pub struct CmsClient {
    client: reqwest::Client,
    endpoint: Option<Endpoint>,
}

#[derive(Clone)]
struct Endpoint {
    query_url: String,
    token: Option<String>,
}

impl CmsClient {
    /// Published content is read through the CDN host when `use_cdn` is set.
    pub fn new(client: reqwest::Client, sanity: Option<SanitySettings>, use_cdn: bool) -> Self {
        let endpoint = sanity.map(|s| {
            let host = if use_cdn { "apicdn" } else { "api" };
            Endpoint {
                query_url: format!(
                    "https://{}.{}.sanity.io/{}/data/query/{}",
                    s.project_id, host, API_VERSION, s.dataset
                ),
                token: s.api_token,
            }
        });
        Self { client, endpoint }
    }

    #[cfg(test)]
    fn with_query_url(mut self, url: &str) -> Self {
        if let Some(endpoint) = &mut self.endpoint {
            endpoint.query_url = url.to_string();
        }
        self
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint, query: &str) -> Result<T, CmsError> {
        let mut request = self
            .client
            .get(&endpoint.query_url)
            .query(&[("query", query), ("perspective", "published")]);
        if let Some(token) = &endpoint.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(CmsError::Status(response.status().as_u16()));
        }
        let body: QueryResponse<T> = response.json().await?;
        Ok(body.result)
    }

    pub async fn dashboard_counts(&self) -> Result<DashboardCounts, CmsError> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(DashboardCounts::default());
        };

        let (company_info, divisions, news_posts, pages, last_updated) = tokio::try_join!(
            self.fetch::<u64>(endpoint, r#"count(*[_type == "companyInfo"])"#),
            self.fetch::<u64>(endpoint, r#"count(*[_type == "division"])"#),
            self.fetch::<u64>(endpoint, r#"count(*[_type == "newsPost"])"#),
            self.fetch::<u64>(endpoint, r#"count(*[_type == "page"])"#),
            self.fetch::<Option<String>>(
                endpoint,
                r#"*[_type == "companyInfo"] | order(_updatedAt desc)[0]._updatedAt"#,
            ),
        )?;

        Ok(DashboardCounts {
            company_info,
            divisions,
            news_posts,
            pages,
            last_updated,
        })
    }
}
