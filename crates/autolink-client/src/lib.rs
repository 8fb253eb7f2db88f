//! MediaWiki client for the auto-link name inventory.
//!
//! Walks `list=allpages` through the action API, one page per request, and
//! plugs into [`autolink_core::fetch_all`] as a [`NameInventoryProvider`].
//!
//! # Example
//! ```rust,no_run
//! use autolink_client::{MediaWikiClient, MediaWikiConfig};
//! use autolink_core::fetch_all;
//!
//! #[tokio::main]
//! async fn main() -> autolink_core::Result<()> {
//!     let client = MediaWikiClient::new(MediaWikiConfig::new("https://wiki.example.org/w/api.php"))?;
//!     let names = fetch_all(&client, 100).await;
//!     println!("{} titles", names.len());
//!     Ok(())
//! }
//! ```
use async_trait::async_trait;
use autolink_core::{AutolinkError, NameInventoryProvider, NamePage, Result};
use serde::{Deserialize, Serialize};

/// Connection settings for a wiki's action API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaWikiConfig {
    /// Full URL of `api.php`. Empty until configured.
    pub api_url: String,
    /// Namespace to list. Default: 0 (main).
    pub namespace: i32,
    /// Page size requested per call. Default: "max".
    pub limit: String,
}

impl Default for MediaWikiConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            namespace: 0,
            limit: "max".into(),
        }
    }
}

impl MediaWikiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: i32) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AutolinkError::Validation(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }

        if self.limit != "max" && self.limit.parse::<u32>().map_or(true, |n| n == 0) {
            return Err(AutolinkError::Validation(
                "limit must be \"max\" or a positive integer".into(),
            ));
        }

        Ok(())
    }

    /// Query parameters for the page at `cursor`.
    pub fn query(&self, cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("action", "query".to_string()),
            ("list", "allpages".to_string()),
            ("aplimit", self.limit.clone()),
            ("apnamespace", self.namespace.to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("apcontinue", cursor.to_string()));
        }
        params
    }
}

#[derive(Debug, Default, Deserialize)]
struct AllPagesResponse {
    #[serde(default)]
    query: Option<AllPagesQuery>,
    #[serde(default, rename = "continue")]
    cont: Option<AllPagesContinue>,
}

#[derive(Debug, Default, Deserialize)]
struct AllPagesQuery {
    #[serde(default)]
    allpages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct AllPagesContinue {
    apcontinue: Option<String>,
}

impl From<AllPagesResponse> for NamePage {
    fn from(resp: AllPagesResponse) -> Self {
        NamePage {
            names: resp
                .query
                .map(|q| q.allpages.into_iter().map(|p| p.title).collect())
                .unwrap_or_default(),
            next_cursor: resp.cont.and_then(|c| c.apcontinue),
        }
    }
}

/// Decode one `list=allpages` response body.
pub fn parse_page(body: &str) -> Result<NamePage> {
    let resp: AllPagesResponse = serde_json::from_str(body)?;
    Ok(resp.into())
}

/// A MediaWiki action API client.
pub struct MediaWikiClient {
    http: reqwest::Client,
    config: MediaWikiConfig,
}

impl MediaWikiClient {
    pub fn new(config: MediaWikiConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("autolink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AutolinkError::Retrieval(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &MediaWikiConfig {
        &self.config
    }
}

#[async_trait]
impl NameInventoryProvider for MediaWikiClient {
    fn name(&self) -> &str {
        &self.config.api_url
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<NamePage> {
        let resp = self
            .http
            .get(&self.config.api_url)
            .query(&self.config.query(cursor))
            .send()
            .await
            .map_err(|e| AutolinkError::Retrieval(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AutolinkError::Retrieval(format!("HTTP error! status: {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| AutolinkError::Retrieval(format!("reading body failed: {e}")))?;
        let page = parse_page(&body)?;
        log::debug!(
            "{}: {} titles, continue={:?}",
            self.config.api_url,
            page.names.len(),
            page.next_cursor
        );
        Ok(page)
    }
}
