use crate::error::Result;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A rendered page: where the browser ended up and the markup it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub html: String,
}

/// The browsing surface the scraper drives.
///
/// Implementations keep their own cookie/session state; every call takes
/// `&mut self` so one browser is never navigated from two places at once.
#[async_trait]
pub trait Browser: Send {
    /// Loads `url` and returns the rendered page.
    async fn navigate(&mut self, url: &str) -> Result<Page>;
    /// Submits a form to `action` with the given fields and returns the resulting page.
    async fn submit_form(&mut self, action: &str, fields: &[(String, String)]) -> Result<Page>;
}

/// Cookie-jar backed HTTP browser. Golfshot renders scorecards on the server,
/// so the raw response body already carries the embedded payload.
pub struct HttpBrowser {
    client: reqwest::Client,
}

impl HttpBrowser {
    pub fn new() -> Result<Self> {
        let cookie_jar = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_USER_AGENT));

        let client = reqwest::Client::builder()
            .cookie_provider(cookie_jar)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn navigate(&mut self, url: &str) -> Result<Page> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let url = response.url().to_string();
        let html = response.text().await?;
        Ok(Page { url, html })
    }

    async fn submit_form(&mut self, action: &str, fields: &[(String, String)]) -> Result<Page> {
        let response = self
            .client
            .post(action)
            .form(fields)
            .send()
            .await?
            .error_for_status()?;
        let url = response.url().to_string();
        let html = response.text().await?;
        Ok(Page { url, html })
    }
}
