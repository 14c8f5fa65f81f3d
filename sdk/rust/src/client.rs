use reqwest::{redirect::Policy, Client, Response};
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub notes: Option<usize>,
}

pub struct NotesClient {
    client: Client,
    base_url: String,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Self {
        // Redirects are surfaced to the caller so a successful save shows up as 302.
        let client = Client::builder()
            .redirect(Policy::none())
            .no_proxy()
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the page of an existing note.
    pub async fn view(&self, slug: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/notes/{}", self.base_url, slug))
            .send()
            .await
    }

    /// Open a note with the admin key, creating it when it does not exist yet.
    pub async fn create(&self, slug: &str, admin_key: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}/notes/{}", self.base_url, slug))
            .query(&[("key", admin_key)])
            .send()
            .await
    }

    /// Submit new markdown for a note, based on the version the caller last saw.
    pub async fn update(
        &self,
        slug: &str,
        markdown: &str,
        version: u64,
    ) -> Result<Response, reqwest::Error> {
        let version = version.to_string();
        self.client
            .post(format!("{}/notes/{}", self.base_url, slug))
            .form(&[("markdown", markdown), ("version", version.as_str())])
            .send()
            .await
    }

    pub async fn health(&self) -> Result<HealthResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(format!("Server returned error status {}: {}", status, text).into());
        }

        Ok(serde_json::from_str::<HealthResponse>(&text)?)
    }
}
