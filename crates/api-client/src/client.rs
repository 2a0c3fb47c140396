use std::time::Duration;

use anyhow::{Result, bail};

use eventdeck_api::*;

/// Typed HTTP client for the Eventdeck API.
///
/// Holds an optional bearer token. Reads work without one (anonymous
/// browsing); every mutating call fails fast with "auth token not set" so the
/// UI can degrade to read-only instead of issuing requests the server would
/// reject anyway.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a new client with the given base URL and request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        })
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn set_auth(&mut self, token: String) {
        self.auth_token = Some(token);
    }

    pub fn clear_auth(&mut self) {
        self.auth_token = None;
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn token_or_bail(&self) -> Result<&str> {
        self.auth_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("auth token not set"))
    }

    // ── Health ────────────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/health")).send().await?;
        parse_response(resp).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthTokenResponse> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn signup(&self, req: &SignupRequest) -> Result<AuthTokenResponse> {
        let resp = self
            .client
            .post(self.url("/auth/signup"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Fetch the full event collection. Sends the bearer token when one is
    /// set; anonymous sessions still get the public listing.
    pub async fn list_events(&self) -> Result<Vec<EventRecord>> {
        let mut req = self.client.get(self.url("/events"));
        if let Some(token) = self.auth_token.as_deref() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        parse_response(resp).await
    }

    pub async fn create_event(&self, req: &CreateEventRequest) -> Result<EventRecord> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .post(self.url("/events"))
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn update_event(&self, id: &str, req: &UpdateEventRequest) -> Result<EventRecord> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .put(self.url(&format!("/events/{id}")))
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<OkResponse> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .delete(self.url(&format!("/events/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// Register the calling user as an attendee. No body.
    pub async fn attend_event(&self, id: &str) -> Result<OkResponse> {
        let token = self.token_or_bail()?;
        let resp = self
            .client
            .post(self.url(&format!("/events/{id}/attend")))
            .bearer_auth(token)
            .send()
            .await?;
        parse_response(resp).await
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("{status}: {body}");
    }
    Ok(resp.json().await?)
}
