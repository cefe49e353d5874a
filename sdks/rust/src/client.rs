//! HTTP client for the ApplyPilot API.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{Error, Result},
    token::{MemoryTokenStore, TokenStore},
    types::*,
};

/// Where a locally running server serves its API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// HTTP client for the API.
///
/// Every request carries `Authorization: Bearer <token>` when the token store
/// holds one. [`Client::login`] fills the store.
///
/// # Example
///
/// ```rust,no_run
/// use applypilot_sdk::{Client, JobQuery};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::localhost()?;
/// client.login("demo", "demo-password").await?;
///
/// let jobs = client
///     .fetch_jobs(&JobQuery { search: Some("rust".into()), ..JobQuery::default() })
///     .await?;
/// if let Some(job) = jobs.first() {
///     client.apply_to_job(job.id, &Default::default()).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl Client {
    /// Create a client for `base_url`, e.g. `http://localhost:8000/api/`.
    ///
    /// A trailing slash is added when missing so endpoint paths join below it.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Client for [`DEFAULT_BASE_URL`].
    pub fn localhost() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base = base_url.as_ref().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&base)?,
            http,
            tokens: Arc::new(MemoryTokenStore::new()),
        })
    }

    /// Replace the token store, e.g. with a [`crate::FileTokenStore`].
    pub fn with_token_store(mut self, store: impl TokenStore + 'static) -> Self {
        self.tokens = Arc::new(store);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.tokens.load()
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.tokens.save(token)
    }

    /// Forget the stored token. Later calls are anonymous.
    pub fn logout(&self) -> Result<()> {
        self.tokens.clear()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange credentials for a token and keep it for later calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token: TokenResponse = self
            .send(self.request(Method::POST, "accounts/token/")?.json(&body))
            .await?;
        self.tokens.save(&token.access)?;
        Ok(token)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Account> {
        self.send(self.request(Method::POST, "accounts/register/")?.json(request))
            .await
    }

    pub async fn fetch_profile(&self) -> Result<AccountProfile> {
        self.send(self.request(Method::GET, "accounts/profile/")?).await
    }

    /// Partial update; any profile list sent replaces the stored one.
    pub async fn update_profile(&self, patch: &serde_json::Value) -> Result<AccountProfile> {
        self.send(self.request(Method::PATCH, "accounts/profile/")?.json(patch))
            .await
    }

    /// Upload a PDF or Word resume, replacing the stored one.
    pub async fn upload_resume(&self, filename: &str, content_type: &str, data: Vec<u8>) -> Result<ResumeInfo> {
        let part = Part::bytes(data).file_name(filename.to_string()).mime_str(content_type)?;
        let form = Form::new().part("resume", part);
        self.send(self.request(Method::POST, "accounts/resume/")?.multipart(form))
            .await
    }

    pub async fn download_resume(&self) -> Result<Vec<u8>> {
        let response = Self::check(self.request(Method::GET, "accounts/resume/")?.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Restore profile and notification settings from an export document.
    pub async fn import_data(&self, export: &serde_json::Value) -> Result<ImportSummary> {
        self.send(self.request(Method::POST, "accounts/import/")?.json(export))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Jobs
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn fetch_jobs(&self, query: &JobQuery) -> Result<Vec<JobListing>> {
        self.send(self.request(Method::GET, "jobs/listings/")?.query(query))
            .await
    }

    pub async fn fetch_job_detail(&self, id: u64) -> Result<JobListing> {
        self.send(self.request(Method::GET, &format!("jobs/listings/{id}/"))?)
            .await
    }

    /// Apply once; a second application to the same job is a 409.
    pub async fn apply_to_job(&self, job_id: u64, data: &ApplicationRequest) -> Result<Application> {
        let body = serde_json::json!({
            "job": job_id,
            "cover_letter": data.cover_letter,
        });
        self.send(self.request(Method::POST, "jobs/applications/")?.json(&body))
            .await
    }

    pub async fn fetch_my_applications(&self) -> Result<Vec<Application>> {
        self.send(self.request(Method::GET, "jobs/my-applications/")?).await
    }

    pub async fn fetch_companies(&self) -> Result<Vec<Company>> {
        self.send(self.request(Method::GET, "jobs/companies/")?).await
    }

    pub async fn fetch_job_analytics(&self) -> Result<Vec<CompanyJobAnalytics>> {
        self.send(self.request(Method::GET, "analytics/jobs/")?).await
    }

    /// Dashboard report: summary counts, platform performance and trend.
    pub async fn fetch_dashboard(&self) -> Result<serde_json::Value> {
        self.send(self.request(Method::GET, "analytics/dashboard/")?).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the automation session API.
    pub fn automation(&self) -> AutomationApi<'_> {
        AutomationApi { client: self }
    }

    /// Access the platform credentials API.
    pub fn credentials(&self) -> CredentialsApi<'_> {
        CredentialsApi { client: self }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let request = self.http.request(method, url);
        Ok(match self.tokens.load()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        Self::check(request.send().await?).await.map(|_| ())
    }

    /// Turn a non-2xx response into [`Error::Api`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown error").to_string()
                } else {
                    body
                }
            });
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

// =============================================================================
// Automation API
// =============================================================================

/// Automation session API client.
#[derive(Debug)]
pub struct AutomationApi<'a> {
    client: &'a Client,
}

impl AutomationApi<'_> {
    /// The platform catalog, including "coming soon" platforms.
    pub async fn platforms(&self) -> Result<Vec<Platform>> {
        self.client
            .send(self.client.request(Method::GET, "automation/platforms/")?)
            .await
    }

    pub async fn sessions(&self) -> Result<Vec<AutomationSession>> {
        self.client
            .send(self.client.request(Method::GET, "automation/sessions/")?)
            .await
    }

    pub async fn start(&self, request: &StartSessionRequest) -> Result<AutomationSession> {
        self.client
            .send(
                self.client
                    .request(Method::POST, "automation/sessions/start/")?
                    .json(request),
            )
            .await
    }

    pub async fn stop(&self, id: u64) -> Result<AutomationSession> {
        self.client
            .send(
                self.client
                    .request(Method::POST, &format!("automation/sessions/{id}/stop/"))?,
            )
            .await
    }

    pub async fn resume(&self, id: u64) -> Result<AutomationSession> {
        self.client
            .send(
                self.client
                    .request(Method::POST, &format!("automation/sessions/{id}/resume/"))?,
            )
            .await
    }
}

// =============================================================================
// Credentials API
// =============================================================================

/// Platform credentials API client.
#[derive(Debug)]
pub struct CredentialsApi<'a> {
    client: &'a Client,
}

impl CredentialsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Credential>> {
        self.client
            .send(self.client.request(Method::GET, "automation/credentials/")?)
            .await
    }

    pub async fn add(&self, request: &CredentialRequest) -> Result<Credential> {
        self.client
            .send(
                self.client
                    .request(Method::POST, "automation/credentials/")?
                    .json(request),
            )
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.client
            .send_empty(
                self.client
                    .request(Method::DELETE, &format!("automation/credentials/{id}/"))?,
            )
            .await
    }

    pub async fn toggle(&self, id: &str) -> Result<Credential> {
        self.client
            .send(
                self.client
                    .request(Method::POST, &format!("automation/credentials/{id}/toggle/"))?,
            )
            .await
    }

    /// Queue a login check; the returned message says what happens next.
    pub async fn test(&self, id: &str) -> Result<CredentialTest> {
        self.client
            .send(
                self.client
                    .request(Method::POST, &format!("automation/credentials/{id}/test/"))?,
            )
            .await
    }
}
