//! API Client - typed access to the recruiting backend's REST endpoints.
//!
//! Credentials live in an explicit `Session` handed to the constructor. Any
//! 401/403 response invokes the registered unauthorized handler and then
//! clears the session.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Applicant, Evaluation, JobPosting, Paginated, Rubric, User};

pub mod session;

pub use session::Session;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const TOKEN_PATH: &str = "/api/token/";
/// Paths that must never carry a bearer token.
const ANONYMOUS_PATHS: &[&str] = &[TOKEN_PATH, "/login", "/register"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Unauthorized (status {status})")]
    Unauthorized { status: u16 },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Login response carried no access token")]
    MissingToken,
}

/// Called with the response status whenever the backend rejects our credentials.
pub type UnauthorizedHandler = Arc<dyn Fn(StatusCode) + Send + Sync>;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            on_unauthorized: None,
        }
    }

    pub fn on_unauthorized(mut self, handler: impl Fn(StatusCode) + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchanges credentials for an access token, loads the current user and
    /// stores both in the session. A token already held is never sent along.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let token: TokenResponse = self
            .execute(
                self.client
                    .post(self.url(TOKEN_PATH))
                    .json(&LoginRequest { email, password }),
            )
            .await?;
        let access = token
            .access
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)?;

        let user: User = self
            .execute(
                self.client
                    .get(self.url("/api/users/me/"))
                    .bearer_auth(&access),
            )
            .await?;

        self.session.login(access, user.clone());
        debug!("Logged in as {}", user.email);
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub async fn job_posting(&self, job_id: i64) -> Result<JobPosting, ApiError> {
        let path = format!("/api/employer/job-postings/{job_id}/");
        self.execute(self.request(Method::GET, &path)).await
    }

    pub async fn rubric_for_posting(&self, job_id: i64) -> Result<Rubric, ApiError> {
        let path = format!("/api/employer/job-postings/{job_id}/rubric/");
        self.execute(
            self.request(Method::GET, &path)
                .query(&[("job_posting_id", job_id)]),
        )
        .await
    }

    pub async fn approve_rubric(&self, job_id: i64) -> Result<(), ApiError> {
        let path = format!("/api/employer/job-postings/{job_id}/approve_rubric/");
        self.send(self.request(Method::POST, &path)).await?;
        Ok(())
    }

    pub async fn applicants_page(
        &self,
        job_id: i64,
        page: u32,
    ) -> Result<Paginated<Applicant>, ApiError> {
        self.execute(
            self.request(Method::GET, "/api/employer/applicants/")
                .query(&[("job_posting", job_id), ("page", i64::from(page))]),
        )
        .await
    }

    /// Follows pagination until the backend reports no further page, a page
    /// comes back empty, or `count` applicants have been collected.
    pub async fn all_applicants(&self, job_id: i64) -> Result<Vec<Applicant>, ApiError> {
        let mut applicants = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.applicants_page(job_id, page).await?;
            debug!(
                "Fetched applicants page {page} for posting {job_id}: {} of {}",
                batch.results.len(),
                batch.count
            );
            let exhausted = batch.next.is_none() || batch.results.is_empty();
            applicants.extend(batch.results);
            if exhausted || applicants.len() as u64 >= batch.count {
                if !exhausted {
                    warn!(
                        "Posting {job_id} still advertises a next page after all {} applicants; stopping",
                        batch.count
                    );
                }
                return Ok(applicants);
            }
            page += 1;
        }
    }

    pub async fn evaluation(&self, evaluation_id: i64) -> Result<Evaluation, ApiError> {
        let path = format!("/api/employer/evaluations/{evaluation_id}/");
        self.execute(self.request(Method::GET, &path)).await
    }

    pub async fn approve_evaluation(&self, evaluation_id: i64) -> Result<(), ApiError> {
        let path = format!("/api/employer/evaluations/{evaluation_id}/approve/");
        self.send(self.request(Method::POST, &path)).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds a request, attaching the session token unless the path is anonymous.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        if ANONYMOUS_PATHS.iter().any(|p| path.contains(p)) {
            return builder;
        }
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("Backend rejected credentials with {status}; clearing session");
            if let Some(handler) = &self.on_unauthorized {
                handler(status);
            }
            self.session.logout();
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(ApiError::Decode)
    }
}
