//! HTTP implementation of the auth service port.
//!
//! Talks JSON to the remote portal API. Successful exchanges persist the
//! issued token and identity through the adapter's credential store; any
//! authorization-denied response additionally emits the process-wide
//! unauthorized broadcast so the guard can force the session anonymous.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use portal_core::auth::{AuthService, AuthSession, CredentialStore, Credentials, RegisterPayload};
use portal_core::error::{PortalError, Result};
use portal_core::events::AuthEvents;
use portal_core::user::User;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Auth service adapter that talks to the portal API over HTTP.
#[derive(Clone)]
pub struct HttpAuthService {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    events: AuthEvents,
}

impl HttpAuthService {
    /// Creates a new adapter against the given API base URL
    /// (without a trailing slash).
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
        events: AuthEvents,
    ) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            credentials,
            events,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<R>().await?);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.events.emit_unauthorized();
        }

        let body_text = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body_text))
    }

    /// Persists the issued token and identity. Storage failure does not
    /// fail the exchange itself; the session just will not survive a
    /// restart.
    fn remember(&self, session: &AuthSession) {
        if let Err(e) = self.credentials.store(&session.token, &session.user) {
            tracing::warn!("failed to persist issued credentials: {}", e);
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: Credentials) -> Result<AuthSession> {
        tracing::debug!(email = %credentials.email, "exchanging credentials");
        let session: AuthSession = self.post_json("/auth/login", &credentials).await?;
        self.remember(&session);
        Ok(session)
    }

    async fn register(&self, payload: RegisterPayload) -> Result<AuthSession> {
        tracing::debug!(email = %payload.email, role = %payload.role, "registering account");
        let session: AuthSession = self.post_json("/auth/register", &payload).await?;
        self.remember(&session);
        Ok(session)
    }

    fn logout(&self) {
        self.credentials.clear();
    }

    fn is_authenticated(&self) -> bool {
        self.credentials.token().is_some()
    }

    fn current_user(&self) -> Option<User> {
        self.credentials.cached_user()
    }

    async fn verify_email(&self, token: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/auth/verify-email", &VerifyEmailRequest { token })
            .await?;
        Ok(())
    }

    async fn resend_verification_email(&self, email: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/auth/resend-verification", &ResendRequest { email })
            .await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct VerifyEmailRequest<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    email: &'a str,
}

/// The error envelope the portal API uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Normalizes a non-success response into a [`PortalError`].
///
/// A `{"error": {"message": ...}}` body becomes an `Api` error carrying the
/// server's message; otherwise 401 maps to `Unauthorized` and everything
/// else to a `Network` error (both displayed as the generic fallback).
fn error_from_response(status: StatusCode, body: &str) -> PortalError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.and_then(|detail| detail.message) {
            return PortalError::api(message);
        }
    }

    if status == StatusCode::UNAUTHORIZED {
        PortalError::Unauthorized
    } else {
        PortalError::network(format!("request failed with status {}", status))
    }
}
