//! Token authentication for the gateway.
//!
//! Every data route requires the API token in the `token` request header.
//! The expected token is read from the settings document on every request,
//! so a runtime token change via `/settings` takes effect immediately; a CLI
//! override, when present, wins and is never affected by `/settings`.
//!
//! An empty expected token disables the gate entirely.
//!
//! Rejections use HTTP 403 with the standard response envelope, so clients
//! can always parse the body the same way:
//!
//! ```json
//! {"message": "verification failed", "data": null, "params": null}
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::config::SettingsStore;
use crate::envelope::Envelope;

/// Request header carrying the API token.
pub const TOKEN_HEADER: &str = "token";

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token header is absent
    MissingToken,

    /// The presented token does not match the expected one
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing token header"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => {
                debug!("Authentication failed: {}", self);
            }
            AuthError::InvalidToken => {
                warn!("Authentication failed: {}", self);
            }
        }

        (StatusCode::FORBIDDEN, Json(Envelope::verification_failed())).into_response()
    }
}

// =============================================================================
// Token Authentication
// =============================================================================

/// Token authenticator shared by the middleware and the `/token` probe.
#[derive(Clone)]
pub struct TokenAuth {
    settings: Arc<SettingsStore>,
    override_token: Option<String>,
}

impl TokenAuth {
    /// Create an authenticator reading its expected token from the settings
    /// store, with an optional CLI/env override that takes precedence.
    pub fn new(settings: Arc<SettingsStore>, override_token: Option<String>) -> Self {
        Self {
            settings,
            override_token,
        }
    }

    /// The token requests must present; empty disables the gate.
    pub async fn expected_token(&self) -> String {
        match &self.override_token {
            Some(token) => token.clone(),
            None => self.settings.token().await,
        }
    }

    /// Verify a presented token (absent header is `None`).
    pub async fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        let expected = self.expected_token().await;
        token_matches(&expected, presented)
    }
}

/// Pure comparison between the expected and presented token.
fn token_matches(expected: &str, presented: Option<&str>) -> Result<(), AuthError> {
    if expected.is_empty() {
        return Ok(());
    }
    match presented {
        None => Err(AuthError::MissingToken),
        Some(presented) if presented == expected => Ok(()),
        Some(_) => Err(AuthError::InvalidToken),
    }
}

/// Axum middleware guarding the data routes.
///
/// Reads the `token` header, compares it against the current expected token,
/// and rejects mismatches with 403 before the handler runs.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use douk_gateway::server::auth::{TokenAuth, auth_middleware};
///
/// let auth = TokenAuth::new(settings, None);
/// let app = protected_routes.layer(middleware::from_fn_with_state(auth, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(auth): State<TokenAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let presented = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    auth.verify(presented).await?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
