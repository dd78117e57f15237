use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::error::ApiError;
use crate::models::{AuthPayload, AuthTokens, Envelope, LoginRequest, RefreshPayload, RegisterRequest, User};
use crate::transport::{ApiRequest, HttpTransport, RawResponse, Transport};

const LOGIN_PATH: &str = "/users/login";
const REGISTER_PATH: &str = "/users/register";
const LOGOUT_PATH: &str = "/users/logout";
const REFRESH_PATH: &str = "/users/refresh-token";
const ME_PATH: &str = "/users/me";

/// Credentials an embedder persists across reloads: the token pair plus the
/// cached user snapshot. Everything else is rebuilt from the backend.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub tokens: AuthTokens,
    pub user: Option<User>,
}

// Type alias for the optional callback function pointer for clarity.
// Called with Some on every credential change, None on teardown.
pub type CredentialsCallback = Option<Box<dyn Fn(Option<&StoredCredentials>) + Send + Sync + 'static>>;

struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
    // Bumped on every credential change. A caller that observed epoch N and
    // then waited on the refresh gate can tell whether someone else already
    // refreshed (or tore the session down) in the meantime.
    epoch: u64,
    credentials_callback: CredentialsCallback,
}

impl TokenState {
    fn empty() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            user: None,
            epoch: 0,
            credentials_callback: None,
        }
    }

    fn notify(&self) {
        if let Some(ref callback) = self.credentials_callback {
            match (&self.access_token, &self.refresh_token) {
                (Some(access), Some(refresh)) => {
                    let stored = StoredCredentials {
                        tokens: AuthTokens {
                            access_token: access.clone(),
                            refresh_token: refresh.clone(),
                        },
                        user: self.user.clone(),
                    };
                    callback(Some(&stored));
                }
                _ => callback(None),
            }
        }
    }
}

/// Owns the session lifecycle: login/register/logout, the stored token pair,
/// and transparent refresh-and-retry on authorization failures.
///
/// The session is the single writer of token state. Every other component
/// reads the current access token only through [`Session::issue`], one
/// request at a time, so a refresh is instantly visible to the next request
/// from any component. Clones share the same underlying state.
///
/// # Logging
///
/// This library uses the `tracing` crate for logging. To enable logs,
/// initialize a tracing subscriber in your application, e.g. with
/// `tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init()`.
pub struct Session {
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<TokenState>>,
    // Single-flight critical section for the refresh protocol. Concurrent
    // 401s queue here in arrival order; exactly one performs the backend call.
    refresh_gate: Arc<Mutex<()>>,
}

impl Session {
    /// Create a session against the base URL from settings (`VIDORA_API_URL`).
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::from_settings()))
    }

    /// Create a session against an explicit base URL.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(base_url, None)))
    }

    /// Create a session over a custom transport. Tests use this to inject
    /// scripted transports so sessions stay fully isolated.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: Arc::new(RwLock::new(TokenState::empty())),
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Register a callback invoked whenever stored credentials change:
    /// with the new credentials after login/register/refresh, with `None`
    /// after logout or teardown. Embedders persist from here.
    pub async fn set_credentials_callback<F>(&self, callback: F)
    where
        F: Fn(Option<&StoredCredentials>) + Send + Sync + 'static,
    {
        let mut state = self.state.write().await;
        state.credentials_callback = Some(Box::new(callback));
        debug!("Credentials callback set.");
    }

    /// Re-hydrate a session from credentials persisted by a previous run.
    pub async fn restore(&self, tokens: AuthTokens, user: Option<User>) {
        let mut state = self.state.write().await;
        state.access_token = Some(tokens.access_token);
        state.refresh_token = Some(tokens.refresh_token);
        state.user = user;
        state.epoch += 1;
        debug!("Session restored from persisted credentials.");
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    /// Cached snapshot of the authenticated user, if any.
    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.access_token.is_some()
    }

    /// Send a request with the current credential attached. If the backend
    /// answers 401, run the refresh protocol and retry exactly once with the
    /// new token; a second 401 propagates as [`ApiError::Unauthorized`]
    /// without looping. Absence of a token sends the request unauthenticated.
    ///
    /// Every failure class other than 401 passes through unmodified.
    pub async fn issue(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let (token, epoch) = {
            let state = self.state.read().await;
            (state.access_token.clone(), state.epoch)
        };

        let response = self
            .transport
            .execute(&request.clone().with_bearer(token))
            .await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path = %request.path, "Request unauthorized, entering refresh protocol");
        let new_token = self.refresh_access_token(epoch).await?;

        let retried = self
            .transport
            .execute(&request.with_bearer(Some(new_token)))
            .await?;
        if retried.status == StatusCode::UNAUTHORIZED {
            warn!("Request still unauthorized after refresh, not retrying again");
            return Err(ApiError::Unauthorized);
        }
        Ok(retried)
    }

    /// Send a request and parse the enveloped payload, mapping failure
    /// statuses into the error taxonomy.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.issue(request).await?;
        Self::parse(response)
    }

    /// Send a request where only success matters (simple acknowledgments).
    pub async fn send_ok(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.issue(request).await?;
        if response.status.is_success() {
            Ok(())
        } else {
            Err(Self::classify(response))
        }
    }

    pub(crate) fn parse<T: DeserializeOwned>(response: RawResponse) -> Result<T, ApiError> {
        if response.status.is_success() {
            let envelope: Envelope<T> = response.json()?;
            Ok(envelope.data)
        } else {
            Err(Self::classify(response))
        }
    }

    /// Map a non-success response onto the error taxonomy, pulling the
    /// user-facing message out of the envelope when one is present.
    fn classify(response: RawResponse) -> ApiError {
        let message = response
            .json::<Envelope<serde_json::Value>>()
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| response.status.to_string());

        match response.status.as_u16() {
            400 => ApiError::Validation(message),
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            status if status >= 500 => ApiError::Server { status, message },
            status => ApiError::InvalidResponse(format!("unexpected status {}: {}", status, message)),
        }
    }

    /// The single-flight refresh protocol. `observed_epoch` is the epoch the
    /// caller's failed request went out under; if the epoch moved while we
    /// queued on the gate, another caller already settled the refresh and we
    /// just reuse its outcome.
    async fn refresh_access_token(&self, observed_epoch: u64) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let refresh_token = {
            let state = self.state.read().await;
            if state.epoch != observed_epoch {
                return state.access_token.clone().ok_or_else(|| {
                    ApiError::SessionTerminated("session ended during refresh".to_string())
                });
            }
            state.refresh_token.clone()
        };

        let Some(refresh_token) = refresh_token else {
            warn!("Unauthorized with no refresh token held, ending session");
            self.teardown("no refresh token held").await;
            return Err(ApiError::SessionTerminated(
                "no refresh token held".to_string(),
            ));
        };

        info!("Access token rejected by backend, refreshing");
        let request =
            ApiRequest::post(REFRESH_PATH).with_json(json!({ "refreshToken": refresh_token }));

        match self.transport.execute(&request).await {
            Ok(response) if response.status.is_success() => {
                let payload = match response.json::<Envelope<RefreshPayload>>() {
                    Ok(envelope) => envelope.data,
                    Err(e) => {
                        error!(error = %e, "Unreadable refresh response, ending session");
                        self.teardown("unreadable refresh response").await;
                        return Err(ApiError::SessionTerminated(
                            "unreadable refresh response".to_string(),
                        ));
                    }
                };

                let mut state = self.state.write().await;
                state.access_token = Some(payload.access_token.clone());
                // A rotated refresh token replaces the stored one; its
                // absence means the backend kept the current one valid.
                if let Some(rotated) = payload.refresh_token {
                    state.refresh_token = Some(rotated);
                }
                state.epoch += 1;
                state.notify();
                info!("Access token refreshed.");
                Ok(payload.access_token)
            }
            Ok(response) => {
                warn!(status = %response.status, "Refresh token rejected, ending session");
                self.teardown("refresh token rejected").await;
                Err(ApiError::SessionTerminated(
                    "refresh token rejected".to_string(),
                ))
            }
            Err(e) => {
                error!(error = %e, "Refresh call failed, ending session");
                self.teardown("refresh call failed").await;
                Err(ApiError::SessionTerminated(format!(
                    "refresh call failed: {}",
                    e
                )))
            }
        }
    }

    /// Clear every piece of session state in one write. No partial state
    /// survives: the next request goes out with no Authorization header.
    async fn teardown(&self, reason: &str) {
        let mut state = self.state.write().await;
        if state.access_token.is_some() || state.refresh_token.is_some() || state.user.is_some() {
            debug!(reason, "Clearing session state");
        }
        state.access_token = None;
        state.refresh_token = None;
        state.user = None;
        state.epoch += 1;
        state.notify();
    }

    async fn store_auth(&self, payload: AuthPayload) -> User {
        let mut state = self.state.write().await;
        state.access_token = Some(payload.access_token);
        state.refresh_token = Some(payload.refresh_token);
        state.user = Some(payload.user.clone());
        state.epoch += 1;
        state.notify();
        payload.user
    }

    /// Log in with username/email and password. On success the session holds
    /// the returned token pair and user snapshot.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
        info!("Logging in");
        let request = ApiRequest::post(LOGIN_PATH).with_json(serde_json::to_value(credentials)?);
        // Auth endpoints bypass issue(): a 401 here means bad credentials,
        // not an expired access token, and must not trigger a refresh.
        let response = self.transport.execute(&request).await?;
        let payload: AuthPayload = Self::parse(response)?;
        let user = self.store_auth(payload).await;
        info!(username = %user.username, "Logged in");
        Ok(user)
    }

    /// Register a new account; the backend logs the new user in directly.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<User, ApiError> {
        info!(username = %profile.username, "Registering");
        let request = ApiRequest::post(REGISTER_PATH).with_json(serde_json::to_value(profile)?);
        let response = self.transport.execute(&request).await?;
        let payload: AuthPayload = Self::parse(response)?;
        let user = self.store_auth(payload).await;
        Ok(user)
    }

    /// Best-effort backend invalidation, then unconditionally clear all local
    /// session state. Backend failures are logged and ignored.
    pub async fn logout(&self) {
        let token = self.access_token().await;
        if let Some(token) = token {
            let request = ApiRequest::post(LOGOUT_PATH).with_bearer(Some(token));
            match self.transport.execute(&request).await {
                Ok(response) if response.status.is_success() => {
                    debug!("Logout acknowledged by backend.")
                }
                Ok(response) => {
                    warn!(status = %response.status, "Logout rejected by backend (ignored)")
                }
                Err(e) => warn!(error = %e, "Logout request failed (ignored)"),
            }
        }
        self.teardown("logout").await;
        info!("Logged out.");
    }

    /// Fetch the current user from the backend and update the cached
    /// snapshot. The credentials callback fires so a persisted snapshot
    /// stays current too.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let user: User = self.send(ApiRequest::get(ME_PATH)).await?;
        {
            let mut state = self.state.write().await;
            state.user = Some(user.clone());
            state.notify();
        }
        Ok(user)
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            state: self.state.clone(),
            refresh_gate: self.refresh_gate.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token state requires await to read; never print credentials anyway
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
