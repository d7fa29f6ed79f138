//! Login-with-registration-fallback protocol.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Natively the protocol runs against any [`AuthApi`] implementation.
//!
//! ERROR HANDLING
//! ==============
//! A non-2xx login answer is the only error that triggers the registration
//! fallback. Network failures and unparseable 2xx bodies end the attempt
//! immediately; every outcome is returned as a value so the form stays usable.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::error::GateError;

/// Endpoint pair used by one protocol run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: crate::consts::LOGIN_ENDPOINT.to_owned(),
            register: crate::consts::REGISTER_ENDPOINT.to_owned(),
        }
    }
}

/// Username and password read from the credential form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Serialized request body shared by login and registration.
    #[must_use]
    pub fn to_body(&self) -> String {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
        })
        .to_string()
    }
}

/// JSON-over-HTTP POST transport.
#[async_trait::async_trait(?Send)]
pub trait AuthApi {
    /// POST `body` to `endpoint` with JSON content-type and accept headers.
    ///
    /// # Errors
    ///
    /// - [`GateError::Transport`] for any non-2xx status.
    /// - [`GateError::Network`] if no response arrived.
    /// - [`GateError::ResponseParse`] if a 2xx body is not JSON.
    async fn post_json(&self, endpoint: &str, body: &str) -> Result<serde_json::Value, GateError>;
}

/// Pull the string `jwt` field out of an auth response.
///
/// # Errors
///
/// Returns [`GateError::UnexpectedResponseShape`] when `jwt` is absent or not a string.
pub fn extract_jwt(response: &serde_json::Value) -> Result<String, GateError> {
    response
        .get("jwt")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or(GateError::UnexpectedResponseShape)
}

/// Try login, fall back to registration on a non-2xx login, return the token.
///
/// Registration is only attempted after the login outcome is known.
///
/// # Errors
///
/// - [`GateError::AuthFailure`] when both endpoints answer non-2xx.
/// - [`GateError::UnexpectedResponseShape`] when the accepting endpoint sends no string `jwt`.
/// - [`GateError::Network`] / [`GateError::ResponseParse`] passed through from the transport.
pub async fn login_or_register<A: AuthApi + ?Sized>(
    api: &A,
    endpoints: &Endpoints,
    credentials: &Credentials,
) -> Result<String, GateError> {
    let body = credentials.to_body();
    let response = match api.post_json(&endpoints.login, &body).await {
        Ok(response) => response,
        Err(GateError::Transport { status, .. }) => {
            log::info!(
                "auth: {} returned {status}, falling back to {}",
                endpoints.login,
                endpoints.register
            );
            match api.post_json(&endpoints.register, &body).await {
                Ok(response) => response,
                Err(GateError::Transport { status, .. }) => {
                    log::warn!("auth: {} returned {status}, giving up", endpoints.register);
                    return Err(GateError::AuthFailure);
                }
                Err(e) => return Err(e),
            }
        }
        Err(e) => return Err(e),
    };
    extract_jwt(&response)
}

/// Browser transport over `fetch`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooAuthApi;

#[cfg(feature = "hydrate")]
#[async_trait::async_trait(?Send)]
impl AuthApi for GlooAuthApi {
    async fn post_json(&self, endpoint: &str, body: &str) -> Result<serde_json::Value, GateError> {
        let resp = gloo_net::http::Request::post(endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body)
            .map_err(|e| GateError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| GateError::Network(e.to_string()))?;
        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(GateError::Transport { endpoint: endpoint.to_owned(), status });
        }
        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| GateError::ResponseParse(e.to_string()))
    }
}
