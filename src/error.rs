//! Error taxonomy for the session gate.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal to the page. Credential errors degrade to
//! "not authenticated", protocol errors leave the form usable, and
//! browser-boundary failures are carried as strings so the core stays
//! free of `JsValue`.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GateError {
    /// The credential could not be split, decoded, or parsed into claims.
    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    /// The credential decoded fine but `exp` is not in the future.
    #[error("credential expired: exp {exp} <= now {now}")]
    ExpiredCredential { exp: f64, now: i64 },

    /// An endpoint answered with a non-2xx status.
    #[error("{endpoint} returned status {status}")]
    Transport { endpoint: String, status: u16 },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response body was not valid JSON.
    #[error("response parse failed: {0}")]
    ResponseParse(String),

    /// Neither login nor registration accepted the credentials.
    #[error("login and registration both rejected")]
    AuthFailure,

    /// A successful response carried no string `jwt` field.
    #[error("response has no string jwt field")]
    UnexpectedResponseShape,

    /// The credential slot could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// A DOM lookup or mutation failed.
    #[error("dom error: {0}")]
    Dom(String),

    /// The embedded application failed to initialize.
    #[error("application init failed: {0}")]
    AppInit(String),

    /// The gate configuration blob was rejected.
    #[error("config error: {0}")]
    Config(String),
}

impl GateError {
    /// Stable machine-readable code for log lines and failure hooks.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedCredential(_) => "E_MALFORMED_CREDENTIAL",
            Self::ExpiredCredential { .. } => "E_EXPIRED_CREDENTIAL",
            Self::Transport { .. } => "E_TRANSPORT",
            Self::Network(_) => "E_NETWORK",
            Self::ResponseParse(_) => "E_RESPONSE_PARSE",
            Self::AuthFailure => "E_AUTH_FAILURE",
            Self::UnexpectedResponseShape => "E_UNEXPECTED_RESPONSE_SHAPE",
            Self::Storage(_) => "E_STORAGE",
            Self::Dom(_) => "E_DOM",
            Self::AppInit(_) => "E_APP_INIT",
            Self::Config(_) => "E_CONFIG",
        }
    }

    /// Whether resubmitting the same form could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Storage(_) | Self::ResponseParse(_))
    }
}

#[cfg(feature = "hydrate")]
impl GateError {
    /// Render a thrown `JsValue` into a [`GateError::Dom`].
    pub(crate) fn from_js(context: &str, value: &wasm_bindgen::JsValue) -> Self {
        Self::Dom(format!("{context}: {value:?}"))
    }
}
