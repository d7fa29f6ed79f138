//! Local session-validity decision for a stored credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once per page load before any user interaction. It answers "is this
//! token locally plausible to use", not "is it authentic": signatures are
//! never checked here, the server enforces them on protected requests.
//!
//! Only the middle (claims) segment of the credential is read. Expiry is
//! exclusive at the boundary second and no clock-skew tolerance is applied.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

use crate::clock::{Clock, to_unix_secs};
use crate::error::GateError;

/// Standard alphabet, padding optional, like the browser's `atob`.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decoded claims payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Expiration as Unix seconds. Kept raw so non-numeric values can be rejected.
    #[serde(default)]
    pub exp: Option<serde_json::Value>,
    /// Subject the token was issued for.
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    /// Token issuer.
    #[serde(default)]
    pub iss: Option<serde_json::Value>,
}

impl Claims {
    /// Numeric `exp`, or `None` when absent or not a number.
    #[must_use]
    pub fn expiration(&self) -> Option<f64> {
        self.exp
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .filter(|exp| exp.is_finite())
    }

    /// Subject rendered as text; numeric subjects are accepted.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        as_text(self.sub.as_ref()?)
    }

    #[must_use]
    pub fn issuer(&self) -> Option<String> {
        as_text(self.iss.as_ref()?)
    }
}

fn as_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Why a stored credential is or is not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoCredential,
    MalformedCredential,
    Expired,
    Valid,
}

impl SessionState {
    #[must_use]
    pub fn is_playable(self) -> bool {
        self == Self::Valid
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoCredential => "no_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::Expired => "expired",
            Self::Valid => "valid",
        }
    }
}

/// Decode the claims segment (index 1) of a dot-separated credential.
///
/// # Errors
///
/// Returns [`GateError::MalformedCredential`] when the segment is missing,
/// is not base64, or does not hold a JSON object.
pub fn parse_claims(raw: &str) -> Result<Claims, GateError> {
    let segment = raw
        .split('.')
        .nth(1)
        .ok_or_else(|| GateError::MalformedCredential("missing claims segment".to_owned()))?;
    let translated: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = CLAIMS_ENGINE
        .decode(translated.as_bytes())
        .map_err(|e| GateError::MalformedCredential(format!("claims not base64: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| GateError::MalformedCredential(format!("claims not json: {e}")))?;
    if !value.is_object() {
        return Err(GateError::MalformedCredential("claims not a json object".to_owned()));
    }
    serde_json::from_value(value).map_err(|e| GateError::MalformedCredential(format!("claims rejected: {e}")))
}

/// Check a credential's expiry against `now_ms`.
///
/// # Errors
///
/// Returns [`GateError::MalformedCredential`] for undecodable credentials or
/// a non-numeric `exp`, and [`GateError::ExpiredCredential`] when
/// `exp <= round(now_ms / 1000)`.
pub fn validate(raw: &str, now_ms: f64) -> Result<Claims, GateError> {
    let claims = parse_claims(raw)?;
    let exp = claims
        .expiration()
        .ok_or_else(|| GateError::MalformedCredential("exp is not a number".to_owned()))?;
    let now = to_unix_secs(now_ms);
    #[allow(clippy::cast_precision_loss)]
    let now_secs = now as f64;
    if exp > now_secs {
        Ok(claims)
    } else {
        Err(GateError::ExpiredCredential { exp, now })
    }
}

/// Classify a possibly-missing stored credential. Never panics.
#[must_use]
pub fn session_state(raw: Option<&str>, now_ms: f64) -> SessionState {
    let Some(raw) = raw else {
        log::debug!("session: no stored credential");
        return SessionState::NoCredential;
    };
    match validate(raw, now_ms) {
        Ok(claims) => {
            log::debug!(
                "session: credential valid (sub={}, iss={})",
                claims.subject().as_deref().unwrap_or("-"),
                claims.issuer().as_deref().unwrap_or("-")
            );
            SessionState::Valid
        }
        Err(GateError::ExpiredCredential { exp, now }) => {
            log::debug!("session: credential expired (exp={exp}, now={now})");
            SessionState::Expired
        }
        Err(e) => {
            log::warn!("session: {e}");
            SessionState::MalformedCredential
        }
    }
}

/// `true` iff the stored credential decodes and has not expired at `now_ms`.
#[must_use]
pub fn is_playable(raw: Option<&str>, now_ms: f64) -> bool {
    session_state(raw, now_ms).is_playable()
}

/// [`is_playable`] against an injected clock.
#[must_use]
pub fn is_playable_now<C: Clock + ?Sized>(raw: Option<&str>, clock: &C) -> bool {
    is_playable(raw, clock.now_ms())
}
