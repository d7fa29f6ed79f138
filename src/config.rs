//! Gate configuration.
//!
//! The page may embed a `<script type="application/json" id="gate-config">`
//! blob to override well-known names. Every field is optional; anything left
//! out falls back to the defaults in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::auth::Endpoints;
use crate::consts;
use crate::error::GateError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub storage_key: String,
    pub login_endpoint: String,
    pub register_endpoint: String,
    pub form_id: String,
    pub ready_event: String,
    pub log_level: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            storage_key: consts::STORAGE_KEY.to_owned(),
            login_endpoint: consts::LOGIN_ENDPOINT.to_owned(),
            register_endpoint: consts::REGISTER_ENDPOINT.to_owned(),
            form_id: consts::FORM_ID.to_owned(),
            ready_event: consts::READY_EVENT.to_owned(),
            log_level: consts::DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl GateConfig {
    /// Build config from an optional JSON blob.
    ///
    /// `None` or a blank blob yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] if the blob is not a JSON object of the
    /// known fields, or if any value fails [`GateConfig::validate`].
    pub fn from_json(raw: Option<&str>) -> Result<Self, GateError> {
        let config = match raw.map(str::trim) {
            None | Some("") => Self::default(),
            Some(raw) => serde_json::from_str(raw).map_err(|e| GateError::Config(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject empty names, relative endpoints, and unknown log levels.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GateError> {
        for (field, value) in [
            ("storage_key", &self.storage_key),
            ("form_id", &self.form_id),
            ("ready_event", &self.ready_event),
        ] {
            if value.trim().is_empty() {
                return Err(GateError::Config(format!("{field} must not be empty")));
            }
        }
        for (field, value) in [
            ("login_endpoint", &self.login_endpoint),
            ("register_endpoint", &self.register_endpoint),
        ] {
            if !value.starts_with('/') {
                return Err(GateError::Config(format!("{field} must be an absolute path, got {value:?}")));
            }
        }
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| GateError::Config(format!("unknown log_level {:?}", self.log_level)))?;
        Ok(())
    }

    /// Parsed log level; falls back to `Info` for values `validate` would reject.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints { login: self.login_endpoint.clone(), register: self.register_endpoint.clone() }
    }
}
