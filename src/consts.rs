//! Well-known names shared between the page markup, the server, and the gate.

// ── Storage ─────────────────────────────────────────────────────

/// `localStorage` key holding the session credential.
pub const STORAGE_KEY: &str = "jwt";

// ── Endpoints ───────────────────────────────────────────────────

/// Login endpoint, tried first on every submission.
pub const LOGIN_ENDPOINT: &str = "/user/login";

/// Registration endpoint, tried only when login is rejected.
pub const REGISTER_ENDPOINT: &str = "/user/register";

// ── DOM ─────────────────────────────────────────────────────────

/// Id of the credential form element.
pub const FORM_ID: &str = "login-form";

/// Name of the document-level event that starts the embedded application.
pub const READY_EVENT: &str = "szachus-init";

/// Id of the optional `<script type="application/json">` config element.
pub const CONFIG_ELEMENT_ID: &str = "gate-config";

/// Form field carrying the username.
pub const USERNAME_FIELD: &str = "username";

/// Form field carrying the password.
pub const PASSWORD_FIELD: &str = "password";

// ── Logging ─────────────────────────────────────────────────────

/// Default console log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
