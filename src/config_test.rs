use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn missing_blob_yields_defaults() {
    assert_eq!(GateConfig::from_json(None), Ok(GateConfig::default()));
    assert_eq!(GateConfig::from_json(Some("   ")), Ok(GateConfig::default()));
}

#[test]
fn defaults_match_page_contract() {
    let config = GateConfig::default();
    assert_eq!(config.storage_key, "jwt");
    assert_eq!(config.login_endpoint, "/user/login");
    assert_eq!(config.register_endpoint, "/user/register");
    assert_eq!(config.form_id, "login-form");
    assert_eq!(config.ready_event, "szachus-init");
    assert_eq!(config.level_filter(), log::LevelFilter::Info);
}

// =============================================================
// Overrides
// =============================================================

#[test]
fn partial_blob_keeps_other_defaults() {
    let config = GateConfig::from_json(Some(r#"{"storage_key":"session","log_level":"debug"}"#)).unwrap();
    assert_eq!(config.storage_key, "session");
    assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.login_endpoint, "/user/login");
}

#[test]
fn endpoints_follow_config() {
    let config = GateConfig::from_json(Some(r#"{"login_endpoint":"/api/login","register_endpoint":"/api/signup"}"#))
        .unwrap();
    let endpoints = config.endpoints();
    assert_eq!(endpoints.login, "/api/login");
    assert_eq!(endpoints.register, "/api/signup");
}

// =============================================================
// Rejections
// =============================================================

#[test]
fn invalid_json_is_a_config_error() {
    let err = GateConfig::from_json(Some("{not json")).unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG");
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(GateConfig::from_json(Some(r#"{"storage":"jwt"}"#)).is_err());
}

#[test]
fn empty_storage_key_is_rejected() {
    let err = GateConfig::from_json(Some(r#"{"storage_key":""}"#)).unwrap_err();
    assert_eq!(err, GateError::Config("storage_key must not be empty".to_owned()));
}

#[test]
fn relative_endpoint_is_rejected() {
    assert!(GateConfig::from_json(Some(r#"{"register_endpoint":"user/register"}"#)).is_err());
}

#[test]
fn unknown_log_level_is_rejected() {
    assert!(GateConfig::from_json(Some(r#"{"log_level":"chatty"}"#)).is_err());
}
