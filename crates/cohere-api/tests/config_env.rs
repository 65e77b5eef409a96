use serial_test::serial;
use std::env;

use cohere_api::{ClientConfig, ConfigError, Credential, API_KEY_ENV, BASE_URL_ENV, COHERE_API_URL};

fn clear_env() {
    env::remove_var(API_KEY_ENV);
    env::remove_var(BASE_URL_ENV);
}

#[test]
#[serial]
fn missing_key_is_reported() {
    clear_env();
    assert!(matches!(Credential::from_env(), Err(ConfigError::MissingCredential)));
    assert!(matches!(ClientConfig::from_env(), Err(ConfigError::MissingCredential)));

    let message = ConfigError::MissingCredential.to_string();
    assert!(message.contains("COHERE_API_KEY"));
}

#[test]
#[serial]
fn blank_key_counts_as_missing() {
    clear_env();
    env::set_var(API_KEY_ENV, "   ");
    assert!(matches!(ClientConfig::from_env(), Err(ConfigError::MissingCredential)));
    clear_env();
}

#[test]
#[serial]
fn defaults_from_env() {
    clear_env();
    env::set_var(API_KEY_ENV, "env-key-123");

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.credential.expose(), "env-key-123");
    assert_eq!(config.base_url, COHERE_API_URL);
    assert!(!config.verbose);
    assert!(config.log_dir.is_none());
    clear_env();
}

#[test]
#[serial]
fn base_url_override_is_normalized() {
    clear_env();
    env::set_var(API_KEY_ENV, "env-key-123");
    env::set_var(BASE_URL_ENV, "http://localhost:8080/");

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.base_url, "http://localhost:8080");

    env::set_var(BASE_URL_ENV, "not a url");
    assert!(matches!(ClientConfig::from_env(), Err(ConfigError::InvalidBaseUrl { .. })));
    clear_env();
}
