// tests/config_env.rs
//
// Config loading with environment overrides. Tests mutate process env, so
// they run serially.

use std::env;
use std::path::PathBuf;

use serial_test::serial;

use atendos_engine::config::{EngineConfig, ProviderKind};
use atendos_engine::{DecisionEngine, EngineError};

const VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "AI_TEST_MODE",
    "ATENDOS_MODEL",
    "ATENDOS_BASE_URL",
    "ATENDOS_TIMEOUT_MS",
    "ATENDOS_HISTORY_WINDOW",
    "ATENDOS_MAX_RETRIES",
];

fn clear_env() {
    for v in VARS {
        env::remove_var(v);
    }
}

fn write_config(name: &str, contents: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("atendos-cfg-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("engine.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn env_placeholder_reads_openai_key() {
    clear_env();
    env::set_var("OPENAI_API_KEY", "sk-from-env");
    let path = write_config("placeholder", "provider_api_key = \"ENV\"\n");

    let cfg = EngineConfig::load_from(&path).unwrap();
    assert_eq!(cfg.provider_api_key, "sk-from-env");
    assert!(cfg.validate().is_ok());
    // Debug output shows only the key length.
    assert!(!format!("{cfg:?}").contains("sk-from-env"));
    clear_env();
}

#[test]
#[serial]
fn missing_file_uses_defaults_and_fails_without_key() {
    clear_env();
    let path = env::temp_dir().join("atendos-does-not-exist/engine.toml");

    let cfg = EngineConfig::load_from(&path).unwrap();
    assert_eq!(cfg.provider, ProviderKind::OpenAi);
    assert_eq!(cfg.model_name, "gpt-4o-mini");
    assert!(matches!(
        DecisionEngine::from_config(&cfg),
        Err(EngineError::Configuration(_))
    ));
}

#[test]
#[serial]
fn test_mode_switches_provider() {
    clear_env();
    env::set_var("AI_TEST_MODE", "MOCK");
    let path = write_config("mode", "provider = \"openai\"\n");

    let cfg = EngineConfig::load_from(&path).unwrap();
    assert_eq!(cfg.provider, ProviderKind::Mock);
    let engine = DecisionEngine::from_config(&cfg).unwrap();
    assert_eq!(engine.provider_name(), "mock");

    env::set_var("AI_TEST_MODE", "error");
    let cfg = EngineConfig::load_from(&path).unwrap();
    assert_eq!(cfg.provider, ProviderKind::Error);
    clear_env();
}

#[test]
#[serial]
fn numeric_overrides_apply_and_garbage_is_ignored() {
    clear_env();
    env::set_var("ATENDOS_TIMEOUT_MS", "2500");
    env::set_var("ATENDOS_HISTORY_WINDOW", "4");
    env::set_var("ATENDOS_MAX_RETRIES", "lots");
    env::set_var("ATENDOS_MODEL", "  gpt-4o  ");
    let path = write_config("numbers", "provider = \"mock\"\nmax_retries = 2\n");

    let cfg = EngineConfig::load_from(&path).unwrap();
    assert_eq!(cfg.timeout_ms, 2500);
    assert_eq!(cfg.history_window_size, 4);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.model_name, "gpt-4o");
    clear_env();
}

#[test]
#[serial]
fn invalid_toml_is_an_error() {
    clear_env();
    let path = write_config("broken", "timeout_ms = \"soon\"\n");
    assert!(EngineConfig::load_from(&path).is_err());
}

#[test]
#[serial]
fn validate_rejects_empty_model_and_zero_timeout() {
    clear_env();
    let base = EngineConfig {
        provider: ProviderKind::Mock,
        ..EngineConfig::default()
    };
    assert!(base.validate().is_ok());

    let no_model = EngineConfig {
        model_name: " ".into(),
        ..base.clone()
    };
    assert!(matches!(no_model.validate(), Err(EngineError::Configuration(_))));

    let no_deadline = EngineConfig {
        timeout_ms: 0,
        ..base
    };
    assert!(matches!(no_deadline.validate(), Err(EngineError::Configuration(_))));
}
