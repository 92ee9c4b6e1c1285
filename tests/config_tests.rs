//! Configuration file loading and environment override tests.

use baudprobe::config::{Config, ConfigError, ConfigLoader, LogFormat};
use baudprobe::sweep::ErrorPolicy;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_config(
        r#"
        [sweep]
        baud_rates = [2400, 4800, 9600]
        default_timeout_secs = 3
        error_policy = "continue"

        [serial]
        default_port = "arduino"
        port_aliases = { arduino = "/dev/ttyACM0" }

        [terminal]
        program = "picocom"
        args = ["-b", "{baud}", "{port}"]
        "#,
    );

    let loader = ConfigLoader::load_from(file.path()).unwrap();
    let config = loader.config();

    assert_eq!(config.sweep.baud_rates, vec![2400, 4800, 9600]);
    assert_eq!(config.sweep.default_timeout_secs, 3);
    assert_eq!(config.sweep.error_policy, ErrorPolicy::Continue);
    assert_eq!(config.serial.resolve_port("arduino"), "/dev/ttyACM0");
    assert_eq!(config.terminal.program, "picocom");
    // Untouched sections keep their defaults.
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert_eq!(loader.config_path.as_deref(), Some(file.path()));
}

#[test]
#[serial]
fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let err = ConfigLoader::load_from(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
#[serial]
fn test_malformed_file_is_parse_error() {
    let file = write_config("[sweep\nbaud_rates = ");
    let err = ConfigLoader::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
#[serial]
fn test_invalid_values_rejected_on_load() {
    let file = write_config("[sweep]\nbaud_rates = []\n");
    let err = ConfigLoader::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { ref key, .. } if key == "sweep.baud_rates"));
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let file = write_config("[sweep]\ndefault_timeout_secs = 3\n");
    env::set_var("BAUDPROBE_SWEEP_TIMEOUT_SECS", "8");
    env::set_var("BAUDPROBE_TERMINAL_PROGRAM", "minicom");

    let result = ConfigLoader::load_from(file.path());

    env::remove_var("BAUDPROBE_SWEEP_TIMEOUT_SECS");
    env::remove_var("BAUDPROBE_TERMINAL_PROGRAM");

    let config = result.unwrap().into_config();
    assert_eq!(config.sweep.default_timeout_secs, 8);
    assert_eq!(config.terminal.program, "minicom");
}

#[test]
#[serial]
fn test_bad_env_override_fails_load() {
    let file = write_config("");
    env::set_var("BAUDPROBE_SWEEP_ERROR_POLICY", "retry-forever");

    let result = ConfigLoader::load_from(file.path());

    env::remove_var("BAUDPROBE_SWEEP_ERROR_POLICY");

    assert!(matches!(result, Err(ConfigError::EnvParse { .. })));
}

#[test]
#[serial]
fn test_with_defaults_ignores_bad_env() {
    env::set_var("BAUDPROBE_SWEEP_POLL_INTERVAL_MS", "fast");
    let loader = ConfigLoader::with_defaults();
    env::remove_var("BAUDPROBE_SWEEP_POLL_INTERVAL_MS");

    assert_eq!(loader.config(), &Config::default());
    assert!(loader.config_path.is_none());
}

#[test]
#[serial]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("baudprobe.toml");

    let mut loader = ConfigLoader::with_defaults();
    loader.config.sweep.baud_rates = vec![1200, 115200];
    loader.config.logging.format = LogFormat::Pretty;
    loader.save_to(&path).unwrap();

    let reloaded = ConfigLoader::load_from(&path).unwrap().into_config();
    assert_eq!(reloaded.sweep.baud_rates, vec![1200, 115200]);
    assert_eq!(reloaded.logging.format, LogFormat::Pretty);
}
