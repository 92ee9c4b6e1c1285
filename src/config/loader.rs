//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "BAUDPROBE";

/// Config file name
const CONFIG_FILE_NAME: &str = "baudprobe.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "BAUDPROBE_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `BAUDPROBE_CONFIG` environment variable (explicit path)
    /// 2. `./baudprobe.toml` (current directory)
    /// 3. `$XDG_CONFIG_HOME/baudprobe/baudprobe.toml` or `~/.config/...`
    /// 4. `%APPDATA%\baudprobe\baudprobe.toml` (Windows)
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables override file values; the result is validated.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path, which must exist.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    ///
    /// Environment overrides that fail to parse are ignored here.
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        if let Err(e) = apply_env_overrides(&mut config) {
            debug!("Ignoring environment override: {}", e);
        }
        if config.validate().is_err() {
            config = Config::default();
        }

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Save the current configuration to its file.
    pub fn save(&self) -> ConfigResult<()> {
        let path = self.config_path.as_ref().ok_or(ConfigError::NoPath)?;
        save_to_file(&self.config, path)
    }

    /// Save the current configuration to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        save_to_file(&self.config, path.as_ref())
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    get_default_config_path().filter(|p| p.exists())
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Get the default config directory for creating new config files.
pub fn get_default_config_dir() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("baudprobe"))
}

/// Get the default config file path for creating new config files.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Config> {
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn save_to_file(config: &Config, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Apply `BAUDPROBE_<SECTION>_<KEY>` overrides from the process environment.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to fetch variables by full name.
pub(crate) fn apply_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| {
        let name = format!("{}_{}", ENV_PREFIX, suffix);
        lookup(&name).map(|value| (name, value))
    };

    if let Some((name, val)) = var("SWEEP_TIMEOUT_SECS") {
        config.sweep.default_timeout_secs = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::env_parse(name, "Invalid number of seconds"))?;
    }
    if let Some((name, val)) = var("SWEEP_POLL_INTERVAL_MS") {
        config.sweep.poll_interval_ms = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::env_parse(name, "Invalid number of milliseconds"))?;
    }
    if let Some((name, val)) = var("SWEEP_ERROR_POLICY") {
        config.sweep.error_policy = val.parse().map_err(|e| ConfigError::env_parse(name, e))?;
    }
    if let Some((name, val)) = var("SWEEP_BAUD_RATES") {
        config.sweep.baud_rates = val
            .split(',')
            .map(|r| r.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| ConfigError::env_parse(name, "Expected comma-separated baud rates"))?;
    }

    if let Some((_, val)) = var("SERIAL_DEFAULT_PORT") {
        config.serial.default_port = Some(val).filter(|v| !v.is_empty());
    }

    if let Some((_, val)) = var("TERMINAL_PROGRAM") {
        config.terminal.program = val;
    }

    if let Some((_, val)) = var("LOGGING_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}
