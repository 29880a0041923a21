//! Lookup configuration
//!
//! Values resolve with priority: environment variables > config file >
//! defaults. The config file lives at `<app data dir>/contact-lookup/config.toml`:
//!
//! ```toml
//! [lookup]
//! deadline_ms = 250
//! ```

use crate::error::{LookupError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "contact-lookup";
const CONFIG_FILE: &str = "config.toml";

/// Default time budget for one lookup, in milliseconds
pub const DEFAULT_DEADLINE_MS: u64 = 250;

/// Environment override for the lookup deadline
pub const DEADLINE_ENV: &str = "CLOOK_DEADLINE_MS";

/// Configuration file format (TOML)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub lookup: LookupConfigFile,
}

/// `[lookup]` section of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupConfigFile {
    pub deadline_ms: Option<u64>,
}

/// Effective engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupConfig {
    /// Upper bound on how long a lookup waits for its searchers
    pub deadline_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            deadline_ms: DEFAULT_DEADLINE_MS,
        }
    }
}

impl LookupConfig {
    /// Config with the given deadline, rounded up to whole milliseconds
    ///
    /// Rounding up keeps any non-zero deadline non-zero.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline_ms: deadline
                .as_nanos()
                .div_ceil(1_000_000)
                .try_into()
                .unwrap_or(u64::MAX),
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.deadline_ms == 0 {
            return Err(LookupError::Config(
                "deadline_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load config with priority: environment variables > config file > defaults
    ///
    /// A missing or unreadable config file falls back to defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(file_config) = config_path().and_then(|p| read_config_file(&p).ok()) {
            config.apply_file(&file_config);
        }

        config.apply_env(std::env::var(DEADLINE_ENV).ok().as_deref());
        config
    }

    /// Load from an explicit config file, still honoring environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let file_config = read_config_file(path)?;

        let mut config = Self::default();
        config.apply_file(&file_config);
        config.apply_env(std::env::var(DEADLINE_ENV).ok().as_deref());
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file_config: &ConfigFile) {
        if let Some(v) = file_config.lookup.deadline_ms {
            self.deadline_ms = v;
        }
    }

    /// Apply the raw value of the deadline env var; unparsable values are ignored
    fn apply_env(&mut self, deadline_ms: Option<&str>) {
        if let Some(ms) = deadline_ms.and_then(|v| v.trim().parse().ok()) {
            self.deadline_ms = ms;
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Application data directory (not created)
pub fn app_data_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        dirs::data_dir()
    };
    base.map(|b| b.join(APP_NAME))
}

/// Location of the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default() {
        let config = LookupConfig::default();
        assert_eq!(config.deadline(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let config = LookupConfig::with_deadline(Duration::ZERO);
        assert!(matches!(config.validate(), Err(LookupError::Config(_))));
    }

    #[test]
    fn test_sub_millisecond_deadline_rounds_up() {
        let config = LookupConfig::with_deadline(Duration::from_micros(500));
        assert_eq!(config.deadline_ms, 1);
        assert!(config.validate().is_ok());

        let config = LookupConfig::with_deadline(Duration::from_nanos(1));
        assert_eq!(config.deadline_ms, 1);

        let config = LookupConfig::with_deadline(Duration::from_micros(1_500));
        assert_eq!(config.deadline(), Duration::from_millis(2));

        let config = LookupConfig::with_deadline(Duration::from_millis(40));
        assert_eq!(config.deadline_ms, 40);
    }

    #[test]
    fn test_file_overrides_default() {
        let file_config: ConfigFile = toml::from_str("[lookup]\ndeadline_ms = 40\n").unwrap();
        let mut config = LookupConfig::default();
        config.apply_file(&file_config);

        assert_eq!(config.deadline_ms, 40);
    }

    #[test]
    fn test_empty_file_keeps_default() {
        let file_config: ConfigFile = toml::from_str("").unwrap();
        let mut config = LookupConfig::default();
        config.apply_file(&file_config);

        assert_eq!(config.deadline_ms, DEFAULT_DEADLINE_MS);
    }

    #[test]
    fn test_env_overrides_file() {
        let file_config: ConfigFile = toml::from_str("[lookup]\ndeadline_ms = 40\n").unwrap();
        let mut config = LookupConfig::default();
        config.apply_file(&file_config);
        config.apply_env(Some(" 75 "));

        assert_eq!(config.deadline_ms, 75);
    }

    #[test]
    fn test_bad_env_value_ignored() {
        let mut config = LookupConfig::default();
        config.apply_env(Some("soon"));
        config.apply_env(None);

        assert_eq!(config.deadline_ms, DEFAULT_DEADLINE_MS);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[lookup]\ndeadline_ms = 120\n").unwrap();

        // Only assert when the env override is not set in this environment
        if std::env::var(DEADLINE_ENV).is_err() {
            let config = LookupConfig::load_from(&path).unwrap();
            assert_eq!(config.deadline_ms, 120);
        }
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[lookup\ndeadline_ms = ").unwrap();

        assert!(matches!(
            LookupConfig::load_from(&path),
            Err(LookupError::ConfigFile(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempdir().unwrap();
        let result = LookupConfig::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(LookupError::Io(_))));
    }
}
