//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `MEDISCHEDULER_DB_PATH` | `medischedular.db` |
//! | `MEDISCHEDULER_LOG_MODE` | `auto` (`file`, `stdout`) |
//! | `MEDISCHEDULER_LOG_FILE` | `medischeduler.log` |
//!
//! The log filter itself comes from `RUST_LOG` via `EnvFilter`.

use std::path::PathBuf;

/// Same file name the earlier releases used, so existing data is picked up.
pub const DEFAULT_DB_PATH: &str = "medischedular.db";
pub const DEFAULT_LOG_FILE: &str = "medischeduler.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether logs should be written to the log file.
    #[must_use]
    pub fn uses_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: non_empty("MEDISCHEDULER_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_mode: non_empty("MEDISCHEDULER_LOG_MODE")
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: non_empty("MEDISCHEDULER_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from("medischedular.db"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MEDISCHEDULER_DB_PATH", "/data/meds.db"),
            ("MEDISCHEDULER_LOG_MODE", "STDOUT"),
            ("MEDISCHEDULER_LOG_FILE", "/var/log/meds.log"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/data/meds.db"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/var/log/meds.log"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("MEDISCHEDULER_DB_PATH", "  "), ("MEDISCHEDULER_LOG_MODE", "bogus")]);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.log_mode, LogMode::Auto);
    }

    #[test]
    fn test_log_mode_destination() {
        assert!(LogMode::Auto.uses_file(true));
        assert!(!LogMode::Auto.uses_file(false));
        assert!(LogMode::File.uses_file(false));
        assert!(!LogMode::Stdout.uses_file(true));
    }
}
