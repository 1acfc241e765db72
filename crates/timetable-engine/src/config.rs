//! Engine configuration, read from TOML.
//!
//! ```toml
//! store_path = ".timetable/schedule.jsonl"
//! daily_load_cap = 5
//!
//! [lock]
//! attempts = 50
//! retry_delay_ms = 20
//!
//! [[classrooms]]
//! number = 101
//! capacity = 30
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use timetable_store::{ClassroomSeed, DEFAULT_LOCK_ATTEMPTS, DEFAULT_LOCK_RETRY_DELAY, LockPolicy};

pub const DEFAULT_STORE_PATH: &str = ".timetable/schedule.jsonl";
pub const DEFAULT_DAILY_LOAD_CAP: usize = 5;
pub const DEFAULT_CLASSROOMS: [ClassroomSeed; 3] = [
    ClassroomSeed::new(101, 30),
    ClassroomSeed::new(102, 20),
    ClassroomSeed::new(103, 25),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimetableConfig {
    pub store_path: PathBuf,
    pub daily_load_cap: usize,
    pub lock: LockConfig,
    pub classrooms: Vec<ClassroomSeed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    pub attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            daily_load_cap: DEFAULT_DAILY_LOAD_CAP,
            lock: LockConfig::default(),
            classrooms: DEFAULT_CLASSROOMS.to_vec(),
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_LOCK_ATTEMPTS,
            retry_delay_ms: DEFAULT_LOCK_RETRY_DELAY.as_millis() as u64,
        }
    }
}

impl TimetableConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|err| match err {
            ConfigError::ParseToml { source, .. } => ConfigError::ParseToml {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate config text. Omitted fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_load_cap == 0 {
            return Err(ConfigError::Invalid(
                "daily_load_cap must be at least 1".to_string(),
            ));
        }
        if self.lock.attempts == 0 {
            return Err(ConfigError::Invalid(
                "lock.attempts must be at least 1".to_string(),
            ));
        }
        let mut numbers = BTreeSet::new();
        for seed in &self.classrooms {
            if !numbers.insert(seed.number) {
                return Err(ConfigError::Invalid(format!(
                    "classroom {} is listed more than once",
                    seed.number
                )));
            }
        }
        Ok(())
    }

    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy {
            attempts: self.lock.attempts,
            retry_delay: Duration::from_millis(self.lock.retry_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_defaults() {
        let config = TimetableConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, TimetableConfig::default());
        assert_eq!(config.classrooms.len(), 3);
        assert_eq!(config.lock_policy(), LockPolicy::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = TimetableConfig::from_toml_str(
            r#"
store_path = "data/school.jsonl"
daily_load_cap = 3

[lock]
attempts = 5

[[classrooms]]
number = 201
capacity = 12
"#,
        )
        .expect("config should parse");

        assert_eq!(config.store_path, PathBuf::from("data/school.jsonl"));
        assert_eq!(config.daily_load_cap, 3);
        assert_eq!(config.lock.attempts, 5);
        assert_eq!(config.lock.retry_delay_ms, 20);
        assert_eq!(config.classrooms, vec![ClassroomSeed::new(201, 12)]);
    }

    #[test]
    fn zero_cap_is_rejected() {
        let err = TimetableConfig::from_toml_str("daily_load_cap = 0").expect_err("must fail");
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("daily_load_cap")));
    }

    #[test]
    fn duplicate_seed_rooms_are_rejected() {
        let err = TimetableConfig::from_toml_str(
            "[[classrooms]]\nnumber = 101\ncapacity = 30\n[[classrooms]]\nnumber = 101\ncapacity = 10\n",
        )
        .expect_err("must fail");
        assert!(matches!(err, ConfigError::Invalid(message) if message.contains("101")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = TimetableConfig::from_toml_str("cap = 4").expect_err("must fail");
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }
}
