//! `looper.toml` settings with environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use puzzle_core::EngineConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "LogicLooper";
pub const CONFIG_FILE_NAME: &str = "looper.toml";
const ACTIVITY_FILE_NAME: &str = "activity.jsonl";
const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_USER_ID: &str = "local";

pub const DIFFICULTY_ENV: &str = "LOOPER_DIFFICULTY";
pub const LOG_ENV: &str = "LOOPER_LOG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LooperConfig {
    pub engine: EngineConfig,
    pub activity_log: Option<PathBuf>,
    pub user_id: String,
    pub log_filter: String,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            activity_log: None,
            user_id: DEFAULT_USER_ID.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn default_activity_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join(ACTIVITY_FILE_NAME))
}

impl LooperConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .engine
            .validate()
            .with_context(|| format!("Invalid [engine] table in {}", path.display()))?;
        Ok(config)
    }

    /// An explicit path must exist; the platform default is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(
            env::var(DIFFICULTY_ENV).ok().as_deref(),
            env::var(LOG_ENV).ok().as_deref(),
        )?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        difficulty: Option<&str>,
        log_filter: Option<&str>,
    ) -> Result<()> {
        if let Some(raw) = difficulty {
            let modifier: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{DIFFICULTY_ENV} is not a number: {raw}"))?;
            if !modifier.is_finite() || modifier < 0.0 {
                bail!("{DIFFICULTY_ENV} must be finite and non-negative, got {raw}");
            }
            self.engine.difficulty_modifier = modifier;
        }
        if let Some(filter) = log_filter.filter(|filter| !filter.trim().is_empty()) {
            self.log_filter = filter.to_string();
        }
        Ok(())
    }

    /// The configured activity file, else the platform data dir.
    pub fn activity_path(&self) -> Option<PathBuf> {
        self.activity_log.clone().or_else(default_activity_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: LooperConfig = toml::from_str("user_id = \"ada\"\n").expect("parse");
        assert_eq!(config.user_id, "ada");
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.activity_log, None);
    }

    #[test]
    fn engine_table_and_paths_load_from_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "activity_log = \"/tmp/looper/activity.jsonl\"\nlog_filter = \"debug\"\n\n\
             [engine]\nseed_prefix = \"test-\"\ndifficulty_modifier = 1.5\nmax_hints = 5\n",
        )
        .expect("write");

        let config = LooperConfig::load(&path).expect("load");
        assert_eq!(config.engine.seed_prefix, "test-");
        assert_eq!(config.engine.difficulty_modifier, 1.5);
        assert_eq!(config.engine.max_hints, 5);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.activity_path(), Some(PathBuf::from("/tmp/looper/activity.jsonl")));
    }

    #[test]
    fn negative_modifier_in_file_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[engine]\ndifficulty_modifier = -1.0\n").expect("write");
        assert!(LooperConfig::load(&path).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        assert!(LooperConfig::resolve(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = LooperConfig::default();
        config.apply_overrides(Some(" 2.5 "), Some("puzzle_core=trace")).expect("valid");
        assert_eq!(config.engine.difficulty_modifier, 2.5);
        assert_eq!(config.log_filter, "puzzle_core=trace");

        config.apply_overrides(None, Some("  ")).expect("valid");
        assert_eq!(config.log_filter, "puzzle_core=trace");

        assert!(config.apply_overrides(Some("hard"), None).is_err());
        assert!(config.apply_overrides(Some("-3"), None).is_err());
        assert_eq!(config.engine.difficulty_modifier, 2.5);
    }
}
