use crate::models::{QuizSettings, SettingsFile};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use std::fs;

/// Directory holding the settings file and the default question file.
pub const DEFAULT_CONFIG_DIR: &str = "Quiz Data";

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "Quiz Settings.yaml";

/// Prefix of environment variables that override the settings file.
pub const ENV_PREFIX: &str = "QUIZ";

/// Configuration manager for loading and saving `Quiz Settings.yaml`.
///
/// Settings resolve in this order, later sources winning:
/// 1. built-in defaults
/// 2. the settings file
/// 3. `QUIZ_DURATION`, `QUIZ_QUESTIONS` and `QUIZ_DEBUG` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE_NAME),
            config_dir,
        })
    }

    /// Load the settings file.
    ///
    /// # Returns
    /// The loaded QuizSettings, or defaults if the file doesn't exist
    pub fn load_settings(&self) -> Result<QuizSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            return Ok(QuizSettings::default());
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        if file_contents.trim().is_empty() {
            tracing::warn!("Settings file {} is empty, using defaults", self.settings_path);
            return Ok(QuizSettings::default());
        }

        let file: SettingsFile = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(file.quiz_settings)
    }

    /// Save the settings file.
    pub fn save_settings(&self, settings: &QuizSettings) -> Result<()> {
        let file = SettingsFile {
            quiz_settings: settings.clone(),
        };
        let yaml_string =
            serde_yaml_ng::to_string(&file).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Load the settings file and apply overrides from the process environment.
    ///
    /// Settings are usually loaded before logging exists, so anything worth
    /// keeping is reported again by [`log_settings`](Self::log_settings).
    pub fn load_settings_with_env(&self) -> Result<QuizSettings> {
        apply_env_overrides(self.load_settings()?, None)
    }

    /// Problems with the resolved settings that deserve a warning.
    pub fn settings_notes(&self, settings: &QuizSettings) -> Vec<String> {
        let mut notes = Vec::new();

        if !self.settings_path.exists() {
            notes.push(format!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            ));
        }

        if settings.session_duration == 0 {
            notes.push("Session duration is 0, sessions will expire immediately".to_string());
        }

        notes
    }

    /// Log the resolved settings. Call once the subscriber is installed.
    pub fn log_settings(&self, settings: &QuizSettings) {
        for note in self.settings_notes(settings) {
            tracing::warn!("{}", note);
        }

        tracing::info!(
            "Settings resolved from {}: duration={}s, question file={}, debug={}",
            self.settings_path,
            settings.session_duration,
            settings.question_file,
            settings.debug_mode
        );
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

/// Apply `QUIZ_*` overrides to `settings`.
///
/// Reads the process environment, or `vars` when given. Variables are
/// matched case-insensitively. A value that doesn't parse is an error rather
/// than silently ignored.
pub fn apply_env_overrides(
    mut settings: QuizSettings,
    vars: Option<config::Map<String, String>>,
) -> Result<QuizSettings> {
    let env = config::Config::builder()
        .add_source(config::Environment::with_prefix(ENV_PREFIX).source(vars))
        .build()
        .context("Failed to read environment overrides")?;

    if let Some(duration) = lookup::<u32>(&env, "duration")? {
        tracing::info!("Session duration overridden by environment: {}s", duration);
        settings.session_duration = duration;
    }

    if let Some(questions) = lookup::<String>(&env, "questions")? {
        tracing::info!("Question file overridden by environment: {}", questions);
        settings.question_file = questions;
    }

    if let Some(debug) = lookup::<bool>(&env, "debug")? {
        settings.debug_mode = debug;
    }

    Ok(settings)
}

fn lookup<T: DeserializeOwned>(env: &config::Config, key: &str) -> Result<Option<T>> {
    match env.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!(
                "Invalid value for {}_{}",
                ENV_PREFIX,
                key.to_ascii_uppercase()
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_create_config_manager() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(manager.settings_path().ends_with(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert_eq!(manager.load_settings().unwrap(), QuizSettings::default());
    }

    #[test]
    fn test_load_save_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = QuizSettings {
            session_duration: 90,
            debug_mode: true,
            ..QuizSettings::default()
        };
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded.session_duration, 90);
        assert!(loaded.debug_mode);
    }

    #[test]
    fn test_env_overrides() {
        let settings = apply_env_overrides(
            QuizSettings::default(),
            Some(vars(&[
                ("QUIZ_DURATION", "30"),
                ("QUIZ_QUESTIONS", "other.yaml"),
                ("QUIZ_DEBUG", "true"),
            ])),
        )
        .unwrap();

        assert_eq!(settings.session_duration, 30);
        assert_eq!(settings.question_file, "other.yaml");
        assert!(settings.debug_mode);
    }

    #[test]
    fn test_env_overrides_absent() {
        let settings =
            apply_env_overrides(QuizSettings::default(), Some(vars(&[("OTHER_DURATION", "9")])))
                .unwrap();
        assert_eq!(settings, QuizSettings::default());
    }

    #[test]
    fn test_settings_notes_missing_file_and_zero_duration() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = QuizSettings {
            session_duration: 0,
            ..QuizSettings::default()
        };

        let notes = manager.settings_notes(&settings);
        assert_eq!(notes.len(), 2);
        assert!(notes[0].contains("not found"));
        assert!(notes[1].contains("duration is 0"));
    }

    #[test]
    fn test_settings_notes_empty_for_saved_settings() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = QuizSettings::default();
        manager.save_settings(&settings).unwrap();

        assert!(manager.settings_notes(&settings).is_empty());
    }

    #[test]
    fn test_invalid_env_override_is_error() {
        let result = apply_env_overrides(
            QuizSettings::default(),
            Some(vars(&[("QUIZ_DURATION", "soon")])),
        );
        assert!(result.is_err());
    }
}
