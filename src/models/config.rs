use serde::{Deserialize, Serialize};

/// Settings file layout for `Quiz Settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "Quiz_Settings", default)]
    pub quiz_settings: QuizSettings,
}

/// User-facing settings for a quiz session and the console front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Countdown length in whole seconds. Zero expires the session immediately.
    #[serde(rename = "Session Duration", default = "default_session_duration")]
    pub session_duration: u32,

    #[serde(rename = "Question File", default = "default_question_file")]
    pub question_file: String,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Console Logging", default)]
    pub console_logging: bool,

    #[serde(rename = "Log Directory", default = "default_log_directory")]
    pub log_directory: String,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            session_duration: default_session_duration(),
            question_file: default_question_file(),
            debug_mode: false,
            console_logging: false,
            log_directory: default_log_directory(),
        }
    }
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            quiz_settings: QuizSettings::default(),
        }
    }
}

fn default_session_duration() -> u32 {
    5
}

fn default_question_file() -> String {
    "Quiz Data/Questions.yaml".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}
