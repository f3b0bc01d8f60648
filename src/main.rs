//! Trivia Clock - timed multiple-choice trivia in the terminal
//!
//! Main entry point for the console application.
//!
//! # Overview
//!
//! This binary runs a single quiz session. It initializes:
//! - Configuration loading ([`ConfigManager`], `Quiz Data/Quiz Settings.yaml`)
//! - Logging infrastructure (daily rotating files, optional stderr mirror)
//! - A single-threaded tokio runtime
//! - The session task ([`SessionRunner`]) and the console loop
//!
//! # Execution Flow
//!
//! 1. Load settings, apply `QUIZ_*` environment overrides
//! 2. Initialize logging → logs/trivia-clock.<date>, then log the resolved settings
//! 3. Spawn the session task, which loads questions and starts the clock
//! 4. Render session events to stdout and forward stdin lines as selections
//! 5. Print the scoreboard when the clock runs out
//!
//! # Usage
//!
//! `trivia-clock [QUESTION FILE]`
//!
//! The question file argument overrides `Question File` from the settings.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use trivia_clock::config::DEFAULT_CONFIG_DIR;
use trivia_clock::ui::{ConsoleView, InputBridge};
use trivia_clock::{
    APP_NAME, ConfigManager, FileProvider, QuizSession, QuizSettings, SessionRunner,
    SessionSettings, Tally, VERSION,
};

/// Commands buffered between the console loop and the session task
const COMMAND_CHANNEL_CAPACITY: usize = 32;

fn main() -> Result<()> {
    let config_manager = ConfigManager::new(DEFAULT_CONFIG_DIR)?;
    let mut settings = config_manager.load_settings_with_env()?;

    if let Some(question_file) = std::env::args().nth(1) {
        settings.question_file = question_file;
    }

    // Keep the guard alive until exit so buffered log lines are flushed
    let _log_guard = trivia_clock::logging::setup_logging(
        Utf8Path::new(&settings.log_directory),
        "trivia-clock",
        settings.debug_mode,
        settings.console_logging,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    config_manager.log_settings(&settings);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build the tokio runtime")?;

    let result = runtime.block_on(play(&settings));

    // Stdin reads run on a blocking thread that may still be waiting for a line
    runtime.shutdown_timeout(Duration::from_secs(1));

    match result {
        Ok(tally) => {
            tracing::info!("Session complete: {}", tally);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Session failed: {:#}", e);
            Err(e)
        }
    }
}

/// Run one session against the console and return its tally.
async fn play(settings: &QuizSettings) -> Result<Tally> {
    let provider = FileProvider::new(&settings.question_file);
    let session = QuizSession::new(SessionSettings::from(settings));
    let mut events = session.subscribe();

    let (runner, commands) = SessionRunner::channel(session, provider, COMMAND_CHANNEL_CAPACITY);
    let session_task = tokio::spawn(runner.run());

    let mut view = ConsoleView::new(std::io::stdout());
    let mut bridge = InputBridge::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    bridge.observe(&event);
                    view.render(&event).context("Failed to write to stdout")?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Console fell behind, {} events skipped", skipped);
                }
                // The session task has finished
                Err(RecvError::Closed) => break,
            },

            line = lines.next_line(), if stdin_open => match line.context("Failed to read stdin")? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match bridge.translate(&line) {
                    Ok(command) => {
                        if commands.send(command).await.is_err() {
                            tracing::debug!("Session no longer accepts commands");
                        }
                    }
                    Err(e) => view.hint(&e.to_string()).context("Failed to write to stdout")?,
                },
                None => {
                    tracing::debug!("Stdin closed, waiting for the clock to run out");
                    stdin_open = false;
                }
            },
        }
    }

    let tally = session_task.await.context("Session task panicked")??;
    Ok(tally)
}
