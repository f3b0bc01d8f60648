// Session controller
//
// This module provides the QuizSession, which owns the countdown timer and the
// answer registry for one quiz run and emits events for the presentation layer.
// The SessionRunner (runner.rs) drives it from a single tokio task.

pub mod runner;

pub use runner::{PlayerCommand, SessionRunner};

use crate::error::{ProviderError, SelectionError, SessionError};
use crate::metrics::SessionMetrics;
use crate::models::{
    DataQualityWarning, Question, QuestionId, QuestionSet, QuizSettings, RawQuestion, Tally,
    validate_questions,
};
use crate::registry::{AnswerRegistry, Selection};
use crate::scoring;
use crate::services::QuestionProvider;
use crate::timer::{CountdownTimer, DEFAULT_TICK_PERIOD, TickOutcome, TimerState};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Buffer size of the session event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Lifecycle phase of a session. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Waiting for the provider; input is rejected.
    Loading,

    /// Clock running; selections are recorded.
    InProgress,

    /// Clock ran out; the tally is final.
    Expired,

    /// The provider failed; there is no tally.
    Failed,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Expired | SessionPhase::Failed)
    }
}

/// Events published to the presentation layer.
///
/// Subscribers get every event sent after they subscribed, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A question is ready to display. `position` is zero-based feed order.
    QuestionAvailable { position: usize, question: Question },

    /// Question data was repaired at load time.
    DataQualityWarning(DataQualityWarning),

    /// The clock started.
    ///
    /// Carries every question in feed order, so a subscriber that lagged
    /// behind the per-question events still learns the full set.
    Started {
        questions: Vec<Question>,
        duration_seconds: u32,
        display: String,
    },

    /// One second elapsed.
    Tick { remaining: u32, display: String },

    /// A selection was recorded; `replaced` marks an overwrite.
    SelectionRecorded {
        question_id: QuestionId,
        answer_index: usize,
        replaced: bool,
    },

    /// The clock reached zero. Always followed by `Scored`.
    TimeUp,

    /// The session is over and this is the final tally.
    Scored { tally: Tally },

    /// The provider failed; no tally will follow.
    Failed { reason: String },
}

/// Tunables of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Countdown length in whole seconds.
    pub duration_seconds: u32,

    /// Real time between ticks.
    pub tick_period: Duration,
}

impl SessionSettings {
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(QuizSettings::default().session_duration)
    }
}

impl From<&QuizSettings> for SessionSettings {
    fn from(settings: &QuizSettings) -> Self {
        Self::new(settings.session_duration)
    }
}

/// One timed quiz run, from question load to final tally.
///
/// The session is a plain state machine: every method runs to completion and
/// nothing happens between calls. Time only advances when the owner applies a
/// tick with [`handle_tick`](Self::handle_tick), normally after awaiting
/// [`wait_for_tick`](Self::wait_for_tick).
///
/// # Usage
///
/// - [`subscribe()`](Self::subscribe) for questions, ticks and the tally
/// - [`load()`](Self::load) or [`begin()`](Self::begin) to leave `Loading`
/// - [`select()`](Self::select) to forward player choices
/// - [`tally()`](Self::tally) once the phase is `Expired`
#[derive(Debug)]
pub struct QuizSession {
    phase: SessionPhase,
    settings: SessionSettings,
    timer: CountdownTimer,
    questions: Vec<Question>,
    registry: AnswerRegistry,
    warnings: Vec<DataQualityWarning>,
    tally: Option<Tally>,
    failure: Option<String>,
    events_tx: broadcast::Sender<SessionEvent>,
    metrics: Arc<SessionMetrics>,
}

impl QuizSession {
    pub fn new(settings: SessionSettings) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            phase: SessionPhase::Loading,
            settings,
            timer: CountdownTimer::with_period(settings.duration_seconds, settings.tick_period),
            questions: Vec::new(),
            registry: AnswerRegistry::new(),
            warnings: Vec::new(),
            tally: None,
            failure: None,
            events_tx,
            metrics: Arc::new(SessionMetrics::new()),
        }
    }

    /// Record into a shared metrics handle instead of a private one.
    pub fn with_metrics(mut self, metrics: Arc<SessionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    // Loading -----------------------------------------------------------------

    /// Fetch questions from `provider` and leave the loading phase.
    pub async fn load<P>(&mut self, provider: &P) -> Result<(), SessionError>
    where
        P: QuestionProvider + ?Sized,
    {
        tracing::info!("Fetching questions");
        let fetched = provider.fetch_questions().await;
        self.finish_loading(fetched)
    }

    /// Apply the outcome of a provider fetch.
    ///
    /// Records are validated into questions and the clock starts. A provider
    /// error moves the session to `Failed` and is returned.
    pub fn finish_loading(
        &mut self,
        fetched: Result<Vec<RawQuestion>, ProviderError>,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::AlreadyLoaded);
        }

        match fetched {
            Ok(raw) => self.begin(validate_questions(raw)),
            Err(error) => {
                tracing::error!("Question provider failed: {}", error);
                let reason = error.to_string();
                self.phase = SessionPhase::Failed;
                self.failure = Some(reason.clone());
                self.publish(SessionEvent::Failed { reason });
                Err(SessionError::ProviderFetchFailure(error))
            }
        }
    }

    /// Enter `InProgress` with an already validated question set and start the clock.
    ///
    /// An empty set is valid. A zero-second duration expires immediately.
    pub fn begin(&mut self, set: QuestionSet) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::AlreadyLoaded);
        }

        let (questions, warnings) = set.into_parts();

        for warning in &warnings {
            self.metrics.record_data_quality_warning();
            self.publish(SessionEvent::DataQualityWarning(warning.clone()));
        }

        for (position, question) in questions.iter().enumerate() {
            self.publish(SessionEvent::QuestionAvailable {
                position,
                question: question.clone(),
            });
        }

        self.questions = questions;
        self.warnings = warnings;
        self.phase = SessionPhase::InProgress;

        let tick_tx = self.events_tx.clone();
        let tick_metrics = Arc::clone(&self.metrics);
        let expire_tx = self.events_tx.clone();
        let expire_metrics = Arc::clone(&self.metrics);

        self.timer.reset(self.settings.duration_seconds);
        self.timer.start(
            move |state: &TimerState| {
                tick_metrics.record_tick();
                publish_event(
                    &tick_tx,
                    &tick_metrics,
                    SessionEvent::Tick {
                        remaining: state.remaining(),
                        display: state.display().to_string(),
                    },
                );
            },
            move |state: &TimerState| {
                tracing::info!("Time is up ({})", state.display());
                publish_event(&expire_tx, &expire_metrics, SessionEvent::TimeUp);
            },
        );

        tracing::info!(
            "Session started: {} questions, {} on the clock",
            self.questions.len(),
            self.timer.display()
        );

        self.publish(SessionEvent::Started {
            questions: self.questions.clone(),
            duration_seconds: self.settings.duration_seconds,
            display: self.timer.display().to_string(),
        });

        if !self.timer.is_running() {
            tracing::warn!("Session duration is zero, expiring immediately");
            self.publish(SessionEvent::TimeUp);
            self.expire();
        }

        Ok(())
    }

    // Input -------------------------------------------------------------------

    /// Record the player's choice of answer `answer_index` for `question_id`.
    ///
    /// Only accepted while `InProgress` and only for delivered questions; a
    /// rejected selection leaves every piece of state untouched.
    pub fn select(
        &mut self,
        question_id: &QuestionId,
        answer_index: usize,
    ) -> Result<(), SelectionError> {
        let result = self.try_select(question_id, answer_index);

        if let Err(error) = &result {
            self.metrics.record_selection_rejected();
            tracing::debug!("Selection ignored: {}", error);
        }

        result
    }

    /// Apply a command from the presentation layer.
    pub fn apply(&mut self, command: PlayerCommand) -> Result<(), SelectionError> {
        match command {
            PlayerCommand::Select {
                question_id,
                answer_index,
            } => self.select(&question_id, answer_index),
        }
    }

    fn try_select(
        &mut self,
        question_id: &QuestionId,
        answer_index: usize,
    ) -> Result<(), SelectionError> {
        match self.phase {
            SessionPhase::InProgress => {}
            SessionPhase::Expired => {
                return Err(SelectionError::PostExpirySelection(question_id.clone()));
            }
            SessionPhase::Loading | SessionPhase::Failed => {
                return Err(SelectionError::NotInProgress);
            }
        }

        let question = self
            .questions
            .iter()
            .find(|question| &question.id == question_id)
            .ok_or_else(|| SelectionError::InvalidSelectionTarget(question_id.clone()))?;

        let answer = question
            .answer(answer_index)
            .cloned()
            .ok_or_else(|| SelectionError::UnknownAnswer {
                question_id: question_id.clone(),
                index: answer_index,
            })?;

        let replaced = self.registry.get(question_id).is_answered();
        if !self.registry.select(question_id.clone(), answer) {
            return Err(SelectionError::PostExpirySelection(question_id.clone()));
        }

        self.metrics.record_selection_accepted(replaced);
        tracing::debug!(
            "Question {} answered with option {}{}",
            question_id,
            answer_index,
            if replaced { " (replaced)" } else { "" }
        );

        self.publish(SessionEvent::SelectionRecorded {
            question_id: question_id.clone(),
            answer_index,
            replaced,
        });

        Ok(())
    }

    // Time --------------------------------------------------------------------

    /// Resolve when the next tick is due. Never resolves unless `InProgress`.
    pub fn wait_for_tick(&self) -> impl Future<Output = ()> + Send + use<> {
        self.timer.wait_for_tick()
    }

    /// Apply one timer tick; on expiry, score the session.
    pub fn handle_tick(&mut self) -> TickOutcome {
        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            self.expire();
        }
        outcome
    }

    fn expire(&mut self) {
        if self.phase != SessionPhase::InProgress {
            return;
        }

        self.timer.stop();
        self.phase = SessionPhase::Expired;
        self.registry.freeze();

        let tally = scoring::score(&self.questions, &self.registry);
        self.tally = Some(tally);

        tracing::info!("Session scored: {}", tally);
        self.publish(SessionEvent::Scored { tally });
        self.metrics.log_summary();
    }

    fn publish(&self, event: SessionEvent) {
        publish_event(&self.events_tx, &self.metrics, event);
    }

    // Accessors ---------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Questions delivered by the provider, in feed order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selection(&self, question_id: &QuestionId) -> Selection<'_> {
        self.registry.get(question_id)
    }

    pub fn registry(&self) -> &AnswerRegistry {
        &self.registry
    }

    pub fn timer_state(&self) -> &TimerState {
        self.timer.state()
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// The final tally, once the session has expired.
    pub fn tally(&self) -> Option<Tally> {
        self.tally
    }

    /// The provider failure, if the session failed to load.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.metrics
    }
}

fn publish_event(
    tx: &broadcast::Sender<SessionEvent>,
    metrics: &SessionMetrics,
    event: SessionEvent,
) {
    // No subscribers is fine; the event is simply unobserved
    if tx.send(event).is_ok() {
        metrics.record_event_published();
    } else {
        metrics.record_event_unobserved();
    }
}
