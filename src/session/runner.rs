// Session runner
//
// Drives a QuizSession on one task: loading, then ticks and player commands
// until the clock runs out. Every state change happens here, one at a time.

use super::{QuizSession, SessionPhase};
use crate::error::SessionError;
use crate::models::{QuestionId, Tally};
use crate::services::QuestionProvider;
use tokio::sync::mpsc;

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Choose answer `answer_index` (zero-based) for `question_id`.
    Select {
        question_id: QuestionId,
        answer_index: usize,
    },
}

impl PlayerCommand {
    pub fn select(question_id: impl Into<QuestionId>, answer_index: usize) -> Self {
        PlayerCommand::Select {
            question_id: question_id.into(),
            answer_index,
        }
    }
}

/// Owns a session, its provider and the command channel.
///
/// [`run`](Self::run) resolves with the final tally once the clock expires.
/// Commands that arrive while questions are still loading are rejected. If
/// the command channel closes, the clock keeps running to expiry.
pub struct SessionRunner<P> {
    session: QuizSession,
    provider: P,
    commands: mpsc::Receiver<PlayerCommand>,
}

impl<P> SessionRunner<P>
where
    P: QuestionProvider,
{
    pub fn new(session: QuizSession, provider: P, commands: mpsc::Receiver<PlayerCommand>) -> Self {
        Self {
            session,
            provider,
            commands,
        }
    }

    /// Build a runner together with the sender its commands come from.
    pub fn channel(
        session: QuizSession,
        provider: P,
        capacity: usize,
    ) -> (Self, mpsc::Sender<PlayerCommand>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(session, provider, rx), tx)
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Run the session to completion.
    pub async fn run(self) -> Result<Tally, SessionError> {
        let Self {
            mut session,
            provider,
            mut commands,
        } = self;
        let mut commands_open = true;

        if session.phase() == SessionPhase::Loading {
            let fetched = {
                let fetch = provider.fetch_questions();
                tokio::pin!(fetch);

                loop {
                    tokio::select! {
                        biased;

                        fetched = &mut fetch => break fetched,

                        command = commands.recv(), if commands_open => match command {
                            // Questions are not on screen yet
                            Some(command) => {
                                let _ = session.apply(command);
                            }
                            None => commands_open = false,
                        },
                    }
                }
            };

            session.finish_loading(fetched)?;
        }

        loop {
            if let Some(tally) = session.tally() {
                return Ok(tally);
            }

            if session.phase() == SessionPhase::Failed {
                let reason = session.failure().unwrap_or("unknown reason").to_string();
                return Err(SessionError::LoadFailed(reason));
            }

            let tick = session.wait_for_tick();

            tokio::select! {
                biased;

                _ = tick => {
                    session.handle_tick();
                }

                command = commands.recv(), if commands_open => match command {
                    Some(command) => {
                        let _ = session.apply(command);
                    }
                    None => {
                        tracing::debug!("Command channel closed, running clock to expiry");
                        commands_open = false;
                    }
                },
            }
        }
    }
}
