// ConsoleView - renders session events as plain text
//
// The view is write-only: it never reads session state, it only reacts to the
// events the session publishes.

use crate::models::{Question, Tally};
use crate::session::SessionEvent;
use std::io::{self, Write};

/// Text renderer for [`SessionEvent`]s.
pub struct ConsoleView<W: Write> {
    out: W,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Render one event.
    pub fn render(&mut self, event: &SessionEvent) -> io::Result<()> {
        match event {
            // Questions are rendered from Started, which carries the full set
            SessionEvent::QuestionAvailable { .. } => {}
            SessionEvent::DataQualityWarning(warning) => {
                writeln!(self.out, "(warning) {}", warning)?
            }
            SessionEvent::Started {
                questions,
                display,
                ..
            } => {
                for (position, question) in questions.iter().enumerate() {
                    self.render_question(position, question)?;
                }
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "{} questions. Answer as many as you can before the clock runs out.",
                    questions.len()
                )?;
                writeln!(
                    self.out,
                    "Type '<question> <answer>', for example '1 2'."
                )?;
                writeln!(self.out, "Time Remaining: {}", display)?;
            }
            SessionEvent::Tick { display, .. } => writeln!(self.out, "Time Remaining: {}", display)?,
            SessionEvent::SelectionRecorded { .. } => {}
            SessionEvent::TimeUp => writeln!(self.out, "Time's up!")?,
            SessionEvent::Scored { tally } => self.render_scoreboard(tally)?,
            SessionEvent::Failed { reason } => {
                writeln!(self.out, "Could not start the quiz: {}", reason)?
            }
        }

        self.out.flush()
    }

    /// Tell the player how to answer after a line that could not be used.
    pub fn hint(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}. Type '<question> <answer>', for example '1 2'.", message)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_question(&mut self, position: usize, question: &Question) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}. {}", position + 1, question.prompt)?;
        for (index, answer) in question.answers.iter().enumerate() {
            writeln!(self.out, "   {}) {}", index + 1, answer.text)?;
        }
        Ok(())
    }

    fn render_scoreboard(&mut self, tally: &Tally) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "All Done!")?;
        writeln!(self.out, "Correct Answers: {}", tally.correct)?;
        writeln!(self.out, "Incorrect Answers: {}", tally.incorrect)?;
        writeln!(self.out, "Unanswered: {}", tally.unanswered)
    }
}
