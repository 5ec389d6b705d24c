//! Quiz state machines.
//!
//! Engines never sleep. An action that needs a feedback pause returns a
//! [`Hold`]; the caller waits `duration` and hands the ticket back through
//! `resolve`. A ticket that is no longer the pending one resolves to nothing.

mod choice;
mod sentence;
mod shuffle;
pub mod word_bank;

use std::time::Duration;

pub use choice::{ChoiceQuestion, ChoiceQuiz, ExhaustPolicy, SessionStats};
pub use sentence::{Feedback, Mode, Phase, SentenceQuiz};
pub use shuffle::shuffled;

/// A pending feedback pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hold {
    pub ticket: u64,
    pub duration: Duration,
}

/// What a resolved hold or an explicit advance did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The wrong choice was cleared; the same question is shown again.
    Retry,
    /// Moved to the next question.
    Next,
    /// The collection was exhausted and restarted with a fresh shuffle.
    Cycled,
    /// The collection was exhausted and the session is over.
    Completed,
    /// A sentence answer was graded.
    Graded,
}

#[derive(Debug, Default)]
struct HoldSlot {
    next_ticket: u64,
    pending: Option<u64>,
}

impl HoldSlot {
    fn arm(&mut self, duration: Duration) -> Hold {
        self.next_ticket += 1;
        self.pending = Some(self.next_ticket);
        Hold {
            ticket: self.next_ticket,
            duration,
        }
    }

    /// Consume the pending hold if `ticket` is it.
    fn take(&mut self, ticket: u64) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
