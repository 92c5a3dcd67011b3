//! Best-of elimination tournament over a batch of images.
//!
//! The engine holds at most one session. Each session starts with the first
//! image of the batch as the current best and the rest as candidates; the
//! user promotes, rejects or saves until no candidates remain. Every decision
//! pushes a full snapshot so `undo` restores the exact prior state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::ImageRef;

mod state;

pub use self::state::{ComparisonState, ImageSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareCommand {
    PreviousCandidate,
    NextCandidate,
    SelectCurrentBest,
    SaveImage,
    RejectImage,
    Undo,
    ExitComparison,
}

impl CompareCommand {
    pub const ALL: [CompareCommand; 7] = [
        CompareCommand::PreviousCandidate,
        CompareCommand::NextCandidate,
        CompareCommand::SelectCurrentBest,
        CompareCommand::SaveImage,
        CompareCommand::RejectImage,
        CompareCommand::Undo,
        CompareCommand::ExitComparison,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompareCommand::PreviousCandidate => "previousCandidate",
            CompareCommand::NextCandidate => "nextCandidate",
            CompareCommand::SelectCurrentBest => "selectCurrentBest",
            CompareCommand::SaveImage => "saveImage",
            CompareCommand::RejectImage => "rejectImage",
            CompareCommand::Undo => "undo",
            CompareCommand::ExitComparison => "exitComparison",
        }
    }

    /// Decisions are recorded in history; navigation and exit are not.
    pub fn is_decision(self) -> bool {
        matches!(
            self,
            CompareCommand::SelectCurrentBest
                | CompareCommand::SaveImage
                | CompareCommand::RejectImage
        )
    }
}

impl fmt::Display for CompareCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

/// Recoverable signals; state is never modified when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error("a comparison needs at least two images (got {len})")]
    InvalidBatch { len: usize },

    #[error("no candidate under review")]
    NoActiveCandidate,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("{0} is already rejected")]
    AlreadyRejected(ImageRef),

    #[error("{0} is saved and cannot be rejected")]
    AlreadySaved(ImageRef),

    #[error("no comparison in progress")]
    NoSession,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub winner: ImageRef,
    pub saved: Vec<ImageRef>,
    pub rejected: Vec<ImageRef>,
    pub remaining: Vec<ImageRef>,
    pub resolved: bool,
    pub decisions: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Updated,
    Exited(SessionSummary),
}

/// What a subscriber is told after a successful mutation.
#[derive(Debug)]
pub enum Change<'a> {
    Started(&'a ComparisonState),
    Updated {
        command: CompareCommand,
        state: &'a ComparisonState,
    },
    Exited(&'a SessionSummary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Change<'_>)>;

struct Session {
    state: ComparisonState,
    history: Vec<ComparisonState>,
}

impl Session {
    fn summary(&self) -> SessionSummary {
        let state = &self.state;
        SessionSummary {
            winner: state.current_best.clone(),
            saved: state.saved.to_vec(),
            rejected: state.rejected.to_vec(),
            remaining: state.candidates.clone(),
            resolved: state.is_resolved(),
            decisions: self.history.len(),
        }
    }
}

#[derive(Default)]
pub struct ComparisonEngine {
    session: Option<Session>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl ComparisonEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tournament over `batch`, discarding any session in progress.
    pub fn start_session(&mut self, batch: &[ImageRef]) -> Result<(), CompareError> {
        let state = ComparisonState::from_batch(batch)?;
        if self.session.is_some() {
            tracing::debug!("replacing comparison session in progress");
        }
        tracing::info!(images = batch.len(), "comparison session started");
        let session = self.session.insert(Session {
            state,
            history: Vec::new(),
        });
        let change = Change::Started(&session.state);
        notify(&mut self.listeners, &change);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Read-only view of the live state, `None` before the first session.
    pub fn snapshot(&self) -> Option<&ComparisonState> {
        self.session.as_ref().map(|s| &s.state)
    }

    pub fn history_depth(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.history.len())
    }

    pub fn previous_candidate(&mut self) -> Result<(), CompareError> {
        self.transition(CompareCommand::PreviousCandidate, ComparisonState::previous_candidate)
    }

    pub fn next_candidate(&mut self) -> Result<(), CompareError> {
        self.transition(CompareCommand::NextCandidate, ComparisonState::next_candidate)
    }

    /// The candidate under review becomes the best; the displaced best takes
    /// its slot in the queue.
    pub fn select_current_best(&mut self) -> Result<(), CompareError> {
        self.transition(CompareCommand::SelectCurrentBest, ComparisonState::select_current_best)
    }

    pub fn save_image(&mut self) -> Result<(), CompareError> {
        self.transition(CompareCommand::SaveImage, ComparisonState::save_image)
    }

    pub fn reject_image(&mut self) -> Result<(), CompareError> {
        self.transition(CompareCommand::RejectImage, ComparisonState::reject_image)
    }

    pub fn undo(&mut self) -> Result<(), CompareError> {
        let session = self.session.as_mut().ok_or(CompareError::NoSession)?;
        let previous = session.history.pop().ok_or(CompareError::NothingToUndo)?;
        session.state = previous;
        tracing::debug!(depth = session.history.len(), "undo");
        let change = Change::Updated {
            command: CompareCommand::Undo,
            state: &session.state,
        };
        notify(&mut self.listeners, &change);
        Ok(())
    }

    /// Ends the session and hands back its outcome.
    pub fn exit_comparison(&mut self) -> Result<SessionSummary, CompareError> {
        let session = self.session.take().ok_or(CompareError::NoSession)?;
        let summary = session.summary();
        tracing::info!(
            winner = %summary.winner,
            saved = summary.saved.len(),
            rejected = summary.rejected.len(),
            resolved = summary.resolved,
            "comparison session ended"
        );
        notify(&mut self.listeners, &Change::Exited(&summary));
        Ok(summary)
    }

    pub fn apply(&mut self, command: CompareCommand) -> Result<Applied, CompareError> {
        match command {
            CompareCommand::PreviousCandidate => self.previous_candidate()?,
            CompareCommand::NextCandidate => self.next_candidate()?,
            CompareCommand::SelectCurrentBest => self.select_current_best()?,
            CompareCommand::SaveImage => self.save_image()?,
            CompareCommand::RejectImage => self.reject_image()?,
            CompareCommand::Undo => self.undo()?,
            CompareCommand::ExitComparison => {
                return self.exit_comparison().map(Applied::Exited);
            }
        }
        Ok(Applied::Updated)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn transition(
        &mut self,
        command: CompareCommand,
        op: fn(&mut ComparisonState) -> Result<(), CompareError>,
    ) -> Result<(), CompareError> {
        let session = self.session.as_mut().ok_or(CompareError::NoSession)?;
        let before = command.is_decision().then(|| session.state.clone());
        if let Err(err) = op(&mut session.state) {
            if matches!(err, CompareError::AlreadyRejected(_)) {
                tracing::warn!(%err, "save refused for a rejected image");
            }
            return Err(err);
        }
        if let Some(before) = before {
            session.history.push(before);
            tracing::debug!(%command, depth = session.history.len(), "decision applied");
        }
        let change = Change::Updated {
            command,
            state: &session.state,
        };
        notify(&mut self.listeners, &change);
        Ok(())
    }
}

fn notify(listeners: &mut [(SubscriptionId, Listener)], change: &Change<'_>) {
    for (_, listener) in listeners.iter_mut() {
        listener(change);
    }
}

#[cfg(test)]
#[path = "tests/compare/engine_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/compare/property_tests.rs"]
mod property_tests;
