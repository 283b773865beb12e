use std::time::SystemTime;

use thiserror::Error;
use uuid::Uuid;

use crate::state::{
    engine::{self, ScoreState, Side},
    points::{PointEvent, PointLog},
    result::MatchResult,
    roster::{MatchMode, Roster, RosterError},
};

/// Lifecycle phases of a scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Participants are being selected; no score yet.
    Setup,
    /// Points are being played.
    InProgress,
    /// A winner is known; the score is frozen and the result can be submitted.
    Finished,
}

/// Operations that depend on the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Leave setup with a participant selection.
    Start,
    /// Record a point for a side.
    AddPoint(Side),
    /// Take a point back from a side.
    RemovePoint(Side),
    /// Send the match result to storage.
    Submit,
}

/// Error returned when an action is not allowed from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {action:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the session was in.
    pub from: SessionPhase,
    /// The refused action.
    pub action: SessionAction,
}

/// Identifier handed out with each submission attempt.
pub type TicketId = Uuid;

/// Errors raised by [`MatchSession`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The action is not valid in the current phase.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// The participant selection was refused; the session stays in setup.
    #[error(transparent)]
    Roster(#[from] RosterError),
    /// A submission is already waiting for the storage answer.
    #[error("result submission already in flight")]
    SubmissionInFlight,
    /// Storage already accepted this result.
    #[error("result already submitted")]
    AlreadySubmitted,
    /// The completed submission is not the pending one.
    #[error("submission ticket {got} does not match the pending submission")]
    TicketMismatch {
        /// Pending ticket, if any.
        expected: Option<TicketId>,
        /// Ticket that was reported.
        got: TicketId,
    },
}

/// Why a point event did not change the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The match is already decided.
    Finished,
    /// The side has no point to take back.
    AtZero,
}

/// Effect of a point event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// The score changed and the match goes on.
    Applied,
    /// The score changed and this point decided the match.
    Decided(Side),
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl PointOutcome {
    /// Whether the score changed.
    pub fn applied(self) -> bool {
        !matches!(self, PointOutcome::Ignored(_))
    }
}

/// Delivery state of the match result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Nothing was sent yet.
    NotSubmitted,
    /// A request is waiting for its answer.
    InFlight,
    /// The last attempt failed with the given operator-facing message.
    Failed(String),
    /// Storage accepted the result.
    Accepted,
}

/// A planned submission: the frozen result plus the ticket that must be
/// reported back to [`MatchSession::complete_submission`].
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    /// Ticket identifier.
    pub id: TicketId,
    /// Result to deliver.
    pub result: MatchResult,
}

/// Everything a view needs to render the scoreboard without re-deriving rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    /// Session identifier.
    pub session_id: Uuid,
    /// Match mode.
    pub mode: MatchMode,
    /// Current phase.
    pub phase: SessionPhase,
    /// Bumped on every state change.
    pub version: usize,
    /// Current score.
    pub score: ScoreState,
    /// Side serving the next point.
    pub server: Side,
    /// Participants, once the match started.
    pub roster: Option<Roster>,
    /// Winning side once terminal.
    pub winner: Option<Side>,
    /// Delivery state of the result.
    pub submission: SubmissionStatus,
    /// Points played so far, oldest first.
    pub points: Vec<PointEvent>,
}

impl Scoreboard {
    /// Label of `side`, if the roster is known.
    pub fn label(&self, side: Side) -> Option<String> {
        self.roster.as_ref().map(|roster| roster.label(side))
    }

    /// Label of the serving side.
    pub fn server_label(&self) -> Option<String> {
        self.label(self.server)
    }

    /// Label of the winner once the match is decided.
    pub fn winner_label(&self) -> Option<String> {
        self.winner.and_then(|side| self.label(side))
    }
}

/// Controller for a single match, from participant selection to result delivery.
///
/// The score engine never locks itself; this type is what refuses point
/// events once the match is decided.
#[derive(Debug, Clone)]
pub struct MatchSession {
    id: Uuid,
    mode: MatchMode,
    phase: SessionPhase,
    version: usize,
    roster: Option<Roster>,
    score: ScoreState,
    log: PointLog,
    started_at: Option<SystemTime>,
    result: Option<MatchResult>,
    submission: SubmissionStatus,
    pending: Option<TicketId>,
}

impl MatchSession {
    /// New session in setup for `mode`.
    pub fn new(mode: MatchMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            phase: SessionPhase::Setup,
            version: 0,
            roster: None,
            score: ScoreState::new(),
            log: PointLog::new(),
            started_at: None,
            result: None,
            submission: SubmissionStatus::NotSubmitted,
            pending: None,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Match mode, fixed for the lifetime of the session.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current score.
    pub fn score(&self) -> ScoreState {
        self.score
    }

    /// History of the points behind the current score.
    pub fn point_log(&self) -> &PointLog {
        &self.log
    }

    /// Participants once started.
    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    /// Start timestamp once started.
    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    /// Frozen result once finished.
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Delivery state of the result.
    pub fn submission(&self) -> &SubmissionStatus {
        &self.submission
    }

    /// Snapshot for display.
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            session_id: self.id,
            mode: self.mode,
            phase: self.phase,
            version: self.version,
            score: self.score,
            server: self.score.server(),
            roster: self.roster.clone(),
            winner: self.result.as_ref().map(MatchResult::winner),
            submission: self.submission.clone(),
            points: self.log.entries().to_vec(),
        }
    }

    /// Validate the participants and begin play at 0-0.
    ///
    /// A refused selection leaves the session untouched in setup.
    pub fn start(&mut self, names: Vec<String>) -> Result<Scoreboard, SessionError> {
        self.ensure_phase(SessionPhase::Setup, SessionAction::Start)?;

        let (roster, score) = engine::initialize(self.mode, names)?;
        self.roster = Some(roster);
        self.score = score;
        self.log.clear();
        self.started_at = Some(SystemTime::now());
        self.phase = SessionPhase::InProgress;
        self.version += 1;

        Ok(self.scoreboard())
    }

    /// Record a point for `side`.
    pub fn add_point(&mut self, side: Side) -> Result<PointOutcome, SessionError> {
        self.apply_point(SessionAction::AddPoint(side))
    }

    /// Take a point back from `side`. A side at zero is left alone.
    pub fn remove_point(&mut self, side: Side) -> Result<PointOutcome, SessionError> {
        self.apply_point(SessionAction::RemovePoint(side))
    }

    /// Plan a submission of the frozen result.
    ///
    /// Marks the result as in flight until [`Self::complete_submission`] is
    /// called with the returned ticket.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, SessionError> {
        self.ensure_phase(SessionPhase::Finished, SessionAction::Submit)?;

        match self.submission {
            SubmissionStatus::InFlight => return Err(SessionError::SubmissionInFlight),
            SubmissionStatus::Accepted => return Err(SessionError::AlreadySubmitted),
            SubmissionStatus::NotSubmitted | SubmissionStatus::Failed(_) => {}
        }

        let Some(result) = self.result.clone() else {
            return Err(InvalidTransition {
                from: self.phase,
                action: SessionAction::Submit,
            }
            .into());
        };

        let id = Uuid::new_v4();
        self.pending = Some(id);
        self.submission = SubmissionStatus::InFlight;
        self.version += 1;

        Ok(SubmissionTicket { id, result })
    }

    /// Record the storage answer for a planned submission.
    ///
    /// A failure keeps the session finished with its result intact so the
    /// operator can submit again.
    pub fn complete_submission(
        &mut self,
        ticket: TicketId,
        outcome: Result<(), String>,
    ) -> Result<&SubmissionStatus, SessionError> {
        if self.pending != Some(ticket) {
            return Err(SessionError::TicketMismatch {
                expected: self.pending,
                got: ticket,
            });
        }

        self.pending = None;
        self.submission = match outcome {
            Ok(()) => SubmissionStatus::Accepted,
            Err(message) => SubmissionStatus::Failed(message),
        };
        self.version += 1;

        Ok(&self.submission)
    }

    /// Abandon the current match and return to setup, keeping the mode.
    pub fn reset(&mut self) -> Scoreboard {
        self.phase = SessionPhase::Setup;
        self.roster = None;
        self.score = ScoreState::new();
        self.log.clear();
        self.started_at = None;
        self.result = None;
        self.submission = SubmissionStatus::NotSubmitted;
        self.pending = None;
        self.version += 1;

        self.scoreboard()
    }

    fn apply_point(&mut self, action: SessionAction) -> Result<PointOutcome, SessionError> {
        match self.phase {
            SessionPhase::Setup => {
                return Err(InvalidTransition {
                    from: self.phase,
                    action,
                }
                .into());
            }
            SessionPhase::Finished => return Ok(PointOutcome::Ignored(IgnoreReason::Finished)),
            SessionPhase::InProgress => {}
        }

        let next = match action {
            SessionAction::AddPoint(side) => {
                self.log.record(side, SystemTime::now());
                self.score.add_point(side)
            }
            SessionAction::RemovePoint(side) => {
                if self.log.retract(side).is_none() {
                    return Ok(PointOutcome::Ignored(IgnoreReason::AtZero));
                }
                self.score.remove_point(side)
            }
            SessionAction::Start | SessionAction::Submit => {
                return Err(InvalidTransition {
                    from: self.phase,
                    action,
                }
                .into());
            }
        };

        self.score = next;
        self.version += 1;

        match next.winner() {
            Some(winner) => {
                self.finish(winner);
                Ok(PointOutcome::Decided(winner))
            }
            None => Ok(PointOutcome::Applied),
        }
    }

    fn finish(&mut self, winner: Side) {
        let ended_at = SystemTime::now();
        let started_at = self.started_at.unwrap_or(ended_at);
        if let Some(roster) = self.roster.clone() {
            self.result = Some(
                MatchResult::new(roster, self.score, winner, started_at, ended_at)
                    .with_points(self.log.entries().to_vec()),
            );
        }
        self.phase = SessionPhase::Finished;
    }

    fn ensure_phase(
        &self,
        expected: SessionPhase,
        action: SessionAction,
    ) -> Result<(), InvalidTransition> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }
}
