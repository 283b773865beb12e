use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::{format_system_time, validation::validate_player_name},
    state::{
        engine::Side,
        points::PointEvent,
        roster::MatchMode,
        session::{PointOutcome, Scoreboard, SessionPhase, SubmissionStatus},
    },
};

/// Payload opening a new scoreboard.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// `"single"` or `"double"`; fixed for the session lifetime.
    pub mode: MatchMode,
}

/// Participant selection that moves a session out of setup.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartMatchRequest {
    /// Singles: `[player1, player2]`. Doubles:
    /// `[team1_player1, team1_player2, team2_player1, team2_player2]`.
    pub players: Vec<String>,
}

impl Validate for StartMatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !matches!(self.players.len(), 2 | 4) {
            let mut err = ValidationError::new("players_count");
            err.message = Some(
                format!(
                    "Expected 2 (singles) or 4 (doubles) players, got {}",
                    self.players.len()
                )
                .into(),
            );
            errors.add("players", err);
        }

        for name in &self.players {
            if let Err(e) = validate_player_name(name) {
                errors.add("players", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A point event for one side.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PointRequest {
    /// `1` or `2`.
    #[validate(range(min = 1, max = 2))]
    pub side: u8,
}

/// Publicly visible session phase.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisiblePhase {
    /// Participants are being selected.
    Setup,
    /// Points are being played.
    InProgress,
    /// The match is decided.
    Finished,
}

impl From<SessionPhase> for VisiblePhase {
    fn from(value: SessionPhase) -> Self {
        match value {
            SessionPhase::Setup => VisiblePhase::Setup,
            SessionPhase::InProgress => VisiblePhase::InProgress,
            SessionPhase::Finished => VisiblePhase::Finished,
        }
    }
}

/// Publicly visible delivery state of the match result.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleSubmission {
    /// Not sent yet.
    NotSubmitted,
    /// Waiting for the storage answer.
    InFlight,
    /// Last attempt failed; see `submission_error`.
    Failed,
    /// Stored.
    Accepted,
}

/// One entry of the point history.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PointView {
    /// Side that scored (`1` or `2`).
    pub side: u8,
    /// Position in the match; gaps are undone points.
    pub order: u32,
    /// RFC 3339 timestamp.
    pub at: String,
}

impl From<&PointEvent> for PointView {
    fn from(event: &PointEvent) -> Self {
        Self {
            side: event.side.number(),
            order: event.order,
            at: format_system_time(event.at),
        }
    }
}

/// Scoreboard as rendered by the view layer.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ScoreboardView {
    pub session_id: Uuid,
    pub mode: MatchMode,
    pub phase: VisiblePhase,
    /// Increases on every change; lets views drop stale updates.
    pub version: usize,
    pub score1: u32,
    pub score2: u32,
    /// Side serving the next point (`1` or `2`).
    pub server: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side1_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side2_label: Option<String>,
    /// Present once the match is decided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_label: Option<String>,
    pub submission: VisibleSubmission,
    /// Storage message of the last failed submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_error: Option<String>,
    /// Points played so far, oldest first.
    pub points: Vec<PointView>,
}

impl From<&Scoreboard> for ScoreboardView {
    fn from(board: &Scoreboard) -> Self {
        let (submission, submission_error) = match &board.submission {
            SubmissionStatus::NotSubmitted => (VisibleSubmission::NotSubmitted, None),
            SubmissionStatus::InFlight => (VisibleSubmission::InFlight, None),
            SubmissionStatus::Failed(message) => {
                (VisibleSubmission::Failed, Some(message.clone()))
            }
            SubmissionStatus::Accepted => (VisibleSubmission::Accepted, None),
        };

        Self {
            session_id: board.session_id,
            mode: board.mode,
            phase: board.phase.into(),
            version: board.version,
            score1: board.score.points(Side::A),
            score2: board.score.points(Side::B),
            server: board.server.number(),
            server_label: board.server_label(),
            side1_label: board.label(Side::A),
            side2_label: board.label(Side::B),
            winner: board.winner.map(Side::number),
            winner_label: board.winner_label(),
            submission,
            submission_error,
            points: board.points.iter().map(PointView::from).collect(),
        }
    }
}

impl From<Scoreboard> for ScoreboardView {
    fn from(board: Scoreboard) -> Self {
        Self::from(&board)
    }
}

/// Answer to a point event.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct PointResponse {
    /// False when the event was ignored (side at zero, match decided).
    pub applied: bool,
    /// True when this very point decided the match.
    pub decided: bool,
    pub scoreboard: ScoreboardView,
}

impl PointResponse {
    /// Combine a point outcome with the scoreboard after it.
    pub fn new(outcome: PointOutcome, scoreboard: ScoreboardView) -> Self {
        Self {
            applied: outcome.applied(),
            decided: matches!(outcome, PointOutcome::Decided(_)),
            scoreboard,
        }
    }
}

/// Entry of the session list.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct SessionListItem {
    pub session_id: Uuid,
    pub mode: MatchMode,
    pub phase: VisiblePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side1_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side2_label: Option<String>,
}

impl From<&Scoreboard> for SessionListItem {
    fn from(board: &Scoreboard) -> Self {
        Self {
            session_id: board.session_id,
            mode: board.mode,
            phase: board.phase.into(),
            side1_label: board.label(Side::A),
            side2_label: board.label(Side::B),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::MatchSession;

    #[test]
    fn start_request_checks_count_and_names() {
        let ok = StartMatchRequest {
            players: vec!["Ann".into(), "Bob".into()],
        };
        assert!(ok.validate().is_ok());

        let three = StartMatchRequest {
            players: vec!["A".into(), "B".into(), "C".into()],
        };
        assert!(three.validate().is_err());

        let blank = StartMatchRequest {
            players: vec!["A".into(), " ".into()],
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("players"));
    }

    #[test]
    fn point_request_accepts_only_sides_one_and_two() {
        assert!(PointRequest { side: 1 }.validate().is_ok());
        assert!(PointRequest { side: 2 }.validate().is_ok());
        assert!(PointRequest { side: 0 }.validate().is_err());
        assert!(PointRequest { side: 3 }.validate().is_err());
    }

    #[test]
    fn view_exposes_labels_server_and_winner() {
        let mut session = MatchSession::new(MatchMode::Doubles);
        session
            .start(vec!["A".into(), "B".into(), "C".into(), "D".into()])
            .unwrap();
        for _ in 0..2 {
            session.add_point(Side::B).unwrap();
        }

        let view = ScoreboardView::from(session.scoreboard());
        assert_eq!(view.phase, VisiblePhase::InProgress);
        assert_eq!((view.score1, view.score2), (0, 2));
        assert_eq!(view.server, 2);
        assert_eq!(view.server_label.as_deref(), Some("C / D"));
        assert_eq!(view.side1_label.as_deref(), Some("A / B"));
        assert!(view.winner.is_none());
        assert_eq!(view.points.len(), 2);
        assert_eq!(view.points[1].side, 2);
        assert_eq!(view.points[1].order, 2);

        for _ in 0..9 {
            session.add_point(Side::B).unwrap();
        }
        let view = ScoreboardView::from(session.scoreboard());
        assert_eq!(view.phase, VisiblePhase::Finished);
        assert_eq!(view.winner, Some(2));
        assert_eq!(view.winner_label.as_deref(), Some("C / D"));
        assert_eq!(view.submission, VisibleSubmission::NotSubmitted);
    }

    #[test]
    fn setup_view_has_no_labels() {
        let session = MatchSession::new(MatchMode::Singles);
        let value = serde_json::to_value(ScoreboardView::from(session.scoreboard())).unwrap();
        assert_eq!(value["phase"], "setup");
        assert_eq!(value["mode"], "single");
        assert_eq!(value["server"], 1);
        assert!(value.get("side1_label").is_none());
        assert!(value.get("winner").is_none());
    }
}
