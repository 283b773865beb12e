use std::time::SystemTime;

use crate::state::{
    engine::{ScoreState, Side},
    points::PointEvent,
    roster::{MatchMode, Roster},
};

/// Final record of a decided match. Built once when the winner is detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    roster: Roster,
    score: ScoreState,
    winner: Side,
    started_at: SystemTime,
    ended_at: SystemTime,
    points: Vec<PointEvent>,
}

impl MatchResult {
    /// Freeze the outcome of a match.
    pub fn new(
        roster: Roster,
        score: ScoreState,
        winner: Side,
        started_at: SystemTime,
        ended_at: SystemTime,
    ) -> Self {
        Self {
            roster,
            score,
            winner,
            started_at,
            ended_at,
            points: Vec::new(),
        }
    }

    /// Attach the point history the score was built from.
    pub fn with_points(mut self, points: Vec<PointEvent>) -> Self {
        self.points = points;
        self
    }

    /// Participants of the match.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mode the match was played in.
    pub fn mode(&self) -> MatchMode {
        self.roster.mode()
    }

    /// Final score.
    pub fn score(&self) -> ScoreState {
        self.score
    }

    /// Winning side.
    pub fn winner(&self) -> Side {
        self.winner
    }

    /// Label of the winning side.
    pub fn winner_label(&self) -> String {
        self.roster.label(self.winner)
    }

    /// When the match went in progress.
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// When the winning point was recorded.
    pub fn ended_at(&self) -> SystemTime {
        self.ended_at
    }

    /// Points of the match, oldest first.
    pub fn points(&self) -> &[PointEvent] {
        &self.points
    }
}
