//! Pure scoring rules: point totals, serve rotation and win detection.
//!
//! Nothing in here remembers history. The server and the winner are always
//! recomputed from the two point totals, so undoing a point can never leave
//! the rotation out of step with the score.

use std::fmt;

use thiserror::Error;

use crate::state::roster::{MatchMode, Roster, RosterError};

/// Points a side needs before it can win a game.
pub const POINTS_TO_WIN: u32 = 11;
/// Lead required over the opponent to close out a game.
pub const MIN_LEAD: u32 = 2;
/// Once both sides reach this many points, serve changes after every point.
pub const DEUCE_THRESHOLD: u32 = 10;
/// Consecutive serves per player outside the deuce zone.
pub const SERVES_PER_TURN: u32 = 2;

/// One of the two competitors of a match (a player or a doubles team).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Player 1 / team 1.
    A,
    /// Player 2 / team 2.
    B,
}

/// Raised when a side number outside `1..=2` reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("side must be 1 or 2 (got {0})")]
pub struct InvalidSide(pub u8);

impl Side {
    /// External numbering used by clients and the result payload.
    pub fn number(self) -> u8 {
        match self {
            Side::A => 1,
            Side::B => 2,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = InvalidSide;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Side::A),
            2 => Ok(Side::B),
            other => Err(InvalidSide(other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Point totals of both sides. Unsigned, so a total can never drop below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScoreState {
    points: [u32; 2],
}

impl ScoreState {
    /// A fresh 0-0 score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a score directly from both totals.
    pub fn from_points(a: u32, b: u32) -> Self {
        Self { points: [a, b] }
    }

    /// Points of `side`.
    pub fn points(&self, side: Side) -> u32 {
        self.points[side.index()]
    }

    /// Points played so far.
    pub fn total(&self) -> u32 {
        self.points[0] + self.points[1]
    }

    /// Score with one more point for `side`.
    #[must_use]
    pub fn add_point(self, side: Side) -> Self {
        let mut next = self;
        next.points[side.index()] = next.points[side.index()].saturating_add(1);
        next
    }

    /// Score with one point less for `side`; unchanged when `side` is at zero.
    #[must_use]
    pub fn remove_point(self, side: Side) -> Self {
        let mut next = self;
        let slot = &mut next.points[side.index()];
        if *slot > 0 {
            *slot -= 1;
        }
        next
    }

    /// Both sides have reached the deuce threshold.
    pub fn is_deuce(&self) -> bool {
        self.points.iter().all(|&points| points >= DEUCE_THRESHOLD)
    }

    /// Side that has won the game, if any.
    ///
    /// A side wins once it holds at least [`POINTS_TO_WIN`] points and leads
    /// by at least [`MIN_LEAD`]. This is evaluated from scratch on every call,
    /// so `(11, 10)` is still open while `(12, 10)` is closed.
    pub fn winner(&self) -> Option<Side> {
        let [a, b] = self.points;
        if a.max(b) >= POINTS_TO_WIN && a.abs_diff(b) >= MIN_LEAD {
            Some(if a > b { Side::A } else { Side::B })
        } else {
            None
        }
    }

    /// Side that serves the next point.
    ///
    /// In the deuce zone serve alternates every point (A on even totals).
    /// Before that each side serves [`SERVES_PER_TURN`] points in a row,
    /// starting with A.
    pub fn server(&self) -> Side {
        let total = self.total();
        let turn = if self.is_deuce() {
            total
        } else {
            total / SERVES_PER_TURN
        };
        if turn % 2 == 0 { Side::A } else { Side::B }
    }
}

impl fmt::Display for ScoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.points[0], self.points[1])
    }
}

/// Validate the participants for `mode` and return the roster with a 0-0 score.
pub fn initialize(
    mode: MatchMode,
    names: Vec<String>,
) -> Result<(Roster, ScoreState), RosterError> {
    let roster = Roster::new(mode, names)?;
    Ok((roster, ScoreState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(a: u32, b: u32) -> ScoreState {
        ScoreState::from_points(a, b)
    }

    #[test]
    fn starts_at_love_all_with_a_serving() {
        let state = ScoreState::new();
        assert_eq!(state.points(Side::A), 0);
        assert_eq!(state.points(Side::B), 0);
        assert_eq!(state.server(), Side::A);
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn remove_point_at_zero_is_a_no_op() {
        let state = ScoreState::new().remove_point(Side::A);
        assert_eq!(state, ScoreState::new());

        let state = score(0, 3).remove_point(Side::A).remove_point(Side::B);
        assert_eq!(state, score(0, 2));
    }

    #[test]
    fn points_never_go_negative_over_mixed_sequences() {
        let mut state = ScoreState::new();
        let script = [
            (true, Side::A),
            (false, Side::B),
            (false, Side::B),
            (false, Side::A),
            (false, Side::A),
            (true, Side::B),
            (false, Side::B),
            (false, Side::B),
        ];
        for (add, side) in script {
            state = if add {
                state.add_point(side)
            } else {
                state.remove_point(side)
            };
        }
        assert_eq!(state, ScoreState::new());
    }

    #[test]
    fn every_short_sequence_matches_a_clamped_count() {
        const OPS: [(bool, Side); 4] = [
            (true, Side::A),
            (true, Side::B),
            (false, Side::A),
            (false, Side::B),
        ];
        const MAX_LEN: u32 = 6;

        for len in 0..=MAX_LEN {
            for code in 0..OPS.len().pow(len) {
                let mut state = ScoreState::new();
                let mut expected = [0u32; 2];
                let mut rest = code;
                for _ in 0..len {
                    let (add, side) = OPS[rest % OPS.len()];
                    rest /= OPS.len();

                    let slot = &mut expected[side.index()];
                    if add {
                        *slot += 1;
                        state = state.add_point(side);
                    } else {
                        *slot = slot.saturating_sub(1);
                        state = state.remove_point(side);
                    }
                    assert_eq!(
                        state,
                        score(expected[0], expected[1]),
                        "sequence {code} of length {len}"
                    );
                }
            }
        }
    }

    #[test]
    fn winner_requires_eleven_and_a_two_point_lead() {
        assert_eq!(score(11, 9).winner(), Some(Side::A));
        assert_eq!(score(11, 10).winner(), None);
        assert_eq!(score(12, 10).winner(), Some(Side::A));
        assert_eq!(score(10, 10).winner(), None);
        assert_eq!(score(10, 0).winner(), None);
        assert_eq!(score(3, 11).winner(), Some(Side::B));
        assert_eq!(score(14, 16).winner(), Some(Side::B));
        assert_eq!(score(15, 16).winner(), None);
    }

    #[test]
    fn serve_changes_every_two_points_before_deuce() {
        let expected = [
            Side::A,
            Side::A,
            Side::B,
            Side::B,
            Side::A,
            Side::A,
            Side::B,
            Side::B,
        ];
        let mut state = ScoreState::new();
        for server in expected {
            assert_eq!(state.server(), server, "at {state}");
            state = state.add_point(Side::A);
        }
    }

    #[test]
    fn straight_eleven_points_wins_and_server_at_ten_is_b() {
        let mut state = ScoreState::new();
        let mut servers = Vec::new();
        for _ in 0..11 {
            servers.push(state.server());
            state = state.add_point(Side::A);
        }
        assert_eq!(state, score(11, 0));
        assert_eq!(state.winner(), Some(Side::A));
        // total = 10, group 5 is odd
        assert_eq!(servers[10], Side::B);
        assert_eq!(score(10, 0).server(), Side::B);
    }

    #[test]
    fn serve_alternates_every_point_in_the_deuce_zone() {
        assert!(score(10, 10).is_deuce());
        assert_eq!(score(10, 10).server(), Side::A);
        assert_eq!(score(11, 10).server(), Side::B);
        assert_eq!(score(11, 11).server(), Side::A);
        assert_eq!(score(12, 11).server(), Side::B);
        assert!(!score(10, 9).is_deuce());
    }

    #[test]
    fn deuce_then_two_points_closes_the_game() {
        let state = score(10, 10).add_point(Side::A);
        assert_eq!(state, score(11, 10));
        assert_eq!(state.winner(), None);

        let state = state.add_point(Side::A);
        assert_eq!(state, score(12, 10));
        assert_eq!(state.winner(), Some(Side::A));
    }

    #[test]
    fn server_depends_only_on_the_score() {
        let via_undo = score(0, 0)
            .add_point(Side::A)
            .add_point(Side::A)
            .add_point(Side::B)
            .remove_point(Side::A)
            .add_point(Side::B);
        let direct = score(1, 2);
        assert_eq!(via_undo, direct);
        assert_eq!(via_undo.server(), direct.server());

        let leaving_deuce = score(10, 10).remove_point(Side::B);
        assert_eq!(leaving_deuce.server(), score(10, 9).server());
        assert_eq!(leaving_deuce.server(), Side::B);
    }

    #[test]
    fn side_numbers_round_trip() {
        assert_eq!(Side::try_from(1), Ok(Side::A));
        assert_eq!(Side::try_from(2), Ok(Side::B));
        assert_eq!(Side::try_from(3), Err(InvalidSide(3)));
        assert_eq!(Side::try_from(0), Err(InvalidSide(0)));
    }

    #[test]
    fn initialize_validates_and_zeroes() {
        let (roster, state) =
            initialize(MatchMode::Singles, vec!["Ann".into(), "Bob".into()]).unwrap();
        assert_eq!(roster.mode(), MatchMode::Singles);
        assert_eq!(state, ScoreState::new());

        assert!(initialize(MatchMode::Singles, vec!["Ann".into(), "Ann".into()]).is_err());
    }
}
