use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::state::engine::Side;

/// Whether a match is played one against one or two against two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MatchMode {
    /// One player per side.
    #[serde(rename = "single")]
    Singles,
    /// Two players per side.
    #[serde(rename = "double")]
    Doubles,
}

impl MatchMode {
    /// Number of names a roster of this mode holds.
    pub fn player_count(self) -> usize {
        match self {
            MatchMode::Singles => 2,
            MatchMode::Doubles => 4,
        }
    }

    /// Wire name used by the result payload.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Singles => "single",
            MatchMode::Doubles => "double",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a participant selection is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The number of names does not match the match mode.
    #[error("{mode} match needs {expected} player names (got {got})")]
    WrongCount {
        /// Mode the names were given for.
        mode: MatchMode,
        /// Names required by the mode.
        expected: usize,
        /// Names actually supplied.
        got: usize,
    },
    /// A name is empty or whitespace only.
    #[error("player {position} name must not be blank")]
    Blank {
        /// One-based position of the offending name.
        position: usize,
    },
    /// The same name appears more than once.
    #[error("player `{name}` is selected more than once")]
    Duplicate {
        /// The repeated (trimmed) name.
        name: String,
    },
}

/// Validated participants of a match, grouped by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roster {
    /// One name per side.
    Singles {
        /// Side A.
        player1: String,
        /// Side B.
        player2: String,
    },
    /// An ordered pair of names per side.
    Doubles {
        /// Side A.
        team1: [String; 2],
        /// Side B.
        team2: [String; 2],
    },
}

impl Roster {
    /// Validate `names` for `mode`.
    ///
    /// Names are trimmed first. Singles takes `[player1, player2]`, doubles
    /// takes `[team1_player1, team1_player2, team2_player1, team2_player2]`.
    /// Every name must be non-blank and distinct from all the others.
    pub fn new(mode: MatchMode, names: Vec<String>) -> Result<Self, RosterError> {
        let expected = mode.player_count();
        if names.len() != expected {
            return Err(RosterError::WrongCount {
                mode,
                expected,
                got: names.len(),
            });
        }

        let names = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .collect::<Vec<_>>();

        let mut seen = HashSet::new();
        for (index, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(RosterError::Blank { position: index + 1 });
            }
            if !seen.insert(name.as_str()) {
                return Err(RosterError::Duplicate { name: name.clone() });
            }
        }

        let mut names = names.into_iter();
        let mut next = || names.next().unwrap_or_default();
        let roster = match mode {
            MatchMode::Singles => Roster::Singles {
                player1: next(),
                player2: next(),
            },
            MatchMode::Doubles => Roster::Doubles {
                team1: [next(), next()],
                team2: [next(), next()],
            },
        };
        Ok(roster)
    }

    /// Mode this roster was validated for.
    pub fn mode(&self) -> MatchMode {
        match self {
            Roster::Singles { .. } => MatchMode::Singles,
            Roster::Doubles { .. } => MatchMode::Doubles,
        }
    }

    /// Display label of `side`: the player name, or both team names joined by ` / `.
    pub fn label(&self, side: Side) -> String {
        match (self, side) {
            (Roster::Singles { player1, .. }, Side::A) => player1.clone(),
            (Roster::Singles { player2, .. }, Side::B) => player2.clone(),
            (Roster::Doubles { team1, .. }, Side::A) => team1.join(" / "),
            (Roster::Doubles { team2, .. }, Side::B) => team2.join(" / "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn singles_requires_two_distinct_names() {
        let roster = Roster::new(MatchMode::Singles, names(&["Ann", "Bob"])).unwrap();
        assert_eq!(roster.label(Side::A), "Ann");
        assert_eq!(roster.label(Side::B), "Bob");

        assert_eq!(
            Roster::new(MatchMode::Singles, names(&["Ann", "Ann"])),
            Err(RosterError::Duplicate { name: "Ann".into() })
        );
    }

    #[test]
    fn names_are_trimmed_before_comparison() {
        assert_eq!(
            Roster::new(MatchMode::Singles, names(&["Ann ", " Ann"])),
            Err(RosterError::Duplicate { name: "Ann".into() })
        );
        let roster = Roster::new(MatchMode::Singles, names(&["  Ann", "Bob  "])).unwrap();
        assert_eq!(roster.label(Side::A), "Ann");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            Roster::new(MatchMode::Singles, names(&["Ann", "   "])),
            Err(RosterError::Blank { position: 2 })
        );
        assert_eq!(
            Roster::new(MatchMode::Doubles, names(&["", "B", "C", "D"])),
            Err(RosterError::Blank { position: 1 })
        );
    }

    #[test]
    fn doubles_requires_four_pairwise_distinct_names() {
        let roster = Roster::new(MatchMode::Doubles, names(&["A", "B", "C", "D"])).unwrap();
        assert_eq!(roster.mode(), MatchMode::Doubles);
        assert_eq!(roster.label(Side::A), "A / B");
        assert_eq!(roster.label(Side::B), "C / D");

        assert_eq!(
            Roster::new(MatchMode::Doubles, names(&["A", "B", "A", "D"])),
            Err(RosterError::Duplicate { name: "A".into() })
        );
        assert!(Roster::new(MatchMode::Doubles, names(&["A", "A", "C", "D"])).is_err());
    }

    #[test]
    fn name_count_must_match_mode() {
        assert_eq!(
            Roster::new(MatchMode::Doubles, names(&["A", "B"])),
            Err(RosterError::WrongCount {
                mode: MatchMode::Doubles,
                expected: 4,
                got: 2,
            })
        );
        assert!(Roster::new(MatchMode::Singles, names(&["A"])).is_err());
        assert!(Roster::new(MatchMode::Singles, Vec::new()).is_err());
    }
}
